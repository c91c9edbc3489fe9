use borsh::{BorshDeserialize, BorshSerialize};
use std::fmt;

/// Holder of balances: the pool, a borrower contract or an external user.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, BorshDeserialize, BorshSerialize,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccountId(pub String);

/// Identifier (address or symbol) of a fungible token.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, BorshDeserialize, BorshSerialize,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetId(pub String);

macro_rules! string_id {
    ($id:ident) => {
        impl $id {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $id {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $id {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(AccountId);
string_id!(AssetId);

/// A ratio. Denom should not = 0
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rational {
    pub num: u64,
    pub denom: u64,
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FeePolicy {
    /// Charges the same fee on every loan regardless of principal
    Flat { amount: u128 },

    /// Charges ceil(principal * ratio)
    ///
    /// Invariants:
    ///  - ratio is a valid Rational
    ///  - ratio <= 1
    Proportional { ratio: Rational },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoanStatus {
    Initiated,
    Disbursed,
    Repaid,
    Failed,
}

/// Accounting for one in-flight flash loan. Lives only for the duration of
/// the call that created it.
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanRecord {
    pub asset: AssetId,
    pub principal: u128,
    pub fee: u128,
    pub borrower: AccountId,
    pub status: LoanStatus,

    /// The pool's balance of `asset` right before the principal left it
    pub pool_balance_before: u128,
}

impl LoanRecord {
    pub fn new(
        asset: AssetId,
        principal: u128,
        fee: u128,
        borrower: AccountId,
        pool_balance_before: u128,
    ) -> Self {
        Self {
            asset,
            principal,
            fee,
            borrower,
            status: LoanStatus::Initiated,
            pool_balance_before,
        }
    }

    /// principal + fee, None on overflow
    pub fn repayment(&self) -> Option<u128> {
        self.principal.checked_add(self.fee)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventLogEntry {
    pub message: String,
    pub value: u128,
}

impl fmt::Display for EventLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.message, self.value)
    }
}
