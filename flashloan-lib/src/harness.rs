//! Test-network helpers: act as any account, check preconditions.
//!
//! Nothing here goes through a flash loan call. Writes land directly on the
//! ledger and are never journaled unless the caller opened a journal.

use flashloan_interface::{AccountId, AssetId, FlashloanError};
use thiserror::Error;
use tracing::info;

use crate::Ledger;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HarnessError {
    #[error("{account} holds {balance} {asset}, needs at least {required}")]
    BalanceTooLow {
        account: AccountId,
        asset: AssetId,
        balance: u128,
        required: u128,
    },

    #[error(transparent)]
    Ledger(#[from] FlashloanError),
}

/// Moves funds out of `account` with no authorization check.
#[derive(Debug)]
pub struct Impersonated<'a> {
    ledger: &'a mut Ledger,
    account: AccountId,
}

pub fn impersonate<'a>(ledger: &'a mut Ledger, account: &AccountId) -> Impersonated<'a> {
    info!(%account, "impersonating");
    Impersonated {
        ledger,
        account: account.clone(),
    }
}

impl Impersonated<'_> {
    pub fn balance(&self, asset: &AssetId) -> u128 {
        self.ledger.balance(&self.account, asset)
    }

    pub fn transfer(
        &mut self,
        to: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), HarnessError> {
        ensure_balance_at_least(self.ledger, &self.account, asset, amount)?;
        self.ledger.transfer(&self.account, to, asset, amount)?;
        Ok(())
    }
}

/// Returns the current balance if it is at least `min`
pub fn ensure_balance_at_least(
    ledger: &Ledger,
    account: &AccountId,
    asset: &AssetId,
    min: u128,
) -> Result<u128, HarnessError> {
    let balance = ledger.balance(account, asset);
    if balance < min {
        return Err(HarnessError::BalanceTooLow {
            account: account.clone(),
            asset: asset.clone(),
            balance,
            required: min,
        });
    }
    Ok(balance)
}

/// Impersonates `from` and sends `amount` of `asset` to `to`.
pub fn fund(
    ledger: &mut Ledger,
    from: &AccountId,
    to: &AccountId,
    asset: &AssetId,
    amount: u128,
) -> Result<(), HarnessError> {
    impersonate(ledger, from).transfer(to, asset, amount)?;
    info!(%from, %to, %asset, amount, "funded");
    Ok(())
}
