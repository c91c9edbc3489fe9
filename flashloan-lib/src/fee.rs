use flashloan_interface::FeePolicy;

use crate::RationalQty;

pub trait FlashLoanFeeCalc {
    fn is_valid(&self) -> bool;

    /// Returns the fee to be charged on top of `principal`.
    ///
    /// Returns None if any calculation errors occurred
    fn apply(&self, principal: u128) -> Option<u128>;

    /// Returns `principal + self.apply(principal)`, the amount
    /// the pool must get back before the loan is settled.
    ///
    /// Returns None if any calculation errors occurred
    fn repayment(&self, principal: u128) -> Option<u128> {
        principal.checked_add(self.apply(principal)?)
    }
}

impl<T: FlashLoanFeeCalc + ?Sized> FlashLoanFeeCalc for &T {
    fn is_valid(&self) -> bool {
        (*self).is_valid()
    }

    fn apply(&self, principal: u128) -> Option<u128> {
        (*self).apply(principal)
    }

    fn repayment(&self, principal: u128) -> Option<u128> {
        (*self).repayment(principal)
    }
}

impl FlashLoanFeeCalc for FeePolicy {
    fn is_valid(&self) -> bool {
        match self {
            Self::Flat { .. } => true,
            Self::Proportional { ratio } => ratio.is_valid() && ratio.is_lte_one(),
        }
    }

    fn apply(&self, principal: u128) -> Option<u128> {
        match self {
            Self::Flat { amount } => Some(*amount),
            Self::Proportional { ratio } => ratio.ceil_mul(principal),
        }
    }
}
