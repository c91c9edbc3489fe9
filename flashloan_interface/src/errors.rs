use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, Hash, PartialEq)]
pub enum FlashloanError {
    #[error("Account balance is lower than the amount to debit")]
    InsufficientFunds = 6000, // 0x1770

    #[error("Amount overflowed while crediting or computing fees")]
    AmountOverflow = 6001, // 0x1771

    #[error("Pool does not hold enough of the asset to lend")]
    InsufficientLiquidity = 6002, // 0x1772

    #[error("Borrower strategy failed")]
    StrategyFailed = 6003, // 0x1773

    #[error("Borrower could not return principal plus fee")]
    RepaymentFailed = 6004, // 0x1774

    #[error("Pool reserves are below pre-loan reserves plus fee after the callback")]
    LoanNotRepaid = 6005, // 0x1775

    #[error("Pool does not lend this asset")]
    UnsupportedAsset = 6006, // 0x1776

    #[error("Invalid fee policy")]
    InvalidFee = 6007, // 0x1777
}

impl FlashloanError {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for err in [
            FlashloanError::InsufficientFunds,
            FlashloanError::AmountOverflow,
            FlashloanError::InsufficientLiquidity,
            FlashloanError::StrategyFailed,
            FlashloanError::RepaymentFailed,
            FlashloanError::LoanNotRepaid,
            FlashloanError::UnsupportedAsset,
            FlashloanError::InvalidFee,
        ] {
            assert_eq!(FlashloanError::from_code(err.code()), Some(err));
        }
        assert_eq!(FlashloanError::from_code(0x1772), Some(FlashloanError::InsufficientLiquidity));
        assert_eq!(FlashloanError::from_code(5999), None);
    }
}
