//! Event messages emitted during a flash loan and well-known amounts.

/// Pool disbursed the principal to the borrower
pub const LOAN_INITIATED_MSG: &str = "loan initiated";

/// Pool observed principal + fee back in its reserves
pub const LOAN_REPAID_MSG: &str = "loan repaid";

/// Borrower callback was entered with the principal
pub const RECEIVED_MSG: &str = "received";

/// Borrower is about to return principal + fee
pub const REPAYING_MSG: &str = "repaying";

pub const INSUFFICIENT_LIQUIDITY_MSG: &str = "insufficient liquidity";

pub const UNSUPPORTED_ASSET_MSG: &str = "unsupported asset";

pub const FEE_OVERFLOW_MSG: &str = "fee overflow";

pub const DISBURSEMENT_FAILED_MSG: &str = "disbursement failed";

pub const STRATEGY_FAILED_MSG: &str = "strategy failed";

pub const REPAYMENT_FAILED_MSG: &str = "repayment failed";

/// Value is the shortfall against principal + fee
pub const LOAN_NOT_REPAID_MSG: &str = "loan not repaid";

/// Value is the number of ledger writes that were undone
pub const REVERTED_MSG: &str = "reverted";

/// dYdX Solo charges a constant 2 wei on every flash loan
pub const SOLO_FLASH_LOAN_FEE: u128 = 2;
