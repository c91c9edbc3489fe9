//! The lender.
//!
//! borrow
//! - checks the pool holds at least the principal
//! - snapshots the pool's balance, moves the principal to the borrower
//!
//! settle
//! - checks the pool's balance is back to at least snapshot + fee

use std::collections::BTreeSet;

use flashloan_interface::{
    AccountId, AssetId, FeePolicy, FlashloanError, LoanRecord, LoanStatus,
    DISBURSEMENT_FAILED_MSG, FEE_OVERFLOW_MSG, INSUFFICIENT_LIQUIDITY_MSG, LOAN_INITIATED_MSG,
    LOAN_NOT_REPAID_MSG, LOAN_REPAID_MSG, UNSUPPORTED_ASSET_MSG,
};
use tracing::debug;

use crate::{EventLog, FlashLoanFeeCalc, Ledger};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    account: AccountId,
    fee: FeePolicy,

    /// None lends any asset the pool holds
    supported_assets: Option<BTreeSet<AssetId>>,
}

impl Pool {
    pub fn new(account: AccountId, fee: FeePolicy) -> Self {
        Self {
            account,
            fee,
            supported_assets: None,
        }
    }

    pub fn with_supported_assets<I: IntoIterator<Item = AssetId>>(mut self, assets: I) -> Self {
        self.supported_assets = Some(assets.into_iter().collect());
        self
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn fee_policy(&self) -> &FeePolicy {
        &self.fee
    }

    pub fn supported_assets(&self) -> Option<&BTreeSet<AssetId>> {
        self.supported_assets.as_ref()
    }

    pub fn validate(&self) -> Result<(), FlashloanError> {
        match self.fee.is_valid() {
            true => Ok(()),
            false => Err(FlashloanError::InvalidFee),
        }
    }

    pub fn supports(&self, asset: &AssetId) -> bool {
        self.supported_assets
            .as_ref()
            .map_or(true, |assets| assets.contains(asset))
    }

    /// The fee to be charged on top of `amount` for a loan of `asset`.
    pub fn flash_fee(&self, asset: &AssetId, amount: u128) -> Result<u128, FlashloanError> {
        if !self.supports(asset) {
            return Err(FlashloanError::UnsupportedAsset);
        }
        self.fee
            .apply(amount)
            .ok_or(FlashloanError::AmountOverflow)
    }

    /// The amount of `asset` that can currently be borrowed.
    pub fn max_flash_loan(&self, ledger: &Ledger, asset: &AssetId) -> u128 {
        match self.supports(asset) {
            true => ledger.balance(&self.account, asset),
            false => 0,
        }
    }

    pub fn borrow(
        &self,
        ledger: &mut Ledger,
        events: &mut EventLog,
        borrower: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<LoanRecord, FlashloanError> {
        let fee = match self.flash_fee(asset, amount) {
            Ok(fee) => fee,
            Err(err) => {
                let msg = match err {
                    FlashloanError::UnsupportedAsset => UNSUPPORTED_ASSET_MSG,
                    _ => FEE_OVERFLOW_MSG,
                };
                events.emit(msg, amount);
                return Err(err);
            }
        };
        if amount.checked_add(fee).is_none() {
            events.emit(FEE_OVERFLOW_MSG, amount);
            return Err(FlashloanError::AmountOverflow);
        }

        let pool_balance_before = ledger.balance(&self.account, asset);
        if pool_balance_before < amount {
            events.emit(INSUFFICIENT_LIQUIDITY_MSG, amount);
            return Err(FlashloanError::InsufficientLiquidity);
        }

        let mut loan = LoanRecord::new(
            asset.clone(),
            amount,
            fee,
            borrower.clone(),
            pool_balance_before,
        );
        if let Err(err) = ledger.transfer(&self.account, borrower, asset, amount) {
            events.emit(DISBURSEMENT_FAILED_MSG, amount);
            return Err(err);
        }
        loan.status = LoanStatus::Disbursed;
        events.emit(LOAN_INITIATED_MSG, amount);
        Ok(loan)
    }

    pub fn settle(
        &self,
        ledger: &Ledger,
        events: &mut EventLog,
        loan: &mut LoanRecord,
    ) -> Result<(), FlashloanError> {
        let (required, expected) = match (
            loan.repayment(),
            loan.pool_balance_before.checked_add(loan.fee),
        ) {
            (Some(r), Some(e)) => (r, e),
            _ => {
                events.emit(FEE_OVERFLOW_MSG, loan.principal);
                return Err(FlashloanError::AmountOverflow);
            }
        };
        let pool_balance_after = ledger.balance(&self.account, &loan.asset);
        debug!(pool_balance_after, expected, "settling flash loan");
        if pool_balance_after < expected {
            events.emit(LOAN_NOT_REPAID_MSG, expected - pool_balance_after);
            return Err(FlashloanError::LoanNotRepaid);
        }
        loan.status = LoanStatus::Repaid;
        events.emit(LOAN_REPAID_MSG, required);
        Ok(())
    }
}
