use flashloan_interface::{
    AccountId, AssetId, FlashloanError, LoanRecord, RECEIVED_MSG, REPAYING_MSG,
    REPAYMENT_FAILED_MSG, STRATEGY_FAILED_MSG,
};
use thiserror::Error;
use tracing::debug;

use crate::{EventLog, FlashloanStrategy, Ledger, StrategyError};

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("strategy failed: {0}")]
    StrategyFailed(#[source] StrategyError),

    #[error("repayment failed: {0}")]
    RepaymentFailed(#[source] FlashloanError),
}

impl CallbackError {
    pub fn kind(&self) -> FlashloanError {
        match self {
            Self::StrategyFailed(_) => FlashloanError::StrategyFailed,
            Self::RepaymentFailed(_) => FlashloanError::RepaymentFailed,
        }
    }
}

/// What a borrower may touch while it holds a loan. Every write goes
/// through the journaled ledger of the enclosing flash loan call.
#[derive(Debug)]
pub struct CallbackContext<'a> {
    ledger: &'a mut Ledger,
    events: &'a mut EventLog,
    this: AccountId,
}

impl<'a> CallbackContext<'a> {
    pub fn new(ledger: &'a mut Ledger, events: &'a mut EventLog, this: AccountId) -> Self {
        Self {
            ledger,
            events,
            this,
        }
    }

    /// The borrower's own account
    pub fn this(&self) -> &AccountId {
        &self.this
    }

    pub fn balance(&self, asset: &AssetId) -> u128 {
        self.ledger.balance(&self.this, asset)
    }

    pub fn balance_of(&self, account: &AccountId, asset: &AssetId) -> u128 {
        self.ledger.balance(account, asset)
    }

    /// Moves `amount` of `asset` out of the borrower's own account
    pub fn transfer(
        &mut self,
        to: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), FlashloanError> {
        self.ledger.transfer(&self.this, to, asset, amount)
    }

    pub fn emit(&mut self, message: &str, value: u128) {
        self.events.emit(message, value);
    }
}

/// Receiving side of a flash loan.
pub trait FlashBorrower {
    fn account(&self) -> &AccountId;

    /// Called after `amount` of `asset` has been credited to [`Self::account`].
    /// Must leave `amount + fee` with `lender` before returning Ok.
    fn on_flashloan(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        lender: &AccountId,
        asset: &AssetId,
        amount: u128,
        fee: u128,
    ) -> Result<(), CallbackError>;

    /// Called once the enclosing flash loan call has completed and committed.
    fn on_flashloan_settled(&mut self, _loan: &LoanRecord) {}
}

/// Borrower contract that runs a [`FlashloanStrategy`] and then repays
/// principal + fee out of its own balance.
#[derive(Debug)]
pub struct FlashloanReceiver<S> {
    account: AccountId,
    strategy: S,

    /// Borrower of the most recently completed loan
    user: Option<AccountId>,
}

impl<S: FlashloanStrategy> FlashloanReceiver<S> {
    pub fn new(account: AccountId, strategy: S) -> Self {
        Self {
            account,
            strategy,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&AccountId> {
        self.user.as_ref()
    }
}

impl<S: FlashloanStrategy> FlashBorrower for FlashloanReceiver<S> {
    fn account(&self) -> &AccountId {
        &self.account
    }

    fn on_flashloan(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        lender: &AccountId,
        asset: &AssetId,
        amount: u128,
        fee: u128,
    ) -> Result<(), CallbackError> {
        ctx.emit(RECEIVED_MSG, amount);

        if let Err(err) = self.strategy.execute(ctx, asset, amount) {
            ctx.emit(STRATEGY_FAILED_MSG, amount);
            return Err(CallbackError::StrategyFailed(err));
        }

        let repay = amount.checked_add(fee).ok_or_else(|| {
            ctx.emit(REPAYMENT_FAILED_MSG, amount);
            CallbackError::RepaymentFailed(FlashloanError::AmountOverflow)
        })?;
        ctx.emit(REPAYING_MSG, repay);
        debug!(%lender, %asset, repay, held = ctx.balance(asset), "repaying flash loan");
        ctx.transfer(lender, asset, repay).map_err(|err| {
            ctx.emit(REPAYMENT_FAILED_MSG, repay);
            CallbackError::RepaymentFailed(err)
        })
    }

    fn on_flashloan_settled(&mut self, loan: &LoanRecord) {
        self.user = Some(loan.borrower.clone());
    }
}
