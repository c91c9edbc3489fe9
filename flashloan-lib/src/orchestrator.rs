//! Entry point of a flash loan.
//!
//! Idle -> Borrowing -> CallbackRunning -> Settling -> Completed
//!
//! Any failure moves the call to Reverted, and every ledger write made since
//! Borrowing is undone before the error is returned.

use borsh::{BorshDeserialize, BorshSerialize};
use flashloan_interface::{AccountId, AssetId, FlashloanError, LoanRecord, LoanStatus, REVERTED_MSG};
use thiserror::Error;
use tracing::{info, trace, warn};

use crate::{
    CallbackContext, CallbackError, EventLog, FlashBorrower, Ledger, Pool, StrategyError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlashloanState {
    Idle,
    Borrowing,
    CallbackRunning,
    Settling,
    Completed,
    Reverted,
}

impl FlashloanState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Reverted)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Idle, Self::Borrowing)
            | (Self::Borrowing, Self::CallbackRunning)
            | (Self::CallbackRunning, Self::Settling)
            | (Self::Settling, Self::Completed) => true,
            (from, Self::Reverted) => !from.is_terminal(),
            _ => false,
        }
    }

    fn advance(&mut self, next: Self) {
        debug_assert!(
            self.can_transition_to(next),
            "invalid flash loan transition {self:?} -> {next:?}"
        );
        trace!(from = ?self, to = ?next, "flash loan transition");
        *self = next;
    }
}

/// Outcome of a Completed call
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct FlashloanReceipt {
    pub loan: LoanRecord,
    pub events: EventLog,
}

impl FlashloanReceipt {
    pub fn state(&self) -> FlashloanState {
        FlashloanState::Completed
    }
}

/// Outcome of a Reverted call. The ledger is back to its pre-call state.
#[derive(Debug, Error)]
#[error("flash loan reverted while {failed_in:?}: {error}")]
pub struct FlashloanReverted {
    pub error: FlashloanError,

    /// The state the call was in when it failed
    pub failed_in: FlashloanState,

    /// None if the loan was never disbursed
    pub loan: Option<LoanRecord>,

    pub events: EventLog,

    #[source]
    pub source: Option<StrategyError>,
}

impl FlashloanReverted {
    pub fn state(&self) -> FlashloanState {
        FlashloanState::Reverted
    }
}

struct Failure {
    error: FlashloanError,
    source: Option<StrategyError>,
}

impl From<FlashloanError> for Failure {
    fn from(error: FlashloanError) -> Self {
        Self {
            error,
            source: None,
        }
    }
}

impl From<CallbackError> for Failure {
    fn from(err: CallbackError) -> Self {
        let error = err.kind();
        let source = match err {
            CallbackError::StrategyFailed(s) => Some(s),
            CallbackError::RepaymentFailed(_) => None,
        };
        Self { error, source }
    }
}

/// Per-call state. Never outlives one flash loan call.
struct Execution {
    state: FlashloanState,
    events: EventLog,
    loan: Option<LoanRecord>,
}

impl Execution {
    fn new() -> Self {
        Self {
            state: FlashloanState::Idle,
            events: EventLog::new(),
            loan: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Commit,
    Simulate,
}

#[derive(Debug)]
pub struct FlashloanOrchestrator<B> {
    ledger: Ledger,
    pool: Pool,
    borrower: B,
}

impl<B: FlashBorrower> FlashloanOrchestrator<B> {
    pub fn deploy(pool: Pool, borrower: B, ledger: Ledger) -> Result<Self, FlashloanError> {
        pool.validate()?;
        info!(
            pool = %pool.account(),
            borrower = %borrower.account(),
            fee = ?pool.fee_policy(),
            "flash loan orchestrator deployed"
        );
        Ok(Self {
            ledger,
            pool,
            borrower,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Direct ledger access for setup and inspection outside of a call
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn borrower(&self) -> &B {
        &self.borrower
    }

    pub fn max_flash_loan(&self, asset: &AssetId) -> u128 {
        self.pool.max_flash_loan(&self.ledger, asset)
    }

    pub fn flash_fee(&self, asset: &AssetId, amount: u128) -> Result<u128, FlashloanError> {
        self.pool.flash_fee(asset, amount)
    }

    /// Borrows `amount` of `asset` from the pool into the borrower, runs the
    /// borrower's callback and settles, as a single all-or-nothing call.
    pub fn initiate_flashloan(
        &mut self,
        asset: &AssetId,
        amount: u128,
    ) -> Result<FlashloanReceipt, FlashloanReverted> {
        self.execute(asset, amount, Mode::Commit)
    }

    /// Same as [`Self::initiate_flashloan`] but always rolls the ledger back
    /// and never notifies the borrower of completion.
    pub fn simulate_flashloan(
        &mut self,
        asset: &AssetId,
        amount: u128,
    ) -> Result<FlashloanReceipt, FlashloanReverted> {
        self.execute(asset, amount, Mode::Simulate)
    }

    fn execute(
        &mut self,
        asset: &AssetId,
        amount: u128,
        mode: Mode,
    ) -> Result<FlashloanReceipt, FlashloanReverted> {
        let mut exec = Execution::new();
        self.ledger.begin();

        match self.run(&mut exec, asset, amount) {
            Ok(loan) => {
                exec.state.advance(FlashloanState::Completed);
                match mode {
                    Mode::Commit => {
                        self.ledger.commit();
                        self.borrower.on_flashloan_settled(&loan);
                    }
                    Mode::Simulate => {
                        self.ledger.rollback();
                    }
                }
                info!(%asset, amount, fee = loan.fee, ?mode, "flash loan completed");
                Ok(FlashloanReceipt {
                    loan,
                    events: exec.events,
                })
            }
            Err(Failure { error, source }) => {
                let failed_in = exec.state;
                exec.state.advance(FlashloanState::Reverted);
                let undone = self.ledger.rollback();
                exec.events.emit(REVERTED_MSG, undone as u128);
                warn!(%asset, amount, ?failed_in, %error, "flash loan reverted");
                let loan = exec.loan.take().map(|mut loan| {
                    loan.status = LoanStatus::Failed;
                    loan
                });
                Err(FlashloanReverted {
                    error,
                    failed_in,
                    loan,
                    events: exec.events,
                    source,
                })
            }
        }
    }

    fn run(
        &mut self,
        exec: &mut Execution,
        asset: &AssetId,
        amount: u128,
    ) -> Result<LoanRecord, Failure> {
        let borrower_account: AccountId = self.borrower.account().clone();

        exec.state.advance(FlashloanState::Borrowing);
        let loan = exec.loan.insert(self.pool.borrow(
            &mut self.ledger,
            &mut exec.events,
            &borrower_account,
            asset,
            amount,
        )?);

        exec.state.advance(FlashloanState::CallbackRunning);
        let mut ctx = CallbackContext::new(&mut self.ledger, &mut exec.events, borrower_account);
        self.borrower
            .on_flashloan(&mut ctx, self.pool.account(), asset, amount, loan.fee)?;

        exec.state.advance(FlashloanState::Settling);
        self.pool.settle(&self.ledger, &mut exec.events, loan)?;

        Ok(loan.clone())
    }
}
