use borsh::{BorshDeserialize, BorshSerialize};
use flashloan_interface::{
    AccountId, AssetId, FeePolicy, FlashloanError, LoanStatus, Rational, DISBURSEMENT_FAILED_MSG,
    FEE_OVERFLOW_MSG, LOAN_INITIATED_MSG, LOAN_REPAID_MSG, REPAYING_MSG, REVERTED_MSG,
    SOLO_FLASH_LOAN_FEE,
};
use flashloan_lib::{
    ensure_balance_at_least, fund, FailingStrategy, FlashloanOrchestrator, FlashloanReceipt,
    FlashloanReceiver, FlashloanState, FlashloanStrategy, Ledger, NoopStrategy, Pool, SpendAll,
};

const E18: u128 = 1_000_000_000_000_000_000;

fn solo() -> AccountId {
    "0x1E0447b19BB6EcFdAe1e4AE1694b0C3659614e4e".into()
}

fn receiver() -> AccountId {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3".into()
}

fn whale() -> AccountId {
    "0x16463c0fdB6BA9618909F5b120ea1581618C1b9E".into()
}

fn dai() -> AssetId {
    "0x6B175474E89094C44Da98b954EedeAC495271d0F".into()
}

fn setup<S: FlashloanStrategy>(
    fee: FeePolicy,
    pool_liquidity: u128,
    receiver_balance: u128,
    strategy: S,
) -> FlashloanOrchestrator<FlashloanReceiver<S>> {
    let mut ledger = Ledger::new();
    ledger.credit(&solo(), &dai(), pool_liquidity).unwrap();
    ledger.credit(&receiver(), &dai(), receiver_balance).unwrap();
    FlashloanOrchestrator::deploy(
        Pool::new(solo(), fee),
        FlashloanReceiver::new(receiver(), strategy),
        ledger,
    )
    .unwrap()
}

fn balances<B: flashloan_lib::FlashBorrower>(o: &FlashloanOrchestrator<B>) -> (u128, u128) {
    (
        o.ledger().balance(&solo(), &dai()),
        o.ledger().balance(&receiver(), &dai()),
    )
}

#[test]
fn zero_fee_loan_completes() {
    let mut o = setup(FeePolicy::Flat { amount: 0 }, 5_000_000, 0, NoopStrategy);
    let receipt = o.initiate_flashloan(&dai(), 1_000_000).unwrap();

    assert_eq!(receipt.state(), FlashloanState::Completed);
    assert_eq!(receipt.loan.status, LoanStatus::Repaid);
    let initiated = receipt.events.position(LOAN_INITIATED_MSG, 1_000_000).unwrap();
    let repaid = receipt.events.position(LOAN_REPAID_MSG, 1_000_000).unwrap();
    assert!(initiated < repaid);
    assert_eq!(balances(&o), (5_000_000, 0));
    assert_eq!(o.borrower().user(), Some(&receiver()));
    assert!(!o.ledger().is_journaling());
}

#[test]
fn insufficient_liquidity_changes_nothing() {
    let mut o = setup(FeePolicy::Flat { amount: 0 }, 500, 0, NoopStrategy);
    let reverted = o.initiate_flashloan(&dai(), 1_000_000).unwrap_err();

    assert_eq!(reverted.error, FlashloanError::InsufficientLiquidity);
    assert_eq!(reverted.failed_in, FlashloanState::Borrowing);
    assert!(reverted.loan.is_none());
    assert_eq!(balances(&o), (500, 0));
    assert_eq!(o.borrower().user(), None);
}

#[test]
fn spending_the_principal_reverts_repayment() {
    let attacker: AccountId = "attacker".into();
    let mut o = setup(
        FeePolicy::Flat { amount: 0 },
        1_000,
        0,
        SpendAll {
            sink: attacker.clone(),
        },
    );
    let reverted = o.initiate_flashloan(&dai(), 1_000).unwrap_err();

    assert_eq!(reverted.error, FlashloanError::RepaymentFailed);
    assert_eq!(reverted.failed_in, FlashloanState::CallbackRunning);
    assert_eq!(reverted.loan.map(|l| l.status), Some(LoanStatus::Failed));
    assert_eq!(balances(&o), (1_000, 0));
    assert_eq!(o.ledger().balance(&attacker, &dai()), 0);
    assert!(o.ledger().balances_of(&attacker).is_empty());
}

#[test]
fn strategy_failure_exposes_its_source() {
    let mut o = setup(
        FeePolicy::Flat { amount: 0 },
        1_000,
        10,
        FailingStrategy {
            reason: "no arbitrage".to_owned(),
        },
    );
    let reverted = o.initiate_flashloan(&dai(), 1_000).unwrap_err();

    assert_eq!(reverted.error, FlashloanError::StrategyFailed);
    let source = std::error::Error::source(&reverted).map(|s| s.to_string());
    assert_eq!(source.as_deref(), Some("no arbitrage"));
    assert!(!reverted.events.contains_message(REPAYING_MSG));
    assert_eq!(balances(&o), (1_000, 10));
}

#[test]
fn fee_overflow_reverts_before_any_write() {
    let mut o = setup(FeePolicy::Flat { amount: u128::MAX }, 1_000, 7, NoopStrategy);
    let reverted = o.initiate_flashloan(&dai(), 1_000).unwrap_err();

    assert_eq!(reverted.error, FlashloanError::AmountOverflow);
    assert_eq!(reverted.failed_in, FlashloanState::Borrowing);
    assert!(reverted.loan.is_none());
    let events: Vec<(&str, u128)> = reverted
        .events
        .iter()
        .map(|e| (e.message.as_str(), e.value))
        .collect();
    assert_eq!(events, [(FEE_OVERFLOW_MSG, 1_000), (REVERTED_MSG, 0)]);
    assert_eq!(balances(&o), (1_000, 7));
}

#[test]
fn disbursement_overflow_reverts() {
    let mut o = setup(FeePolicy::Flat { amount: 0 }, 1_000, u128::MAX - 10, NoopStrategy);
    let reverted = o.initiate_flashloan(&dai(), 1_000).unwrap_err();

    assert_eq!(reverted.error, FlashloanError::AmountOverflow);
    assert_eq!(reverted.failed_in, FlashloanState::Borrowing);
    assert!(reverted.loan.is_none());
    assert_eq!(reverted.events.position(DISBURSEMENT_FAILED_MSG, 1_000), Some(0));
    assert_eq!(balances(&o), (1_000, u128::MAX - 10));
    assert_eq!(o.borrower().user(), None);
}

#[test]
fn repeated_failures_are_identical() {
    let mut o = setup(FeePolicy::Flat { amount: 0 }, 500, 7, NoopStrategy);
    let first = o.initiate_flashloan(&dai(), 1_000).unwrap_err();
    let after_first = balances(&o);
    let second = o.initiate_flashloan(&dai(), 1_000).unwrap_err();

    assert_eq!(first.error, second.error);
    assert_eq!(first.events, second.events);
    assert_eq!(after_first, balances(&o));
    assert_eq!(after_first, (500, 7));
}

#[test]
fn user_tracks_only_the_latest_completed_call() {
    let mut o = setup(FeePolicy::Flat { amount: 1 }, 1_000, 1, NoopStrategy);

    o.simulate_flashloan(&dai(), 1_000).unwrap();
    assert_eq!(o.borrower().user(), None);

    o.initiate_flashloan(&dai(), 1_000).unwrap();
    assert_eq!(o.borrower().user(), Some(&receiver()));

    // the receiver can no longer pay the fee
    let reverted = o.initiate_flashloan(&dai(), 1_000).unwrap_err();
    assert_eq!(reverted.error, FlashloanError::RepaymentFailed);
    assert_eq!(o.borrower().user(), Some(&receiver()));
}

#[test]
fn pool_earns_exactly_the_fee() {
    let fee = FeePolicy::Proportional {
        ratio: Rational { num: 9, denom: 10_000 },
    };
    let mut o = setup(fee, 10_000_000, 50_000, NoopStrategy);
    let quoted = o.flash_fee(&dai(), 1_234_567).unwrap();
    let receipt = o.initiate_flashloan(&dai(), 1_234_567).unwrap();

    // 1_234_567 * 9 / 10_000 = 1111.1103, rounded up
    assert_eq!(quoted, 1_112);
    assert_eq!(receipt.loan.fee, quoted);
    assert_eq!(balances(&o), (10_000_000 + quoted, 50_000 - quoted));
    assert_eq!(o.max_flash_loan(&dai()), 10_000_000 + quoted);
}

#[test]
fn mainnet_fork_scenario() {
    const FUND_AMOUNT: u128 = 200 * E18;
    const BORROW_AMOUNT: u128 = 1_000_000 * E18;

    let mut ledger = Ledger::new();
    ledger.credit(&solo(), &dai(), 5_000_000 * E18).unwrap();
    ledger.credit(&whale(), &dai(), 1_000 * E18).unwrap();

    ensure_balance_at_least(&ledger, &whale(), &dai(), FUND_AMOUNT).unwrap();
    fund(&mut ledger, &whale(), &receiver(), &dai(), FUND_AMOUNT).unwrap();
    ensure_balance_at_least(&ledger, &solo(), &dai(), BORROW_AMOUNT).unwrap();

    let mut o = FlashloanOrchestrator::deploy(
        Pool::new(
            solo(),
            FeePolicy::Flat {
                amount: SOLO_FLASH_LOAN_FEE,
            },
        ),
        FlashloanReceiver::new(receiver(), NoopStrategy),
        ledger,
    )
    .unwrap();
    let receipt = o.initiate_flashloan(&dai(), BORROW_AMOUNT).unwrap();

    for entry in &receipt.events {
        println!("{entry}");
    }
    assert_eq!(o.borrower().user(), Some(&receiver()));
    assert_eq!(
        balances(&o),
        (
            5_000_000 * E18 + SOLO_FLASH_LOAN_FEE,
            FUND_AMOUNT - SOLO_FLASH_LOAN_FEE
        )
    );
    assert_eq!(o.ledger().balance(&whale(), &dai()), 800 * E18);
}

#[test]
fn simulated_loans_change_nothing() {
    let mut o = setup(FeePolicy::Flat { amount: 2 }, 1_000, 2, NoopStrategy);
    let receipt = o.simulate_flashloan(&dai(), 1_000).unwrap();
    assert_eq!(receipt.loan.status, LoanStatus::Repaid);
    assert_eq!(balances(&o), (1_000, 2));

    let reverted = o.simulate_flashloan(&dai(), 1_001).unwrap_err();
    assert_eq!(reverted.error, FlashloanError::InsufficientLiquidity);
    assert_eq!(balances(&o), (1_000, 2));
}

#[test]
fn receipt_survives_borsh() {
    let mut o = setup(FeePolicy::Flat { amount: 2 }, 1_000, 2, NoopStrategy);
    let receipt = o.initiate_flashloan(&dai(), 1_000).unwrap();
    let bytes = receipt.try_to_vec().unwrap();
    assert_eq!(FlashloanReceipt::try_from_slice(&bytes).unwrap(), receipt);
}
