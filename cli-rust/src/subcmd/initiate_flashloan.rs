use clap::{Args, ValueEnum};
use flashloan_interface::AssetId;
use flashloan_lib::{
    ensure_balance_at_least, fund, FailingStrategy, FlashloanReceiver, FlashloanStrategy,
    NoopStrategy, SpendAll,
};
use tracing::info;

use crate::{
    argparse::DAI,
    errors::CliError,
    tx_utils::{print_events, send_or_sim_flashloan, to_base64},
};

use super::SubcmdExec;

const BURN: &str = "0x000000000000000000000000000000000000dEaD";

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StrategyArg {
    /// Hold the principal and repay it untouched
    Noop,
    /// Send the principal away so repayment fails
    SpendAll,
    /// Abort before repaying
    Fail,
}

impl StrategyArg {
    fn into_strategy(self) -> Box<dyn FlashloanStrategy> {
        match self {
            Self::Noop => Box::new(NoopStrategy),
            Self::SpendAll => Box::new(SpendAll { sink: BURN.into() }),
            Self::Fail => Box::new(FailingStrategy {
                reason: "aborted by --strategy fail".to_owned(),
            }),
        }
    }
}

#[derive(Args, Debug)]
#[command(
    long_about = "Fund the receiver from the configured whale, then borrow from the pool and repay within a single call"
)]
pub struct InitiateFlashloanArgs {
    #[arg(long, help = "Asset to borrow", default_value = DAI)]
    asset: String,

    #[arg(
        long,
        help = "Principal to borrow",
        default_value = "1000000000000000000000000"
    )]
    amount: u128,

    #[arg(
        long,
        help = "Amount the whale sends to the receiver beforehand. 0 skips funding",
        default_value = "200000000000000000000"
    )]
    fund: u128,

    #[arg(long, value_enum, default_value_t = StrategyArg::Noop)]
    strategy: StrategyArg,

    #[arg(
        long,
        help = "Print the base64 encoded borsh receipt",
        default_value_t = false
    )]
    print_receipt: bool,
}

impl SubcmdExec for InitiateFlashloanArgs {
    fn process_cmd(&self, args: &crate::Args) -> Result<(), CliError> {
        let config = &args.config;
        let asset: AssetId = self.asset.as_str().into();
        let mut orchestrator = config.deploy(FlashloanReceiver::new(
            config.receiver.clone(),
            self.strategy.into_strategy(),
        ))?;
        println!("Contract deployed to: {}", config.receiver);

        if let (Some(whale), true) = (&config.whale, self.fund > 0) {
            fund(
                orchestrator.ledger_mut(),
                whale,
                &config.receiver,
                &asset,
                self.fund,
            )?;
        }
        let liquidity =
            ensure_balance_at_least(orchestrator.ledger(), &config.pool, &asset, self.amount)?;
        info!(%asset, liquidity, amount = self.amount, "pool has enough liquidity");

        let receipt = send_or_sim_flashloan(args, &mut orchestrator, &asset, self.amount)?;
        print_events(&receipt.events);

        if !args.dry_run {
            let found = orchestrator.borrower().user().cloned();
            if found.as_ref() != Some(&config.receiver) {
                return Err(CliError::UserMismatch {
                    expected: config.receiver.clone(),
                    found,
                });
            }
            println!("User: {}", config.receiver);
        }
        if self.print_receipt {
            println!("{}", to_base64(&receipt)?);
        }
        Ok(())
    }
}
