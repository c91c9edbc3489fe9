use clap::Args;
use flashloan_lib::{FlashBorrower, FlashloanReceiver, NoopStrategy};

use crate::errors::CliError;

use super::SubcmdExec;

#[derive(Args, Debug)]
#[command(
    long_about = "Deploy the flash loan receiver against the pool described by --config and check the deployment is valid"
)]
pub struct DeployArgs {}

impl SubcmdExec for DeployArgs {
    fn process_cmd(&self, args: &crate::Args) -> Result<(), CliError> {
        let orchestrator =
            args.config
                .deploy(FlashloanReceiver::new(args.config.receiver.clone(), NoopStrategy))?;
        println!("Contract deployed to: {}", orchestrator.borrower().account());
        println!(
            "Lending from: {}\nFee: {:?}",
            orchestrator.pool().account(),
            orchestrator.pool().fee_policy()
        );
        Ok(())
    }
}
