use clap::Args;
use flashloan_interface::{AssetId, FlashloanError};

use crate::{argparse::DAI, errors::CliError};

use super::SubcmdExec;

#[derive(Args, Debug)]
#[command(long_about = "Quote the fee the pool charges on a flash loan")]
pub struct FlashFeeArgs {
    #[arg(help = "Principal to quote for")]
    amount: u128,

    #[arg(long, help = "Asset to borrow", default_value = DAI)]
    asset: String,
}

impl SubcmdExec for FlashFeeArgs {
    fn process_cmd(&self, args: &crate::Args) -> Result<(), CliError> {
        let pool = args.config.pool()?;
        pool.validate()?;
        let asset: AssetId = self.asset.as_str().into();

        let fee = pool.flash_fee(&asset, self.amount)?;
        let repayment = self
            .amount
            .checked_add(fee)
            .ok_or(FlashloanError::AmountOverflow)?;
        println!("Fee: {} {}", fee, asset);
        println!("Repayment: {} {}", repayment, asset);
        Ok(())
    }
}
