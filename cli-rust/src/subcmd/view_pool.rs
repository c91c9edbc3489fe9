use clap::Args;

use crate::errors::CliError;

use super::SubcmdExec;

#[derive(Args, Debug)]
#[command(long_about = "View details about the flash loan pool described by --config")]
pub struct ViewPoolArgs {}

impl SubcmdExec for ViewPoolArgs {
    fn process_cmd(&self, args: &crate::Args) -> Result<(), CliError> {
        let pool = args.config.pool()?;
        pool.validate()?;
        let ledger = args.config.ledger()?;

        println!("Pool: {}", pool.account());
        println!("Fee: {:?}", pool.fee_policy());
        match pool.supported_assets() {
            Some(assets) => {
                let assets: Vec<&str> = assets.iter().map(|a| a.as_str()).collect();
                println!("Supported assets: {}", assets.join(", "));
            }
            None => println!("Supported assets: any"),
        }
        for (asset, balance) in ledger.balances_of(pool.account()) {
            println!(
                "Liquidity: {} {} (max flash loan {})",
                balance,
                asset,
                pool.max_flash_loan(&ledger, &asset)
            );
        }
        Ok(())
    }
}
