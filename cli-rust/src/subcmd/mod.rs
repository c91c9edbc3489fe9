use clap::Subcommand;

use crate::errors::CliError;

mod deploy;
mod flash_fee;
mod initiate_flashloan;
mod view_pool;

pub use deploy::*;
pub use flash_fee::*;
pub use initiate_flashloan::*;
pub use view_pool::*;

#[derive(Debug, Subcommand)]
pub enum Subcmd {
    Deploy(DeployArgs),
    FlashFee(FlashFeeArgs),
    InitiateFlashloan(InitiateFlashloanArgs),
    ViewPool(ViewPoolArgs),
}

pub trait SubcmdExec {
    fn process_cmd(&self, args: &crate::Args) -> Result<(), CliError>;
}

impl SubcmdExec for Subcmd {
    fn process_cmd(&self, args: &crate::Args) -> Result<(), CliError> {
        match self {
            Self::Deploy(a) => a.process_cmd(args),
            Self::FlashFee(a) => a.process_cmd(args),
            Self::InitiateFlashloan(a) => a.process_cmd(args),
            Self::ViewPool(a) => a.process_cmd(args),
        }
    }
}
