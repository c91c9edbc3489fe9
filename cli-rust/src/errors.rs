use std::io;

use flashloan_interface::{AccountId, FlashloanError};
use flashloan_lib::{FlashloanReverted, HarnessError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid deployment file: {0}")]
    ParseConfig(#[from] serde_json::Error),

    #[error("invalid fee: {0}")]
    InvalidFee(String),

    #[error("could not encode receipt: {0}")]
    Encode(#[from] io::Error),

    #[error("expected user to be {expected}, got {found:?}")]
    UserMismatch {
        expected: AccountId,
        found: Option<AccountId>,
    },

    #[error(transparent)]
    Flashloan(#[from] FlashloanError),

    #[error(transparent)]
    Harness(#[from] HarnessError),

    #[error(transparent)]
    Reverted(#[from] FlashloanReverted),
}
