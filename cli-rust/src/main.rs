use clap::{builder::ValueParser, Parser};
use tracing_subscriber::EnvFilter;

mod argparse;
mod errors;
mod subcmd;
mod tx_utils;
mod utils;

use argparse::{parse_deploy_config_from_path, ConfigWrapper};
use subcmd::{Subcmd, SubcmdExec};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "CLI for deploying and driving an all-or-nothing flash loan against a lending pool"
)]
pub struct Args {
    #[arg(
        long,
        short,
        help = "path to JSON deployment file. Defaults to a DAI pool on a mainnet fork",
        default_value = "",
        value_parser = ValueParser::new(parse_deploy_config_from_path)
    )]
    pub config: ConfigWrapper,

    #[arg(
        long,
        help = "only simulate the flash loan instead of committing it",
        default_value_t = false
    )]
    pub dry_run: bool,

    #[command(subcommand)]
    pub subcmd: Subcmd,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = args.subcmd.process_cmd(&args) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
