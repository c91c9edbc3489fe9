use base64::Engine;
use borsh::BorshSerialize;
use flashloan_interface::AssetId;
use flashloan_lib::{
    EventLog, FlashBorrower, FlashloanOrchestrator, FlashloanReceipt, FlashloanReverted,
};

use crate::errors::CliError;

pub fn send_or_sim_flashloan<B: FlashBorrower>(
    args: &crate::Args,
    orchestrator: &mut FlashloanOrchestrator<B>,
    asset: &AssetId,
    amount: u128,
) -> Result<FlashloanReceipt, FlashloanReverted> {
    let res = if args.dry_run {
        orchestrator.simulate_flashloan(asset, amount)
    } else {
        orchestrator.initiate_flashloan(asset, amount)
    };
    match (&res, args.dry_run) {
        (Ok(receipt), true) => println!("Simulate result: {:?}", receipt.loan.status),
        (Ok(receipt), false) => println!("Loan: {:?}", receipt.loan.status),
        (Err(reverted), _) => print_events(&reverted.events),
    }
    res
}

pub fn print_events(events: &EventLog) {
    for entry in events {
        println!("{}", entry);
    }
}

pub fn to_base64(receipt: &FlashloanReceipt) -> Result<String, CliError> {
    let serialized_data: Vec<u8> = receipt.try_to_vec()?;
    Ok(base64::engine::general_purpose::STANDARD.encode(serialized_data))
}
