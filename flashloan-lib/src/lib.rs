pub mod borrower;
pub use borrower::*;
pub mod events;
pub use events::*;
pub mod fee;
pub use fee::*;
pub mod harness;
pub use harness::*;
pub mod ledger;
pub use ledger::*;
pub mod orchestrator;
pub use orchestrator::*;
pub mod pool;
pub use pool::*;
pub mod rational;
pub use rational::*;
pub mod strategy;
pub use strategy::*;
