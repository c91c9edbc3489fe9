//! What a borrower does with the principal while it holds it.

use flashloan_interface::{AccountId, AssetId, FlashloanError};
use thiserror::Error;

use crate::CallbackContext;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("{0}")]
    Custom(String),

    #[error(transparent)]
    Ledger(#[from] FlashloanError),
}

pub trait FlashloanStrategy {
    /// Runs with the principal already credited to `ctx.this()`.
    fn execute(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), StrategyError>;
}

impl<T: FlashloanStrategy + ?Sized> FlashloanStrategy for &mut T {
    fn execute(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), StrategyError> {
        (**self).execute(ctx, asset, amount)
    }
}

impl<T: FlashloanStrategy + ?Sized> FlashloanStrategy for Box<T> {
    fn execute(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), StrategyError> {
        (**self).execute(ctx, asset, amount)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopStrategy;

impl FlashloanStrategy for NoopStrategy {
    fn execute(
        &mut self,
        _ctx: &mut CallbackContext<'_>,
        _asset: &AssetId,
        _amount: u128,
    ) -> Result<(), StrategyError> {
        Ok(())
    }
}

/// Moves everything the borrower holds of the asset to `sink`,
/// leaving nothing to repay with.
#[derive(Clone, Debug)]
pub struct SpendAll {
    pub sink: AccountId,
}

impl FlashloanStrategy for SpendAll {
    fn execute(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        asset: &AssetId,
        _amount: u128,
    ) -> Result<(), StrategyError> {
        let held = ctx.balance(asset);
        ctx.transfer(&self.sink, asset, held)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct FailingStrategy {
    pub reason: String,
}

impl FlashloanStrategy for FailingStrategy {
    fn execute(
        &mut self,
        _ctx: &mut CallbackContext<'_>,
        _asset: &AssetId,
        _amount: u128,
    ) -> Result<(), StrategyError> {
        Err(StrategyError::Custom(self.reason.clone()))
    }
}

/// See [`from_fn`]
#[derive(Clone, Copy)]
pub struct FnStrategy<F>(F);

/// Wraps a closure as a [`FlashloanStrategy`].
pub fn from_fn<F>(f: F) -> FnStrategy<F>
where
    F: FnMut(&mut CallbackContext<'_>, &AssetId, u128) -> Result<(), StrategyError>,
{
    FnStrategy(f)
}

impl<F> FlashloanStrategy for FnStrategy<F>
where
    F: FnMut(&mut CallbackContext<'_>, &AssetId, u128) -> Result<(), StrategyError>,
{
    fn execute(
        &mut self,
        ctx: &mut CallbackContext<'_>,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), StrategyError> {
        (self.0)(ctx, asset, amount)
    }
}
