use derive_more::{AsRef, Deref};
use flashloan_interface::{AccountId, AssetId, FeePolicy, FlashloanError, SOLO_FLASH_LOAN_FEE};
use flashloan_lib::{FlashBorrower, FlashloanOrchestrator, Ledger, Pool};
use serde::Deserialize;

use crate::{
    errors::CliError,
    utils::{to_fee_policy_checked, FeeArg},
};

pub const SOLO: &str = "0x1E0447b19BB6EcFdAe1e4AE1694b0C3659614e4e";
pub const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
pub const DAI_WHALE: &str = "0x16463c0fdB6BA9618909F5b120ea1581618C1b9E";
pub const RECEIVER: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

const E18: u128 = 1_000_000_000_000_000_000;

#[derive(Clone, Debug, Deserialize)]
pub struct BalanceArg {
    pub account: AccountId,
    pub asset: AssetId,
    pub amount: u128,
}

/// Contents of a deployment file
#[derive(Clone, Debug, Deserialize)]
pub struct DeployConfig {
    pub pool: AccountId,
    pub receiver: AccountId,
    pub fee: FeeArg,

    /// Assets the pool lends. Omit to lend anything it holds.
    #[serde(default)]
    pub assets: Option<Vec<AssetId>>,

    /// Opening balances
    #[serde(default)]
    pub balances: Vec<BalanceArg>,

    /// Account the receiver is funded from before a loan
    #[serde(default)]
    pub whale: Option<AccountId>,
}

impl DeployConfig {
    /// dYdX Solo lending DAI on a mainnet fork
    pub fn mainnet_fork() -> Self {
        Self {
            pool: SOLO.into(),
            receiver: RECEIVER.into(),
            fee: FeeArg::Flat(SOLO_FLASH_LOAN_FEE),
            assets: Some(vec![DAI.into()]),
            balances: vec![
                BalanceArg {
                    account: SOLO.into(),
                    asset: DAI.into(),
                    amount: 5_000_000 * E18,
                },
                BalanceArg {
                    account: DAI_WHALE.into(),
                    asset: DAI.into(),
                    amount: 1_000 * E18,
                },
            ],
            whale: Some(DAI_WHALE.into()),
        }
    }
}

/// clap requires arg types to impl Clone
#[derive(AsRef, Clone, Debug, Deref)]
pub struct ConfigWrapper(DeployConfig);

impl ConfigWrapper {
    pub fn fee_policy(&self) -> Result<FeePolicy, CliError> {
        to_fee_policy_checked(&self.fee)
    }

    pub fn pool(&self) -> Result<Pool, CliError> {
        let pool = Pool::new(self.pool.clone(), self.fee_policy()?);
        Ok(match &self.assets {
            Some(assets) => pool.with_supported_assets(assets.iter().cloned()),
            None => pool,
        })
    }

    pub fn ledger(&self) -> Result<Ledger, FlashloanError> {
        let mut ledger = Ledger::new();
        for BalanceArg {
            account,
            asset,
            amount,
        } in &self.balances
        {
            ledger.credit(account, asset, *amount)?;
        }
        Ok(ledger)
    }

    pub fn deploy<B: FlashBorrower>(
        &self,
        borrower: B,
    ) -> Result<FlashloanOrchestrator<B>, CliError> {
        Ok(FlashloanOrchestrator::deploy(
            self.pool()?,
            borrower,
            self.ledger()?,
        )?)
    }
}

pub fn parse_deploy_config_from_path(path: &str) -> Result<ConfigWrapper, CliError> {
    if path.is_empty() {
        return Ok(ConfigWrapper(DeployConfig::mainnet_fork()));
    }
    let s = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_owned(),
        source,
    })?;
    Ok(ConfigWrapper(serde_json::from_str(&s)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deployment_file() {
        let config: DeployConfig = serde_json::from_str(
            r#"{
                "pool": "solo",
                "receiver": "receiver",
                "fee": {"proportional": 0.0009},
                "balances": [
                    {"account": "solo", "asset": "DAI", "amount": 5000000000000000000000000}
                ]
            }"#,
        )
        .unwrap();
        let config = ConfigWrapper(config);
        assert!(config.whale.is_none());
        let pool = config.pool().unwrap();
        assert!(pool.supports(&"WETH".into()));
        let ledger = config.ledger().unwrap();
        assert_eq!(
            ledger.balance(&"solo".into(), &"DAI".into()),
            5_000_000 * E18
        );
    }

    #[test]
    fn empty_path_is_mainnet_fork() {
        let config = parse_deploy_config_from_path("").unwrap();
        assert_eq!(config.pool.as_str(), SOLO);
        assert_eq!(
            config.fee_policy().unwrap(),
            FeePolicy::Flat {
                amount: SOLO_FLASH_LOAN_FEE
            }
        );
        assert!(!config.pool().unwrap().supports(&"WETH".into()));
    }
}
