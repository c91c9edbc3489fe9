use flashloan_interface::{FeePolicy, Rational};
use serde::Deserialize;

use crate::errors::CliError;

#[derive(Clone, Copy, Debug, Deserialize)]
pub enum FeeArg {
    /// Fixed amount in the asset's smallest unit
    #[serde(rename = "flat")]
    Flat(u128),

    /// Fraction of the principal, e.g. 0.0009
    #[serde(rename = "proportional")]
    Proportional(f64),
}

fn number_to_positive_rational_checked(n: f64) -> Result<Rational, CliError> {
    if !n.is_finite() || n < 0.0 {
        return Err(CliError::InvalidFee(format!(
            "only positive numbers allowed, {} given",
            n
        )));
    }
    let s = n.to_string();
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let dps = u32::try_from(frac_part.len())
        .ok()
        .filter(|dps| *dps <= 19)
        .ok_or_else(|| CliError::InvalidFee(format!("could not convert {} to rational", n)))?;
    let num = format!("{}{}", int_part, frac_part)
        .parse()
        .map_err(|_| CliError::InvalidFee(format!("could not convert {} to rational", n)))?;
    Ok(Rational {
        num,
        denom: 10_u64.pow(dps),
    })
}

pub fn to_fee_policy_checked(fee_arg: &FeeArg) -> Result<FeePolicy, CliError> {
    match *fee_arg {
        FeeArg::Flat(amount) => Ok(FeePolicy::Flat { amount }),
        FeeArg::Proportional(ratio) => {
            let ratio = number_to_positive_rational_checked(ratio)?;
            if ratio.num > ratio.denom {
                return Err(CliError::InvalidFee(format!(
                    "proportional fee must be <= 1, {} given",
                    ratio
                )));
            }
            Ok(FeePolicy::Proportional { ratio })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fee_json() {
        let flat: FeeArg = serde_json::from_str(r#"{"flat": 2}"#).unwrap();
        assert_eq!(
            to_fee_policy_checked(&flat).unwrap(),
            FeePolicy::Flat { amount: 2 }
        );

        let prop: FeeArg = serde_json::from_str(r#"{"proportional": 0.0009}"#).unwrap();
        assert_eq!(
            to_fee_policy_checked(&prop).unwrap(),
            FeePolicy::Proportional {
                ratio: Rational {
                    num: 9,
                    denom: 10_000
                }
            }
        );
    }

    #[test]
    fn rejects_bad_ratios() {
        assert!(to_fee_policy_checked(&FeeArg::Proportional(-0.1)).is_err());
        assert!(to_fee_policy_checked(&FeeArg::Proportional(1.5)).is_err());
        assert!(to_fee_policy_checked(&FeeArg::Proportional(f64::NAN)).is_err());
        assert!(to_fee_policy_checked(&FeeArg::Proportional(1.0)).is_ok());
    }
}
