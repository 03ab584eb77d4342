use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::{
    api::esios,
    core::{
        fuel::{DEFAULT_EV_CONSUMPTION_KWH_100KM, FuelParameters},
        tariff::{ContractType, SocialBonusType, TariffConfig},
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate the cost of one charging session.
    Cost(Box<CostArgs>),

    /// Show the day's hourly PVPC prices.
    Prices(PricesArgs),

    /// Estimate the fuel-equivalent savings for charged energy.
    Savings(SavingsArgs),
}

#[derive(Parser)]
pub struct CostArgs {
    /// Session date. Defaults to today.
    #[clap(long, default_value_t = Local::now().date_naive())]
    pub date: NaiveDate,

    /// Session start time (`HH:MM`). Required for hourly tariffs.
    #[clap(long = "start")]
    pub start_time: Option<String>,

    /// Session end time (`HH:MM`). Required for hourly tariffs.
    #[clap(long = "end")]
    pub end_time: Option<String>,

    /// Energy delivered in kilowatt-hours.
    #[clap(long = "kwh")]
    pub energy: KilowattHours,

    /// Also show the tax-inclusive cost breakdown.
    #[clap(long)]
    pub breakdown: bool,

    #[clap(flatten)]
    pub tariff: TariffArgs,

    #[clap(flatten)]
    pub esios: EsiosArgs,
}

#[derive(Parser)]
pub struct PricesArgs {
    /// Date to show. Defaults to today.
    #[clap(long, default_value_t = Local::now().date_naive())]
    pub date: NaiveDate,

    #[clap(flatten)]
    pub esios: EsiosArgs,
}

#[derive(Parser)]
pub struct SavingsArgs {
    /// One or more sessions as `kwh:cost` pairs, e.g. `38.2:4.21`.
    ///
    /// Multiple sessions are summed before the estimate, so per-session
    /// rounding cannot drift.
    #[clap(long = "session", required = true)]
    pub sessions: Vec<SessionTotals>,

    #[clap(flatten)]
    pub fuel: FuelArgs,
}

/// Charged energy and what it cost, as logged for one session.
#[derive(Copy, Clone)]
pub struct SessionTotals {
    pub energy: KilowattHours,
    pub electric_cost: Cost,
}

impl std::str::FromStr for SessionTotals {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (energy, electric_cost) = s.split_once(':').context("expected a `kwh:cost` pair")?;
        Ok(Self { energy: energy.trim().parse()?, electric_cost: electric_cost.trim().parse()? })
    }
}

#[derive(Parser)]
pub struct TariffArgs {
    #[clap(long = "contract-type", value_enum, default_value = "pvpc", env = "CONTRACT_TYPE")]
    pub contract_type: ContractType,

    /// Contracted flat price in €/kWh (fixed-rate contracts only).
    #[clap(long = "fixed-price-per-kwh", env = "FIXED_PRICE_PER_KWH")]
    pub fixed_price: Option<KilowattHourRate>,

    #[clap(long = "social-bonus", value_enum, default_value = "none", env = "SOCIAL_BONUS")]
    pub social_bonus: SocialBonusType,

    /// Social-bonus discount percent. Defaults to the category's standard
    /// rate.
    #[clap(long = "discount-percent", env = "SOCIAL_BONUS_DISCOUNT_PERCENT")]
    pub discount_percent: Option<f64>,
}

impl TariffArgs {
    pub fn to_config(&self) -> TariffConfig {
        let discount_percent =
            self.discount_percent.unwrap_or_else(|| self.social_bonus.default_discount());
        if !self.social_bonus.discount_range().contains(&discount_percent) {
            warn!(
                discount_percent,
                ?self.social_bonus,
                "discount is outside the category's allowed bracket",
            );
        }
        TariffConfig {
            contract_type: self.contract_type,
            fixed_price: self.fixed_price,
            has_social_bonus: self.social_bonus != SocialBonusType::None,
            social_bonus: self.social_bonus,
            discount_percent,
        }
    }
}

#[derive(Parser)]
pub struct FuelArgs {
    /// Combustion car consumption in litres per 100 km.
    #[clap(long = "fuel-consumption-l-100km", default_value_t = 7.0, env = "FUEL_CONSUMPTION_L_100KM")]
    pub consumption_l_100km: f64,

    /// Fuel price in euros per litre.
    #[clap(long = "fuel-price-per-liter", default_value_t = 1.55, env = "FUEL_PRICE_PER_LITER")]
    pub price_per_liter: f64,

    /// EV consumption assumption in kWh per 100 km.
    #[clap(
        long = "ev-consumption-kwh-100km",
        default_value_t = DEFAULT_EV_CONSUMPTION_KWH_100KM,
        env = "EV_CONSUMPTION_KWH_100KM"
    )]
    pub ev_consumption_kwh_100km: f64,
}

impl FuelArgs {
    pub const fn parameters(&self) -> FuelParameters {
        FuelParameters {
            consumption_l_100km: self.consumption_l_100km,
            price_per_liter: self.price_per_liter,
        }
    }
}

#[derive(Parser)]
pub struct EsiosArgs {
    /// ESIOS personal API token.
    #[clap(long = "esios-api-token", env = "ESIOS_API_TOKEN")]
    pub api_token: Option<String>,
}

impl EsiosArgs {
    pub fn try_new_client(&self) -> Result<esios::Api> {
        let api_token = self
            .api_token
            .clone()
            .context("an ESIOS API token is required (`--esios-api-token` or `ESIOS_API_TOKEN`)")?;
        esios::Api::try_new(api_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_defaults_to_the_category_rate() {
        let args = TariffArgs {
            contract_type: ContractType::Pvpc,
            fixed_price: None,
            social_bonus: SocialBonusType::Vulnerable,
            discount_percent: None,
        };
        let tariff = args.to_config();
        assert!(tariff.discount_active());
        assert_eq!(tariff.discount_percent, 25.0);
    }

    #[test]
    fn test_parse_session_totals() -> Result {
        let totals: SessionTotals = "38.2:4.21".parse()?;
        assert_eq!(totals.energy, KilowattHours::from(38.2));
        assert_eq!(totals.electric_cost, Cost::from(4.21));
        assert!("38.2".parse::<SessionTotals>().is_err());
        Ok(())
    }

    #[test]
    fn test_explicit_discount_wins() {
        let args = TariffArgs {
            contract_type: ContractType::Pvpc,
            fixed_price: None,
            social_bonus: SocialBonusType::VulnerableSevere,
            discount_percent: Some(35.0),
        };
        assert_eq!(args.to_config().discount_percent, 35.0);
    }
}
