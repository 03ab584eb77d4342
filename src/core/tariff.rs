use std::ops::RangeInclusive;

use crate::quantity::rate::KilowattHourRate;

/// Electricity contract kind.
#[derive(
    Copy, Clone, Debug, Hash, Eq, PartialEq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
pub enum ContractType {
    /// Regulated hourly-priced tariff.
    Pvpc,

    /// Flat contracted price, independent of the hour.
    FixedSingle,
}

/// Social-bonus category of the supply contract.
#[derive(
    Copy, Clone, Debug, Hash, Eq, PartialEq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
pub enum SocialBonusType {
    None,
    Vulnerable,
    VulnerableSevere,
    ExclusionRisk,
}

impl SocialBonusType {
    /// Standard discount percentage of the category. Switching category
    /// resets the configured discount to this value.
    pub const fn default_discount(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Vulnerable => 25.0,
            Self::VulnerableSevere | Self::ExclusionRisk => 40.0,
        }
    }

    /// Percentage bracket the regulation allows for the category.
    ///
    /// The cost pipeline itself trusts whatever percentage it is given;
    /// enforcing the bracket is the caller's concern.
    pub const fn discount_range(self) -> RangeInclusive<f64> {
        match self {
            Self::None => 0.0..=0.0,
            Self::Vulnerable => 20.0..=30.0,
            Self::VulnerableSevere | Self::ExclusionRisk => 35.0..=50.0,
        }
    }
}

/// The subset of user settings the cost engine needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TariffConfig {
    pub contract_type: ContractType,

    /// Contracted flat price. Only meaningful for [`ContractType::FixedSingle`].
    pub fixed_price: Option<KilowattHourRate>,

    pub has_social_bonus: bool,
    pub social_bonus: SocialBonusType,

    /// Discount percentage, `0..=100`. Only meaningful when the social bonus
    /// is active. Non-finite values are normalised to zero-effect by the
    /// pipeline.
    pub discount_percent: f64,
}

impl TariffConfig {
    pub fn pvpc() -> Self {
        Self {
            contract_type: ContractType::Pvpc,
            fixed_price: None,
            has_social_bonus: false,
            social_bonus: SocialBonusType::None,
            discount_percent: 0.0,
        }
    }

    /// Whether the fast fixed-price path applies: a flat contract with the
    /// price actually configured. A flat contract without a price falls back
    /// to hourly allocation.
    pub const fn uses_fixed_price(&self) -> bool {
        matches!(self.contract_type, ContractType::FixedSingle) && self.fixed_price.is_some()
    }

    pub fn discount_active(&self) -> bool {
        self.has_social_bonus && self.social_bonus != SocialBonusType::None
    }
}
