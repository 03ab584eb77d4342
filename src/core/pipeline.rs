//! Social-bonus discount and the tax stack applied on top of the base cost.

use crate::{core::tariff::TariffConfig, prelude::*, quantity::cost::Cost};

/// The two sequential fixed-rate taxes of the Spanish electricity bill.
///
/// The excise applies to the discounted energy cost, VAT applies to the
/// excise-inclusive amount (tax on top of tax).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaxRates {
    pub electricity_tax: f64,
    pub vat: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self { electricity_tax: 0.0511, vat: 0.21 }
    }
}

/// Tax-inclusive cost view of one session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostBreakdown {
    pub base_cost: Cost,
    pub bonus_discount: Cost,
    pub cost_after_bonus: Cost,
    pub electricity_tax: Cost,
    pub iva: Cost,
    pub total_cost: Cost,
}

/// Normalise an untrusted numeric input at the pipeline boundary.
///
/// A non-finite value is substituted with zero and logged; it must never
/// reach a displayed currency figure. Valid zero-cost sessions pass through
/// untouched.
fn normalize(value: f64, what: &'static str) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(what, value, "non-finite input normalised to zero");
        0.0
    }
}

/// Apply the social-bonus discount to a base cost.
///
/// Returns the cost unchanged when no bonus is active. The result is clamped
/// at zero: a discount can never turn a cost into income.
pub fn apply_bonus_discount(base_cost: Cost, tariff: &TariffConfig) -> Cost {
    let base_cost = Cost::from(normalize(base_cost.0, "base cost"));
    if !tariff.discount_active() {
        return base_cost;
    }
    let discount_percent = normalize(tariff.discount_percent, "discount percent");
    (base_cost - base_cost * (discount_percent / 100.0)).max(Cost::ZERO)
}

/// The absolute amount the social bonus shaves off the base cost.
pub fn bonus_savings(base_cost: Cost, tariff: &TariffConfig) -> Cost {
    let base_cost = Cost::from(normalize(base_cost.0, "base cost"));
    base_cost - apply_bonus_discount(base_cost, tariff)
}

/// Compute the tax-inclusive breakdown: bonus discount first, then the
/// electricity excise, then VAT on the excise-inclusive subtotal.
pub fn compute_breakdown(base_cost: Cost, tariff: &TariffConfig, rates: TaxRates) -> CostBreakdown {
    let base_cost = Cost::from(normalize(base_cost.0, "base cost"));
    let cost_after_bonus = apply_bonus_discount(base_cost, tariff);
    let electricity_tax = cost_after_bonus * rates.electricity_tax;
    let subtotal = cost_after_bonus + electricity_tax;
    let iva = subtotal * rates.vat;
    CostBreakdown {
        base_cost,
        bonus_discount: base_cost - cost_after_bonus,
        cost_after_bonus,
        electricity_tax,
        iva,
        total_cost: subtotal + iva,
    }
}
