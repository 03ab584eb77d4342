//! Combustion-fuel equivalence estimate for comparative savings display.

use crate::quantity::{cost::Cost, energy::KilowattHours};

/// Average EV consumption assumed when the vehicle's is unknown.
pub const DEFAULT_EV_CONSUMPTION_KWH_100KM: f64 = 15.0;

/// Combustion-side comparison parameters from the user settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FuelParameters {
    pub consumption_l_100km: f64,
    pub price_per_liter: f64,
}

impl Default for FuelParameters {
    fn default() -> Self {
        Self { consumption_l_100km: 7.0, price_per_liter: 1.55 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FuelSavingsResult {
    pub fuel_cost: Cost,
    pub electric_cost: Cost,

    /// May be negative when charging was more expensive than fuel would have
    /// been; callers typically clamp it at zero for display.
    pub savings: Cost,

    pub estimated_km: f64,
    pub fuel_liters: f64,
}

/// Estimate what the same distance would have cost on combustion fuel.
///
/// The charged energy is turned into an estimated distance via the EV
/// consumption assumption, the distance into litres via the configured fuel
/// consumption, and the litres into money via the configured fuel price.
pub fn estimate_fuel_savings(
    energy: KilowattHours,
    electric_cost: Cost,
    params: FuelParameters,
    ev_consumption_kwh_100km: f64,
) -> FuelSavingsResult {
    let estimated_km = energy.0 * (100.0 / ev_consumption_kwh_100km);
    let fuel_liters = estimated_km / 100.0 * params.consumption_l_100km;
    let fuel_cost = Cost::from(fuel_liters * params.price_per_liter);
    FuelSavingsResult {
        fuel_cost,
        electric_cost,
        savings: fuel_cost - electric_cost,
        estimated_km,
        fuel_liters,
    }
}

/// Aggregate variant: sums energy and cost across the sessions first and
/// applies the formula once, so per-session rounding cannot drift.
pub fn estimate_total_fuel_savings(
    sessions: impl IntoIterator<Item = (KilowattHours, Cost)>,
    params: FuelParameters,
    ev_consumption_kwh_100km: f64,
) -> FuelSavingsResult {
    let (total_energy, total_cost) = sessions.into_iter().fold(
        (KilowattHours::ZERO, Cost::ZERO),
        |(energy_sum, cost_sum), (energy, cost)| (energy_sum + energy, cost_sum + cost),
    );
    estimate_fuel_savings(total_energy, total_cost, params, ev_consumption_kwh_100km)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_estimate() {
        let result = estimate_fuel_savings(
            KilowattHours::from(50.0),
            Cost::from(6.0),
            FuelParameters::default(),
            DEFAULT_EV_CONSUMPTION_KWH_100KM,
        );
        assert_abs_diff_eq!(result.estimated_km, 333.33, epsilon = 0.01);
        assert_abs_diff_eq!(result.fuel_liters, 23.33, epsilon = 0.01);
        assert_abs_diff_eq!(result.fuel_cost.0, 36.17, epsilon = 0.01);
        assert_abs_diff_eq!(result.savings.0, result.fuel_cost.0 - 6.0);
    }

    #[test]
    fn test_savings_may_be_negative() {
        let result = estimate_fuel_savings(
            KilowattHours::from(1.0),
            Cost::from(100.0),
            FuelParameters::default(),
            DEFAULT_EV_CONSUMPTION_KWH_100KM,
        );
        assert!(result.savings < Cost::ZERO);
    }

    #[test]
    fn test_aggregate_equals_single_shot_on_summed_inputs() {
        let sessions = [
            (KilowattHours::from(10.0), Cost::from(1.2)),
            (KilowattHours::from(25.5), Cost::from(3.1)),
            (KilowattHours::from(14.5), Cost::from(1.7)),
        ];
        let aggregate = estimate_total_fuel_savings(
            sessions,
            FuelParameters::default(),
            DEFAULT_EV_CONSUMPTION_KWH_100KM,
        );
        let single_shot = estimate_fuel_savings(
            KilowattHours::from(50.0),
            Cost::from(6.0),
            FuelParameters::default(),
            DEFAULT_EV_CONSUMPTION_KWH_100KM,
        );
        assert_abs_diff_eq!(aggregate.fuel_cost.0, single_shot.fuel_cost.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aggregate.savings.0, single_shot.savings.0, epsilon = 1e-9);
    }
}
