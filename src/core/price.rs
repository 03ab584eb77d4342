use chrono::{DateTime, FixedOffset, TimeDelta};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::quantity::rate::KilowattHourRate;

/// One hour-long price interval of the day-ahead PVPC curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourlyPrice {
    /// Local-calendar hour index of the interval start, `0..24`.
    ///
    /// Within one date's price set the hours are unique and, ideally,
    /// complete. The allocator tolerates gaps.
    pub hour: u32,

    pub price: KilowattHourRate,

    pub starts_at: DateTime<FixedOffset>,
    pub ends_at: DateTime<FixedOffset>,
}

impl HourlyPrice {
    pub fn new(hour: u32, price: KilowattHourRate, starts_at: DateTime<FixedOffset>) -> Self {
        Self { hour, price, starts_at, ends_at: starts_at + TimeDelta::hours(1) }
    }
}

pub fn day_min_price(prices: &[HourlyPrice]) -> Option<KilowattHourRate> {
    prices.iter().map(|price| OrderedFloat(price.price.0)).min().map(|min| min.0.into())
}

pub fn day_max_price(prices: &[HourlyPrice]) -> Option<KilowattHourRate> {
    prices.iter().map(|price| OrderedFloat(price.price.0)).max().map(|max| max.0.into())
}

/// Price position relative to the day's `[min, max]` range, for colouring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PriceLevel {
    Low,
    Medium,
    High,
}

impl PriceLevel {
    /// Split the day's range into thirds. A flat day has no cheap or
    /// expensive hours.
    pub fn relative(price: KilowattHourRate, min: KilowattHourRate, max: KilowattHourRate) -> Self {
        let range = max.0 - min.0;
        if range == 0.0 {
            return Self::Medium;
        }
        let position = (price.0 - min.0) / range;
        if position <= 0.33 {
            Self::Low
        } else if position <= 0.66 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts_at(hour: u32) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(&format!("2026-01-12T{hour:02}:00:00+01:00")).unwrap()
    }

    #[test]
    fn test_day_bounds() {
        let prices = vec![
            HourlyPrice::new(0, 0.12.into(), starts_at(0)),
            HourlyPrice::new(1, 0.08.into(), starts_at(1)),
            HourlyPrice::new(2, 0.19.into(), starts_at(2)),
        ];
        assert_eq!(day_min_price(&prices), Some(KilowattHourRate::from(0.08)));
        assert_eq!(day_max_price(&prices), Some(KilowattHourRate::from(0.19)));
    }

    #[test]
    fn test_day_bounds_empty() {
        assert_eq!(day_min_price(&[]), None);
        assert_eq!(day_max_price(&[]), None);
    }

    #[test]
    fn test_relative_level_thirds() {
        let (min, max) = (KilowattHourRate::from(0.10), KilowattHourRate::from(0.20));
        assert_eq!(PriceLevel::relative(min, min, max), PriceLevel::Low);
        assert_eq!(PriceLevel::relative(KilowattHourRate::from(0.15), min, max), PriceLevel::Medium);
        assert_eq!(PriceLevel::relative(max, min, max), PriceLevel::High);
    }

    #[test]
    fn test_relative_level_flat_day() {
        let price = KilowattHourRate::from(0.10);
        assert_eq!(PriceLevel::relative(price, price, price), PriceLevel::Medium);
    }
}
