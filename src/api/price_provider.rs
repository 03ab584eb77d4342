use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{core::price::HourlyPrice, prelude::*};

/// Source of a day's hourly prices.
///
/// An empty result is valid: day-ahead prices are published around 20:30
/// local time, so the next day has no data before that. Callers treat
/// emptiness as "no data yet", not as an error.
#[async_trait]
pub trait PriceProvider: Sync {
    async fn get_day_prices(&self, on: NaiveDate) -> Result<Vec<HourlyPrice>>;
}
