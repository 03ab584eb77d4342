//! [ESIOS](https://www.esios.ree.es) day-ahead PVPC price client.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use itertools::Itertools;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    api::{client, price_provider::PriceProvider},
    core::price::HourlyPrice,
    prelude::*,
    quantity::rate::KilowattHourRate,
};

/// PVPC 2.0TD indicator.
const PVPC_INDICATOR_ID: u32 = 1001;

/// Mainland Spain. The indicator also carries the islands' curves.
const PENINSULA_GEO_ID: u32 = 8741;

pub struct Api {
    client: Client,
    api_token: String,
}

impl Api {
    pub fn try_new(api_token: String) -> Result<Self> {
        Ok(Self { client: client::try_new()?, api_token })
    }
}

#[async_trait]
impl PriceProvider for Api {
    /// Get all hourly PVPC prices on the specified day.
    ///
    /// Returns an empty vector when the day's prices are not published yet.
    #[instrument(fields(on = ?on), skip_all)]
    async fn get_day_prices(&self, on: NaiveDate) -> Result<Vec<HourlyPrice>> {
        info!("fetching…");
        let url = format!(
            "https://api.esios.ree.es/indicators/{PVPC_INDICATOR_ID}?start_date={on}T00:00&end_date={on}T23:59"
        );
        let values = self
            .client
            .get(url)
            .header("Accept", "application/json; application/vnd.esios-api-v1+json")
            .header("x-api-key", &self.api_token)
            .send()
            .await
            .context("failed to call")?
            .error_for_status()
            .context("request failed")?
            .json::<GetIndicatorResponse>()
            .await
            .context("failed to deserialize the response")?
            .indicator
            .values;
        info!(n_values = values.len(), "fetched");
        let prices = values
            .into_iter()
            .filter(|value| value.geo_id == PENINSULA_GEO_ID)
            .map(IndicatorValue::into_hourly_price)
            .sorted_unstable_by_key(|price| price.hour)
            .collect();
        Ok(prices)
    }
}

#[derive(Deserialize)]
struct GetIndicatorResponse {
    indicator: Indicator,
}

#[derive(Deserialize)]
struct Indicator {
    values: Vec<IndicatorValue>,
}

#[derive(Deserialize)]
struct IndicatorValue {
    /// Euro per **megawatt**-hour.
    value: f64,

    /// Interval start, carrying the local UTC offset (`+01:00` or `+02:00`).
    datetime: DateTime<FixedOffset>,

    geo_id: u32,
}

impl IndicatorValue {
    fn into_hourly_price(self) -> HourlyPrice {
        let hour = self.datetime.hour();
        let price = KilowattHourRate::from(self.value / 1000.0);
        HourlyPrice::new(hour, price, self.datetime)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Local;

    use super::*;

    #[test]
    fn test_deserialize_and_convert() -> Result {
        let response: GetIndicatorResponse = serde_json::from_str(
            // language=json
            r#"{
                "indicator": {
                    "values": [
                        {
                            "value": 142.35,
                            "datetime": "2026-01-12T15:00:00.000+01:00",
                            "geo_id": 8741,
                            "geo_name": "Península"
                        },
                        {
                            "value": 150.0,
                            "datetime": "2026-01-12T15:00:00.000+01:00",
                            "geo_id": 8742,
                            "geo_name": "Canarias"
                        }
                    ]
                }
            }"#,
        )?;
        let prices: Vec<HourlyPrice> = response
            .indicator
            .values
            .into_iter()
            .filter(|value| value.geo_id == PENINSULA_GEO_ID)
            .map(IndicatorValue::into_hourly_price)
            .collect();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].hour, 15);
        assert_abs_diff_eq!(prices[0].price.0, 0.14235);
        assert_eq!(prices[0].ends_at - prices[0].starts_at, chrono::TimeDelta::hours(1));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_get_day_prices_ok() -> Result {
        let api = Api::try_new(std::env::var("ESIOS_API_TOKEN")?)?;
        let prices = api.get_day_prices(Local::now().date_naive()).await?;
        assert!(prices.len() <= 24);
        assert!(prices.iter().is_sorted_by_key(|price| price.hour));
        Ok(())
    }
}
