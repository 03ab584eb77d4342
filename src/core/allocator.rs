//! Session cost allocation against a day's hourly price curve.

use chrono::NaiveDate;
use itertools::Itertools;

use crate::{
    api::price_provider::PriceProvider,
    core::{
        error::CostError,
        pipeline,
        price::{HourlyPrice, day_max_price, day_min_price},
        span::SessionSpan,
        tariff::TariffConfig,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// Outcome of one session cost allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionCostResult {
    /// Energy × effective unit price, before any discount or tax.
    pub base_cost: Cost,

    /// Base cost after the social-bonus discount, still without taxes.
    pub discounted_cost: Cost,

    /// Effective unit price: time-weighted for hourly tariffs, the contracted
    /// price for flat ones.
    pub average_price: KilowattHourRate,

    /// Hourly prices that contributed, unique by hour, ascending.
    pub prices_used: Vec<HourlyPrice>,

    /// Session duration in hours. Zero for flat-tariff sessions, which need
    /// no time bounds.
    pub hours_charged: f64,

    pub day_min_price: KilowattHourRate,
    pub day_max_price: KilowattHourRate,
}

/// Fetch the day's prices and allocate the session cost.
///
/// The fixed-price path never touches the provider, so a flat-tariff
/// calculation works even while the day-ahead prices are unpublished.
#[instrument(skip_all, fields(on = %on, energy = %energy))]
pub async fn calculate_session_cost<P: PriceProvider + ?Sized>(
    provider: &P,
    on: NaiveDate,
    start_time: Option<&str>,
    end_time: Option<&str>,
    energy: KilowattHours,
    tariff: &TariffConfig,
) -> Result<SessionCostResult> {
    if tariff.uses_fixed_price() {
        return Ok(compute_session_cost(&[], None, None, energy, tariff)?);
    }
    let prices =
        provider.get_day_prices(on).await.context("failed to fetch the day's prices")?;
    Ok(compute_session_cost(&prices, start_time, end_time, energy, tariff)?)
}

/// Allocate the session cost over already-fetched prices.
///
/// For hourly tariffs the session window is walked hour bucket by hour
/// bucket, weighting each bucket's price by the fraction of the hour the
/// session actually covers. Hours with no published price are skipped rather
/// than failing. When the weighted walk produces nothing, an unweighted mean
/// over the session's inclusive wall-clock hour range serves as fallback.
pub fn compute_session_cost(
    prices: &[HourlyPrice],
    start_time: Option<&str>,
    end_time: Option<&str>,
    energy: KilowattHours,
    tariff: &TariffConfig,
) -> Result<SessionCostResult, CostError> {
    if !energy.is_finite() || energy <= KilowattHours::ZERO {
        return Err(CostError::invalid_input("the delivered energy must be positive"));
    }

    if tariff.uses_fixed_price()
        && let Some(fixed_price) = tariff.fixed_price
    {
        let base_cost = energy * fixed_price;
        return Ok(SessionCostResult {
            base_cost,
            discounted_cost: pipeline::apply_bonus_discount(base_cost, tariff),
            average_price: fixed_price,
            prices_used: Vec::new(),
            hours_charged: 0.0,
            day_min_price: fixed_price,
            day_max_price: fixed_price,
        });
    }

    let (Some(day_min), Some(day_max)) = (day_min_price(prices), day_max_price(prices)) else {
        return Err(CostError::NoPriceData);
    };
    let (Some(start_time), Some(end_time)) = (start_time, end_time) else {
        return Err(CostError::invalid_input(
            "start and end times are required for an hourly tariff",
        ));
    };
    let span = SessionSpan::parse(start_time, end_time)?;

    let mut prices_used: Vec<HourlyPrice> = Vec::new();
    let mut weighted_price_sum = KilowattHourRate::ZERO;
    let mut total_weight = 0.0;
    for bucket in span.hour_buckets() {
        let Some(hourly) = prices.iter().find(|price| price.hour == bucket.hour) else {
            warn!(hour = bucket.hour, "no published price for the hour, skipping");
            continue;
        };
        weighted_price_sum += hourly.price * bucket.weight;
        total_weight += bucket.weight;
        if !prices_used.iter().any(|price| price.hour == hourly.hour) {
            prices_used.push(hourly.clone());
        }
    }

    if total_weight == 0.0 || prices_used.is_empty() {
        return fall_back_to_unweighted_mean(prices, span, energy, tariff, day_min, day_max);
    }

    let average_price = weighted_price_sum / total_weight;
    let base_cost = energy * average_price;
    prices_used.sort_unstable_by_key(|price| price.hour);
    Ok(SessionCostResult {
        base_cost,
        discounted_cost: pipeline::apply_bonus_discount(base_cost, tariff),
        average_price,
        prices_used,
        hours_charged: span.duration_hours(),
        day_min_price: day_min,
        day_max_price: day_max,
    })
}

/// Degenerate path: a plain arithmetic mean over every published price in the
/// session's inclusive wall-clock hour range.
///
/// Note that the inclusive range may cover one more boundary hour than the
/// weighted walk would for the same session. This path only runs when the
/// weighted walk found no overlapping prices at all, so the two can never
/// disagree about a session the primary path is able to price.
fn fall_back_to_unweighted_mean(
    prices: &[HourlyPrice],
    span: SessionSpan,
    energy: KilowattHours,
    tariff: &TariffConfig,
    day_min: KilowattHourRate,
    day_max: KilowattHourRate,
) -> Result<SessionCostResult, CostError> {
    let in_range = prices
        .iter()
        .filter(|price| span.wall_hour_range_contains(price.hour))
        .cloned()
        .collect_vec();
    if in_range.is_empty() {
        return Err(CostError::NoPriceData);
    }

    #[allow(clippy::cast_precision_loss)]
    let average_price =
        in_range.iter().map(|price| price.price).sum::<KilowattHourRate>() / in_range.len() as f64;
    let base_cost = energy * average_price;
    info!(n_prices = in_range.len(), "weighted allocation found nothing, averaged the hour range");
    Ok(SessionCostResult {
        base_cost,
        discounted_cost: pipeline::apply_bonus_discount(base_cost, tariff),
        average_price,
        prices_used: in_range.into_iter().sorted_unstable_by_key(|price| price.hour).collect(),
        hours_charged: span.duration_hours(),
        day_min_price: day_min,
        day_max_price: day_max,
    })
}
