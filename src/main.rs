mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    api::price_provider::PriceProvider,
    cli::{Args, Command, CostArgs, PricesArgs, SavingsArgs},
    core::{
        allocator, fuel,
        pipeline::{self, TaxRates},
        price::{day_max_price, day_min_price},
    },
    prelude::*,
    tables::{
        build_breakdown_table,
        build_day_prices_table,
        build_savings_table,
        build_session_cost_table,
    },
};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Cost(args) => cost(&args).await?,
        Command::Prices(args) => prices(&args).await?,
        Command::Savings(args) => savings(&args),
    }

    info!("done!");
    Ok(())
}

async fn cost(args: &CostArgs) -> Result {
    let tariff = args.tariff.to_config();
    let result = if tariff.uses_fixed_price() {
        allocator::compute_session_cost(&[], None, None, args.energy, &tariff)?
    } else {
        let esios = args.esios.try_new_client()?;
        allocator::calculate_session_cost(
            &esios,
            args.date,
            args.start_time.as_deref(),
            args.end_time.as_deref(),
            args.energy,
            &tariff,
        )
        .await?
    };
    info!(
        base_cost = %result.base_cost,
        discounted_cost = %result.discounted_cost,
        average_price = %result.average_price,
        bonus_savings = %pipeline::bonus_savings(result.base_cost, &tariff),
        "estimated",
    );
    if !result.prices_used.is_empty() {
        println!(
            "{}",
            build_day_prices_table(&result.prices_used, result.day_min_price, result.day_max_price)
        );
    }
    println!("{}", build_session_cost_table(&result));

    if args.breakdown {
        let rates = TaxRates::default();
        let breakdown = pipeline::compute_breakdown(result.base_cost, &tariff, rates);
        println!("{}", build_breakdown_table(&breakdown, rates));
    }
    Ok(())
}

async fn prices(args: &PricesArgs) -> Result {
    let esios = args.esios.try_new_client()?;
    let prices = esios.get_day_prices(args.date).await?;
    if prices.is_empty() {
        warn!("no prices published for the date yet, try again after 20:30");
        return Ok(());
    }
    let (Some(min), Some(max)) = (day_min_price(&prices), day_max_price(&prices)) else {
        return Ok(());
    };
    info!(min = %min, max = %max, "day range");
    println!("{}", build_day_prices_table(&prices, min, max));
    Ok(())
}

fn savings(args: &SavingsArgs) {
    let result = fuel::estimate_total_fuel_savings(
        args.sessions.iter().map(|session| (session.energy, session.electric_cost)),
        args.fuel.parameters(),
        args.fuel.ev_consumption_kwh_100km,
    );
    println!("{}", build_savings_table(&result));
}
