use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        allocator::SessionCostResult,
        fuel::FuelSavingsResult,
        pipeline::{CostBreakdown, TaxRates},
        price::{HourlyPrice, PriceLevel},
    },
    quantity::{cost::Cost, rate::KilowattHourRate},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

const fn level_color(level: PriceLevel) -> Color {
    match level {
        PriceLevel::Low => Color::Green,
        PriceLevel::Medium => Color::DarkYellow,
        PriceLevel::High => Color::Red,
    }
}

#[must_use]
pub fn build_day_prices_table(
    prices: &[HourlyPrice],
    min: KilowattHourRate,
    max: KilowattHourRate,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hour", "Price", "Level"]);
    for price in prices {
        let level = PriceLevel::relative(price.price, min, max);
        table.add_row(vec![
            Cell::new(format!("{:02}:00", price.hour)),
            Cell::new(price.price).set_alignment(CellAlignment::Right).fg(level_color(level)),
            Cell::new(format!("{level:?}")).fg(level_color(level)),
        ]);
    }
    table
}

#[must_use]
pub fn build_session_cost_table(result: &SessionCostResult) -> Table {
    let average_level =
        PriceLevel::relative(result.average_price, result.day_min_price, result.day_max_price);

    let mut table = new_table();
    table.set_header(vec!["", "Value"]);
    table.add_row(vec![
        Cell::new("Average price"),
        Cell::new(result.average_price)
            .set_alignment(CellAlignment::Right)
            .fg(level_color(average_level)),
    ]);
    table.add_row(vec![
        Cell::new("Base cost"),
        Cell::new(result.base_cost.round_to_mills()).set_alignment(CellAlignment::Right),
    ]);
    if result.discounted_cost != result.base_cost {
        table.add_row(vec![
            Cell::new("After social bonus"),
            Cell::new(result.discounted_cost.round_to_mills())
                .set_alignment(CellAlignment::Right)
                .fg(Color::Green),
        ]);
    }
    if result.hours_charged > 0.0 {
        table.add_row(vec![
            Cell::new("Duration"),
            Cell::new(format!("{:.2} h", result.hours_charged)).set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("Day range"),
            Cell::new(format!("{} – {}", result.day_min_price, result.day_max_price))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

#[must_use]
pub fn build_breakdown_table(breakdown: &CostBreakdown, rates: TaxRates) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![
        Cell::new("Energy cost"),
        Cell::new(breakdown.base_cost).set_alignment(CellAlignment::Right),
    ]);
    if breakdown.bonus_discount != Cost::ZERO {
        table.add_row(vec![
            Cell::new("Social bonus"),
            Cell::new(format!("-{}", breakdown.bonus_discount))
                .set_alignment(CellAlignment::Right)
                .fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("Subtotal"),
            Cell::new(breakdown.cost_after_bonus).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("Electricity tax ({:.2}%)", rates.electricity_tax * 100.0)),
        Cell::new(breakdown.electricity_tax).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new(format!("VAT ({:.0}%)", rates.vat * 100.0)),
        Cell::new(breakdown.iva).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Total with taxes").add_attribute(Attribute::Bold),
        Cell::new(breakdown.total_cost)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

#[must_use]
pub fn build_savings_table(result: &FuelSavingsResult) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Value"]);
    table.add_row(vec![
        Cell::new("Estimated distance"),
        Cell::new(format!("{:.0} km", result.estimated_km)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Fuel equivalent"),
        Cell::new(format!("{:.2} L", result.fuel_liters)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Fuel cost"),
        Cell::new(result.fuel_cost).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Electric cost"),
        Cell::new(result.electric_cost).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Savings").add_attribute(Attribute::Bold),
        Cell::new(result.savings)
            .set_alignment(CellAlignment::Right)
            .fg(if result.savings >= Cost::ZERO { Color::Green } else { Color::Red }),
    ]);
    table
}
