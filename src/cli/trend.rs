use crate::cli::ui;
use crate::config::AppConfig;
use crate::market;
use crate::providers;
use crate::rate_source::ReferenceRateSource;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use comfy_table::Cell;

fn leg(input: &str) -> Result<String> {
    let leg = input.trim().to_ascii_uppercase();
    if leg.len() != 3 || !leg.bytes().all(|b| b.is_ascii_uppercase()) {
        bail!("Currencies must be 3 letters (e.g. USD)");
    }
    Ok(leg)
}

/// Renders the trailing daily closes for a pair as a table.
pub async fn trend(config: &AppConfig, from: &str, to: &str, days: u32) -> Result<()> {
    let from = leg(from)?;
    let to = leg(to)?;

    let reference = providers::reference_source(config)?;
    let pb = ui::new_spinner(&format!("Fetching {days}-day trend for {from}/{to}..."));
    let result = reference.historical_series(&from, &to, days).await;
    pb.finish_and_clear();
    let series = result?;

    if series.is_empty() {
        bail!("No historical data for {from}/{to}");
    }

    println!(
        "{}",
        ui::style_text(&format!("{from}/{to}"), ui::StyleType::Title)
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Date"), ui::header_cell("Rate")]);
    for point in &series {
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            ui::rate_cell(point.rate),
        ]);
    }
    println!("{table}");

    if series.len() > 1 {
        let change = market::percent_change(series[0].rate, series[series.len() - 1].rate);
        println!(
            "Change over the window: {}",
            ui::style_text(&format!("{change:+.2}%"), ui::StyleType::Value)
        );
    }

    Ok(())
}

/// Prints the closing rate for a single past date.
pub async fn lookup(config: &AppConfig, from: &str, to: &str, date: NaiveDate) -> Result<()> {
    let from = leg(from)?;
    let to = leg(to)?;

    let reference = providers::reference_source(config)?;
    let pb = ui::new_spinner(&format!("Looking up {from}/{to} on {date}..."));
    let result = reference.rate_on_date(&from, &to, date).await;
    pb.finish_and_clear();
    let rate = result?;

    println!(
        "1 {from} = {} on {date}",
        ui::style_text(&format!("{rate:.4} {to}"), ui::StyleType::Value)
    );
    Ok(())
}
