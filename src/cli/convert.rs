use crate::cli::ui;
use crate::config::AppConfig;
use crate::convert;
use crate::history::{HistoryLog, HistoryRecord};
use crate::providers;
use crate::store;
use anyhow::{Context, Result, bail};

/// Converts an amount between two currencies and appends the result to
/// the conversion history.
pub async fn run(config: &AppConfig, from: &str, to: &str, amount: f64) -> Result<()> {
    let from = from.trim().to_ascii_uppercase();
    let to = to.trim().to_ascii_uppercase();

    if from.is_empty() || to.is_empty() {
        bail!("Please enter valid currencies");
    }
    if from == to {
        bail!("Source and target currencies must be different");
    }
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Please enter a valid amount greater than zero");
    }

    let spot = providers::spot_source(config)?;
    let pb = ui::new_spinner(&format!("Converting {amount} {from} to {to}..."));
    let result = convert::execute(&spot, &from, &to, amount).await;
    pb.finish_and_clear();
    let conversion = result?;

    println!(
        "{} {} = {}",
        conversion.amount,
        conversion.from,
        ui::style_text(
            &format!("{:.2} {}", conversion.converted, conversion.to),
            ui::StyleType::Value
        )
    );
    println!(
        "{}",
        ui::style_text(
            &format!("1 {} = {:.4} {}", conversion.from, conversion.rate, conversion.to),
            ui::StyleType::Subtle
        )
    );

    // A failed write breaks the durability contract; surface it rather
    // than swallowing.
    let blob_store = store::open(config)?;
    let mut history = HistoryLog::load(blob_store);
    history
        .record(HistoryRecord::now(
            conversion.amount,
            conversion.from,
            conversion.to,
            conversion.converted,
        ))
        .context("Conversion succeeded but could not be recorded in history")?;

    Ok(())
}
