use crate::cli::ui;
use crate::config::AppConfig;
use crate::market::{self, PairOutcome};
use crate::providers;
use crate::rate_source::{ReferenceRateSource, SpotRateSource};
use crate::store;
use crate::watchlist::Watchlist;
use anyhow::Result;
use comfy_table::Cell;
use std::time::Duration;
use tracing::info;

/// Renders the market panel once, or on a fixed timer with `--poll`.
pub async fn run(config: &AppConfig, poll: bool) -> Result<()> {
    let blob_store = store::open(config)?;
    let watchlist = Watchlist::load(blob_store, config.max_tracked_pairs);
    let spot = providers::spot_source(config)?;
    let reference = providers::reference_source(config)?;

    if !poll {
        return render_once(&watchlist, &spot, &reference).await;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(config.poll_interval_secs));
    loop {
        ticker.tick().await;
        render_once(&watchlist, &spot, &reference).await?;
        info!(
            "Next refresh in {} seconds, Ctrl-C to stop",
            config.poll_interval_secs
        );
    }
}

async fn render_once(
    watchlist: &Watchlist,
    spot: &dyn SpotRateSource,
    reference: &dyn ReferenceRateSource,
) -> Result<()> {
    let tracked = watchlist.tracked();
    // Should never exceed capacity, re-slice anyway.
    let tracked = &tracked[..tracked.len().min(watchlist.capacity())];

    if tracked.is_empty() {
        println!("No pairs tracked. Add one with `fxwatch track USD/EUR`.");
        return Ok(());
    }

    let pb = ui::new_spinner("Fetching live market data...");
    let outcomes = market::refresh(spot, reference, tracked).await;
    pb.finish_and_clear();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Name"),
        ui::header_cell("Rate"),
        ui::header_cell("Change"),
    ]);

    let mut failures = Vec::new();
    for outcome in &outcomes {
        match outcome {
            PairOutcome::Quote(quote) => {
                table.add_row(vec![
                    Cell::new(quote.code.as_str()),
                    Cell::new(&quote.display_name),
                    ui::rate_cell(quote.rate),
                    ui::change_cell(quote.percent_change),
                ]);
            }
            PairOutcome::Failure(failure) => {
                table.add_row(vec![
                    Cell::new(failure.code.as_str()),
                    Cell::new(&failure.display_name),
                    Cell::new(ui::style_text("load failed", ui::StyleType::Error)),
                    Cell::new("N/A"),
                ]);
                failures.push(failure.code.as_str());
            }
        }
    }

    println!("{table}");

    if !failures.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "Failed to load: {}. Remove with `fxwatch untrack <PAIR>`.",
                    failures.join(", ")
                ),
                ui::StyleType::Error
            )
        );
    }

    Ok(())
}
