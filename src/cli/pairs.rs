use crate::cli::ui;
use crate::config::AppConfig;
use crate::pair::{PairCode, TrackedPair};
use crate::store;
use crate::watchlist::{Watchlist, WatchlistError};
use anyhow::Result;
use comfy_table::Cell;

/// Adds a pair to the watchlist, evicting the oldest when full.
pub fn track(config: &AppConfig, code: &str, name: Option<&str>) -> Result<()> {
    let code: PairCode = code.parse()?;
    let display_name = name.map_or_else(
        || format!("{} / {}", code.from_currency(), code.to_currency()),
        str::to_string,
    );

    let blob_store = store::open(config)?;
    let mut watchlist = Watchlist::load(blob_store, config.max_tracked_pairs);

    match watchlist.add(TrackedPair::new(code.clone(), display_name)) {
        Ok(()) => {
            println!("Added {code} to the watchlist.");
            Ok(())
        }
        Err(e @ WatchlistError::AlreadyTracked(_)) => {
            // Domain rejection, not a process failure.
            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn untrack(config: &AppConfig, code: &str) -> Result<()> {
    let code: PairCode = code.parse()?;

    let blob_store = store::open(config)?;
    let mut watchlist = Watchlist::load(blob_store, config.max_tracked_pairs);

    match watchlist.remove(&code) {
        Ok(()) => {
            println!("Removed {code} from the watchlist.");
            Ok(())
        }
        Err(e @ WatchlistError::NotTracked(_)) => {
            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list(config: &AppConfig) -> Result<()> {
    let blob_store = store::open(config)?;
    let watchlist = Watchlist::load(blob_store, config.max_tracked_pairs);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Pair"),
        ui::header_cell("Name"),
    ]);
    for (i, pair) in watchlist.tracked().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(pair.code.as_str()),
            Cell::new(&pair.display_name),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        ui::style_text(
            &format!(
                "{} of {} slots used; the oldest pair is evicted first.",
                watchlist.len(),
                watchlist.capacity()
            ),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
