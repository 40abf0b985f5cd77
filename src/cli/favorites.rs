use crate::cli::ui;
use crate::config::AppConfig;
use crate::favorites::{Favorites, FavoritesError};
use crate::pair::PairCode;
use crate::store;
use anyhow::{Result, bail};
use comfy_table::Cell;

pub fn add(config: &AppConfig, code: &str) -> Result<()> {
    let code: PairCode = code.parse()?;
    // The add boundary rejects degenerate pairs; the model does not.
    if code.from_currency() == code.to_currency() {
        bail!("Source and target currencies must be different");
    }

    let blob_store = store::open(config)?;
    let mut favorites = Favorites::load(blob_store);

    match favorites.add(code.clone()) {
        Ok(()) => {
            println!("Added {code} to favorites.");
            Ok(())
        }
        Err(e @ FavoritesError::AlreadySaved(_)) => {
            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn remove(config: &AppConfig, code: &str) -> Result<()> {
    let code: PairCode = code.parse()?;

    let blob_store = store::open(config)?;
    let mut favorites = Favorites::load(blob_store);

    match favorites.remove(&code) {
        Ok(()) => {
            println!("Removed {code} from favorites.");
            Ok(())
        }
        Err(e @ FavoritesError::NotSaved(_)) => {
            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list(config: &AppConfig) -> Result<()> {
    let blob_store = store::open(config)?;
    let favorites = Favorites::load(blob_store);

    if favorites.is_empty() {
        println!("No favorite pairs saved yet.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Pair"), ui::header_cell("Name")]);
    for code in favorites.codes() {
        table.add_row(vec![
            Cell::new(code.as_str()),
            Cell::new(format!(
                "{} / {}",
                code.from_currency(),
                code.to_currency()
            )),
        ]);
    }

    println!("{table}");
    Ok(())
}
