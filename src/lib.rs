pub mod cli;
pub mod config;
pub mod convert;
pub mod favorites;
pub mod history;
pub mod log;
pub mod market;
pub mod pair;
pub mod providers;
pub mod rate_source;
pub mod store;
pub mod watchlist;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum AppCommand {
    Convert {
        from: String,
        to: String,
        amount: f64,
    },
    Watch {
        poll: bool,
    },
    Track {
        pair: String,
        name: Option<String>,
    },
    Untrack {
        pair: String,
    },
    Pairs,
    History,
    Favorite {
        pair: String,
    },
    Unfavorite {
        pair: String,
    },
    Favorites,
    Trend {
        from: String,
        to: String,
        days: u32,
    },
    Lookup {
        from: String,
        to: String,
        date: NaiveDate,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert { from, to, amount } => {
            cli::convert::run(&config, &from, &to, amount).await
        }
        AppCommand::Watch { poll } => cli::watch::run(&config, poll).await,
        AppCommand::Track { pair, name } => cli::pairs::track(&config, &pair, name.as_deref()),
        AppCommand::Untrack { pair } => cli::pairs::untrack(&config, &pair),
        AppCommand::Pairs => cli::pairs::list(&config),
        AppCommand::History => cli::history::run(&config),
        AppCommand::Favorite { pair } => cli::favorites::add(&config, &pair),
        AppCommand::Unfavorite { pair } => cli::favorites::remove(&config, &pair),
        AppCommand::Favorites => cli::favorites::list(&config),
        AppCommand::Trend { from, to, days } => cli::trend::trend(&config, &from, &to, days).await,
        AppCommand::Lookup { from, to, date } => {
            cli::trend::lookup(&config, &from, &to, date).await
        }
    }
}
