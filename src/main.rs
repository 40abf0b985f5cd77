use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use fxwatch::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        from: String,
        to: String,
        amount: f64,
    },
    /// Display the market panel for tracked pairs
    Watch {
        /// Keep refreshing on the configured interval
        #[arg(long)]
        poll: bool,
    },
    /// Track a pair (e.g. USD/EUR), evicting the oldest when full
    Track {
        pair: String,
        /// Human-readable label for the pair
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Stop tracking a pair
    Untrack { pair: String },
    /// List tracked pairs in insertion order
    Pairs,
    /// Display recent conversions
    History,
    /// Save a pair as a favorite
    Favorite { pair: String },
    /// Remove a pair from favorites
    Unfavorite { pair: String },
    /// List favorite pairs
    Favorites,
    /// Display the trailing daily closes for a pair
    Trend {
        from: String,
        to: String,
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Look up the closing rate on a past date (YYYY-MM-DD)
    Lookup {
        from: String,
        to: String,
        date: NaiveDate,
    },
}

impl From<Commands> for fxwatch::AppCommand {
    fn from(cmd: Commands) -> fxwatch::AppCommand {
        match cmd {
            Commands::Convert { from, to, amount } => {
                fxwatch::AppCommand::Convert { from, to, amount }
            }
            Commands::Watch { poll } => fxwatch::AppCommand::Watch { poll },
            Commands::Track { pair, name } => fxwatch::AppCommand::Track { pair, name },
            Commands::Untrack { pair } => fxwatch::AppCommand::Untrack { pair },
            Commands::Pairs => fxwatch::AppCommand::Pairs,
            Commands::History => fxwatch::AppCommand::History,
            Commands::Favorite { pair } => fxwatch::AppCommand::Favorite { pair },
            Commands::Unfavorite { pair } => fxwatch::AppCommand::Unfavorite { pair },
            Commands::Favorites => fxwatch::AppCommand::Favorites,
            Commands::Trend { from, to, days } => fxwatch::AppCommand::Trend { from, to, days },
            Commands::Lookup { from, to, date } => fxwatch::AppCommand::Lookup { from, to, date },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxwatch::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  exchange_rate:
    base_url: "https://v6.exchangerate-api.com/v6"
    api_key: "YOUR-EXCHANGERATE-API-KEY"
  polygon:
    base_url: "https://api.polygon.io"
    api_key: "YOUR-POLYGON-API-KEY"

# Watchlist capacity; the oldest tracked pair is evicted beyond it.
max_tracked_pairs: 3
request_timeout_secs: 10
poll_interval_secs: 300
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
