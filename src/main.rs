use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use valut_convert::config::Config;
use valut_convert::currency::{display_code, normalize_code};
use valut_convert::loader::backfill;
use valut_convert::prefs::Preferences;
use valut_convert::{CbrClient, LoadedRates, RateSource, RateStore, convert, export, load_rates};

#[derive(Parser)]
#[command(name = "valut")]
#[command(author, version, about = "Currency converter on CBR daily rates", long_about = None)]
struct Cli {
    /// Skip the network and use stored rates only
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount; missing arguments are taken from the last run
    Convert {
        /// Amount, arithmetic allowed (e.g. 50*1.2)
        amount: Option<String>,
        /// Source currency code
        from: Option<String>,
        /// Target currency code
        to: Option<String>,
    },
    /// Show all rates of the current snapshot
    Rates,
    /// Export all rates to an .xlsx workbook
    Export {
        /// Output file; `.xlsx` is appended if missing
        path: PathBuf,
    },
    /// Show stored history of one currency
    History {
        /// Currency code (e.g. USD)
        code: String,
    },
    /// Fetch and store rates for the past days
    Backfill {
        #[arg(long, default_value_t = 7)]
        days: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = RateStore::open(&config.database_url).await?;
    let client = CbrClient::new(&config.feed_url, &config.probe_url, config.http_timeout)?;

    let result = run(cli, &config, &client, &store).await;
    store.close().await;
    result
}

async fn run(cli: Cli, config: &Config, client: &CbrClient, store: &RateStore) -> Result<()> {
    match cli.command {
        Commands::Convert { amount, from, to } => {
            let loaded = resolve_rates(client, store, cli.offline).await;
            let last = Preferences::load(&config.prefs_path);
            let prefs = Preferences {
                from: normalize_code(from.as_deref().unwrap_or(&last.from)),
                to: normalize_code(to.as_deref().unwrap_or(&last.to)),
                amount: amount.unwrap_or(last.amount),
            };

            match convert(&prefs.amount, &prefs.from, &prefs.to, &loaded.snapshot) {
                Ok(result) => println!("{result:.4}"),
                Err(e) => println!("Error: {e}"),
            }
            prefs.save(&config.prefs_path);
        }
        Commands::Rates => {
            let loaded = resolve_rates(client, store, cli.offline).await;
            for (code, rate) in loaded.snapshot.iter() {
                println!("{:<50} {rate:>16.6}", display_code(code));
            }
        }
        Commands::Export { path } => {
            let loaded = resolve_rates(client, store, cli.offline).await;
            let written = export::write_rates(&loaded.snapshot, &path)?;
            println!("Saved {}", written.display());
        }
        Commands::History { code } => {
            let code = normalize_code(&code);
            let history = store.history(&code).await?;
            if history.is_empty() {
                println!("no data");
            }
            let name = display_code(&code);
            for entry in history {
                println!("{}  {name}: {:.6} RUB", entry.observed_at, entry.rate);
            }
        }
        Commands::Backfill { days } => {
            let stored = backfill(client, store, days).await?;
            println!("Stored rates for {stored} days");
        }
    }

    Ok(())
}

async fn resolve_rates(client: &CbrClient, store: &RateStore, offline: bool) -> LoadedRates {
    let loaded = load_rates(client, store, offline).await;
    if loaded.source != RateSource::Live {
        println!("Last updated: {}", loaded.snapshot.label());
    }
    loaded
}
