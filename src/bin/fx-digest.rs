//! fx-digest CLI - daily exchange-rate digest
//!
//! ## Example Usage
//!
//! ```bash
//! # Fetch, notify and store today's rates for every configured currency
//! FREE_CURRENCY_API_KEY=... fx-digest run
//!
//! # Compute and print without side effects
//! fx-digest run --currency INR --dry-run
//!
//! # Show the stored series for a range
//! fx-digest history MYR --from 2024-06-01 --to 2024-06-30
//! ```

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use fx_digest::format;
use fx_digest::{RateTracker, Result, RunOptions, StepStatus, TrackerConfig};

/// fx-digest: daily exchange-rate digest with weekly stats
#[derive(Parser)]
#[command(name = "fx-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Daily exchange-rate digest with weekly stats", long_about = None)]
struct Cli {
    /// Directory holding the rates database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file replacing the built-in currency table
    #[arg(long, global = true)]
    currencies: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's rates, compute stats, notify and store
    Run {
        /// Only process these currencies (repeatable)
        #[arg(short = 'c', long = "currency", value_name = "CODE")]
        currency: Vec<String>,

        /// Do not write today's rate to the store
        #[arg(long)]
        no_store: bool,

        /// Do not send notifications
        #[arg(long)]
        no_notify: bool,

        /// Neither notify nor store; just print the digest
        #[arg(long)]
        dry_run: bool,

        /// Treat this RFC 3339 timestamp as "now"
        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<DateTime<chrono::FixedOffset>>,
    },

    /// Print the stored series for a currency
    History {
        #[arg(value_name = "CODE")]
        currency: String,

        /// First date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// List configured currencies
    Currencies,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    process::exit(code);
}

fn execute(cli: Cli) -> Result<i32> {
    let mut config = TrackerConfig::from_env()?;
    if let Some(path) = &cli.currencies {
        config = config.with_currency_file(path)?;
    }

    if let Commands::Currencies = cli.command {
        list_currencies(&config);
        return Ok(0);
    }

    let mut builder = RateTracker::builder()
        .config(config)
        .timeout(Duration::from_secs(cli.timeout));
    if let Some(dir) = &cli.data_dir {
        builder = builder.data_dir(dir);
    }
    let tracker = builder.build()?;

    match cli.command {
        Commands::Run {
            currency,
            no_store,
            no_notify,
            dry_run,
            at,
        } => {
            let options = RunOptions {
                notify: !(no_notify || dry_run),
                store: !(no_store || dry_run),
            };
            let currencies: Vec<String> = if currency.is_empty() {
                tracker.config().currency_codes()
            } else {
                currency.iter().map(|c| c.to_uppercase()).collect()
            };
            let report = match at {
                Some(now) => tracker.run_currencies(&currencies, &options, &now),
                None => tracker.run_currencies(&currencies, &options, &Utc::now()),
            };

            for (code, result) in &report.results {
                match result {
                    Ok(outcome) => {
                        println!("{} ({})", outcome.payload.title, outcome.date);
                        print!("{}", format::message(&outcome.payload));
                        print_step("notification", &outcome.notification);
                        print_step("storage", &outcome.storage);
                    }
                    Err(e) => println!("{}: failed: {}", code, e),
                }
            }
            Ok(report.exit_code())
        }
        Commands::History { currency, from, to } => {
            let currency = currency.to_uppercase();
            let records = tracker.history(&currency, from, to)?;
            if records.is_empty() {
                println!("No records for {}", currency);
            }
            for record in records {
                let rate = record
                    .rate(&currency)
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| format::NOT_AVAILABLE.to_string());
                println!("{}  {}", record.date, rate);
            }
            Ok(0)
        }
        Commands::Currencies => Ok(0),
    }
}

fn print_step(name: &str, status: &StepStatus) {
    if *status != StepStatus::Skipped {
        println!("  {}: {}", name, status);
    }
}

fn list_currencies(config: &TrackerConfig) {
    println!("Base currency: {} ({})", config.base_currency, config.timezone);
    for (code, meta) in &config.currencies {
        println!(
            "{}  {:<20} {:<4} collection={} topic={}",
            code, meta.name, meta.symbol, meta.collection, meta.notification_topic
        );
    }
}
