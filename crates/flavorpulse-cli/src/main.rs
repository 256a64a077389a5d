mod batch;
mod inputs;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use flavorpulse_demand::{compute_demand_signal_with, ScoringContext, SearchTerms};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flavorpulse")]
#[command(about = "Score audience demand for ingredient combinations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score one combination and print the demand signal as JSON
    Score {
        /// JSON file holding an array of content items
        #[arg(long)]
        items: PathBuf,

        /// Comma-separated search terms, e.g. "gochujang, butter"
        #[arg(long)]
        terms: String,

        /// JSON file holding a trend signal
        #[arg(long)]
        trend: Option<PathBuf>,

        /// Evaluation time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Score every combination listed in a YAML batch file
    Batch {
        #[arg(long)]
        file: PathBuf,
    },
    /// Check whether a term matches a piece of text
    Match {
        #[arg(long)]
        term: String,

        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = flavorpulse_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Score {
            items,
            terms,
            trend,
            now,
        }) => {
            let aliases = inputs::build_alias_table(&config)?;
            let calibration = inputs::load_calibration(&config);
            let items = inputs::read_items(&items)?;
            let trend = trend.as_deref().map(inputs::read_trend).transpose()?;
            let terms = SearchTerms::parse(&terms);

            let mut ctx = ScoringContext::new(now.unwrap_or_else(Utc::now), &aliases);
            if let Some(source) = calibration.as_ref() {
                ctx = ctx.with_calibration(source);
            }
            let signal = compute_demand_signal_with(&items, &terms, trend.as_ref(), &ctx);
            println!("{}", serde_json::to_string_pretty(&signal)?);
        }
        Some(Commands::Batch { file }) => {
            let results = batch::run_batch(&config, &file).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Some(Commands::Match { term, text }) => {
            let aliases = inputs::build_alias_table(&config)?;
            let matched = aliases.matches(&term, &text);
            println!(
                "{}",
                serde_json::json!({ "term": term, "text": text, "matches": matched })
            );
        }
        None => println!("flavorpulse: use --help to list commands"),
    }

    Ok(())
}
