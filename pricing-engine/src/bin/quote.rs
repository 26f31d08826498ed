//! Freight quote command-line tool

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pricing_engine::{
    Currency, PriceCalculator, PricingConfig, RawAdvancePayment, RawQuoteInput, TransportMode,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "freight-quote", version, about = "Quote a freight shipment in EUR and XOF")]
struct Cli {
    /// TOML pricing configuration (falls back to FREIGHT_PRICING_CONFIG, then built-in rates)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the price breakdown of one shipment
    Quote(QuoteArgs),
    /// Show the rate schedule of a transport mode
    Rates {
        /// air, sea or gp
        mode: String,
    },
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// air, sea or gp
    #[arg(long)]
    mode: String,

    /// Food weight (kg)
    #[arg(long, default_value = "")]
    food: String,

    /// Non-food weight (kg)
    #[arg(long, default_value = "")]
    non_food: String,

    /// HN7 weight (kg)
    #[arg(long, default_value = "")]
    hn7: String,

    /// Length (cm, sea only)
    #[arg(long, default_value = "")]
    length: String,

    /// Width (cm, sea only)
    #[arg(long, default_value = "")]
    width: String,

    /// Height (cm, sea only)
    #[arg(long, default_value = "")]
    height: String,

    /// Advance already paid
    #[arg(long)]
    advance: Option<String>,

    /// Currency of the advance (EUR or XOF)
    #[arg(long, default_value = "EUR")]
    currency: String,

    /// Print the breakdown as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PricingConfig::from_file(path)
            .with_context(|| format!("loading pricing config {}", path.display()))?,
        None => PricingConfig::from_env()?,
    };
    let calculator = PriceCalculator::new(config)?;

    match cli.command {
        Commands::Quote(args) => {
            let currency: Currency = args.currency.parse()?;
            let raw = RawQuoteInput {
                food_weight: args.food,
                non_food_weight: args.non_food,
                hn7_weight: args.hn7,
                length: args.length,
                width: args.width,
                height: args.height,
                advance: args.advance.map(|amount| RawAdvancePayment::new(amount, currency)),
            };

            let quote = calculator.calculate_raw(&args.mode, &raw)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("{}", quote);
            }
        }
        Commands::Rates { mode } => {
            let mode: TransportMode = mode.parse()?;
            print!("{}", calculator.rate_card(mode));
        }
    }

    Ok(())
}
