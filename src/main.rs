//! Agricultural Market Advisor
//!
//! CLI for crop market analysis and LLM-backed marketing advice.

use agri_advisor::{
    advisor::{Advisor, AdvisoryCache, LlmClient},
    analysis::Analyzer,
    config::Config,
    data::DataStore,
    server::{start_server, AppState},
    types::{AdvisoryResponse, Timeframe},
};
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agri-advisor")]
#[command(about = "Market analysis and advisory tool for crop marketing decisions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate marketing advice for a farmer query
    Advise {
        /// Crop to analyze
        #[arg(long, default_value = "wheat")]
        crop: String,
        /// Analysis timeframe: "1 week", "1 month", or "3 months"
        #[arg(long, default_value = "1 month")]
        timeframe: String,
        /// Farmer query
        #[arg(long)]
        query: String,
        /// Force refresh all data and bypass the advisory cache
        #[arg(long)]
        refresh: bool,
        /// Output file path for JSON results
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the comprehensive analysis for a crop as JSON
    Analyze {
        #[arg(long, default_value = "wheat")]
        crop: String,
        #[arg(long, default_value = "1 month")]
        timeframe: String,
    },
    /// Regenerate the datasets backing a crop
    Refresh {
        #[arg(long, default_value = "wheat")]
        crop: String,
    },
    /// Run the JSON API server
    Serve {
        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Advise {
            crop,
            timeframe,
            query,
            refresh,
            output,
        } => advise(config, &crop, &timeframe, &query, refresh, output).await,
        Commands::Analyze { crop, timeframe } => analyze(config, &crop, &timeframe),
        Commands::Refresh { crop } => refresh_data(config, &crop),
        Commands::Serve { port } => serve(config, port).await,
    }
}

fn build_analyzer(config: &Config) -> anyhow::Result<Analyzer> {
    let data = DataStore::open(config.data.dir_path())?;
    Ok(Analyzer::new(data, config.data.default_region.clone()))
}

fn build_advisor(config: &Config) -> anyhow::Result<Advisor> {
    let cache = AdvisoryCache::open(config.cache.dir_path())?;
    let model = LlmClient::from_config(&config.llm)?;
    Ok(Advisor::new(cache, Box::new(model)))
}

async fn advise(
    config: Config,
    crop: &str,
    timeframe: &str,
    query: &str,
    refresh: bool,
    output: Option<String>,
) -> anyhow::Result<()> {
    println!("🌾 Agricultural Market Advisor");
    println!("Analyzing {crop} for {timeframe} timeframe");

    let mut analyzer = build_analyzer(&config)?;
    let advisor = build_advisor(&config)?;

    if refresh {
        println!("Refreshing data...");
        analyzer.refresh_data(crop)?;
    }

    println!("Analyzing market data...");
    let analysis = analyzer.comprehensive(crop, Timeframe::parse(timeframe))?;

    println!("Generating personalized advice...");
    let advisory = advisor.get_advisory(&analysis, query, refresh).await;

    print_advisory(&advisory);

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string_pretty(&advisory)?)?;
        println!("\nResults saved to {path}");
    }

    Ok(())
}

fn print_advisory(advisory: &AdvisoryResponse) {
    println!("\n===== MARKET ADVICE =====");
    println!("{}", advisory.advice);

    println!("\n===== DATA SUMMARY =====");
    match &advisory.data_summary {
        Some(summary) => {
            print_summary_line("Current Price", summary.current_price);
            print_summary_line("Price Trend", summary.price_trend);
            print_summary_line("Projected Price Change", summary.projected_price_change);
            print_summary_line("Market Sentiment", summary.market_sentiment);
            print_summary_line("Weather Impact", summary.weather_impact);
        }
        None => println!("- Not available"),
    }

    println!("\nGenerated on: {}", advisory.timestamp);
}

fn print_summary_line<T: Display>(label: &str, value: Option<T>) {
    match value {
        Some(value) => println!("- {label}: {value}"),
        None => println!("- {label}: N/A"),
    }
}

fn analyze(config: Config, crop: &str, timeframe: &str) -> anyhow::Result<()> {
    let mut analyzer = build_analyzer(&config)?;
    let analysis = analyzer.comprehensive(crop, Timeframe::parse(timeframe))?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

fn refresh_data(config: Config, crop: &str) -> anyhow::Result<()> {
    let mut analyzer = build_analyzer(&config)?;
    analyzer.refresh_data(crop)?;
    println!("Refreshed datasets for {crop}");
    Ok(())
}

async fn serve(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    let analyzer = build_analyzer(&config)?;
    let advisor = build_advisor(&config)?;

    let state = Arc::new(AppState {
        analyzer: Mutex::new(analyzer),
        advisor,
    });

    let port = port.unwrap_or(config.server.port);
    start_server(state, port).await?;
    Ok(())
}
