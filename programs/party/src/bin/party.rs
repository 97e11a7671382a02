// Operator CLI for BNB Party launch configurations
//
// Price helpers for picking a launch price and a checker for TOML launch
// configurations before they are deployed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bnb_party::PartyConfig;
use clap::{Parser, Subcommand};
use ethnum::U256;
use party_math::{decode_price, encode_price_sqrt, tick_at_sqrt_ratio};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "party")]
#[command(about = "BNB Party launch configuration tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Q64.96 square root of reserve1 / reserve0
    EncodePrice {
        /// Reserve of token1, in base units
        reserve1: u128,
        /// Reserve of token0, in base units
        reserve0: u128,
    },

    /// Both directional prices of a Q64.96 square root, 18 decimals
    DecodePrice {
        /// Square-root price as a decimal integer
        sqrt_price_x96: String,
    },

    /// Load and validate a TOML launch configuration
    CheckConfig {
        /// Path to the configuration file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::EncodePrice { reserve1, reserve0 } => encode(reserve1, reserve0, cli.json),
        Commands::DecodePrice { sqrt_price_x96 } => decode(&sqrt_price_x96, cli.json),
        Commands::CheckConfig { path } => check_config(&path, cli.json),
    }
}

fn encode(reserve1: u128, reserve0: u128, as_json: bool) -> Result<()> {
    let sqrt_price_x96 = encode_price_sqrt(reserve1, reserve0)
        .with_context(|| format!("cannot encode {reserve1} / {reserve0}"))?;
    let tick = tick_at_sqrt_ratio(sqrt_price_x96).ok();
    debug!(reserve1, reserve0, ?tick, "encoded price");

    if as_json {
        println!(
            "{}",
            json!({
                "sqrt_price_x96": sqrt_price_x96.to_string(),
                "tick": tick,
            })
        );
    } else {
        println!("{sqrt_price_x96}");
    }
    Ok(())
}

fn decode(raw: &str, as_json: bool) -> Result<()> {
    let sqrt_price_x96: U256 = raw
        .replace('_', "")
        .parse()
        .with_context(|| format!("not a decimal integer: {raw}"))?;
    let decoded = decode_price(sqrt_price_x96).context("cannot decode price")?;

    let forward = fixed_18(decoded.token1_per_token0);
    let backward = fixed_18(decoded.token0_per_token1);
    if as_json {
        println!(
            "{}",
            json!({
                "token1_per_token0": forward,
                "token0_per_token1": backward,
            })
        );
    } else {
        println!("token1 per token0: {forward}");
        println!("token0 per token1: {backward}");
    }
    Ok(())
}

fn check_config(path: &PathBuf, as_json: bool) -> Result<()> {
    let config = PartyConfig::load(path)
        .with_context(|| format!("invalid launch configuration {}", path.display()))?;
    info!(
        path = %path.display(),
        wrapped_native = %config.wrapped_native,
        target = config.party_target,
        "configuration valid"
    );

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("party target:     {}", fixed_18(U256::from(config.party_target)));
        println!("create token fee: {}", fixed_18(U256::from(config.create_token_fee)));
        println!("bonded fee tier:  {}", config.party_lp_fee);
        println!("public fee tier:  {}", config.lp_fee);
        println!(
            "bonded ticks:     [{}, {}]",
            config.party_ticks.lower, config.party_ticks.upper
        );
        println!(
            "public ticks:     [{}, {}]",
            config.public_ticks.lower, config.public_ticks.upper
        );
        println!("wrapped native:   {}", config.wrapped_native);
    }
    Ok(())
}

/// Render a 1e18-scaled value as a decimal
fn fixed_18(value: U256) -> String {
    let scale = U256::from(1_000_000_000_000_000_000u128);
    let fraction = (value % scale).to_string();
    format!("{}.{:0>18}", value / scale, fraction)
}
