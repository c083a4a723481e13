use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use pumpfun_sdk::{
    common::AnyResult,
    config::SdkConfig,
    event_parser::{CompleteEvent, CreateEvent, EventMetadata, SetParamsEvent, TradeEvent},
    utils::{
        price::pumpfun::{buy_price_impact_bps, price_token_in_sol_with_bonding_curve},
        units,
    },
    PumpFunSdk,
};

#[derive(Parser, Debug)]
#[command(name = "pumpfun-sdk")]
#[command(about = "Inspect Pump.fun bonding curves, quote trades and watch program events")]
struct Args {
    /// Path to a TOML configuration file, the environment is used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the global account
    Global,
    /// Print the bonding curve of a mint
    Curve {
        #[arg(long)]
        mint: String,
    },
    /// Quote a buy of `sol` SOL
    QuoteBuy {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        sol: f64,
        #[arg(long)]
        slippage_bps: Option<u64>,
    },
    /// Quote a sell of `tokens` tokens (UI amount, 6 decimals)
    QuoteSell {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        tokens: f64,
        #[arg(long)]
        slippage_bps: Option<u64>,
    },
    /// Print the SOL balance of a wallet, or its token balance with `--mint`
    Balance {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        mint: Option<String>,
    },
    /// Print the status of a landed transaction
    TxStatus {
        #[arg(long)]
        signature: String,
    },
    /// Print program events as they arrive
    Watch {
        /// Stop after this many seconds, run until Ctrl-C otherwise
        #[arg(long)]
        seconds: Option<u64>,
    },
}

#[derive(Serialize)]
struct CurveReport<'a> {
    mint: String,
    active: bool,
    price_sol: f64,
    market_cap_lamports: u64,
    #[serde(flatten)]
    curve: &'a pumpfun_sdk::accounts::BondingCurveAccount,
}

fn print_json<T: Serialize>(value: &T) -> AnyResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_event<T: Serialize>(kind: &str, event: &T, metadata: &EventMetadata) {
    let line = serde_json::json!({ "type": kind, "event": event, "metadata": metadata });
    println!("{}", line);
}

fn parse_pubkey(kind: &str, value: &str) -> AnyResult<Pubkey> {
    Pubkey::from_str(value).map_err(|e| anyhow::anyhow!("invalid {} {}: {}", kind, value, e))
}

fn parse_mint(mint: &str) -> AnyResult<Pubkey> {
    parse_pubkey("mint", mint)
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let config = match &args.config {
        Some(path) => SdkConfig::load(path)?,
        None => SdkConfig::from_env()?,
    };
    let sdk = PumpFunSdk::from_config(&config)?;

    match args.command {
        Command::Global => print_json(&sdk.get_global_account().await?)?,
        Command::Curve { mint } => {
            let mint = parse_mint(&mint)?;
            let curve = sdk.get_bonding_curve_account(&mint).await?;
            print_json(&CurveReport {
                mint: mint.to_string(),
                active: curve.is_active(),
                price_sol: price_token_in_sol_with_bonding_curve(&curve),
                market_cap_lamports: curve.get_market_cap_sol()?,
                curve: &curve,
            })?;
        }
        Command::QuoteBuy { mint, sol, slippage_bps } => {
            let mint = parse_mint(&mint)?;
            let lamports = units::sol_to_lamports(sol);
            let snapshot = sdk.fetch_snapshot(&mint).await?;
            let quote =
                snapshot.buy(lamports, slippage_bps.unwrap_or(sdk.default_buy_slippage_bps()))?;
            print_json(&serde_json::json!({
                "quote": quote,
                "price_impact_bps": buy_price_impact_bps(&snapshot.curve, lamports),
            }))?;
        }
        Command::QuoteSell { mint, tokens, slippage_bps } => {
            let mint = parse_mint(&mint)?;
            let amount = units::ui_amount_to_base_units(
                tokens,
                pumpfun_sdk::constants::pumpfun::global_constants::DEFAULT_DECIMALS,
            );
            let quote = sdk.quote_sell(&mint, amount, slippage_bps).await?;
            print_json(&quote)?;
        }
        Command::Balance { owner, mint } => {
            let owner = parse_pubkey("owner", &owner)?;
            match mint {
                Some(mint) => {
                    let mint = parse_mint(&mint)?;
                    print_json(&sdk.get_token_balance(&owner, &mint).await?)?
                }
                None => print_json(&sdk.get_sol_balance(&owner).await?)?,
            }
        }
        Command::TxStatus { signature } => {
            let signature = Signature::from_str(&signature)
                .map_err(|e| anyhow::anyhow!("invalid signature {}: {}", signature, e))?;
            match sdk.get_transaction_status(&signature).await? {
                Some(status) => print_json(&status)?,
                None => anyhow::bail!("transaction {} not found", signature),
            }
        }
        Command::Watch { seconds } => watch(&sdk, seconds).await?,
    }

    Ok(())
}

async fn watch(sdk: &PumpFunSdk, seconds: Option<u64>) -> AnyResult<()> {
    sdk.add_event_listener::<CreateEvent, _>(|e, m| print_event("create", e, m));
    sdk.add_event_listener::<TradeEvent, _>(|e, m| print_event("trade", e, m));
    sdk.add_event_listener::<CompleteEvent, _>(|e, m| print_event("complete", e, m));
    sdk.add_event_listener::<SetParamsEvent, _>(|e, m| print_event("set_params", e, m));

    let handle = sdk.subscribe_events().await?;
    match seconds {
        Some(seconds) => tokio::time::sleep(Duration::from_secs(seconds)).await,
        None => tokio::signal::ctrl_c().await?,
    }
    handle.shutdown().await;

    let stats = sdk.events().stats();
    log::info!("Decoded {} event(s), skipped {}", stats.decoded, stats.skipped);
    Ok(())
}
