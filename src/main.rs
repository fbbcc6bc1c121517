use anyhow::{bail, Context, Result};
use balance_exporter::{
    apis::CoinGeckoClient,
    balances::{read_addresses, run_batch},
    config::{self, get_config_clone, update_config, with_config},
    logger::{self, LogTag, LoggerConfig},
    paths,
    services::Services,
    tokens::{to_upstream_date, CoinList, TokenListSource},
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "balance-exporter")]
#[command(version, about = "Export Solana wallet balances with token metadata and historical USD prices")]
struct Cli {
    /// Config file (default: <data dir>/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug output for a log tag (http, rpc, tokens, prices, cache, export, config, system, all)
    #[arg(long = "debug", global = true, value_name = "TAG")]
    debug: Vec<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one balances CSV per address in the address file
    Export(ExportArgs),
    /// Download the CoinGecko coin list used for price id lookups
    FetchCoinList,
    /// Look up one mint in the Jupiter token list
    LookupMint {
        mint: String,
    },
    /// Print the historical USD price of a token symbol
    Price {
        symbol: String,
        /// Day to price, YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Args)]
struct ExportArgs {
    /// Newline-separated wallet addresses
    #[arg(long, default_value = ".addresses")]
    addresses: PathBuf,

    /// Day to price, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    date: Option<String>,

    /// Directory for the CSV reports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keep balances of exactly 0 or 1
    #[arg(long)]
    keep_dust: bool,

    /// Keep tokens whose name could not be resolved
    #[arg(long)]
    keep_unknown: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    paths::ensure_all_directories()
        .map_err(anyhow::Error::msg)
        .context("Failed to create application directories")?;

    logger::init(LoggerConfig::from_flags(&cli.debug, cli.verbose, cli.quiet));

    let result = run(cli).await;
    if let Err(e) = &result {
        logger::error(LogTag::System, &format!("{:#}", e));
    }
    logger::flush();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(paths::get_config_path);
    let from_file = config::load_config_from_path(&config_path)
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;
    if from_file {
        logger::info(LogTag::Config, &format!("Loaded config from {}", config_path.display()));
    } else {
        logger::debug(
            LogTag::Config,
            &format!("No config at {}, using defaults", config_path.display()),
        );
    }

    match cli.command {
        Command::Export(args) => export(args).await,
        Command::FetchCoinList => fetch_coin_list().await,
        Command::LookupMint { mint } => lookup_mint(&mint).await,
        Command::Price { symbol, date } => price(&symbol, date).await,
    }
}

fn resolve_date(date: Option<String>) -> Result<String> {
    let date = date.unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());
    if to_upstream_date(&date).is_none() {
        bail!("Invalid date '{}', expected YYYY-MM-DD", date);
    }
    Ok(date)
}

fn build_services() -> Result<Services> {
    let config = get_config_clone();
    logger::verbose(LogTag::Config, &format!("{:?}", config));
    Services::from_config(&config)
        .map_err(anyhow::Error::msg)
        .context("Failed to build HTTP client")
}

async fn export(args: ExportArgs) -> Result<()> {
    let date = resolve_date(args.date)?;

    update_config(|cfg| {
        if args.keep_dust {
            cfg.export.skip_dust_balances = false;
        }
        if args.keep_unknown {
            cfg.export.skip_unknown_tokens = false;
        }
        if let Some(dir) = &args.output_dir {
            cfg.export.output_dir = Some(dir.display().to_string());
        }
    });

    let output_dir = with_config(|cfg| cfg.export.output_dir.clone())
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_exports_directory);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let addresses = read_addresses(&args.addresses).map_err(anyhow::Error::msg)?;
    if addresses.is_empty() {
        logger::warning(
            LogTag::Export,
            &format!("No addresses in {}", args.addresses.display()),
        );
        return Ok(());
    }

    let services = build_services()?;
    let aggregator = services.aggregator();

    logger::info(
        LogTag::Export,
        &format!(
            "Exporting {} addresses priced on {} into {}",
            addresses.len(),
            date,
            output_dir.display()
        ),
    );

    let start = Instant::now();
    let summary = run_batch(&aggregator, &addresses, &date, &output_dir).await;
    logger::info(
        LogTag::Export,
        &format!(
            "Done in {:.1}s: {}/{} reports written",
            start.elapsed().as_secs_f64(),
            summary.written.len(),
            summary.total()
        ),
    );

    Ok(())
}

async fn fetch_coin_list() -> Result<()> {
    let services = build_services()?;
    let coins = services
        .coingecko
        .fetch_coins_list()
        .await
        .context("Failed to fetch CoinGecko coin list")?;

    CoinList::save(&coins, services.coin_list_path()).map_err(anyhow::Error::msg)?;
    logger::info(
        LogTag::Prices,
        &format!(
            "Saved {} coins ({} with a Solana address) to {}",
            coins.len(),
            CoinGeckoClient::extract_solana_addresses(&coins).len(),
            services.coin_list_path().display()
        ),
    );
    Ok(())
}

async fn lookup_mint(mint: &str) -> Result<()> {
    let services = build_services()?;
    match services.jupiter.lookup(mint).await {
        Ok(details) => {
            println!("Token Name: {}, Token Symbol: {}", details.name, details.symbol);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{} is not in the token list", mint);
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("Lookup of {} failed", mint))),
    }
}

async fn price(symbol: &str, date: Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    let services = build_services()?;

    let coin_id = services.load_coin_list().resolve_id_by_symbol(symbol);
    let price = services.price_resolver().resolve(&coin_id, &date).await;
    if price.is_unknown() {
        logger::warning(
            LogTag::Prices,
            &format!("No price for '{}' (id '{}') on {}", symbol, coin_id, date),
        );
    }

    println!(
        "Token ID: '{}', Symbol: '{}', Date: {}, Price: {}",
        coin_id, symbol, date, price
    );
    Ok(())
}
