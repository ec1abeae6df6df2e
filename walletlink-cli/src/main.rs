//! walletlink command line client
//!
//! Connects to a JSON-RPC node as if it were an injected wallet, shows the
//! session state and looks up balances.

mod commands;
mod config;
mod types;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{CliConfig, CONFIG_FILE};
use types::Engine;

#[derive(Debug, Parser)]
#[command(name = "walletlink", version, about = "Wallet session client for Ethereum-compatible nodes")]
struct Cli {
    /// JSON-RPC endpoint
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Use the public endpoint of a known chain instead of --rpc-url
    #[arg(long, global = true, conflicts_with = "rpc_url")]
    chain: Option<u64>,

    /// Backend for chain queries
    #[arg(long, global = true, value_enum)]
    engine: Option<Engine>,

    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Request accounts and show address, network and balance
    Connect {
        /// Keep running and print every session change
        #[arg(long)]
        watch: bool,
        /// Poll interval for --watch in milliseconds
        #[arg(long)]
        watch_interval_ms: Option<u64>,
    },
    /// Look up the balance of any address without connecting
    Balance {
        /// Address to look up
        address: String,
    },
    /// Print the display name of a chain id
    Network {
        /// Chain id
        chain_id: u64,
    },
    /// List the known networks
    Networks,
    /// Write the effective configuration to the config file
    Init,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "walletlink=info",
        1 => "walletlink=debug",
        _ => "walletlink=trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = CliConfig::load(&cli.config)?;
    config.apply_env()?;
    if let Some(rpc_url) = cli.rpc_url.clone() {
        config.rpc_url = rpc_url;
    }
    if let Some(engine) = cli.engine {
        config.engine = engine;
    }
    tracing::debug!(?config, "effective configuration");

    match cli.command {
        Command::Connect {
            watch,
            watch_interval_ms,
        } => {
            let interval =
                Duration::from_millis(watch_interval_ms.unwrap_or(config.watch_interval_ms));
            let host = commands::build_host(config.provider_config(cli.chain)?, config.engine)?;
            commands::connect(host, watch, interval).await
        }
        Command::Balance { address } => {
            let host = commands::build_host(config.provider_config(cli.chain)?, config.engine)?;
            commands::balance(host, &address, cli.chain).await
        }
        Command::Network { chain_id } => {
            commands::network(chain_id);
            Ok(())
        }
        Command::Networks => {
            commands::networks();
            Ok(())
        }
        Command::Init => {
            config.save(&cli.config)?;
            println!("✅ Wrote {}", cli.config.display());
            Ok(())
        }
    }
}
