//! Interactive owner/dealer client for the multi-token ledger contract.

use anyhow::Result;
use colored::Colorize;
use ledger_cli::{load_signer, Context, Dispatcher, LedgerConfig, Prompt, StartupError, StdinPrompt};
use ledger_contract::{connect, EventObserver};
use ledger_core::{LedgerGateway, Operator, TokenRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the ledger client.
#[derive(Debug, StructOpt)]
#[structopt(name = "ledgerctl", about = "Owner and dealer client for the multi-token ledger")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint to connect to
    #[structopt(long)]
    rpc_url: Option<String>,

    /// Address of the ledger contract
    #[structopt(long)]
    contract: Option<String>,

    /// Encrypted JSON keystore holding the signing key
    #[structopt(short, long, parse(from_os_str))]
    keystore: Option<PathBuf>,

    /// Chain id used when signing
    #[structopt(long)]
    chain_id: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opt = Opt::from_args();

    if let Err(e) = run(opt).await {
        error!("{}", e);
        eprintln!("{}", e.to_string().red());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Loads configuration: file, then environment, then flags.
fn load_config(opt: Opt) -> Result<LedgerConfig, StartupError> {
    let mut config = match &opt.config {
        Some(path) => LedgerConfig::from_file(path)
            .map_err(|e| StartupError::Config(format!("{}: {}", path.display(), e)))?,
        None => {
            let path = LedgerConfig::default_path();
            if path.exists() {
                info!("Using configuration {}", path.display());
                LedgerConfig::from_file(&path)
                    .map_err(|e| StartupError::Config(format!("{}: {}", path.display(), e)))?
            } else {
                LedgerConfig::default()
            }
        }
    };

    config.apply_env(|key| std::env::var(key).ok());

    if let Some(rpc_url) = opt.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(contract) = opt.contract {
        config.contract_address = contract;
    }
    if let Some(keystore) = opt.keystore {
        config.keystore = Some(keystore);
    }
    if let Some(chain_id) = opt.chain_id {
        config.chain_id = chain_id;
    }

    config.validate().map_err(StartupError::Config)?;
    Ok(config)
}

async fn run(opt: Opt) -> Result<(), StartupError> {
    let config = load_config(opt)?;
    let mut input = StdinPrompt;

    let wallet = load_signer(&config, |key| std::env::var(key).ok(), || {
        input.read_line("Keystore password : ")
    })?;

    let gateway = Arc::new(connect(&config.rpc_url, &config.contract_address, wallet, config.tx_settings()).await?);

    let is_owner = gateway
        .is_owner()
        .await
        .map_err(|e| StartupError::Role(e.to_string()))?;
    let operator = Operator::from_ownership(is_owner);
    println!("{} {} as {}", "Connected:".green(), gateway.account(), operator);

    let registry = Arc::new(TokenRegistry::new());
    if let Err(e) = registry.populate(gateway.as_ref()).await {
        warn!("Token registry is incomplete: {}", e);
        println!(
            "{} only {} tokens could be loaded: {}",
            "Warning:".yellow(),
            registry.len(),
            e
        );
    }

    let observer = EventObserver::new(gateway.as_ref(), registry.clone(), config.observer_interval())
        .spawn(|event| println!("\n{} {}", "Event:".cyan(), event));

    let mut ctx = Context::new(gateway, registry);
    ctx.diagnose_all_rejections = config.diagnose_all_rejections;

    Dispatcher::new(operator, ctx).run(&mut input).await;

    observer.abort();
    println!("Bye");
    Ok(())
}
