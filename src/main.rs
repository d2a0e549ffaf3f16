//! DEX Monitor
//!
//! Watches confirmed transactions on one or all configured networks and
//! alerts on token issuance, pair listing and pair-listing proposals.
//!
//! Usage:
//!   dex-monitor --net prod
//!   dex-monitor --net all --config config/monitor.toml
//!
//! Alert delivery (optional, from environment / .env):
//!   TELEGRAM_BOT_TOKEN + TELEGRAM_CHAT_ID, DISCORD_WEBHOOK
//!
//! Each network runs in its own task. SIGINT/SIGTERM stops all of them.

use anyhow::{Context, Result};
use clap::Parser;
use dexnode_client::config::{AlertConfig, MonitorConfig, DEFAULT_CONFIG_PATH};
use dexnode_client::monitor::NetworkMonitor;
use dexnode_client::notify::build_sink;
use dexnode_client::rpc::WsEventSource;
use futures::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// DEX Monitor: token issuance and pair listing alerts
#[derive(Parser)]
#[command(name = "dex-monitor")]
struct Args {
    /// Network to watch (prod, testnet, or all)
    #[arg(short, long, env = "DEX_NET", default_value = "prod")]
    net: String,

    /// Monitor config; built-in networks are used when missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let args = Args::parse();

    info!("===========================================");
    info!("   DEX Monitor");
    info!("===========================================");

    let config = MonitorConfig::load_or_builtin(&args.config)?;
    let networks = config.select(&args.net.to_lowercase())?;
    info!("Config: {} | networks: {}", args.config.display(), networks.len());

    let sink = build_sink(&AlertConfig::from_env());

    // Shutdown flag shared by every worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;
    let signals_handle = signals.handle();
    tokio::spawn(async move {
        if let Some(sig) = signals.next().await {
            info!("Received signal {} - stopping monitors", sig);
            let _ = shutdown_tx.send(true);
        }
    });

    let mut workers = JoinSet::new();
    for net in networks {
        let settings = config.settings_for(net);
        let source = WsEventSource::new(&net.rpc_url)
            .with_context(|| format!("Invalid rpc_url for network {}", net.name))?;
        info!("{}: {} ({})", net.name, source.url(), net.chain.default_chain_id());

        let sink = Arc::clone(&sink);
        let shutdown = shutdown_rx.clone();
        workers.spawn(async move {
            let mut monitor = NetworkMonitor::new(source, sink, settings);
            let result = monitor.run(shutdown).await;
            (monitor.settings().name.clone(), result)
        });
    }
    drop(shutdown_rx);

    let mut failures = 0usize;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok((name, Ok(stats))) => info!(
                "{} finished | events={} dispatched={} decode_failures={}",
                name, stats.events, stats.dispatched, stats.decode_failures
            ),
            Ok((name, Err(e))) => {
                failures += 1;
                error!("{} monitor failed: {}", name, e);
            }
            Err(e) => {
                failures += 1;
                error!("Monitor task panicked: {}", e);
            }
        }
    }
    signals_handle.close();

    if failures > 0 {
        warn!("{} monitor(s) ended with an error", failures);
        anyhow::bail!("{} monitor(s) failed", failures);
    }
    info!("All monitors stopped");
    Ok(())
}
