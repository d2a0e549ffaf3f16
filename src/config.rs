//! Configuration management
//!
//! Sources:
//!     config/monitor.toml — monitored networks + monitor tuning
//!     environment / .env  — node URL for library clients, alert secrets
//!
//! Secrets never live in the TOML file.
//!
//! Example:
//!   [general]
//!   event_query = "tm.event = 'Tx'"
//!   buffer_size = 100
//!   heartbeat_interval = 100
//!
//!   [[network]]
//!   name = "prod"
//!   chain = "prod"
//!   rpc_url = "http://dataseed5.ninicoin.io:80"

use crate::error::TransportError;
use crate::monitor::MonitorSettings;
use crate::rpc::event_query::EventQuery;
use crate::rpc::{DexClient, HttpTransport, TX_EVENT_QUERY};
use crate::types::ChainNetwork;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";
pub const PROD_RPC_URL: &str = "http://dataseed5.ninicoin.io:80";
pub const TESTNET_RPC_URL: &str = "http://data-seed-pre-1-s3.binance.org:80";

// ── Monitor (TOML) ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(rename = "network", default = "default_networks")]
    pub networks: Vec<NetworkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_event_query")]
    pub event_query: String,
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval: i64,
}

fn default_event_query() -> String { TX_EVENT_QUERY.to_string() }
fn default_buffer_size() -> usize { 100 }
fn default_heartbeat_interval() -> i64 { 100 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            event_query: default_event_query(),
            buffer_size: default_buffer_size(),
            heartbeat_interval: default_heartbeat_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Label in alerts and logs, matched by `--net`
    pub name: String,
    pub chain: ChainNetwork,
    pub rpc_url: String,
}

fn default_networks() -> Vec<NetworkConfig> {
    vec![
        NetworkConfig {
            name: "prod".to_string(),
            chain: ChainNetwork::Prod,
            rpc_url: PROD_RPC_URL.to_string(),
        },
        NetworkConfig {
            name: "testnet".to_string(),
            chain: ChainNetwork::Testnet,
            rpc_url: TESTNET_RPC_URL.to_string(),
        },
    ]
}

impl MonitorConfig {
    /// Public seed nodes for prod and testnet
    pub fn builtin() -> Self {
        Self {
            general: GeneralConfig::default(),
            networks: default_networks(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in networks when the file does not exist
    pub fn load_or_builtin<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            info!(
                "{} not found - using built-in prod/testnet networks",
                path.as_ref().display()
            );
            Ok(Self::builtin())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.networks.is_empty() {
            bail!("no [[network]] entries configured");
        }
        if self.general.buffer_size == 0 {
            bail!("general.buffer_size must be at least 1");
        }
        EventQuery::parse(&self.general.event_query)
            .with_context(|| format!("invalid general.event_query {:?}", self.general.event_query))?;

        let mut names = HashSet::new();
        for net in &self.networks {
            if !names.insert(net.name.as_str()) {
                bail!("duplicate network name {:?}", net.name);
            }
        }
        Ok(())
    }

    /// `"all"` selects every network; anything else must match a name
    pub fn select(&self, net: &str) -> Result<Vec<&NetworkConfig>> {
        if net.eq_ignore_ascii_case("all") {
            return Ok(self.networks.iter().collect());
        }
        let selected: Vec<_> = self.networks.iter().filter(|n| n.name == net).collect();
        if selected.is_empty() {
            let known: Vec<_> = self.networks.iter().map(|n| n.name.as_str()).collect();
            bail!("unknown network {:?} (configured: {}, or all)", net, known.join(", "));
        }
        Ok(selected)
    }

    pub fn settings_for(&self, net: &NetworkConfig) -> MonitorSettings {
        MonitorSettings {
            name: net.name.clone(),
            network: net.chain,
            event_query: self.general.event_query.clone(),
            buffer_size: self.general.buffer_size,
            heartbeat_interval: self.general.heartbeat_interval,
        }
    }
}

// ── Library client (environment) ────────────────────────────────────

/// Node connection for query / transaction clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub network: ChainNetwork,
    pub chain_id: String,
}

impl ClientConfig {
    /// NODE_RPC_URL (required), CHAIN_NETWORK (default prod), CHAIN_ID
    /// (default: the network's chain id)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_url = non_empty(lookup("NODE_RPC_URL")).context("NODE_RPC_URL not set")?;
        let network: ChainNetwork = match non_empty(lookup("CHAIN_NETWORK")) {
            Some(s) => s.parse().map_err(anyhow::Error::msg)?,
            None => ChainNetwork::Prod,
        };
        let chain_id = non_empty(lookup("CHAIN_ID"))
            .unwrap_or_else(|| network.default_chain_id().to_string());

        Ok(Self {
            rpc_url,
            network,
            chain_id,
        })
    }

    /// Read-only accessors over HTTP
    pub fn dex_client(&self) -> std::result::Result<DexClient<HttpTransport>, TransportError> {
        Ok(DexClient::new(HttpTransport::new(&self.rpc_url)?, self.network))
    }
}

// ── Alerts (environment) ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertConfig {
    /// Both TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID set
    pub telegram: Option<TelegramConfig>,
    pub discord_webhook: Option<String>,
}

impl AlertConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let telegram = match (
            non_empty(lookup("TELEGRAM_BOT_TOKEN")),
            non_empty(lookup("TELEGRAM_CHAT_ID")),
        ) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };
        Self {
            telegram,
            discord_webhook: non_empty(lookup("DISCORD_WEBHOOK")),
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
