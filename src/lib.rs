//! DEX Node Client Library
//!
//! Typed access to a DEX chain node: namespaced store queries, governance
//! proposal submission, and a confirmed-transaction monitor that raises
//! alerts for token issuance and pair listing.
//!
//! Layers:
//!     types / msg / codec — domain model and wire encoding
//!     rpc                 — transports, store keys, typed accessors
//!     transaction         — signing + broadcast, proposal submission
//!     monitor / notify    — event watcher and alert delivery
//!     config              — TOML monitor config, environment settings

pub mod codec;
pub mod config;
pub mod error;
pub mod monitor;
pub mod msg;
pub mod notify;
pub mod rpc;
pub mod transaction;
pub mod types;

// Re-export commonly used types
pub use codec::{BinaryCodec, Codec};
pub use config::{AlertConfig, ClientConfig, MonitorConfig};
pub use error::{ClientError, Result, TransportError};
pub use monitor::{MonitorSettings, MonitorStats, NetworkMonitor};
pub use msg::Msg;
pub use notify::{build_sink, NotificationSink};
pub use rpc::{BroadcastMode, DexClient, HttpTransport, StoreQueryClient, WsEventSource};
pub use transaction::{BroadcastOptions, KeyManager, SubmitProposalResult, TxClient};
pub use types::{AccAddress, ChainNetwork, Fixed8};
