//! Node access layer
//!
//! Architecture:
//!     validate.rs    — parameter checks run before any network call
//!     event_query.rs — event-filter grammar
//!     transport.rs   — NodeTransport / EventSource contracts
//!     store.rs       — namespaced keys → store or custom-path queries
//!     dex_client.rs  — typed accessors
//!     http.rs        — JSON-RPC over HTTP transport
//!     ws.rs          — websocket event source

pub mod dex_client;
pub mod event_query;
pub mod http;
pub mod store;
pub mod transport;
pub mod validate;
pub mod ws;

#[cfg(test)]
pub(crate) mod mock;

pub use dex_client::DexClient;
pub use event_query::{EventQuery, TX_EVENT_QUERY};
pub use http::HttpTransport;
pub use store::{Namespace, StoreKey, StoreQueryClient};
pub use transport::{
    BroadcastMode, EventSource, NodeTransport, QueryResult, RawEvent, RawTxInfo, TxCommitResult,
    TxResult,
};
pub use validate::MAX_PAGE_SIZE;
pub use ws::WsEventSource;
