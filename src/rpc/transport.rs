//! Consumed primitives
//!
//! `NodeTransport` is the request/response side of the node (ABCI queries,
//! broadcasts, tx search); `EventSource` is the subscription side. Both are
//! async traits so the accessors, submitter and monitor can be driven by the
//! HTTP/websocket implementations or by an in-memory double.

use crate::error::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Raw ABCI query answer. `bytes == None` means the key is not present,
/// which is distinct from bytes that fail to decode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
    pub bytes: Option<Vec<u8>>,
    pub height: i64,
}

impl QueryResult {
    pub fn found(bytes: Vec<u8>, height: i64) -> Self {
        Self { bytes: Some(bytes), height }
    }

    pub fn absent(height: i64) -> Self {
        Self { bytes: None, height }
    }
}

/// `Sync` waits for the block commit and returns the deliver result;
/// `Async` returns as soon as the node accepted the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastMode {
    Sync,
    Async,
}

impl BroadcastMode {
    pub fn from_sync_flag(sync: bool) -> Self {
        if sync {
            BroadcastMode::Sync
        } else {
            BroadcastMode::Async
        }
    }
}

/// Node acknowledgment of a broadcast.
/// `data` is only meaningful when `ok` and the mode was `Sync`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxCommitResult {
    pub ok: bool,
    pub log: String,
    pub hash: String,
    pub code: u32,
    pub data: Vec<u8>,
    pub height: i64,
}

/// Execution result attached to a searched transaction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxResult {
    pub code: u32,
    pub data: Vec<u8>,
    pub log: String,
}

/// Undecoded transaction search row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTxInfo {
    pub hash: String,
    pub height: i64,
    pub tx: Vec<u8>,
    pub result: TxResult,
}

/// One delivered confirmed-transaction event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub height: i64,
    pub tx: Vec<u8>,
}

#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// Key-value lookups use the path `/store/{name}/key` with the key as data;
    /// custom queries pass their own path and request payload.
    async fn abci_query(
        &self,
        path: &str,
        data: &[u8],
        prove: bool,
    ) -> Result<QueryResult, TransportError>;

    async fn broadcast_tx(
        &self,
        tx: &[u8],
        mode: BroadcastMode,
    ) -> Result<TxCommitResult, TransportError>;

    async fn tx_search(
        &self,
        query: &str,
        prove: bool,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawTxInfo>, TransportError>;
}

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Ordered delivery through a channel holding at most `buffer` events.
    /// The channel closes when the underlying connection ends.
    async fn subscribe(
        &self,
        query: &str,
        buffer: usize,
    ) -> Result<mpsc::Receiver<RawEvent>, TransportError>;
}

#[async_trait]
impl<T: NodeTransport + ?Sized> NodeTransport for Arc<T> {
    async fn abci_query(
        &self,
        path: &str,
        data: &[u8],
        prove: bool,
    ) -> Result<QueryResult, TransportError> {
        (**self).abci_query(path, data, prove).await
    }

    async fn broadcast_tx(
        &self,
        tx: &[u8],
        mode: BroadcastMode,
    ) -> Result<TxCommitResult, TransportError> {
        (**self).broadcast_tx(tx, mode).await
    }

    async fn tx_search(
        &self,
        query: &str,
        prove: bool,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawTxInfo>, TransportError> {
        (**self).tx_search(query, prove, page, per_page).await
    }
}

#[async_trait]
impl<S: EventSource + ?Sized> EventSource for Arc<S> {
    async fn subscribe(
        &self,
        query: &str,
        buffer: usize,
    ) -> Result<mpsc::Receiver<RawEvent>, TransportError> {
        (**self).subscribe(query, buffer).await
    }
}
