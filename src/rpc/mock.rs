//! In-memory transport for tests. Records every primitive call so tests can
//! assert exactly which queries were (or were not) issued.

use super::transport::{BroadcastMode, NodeTransport, QueryResult, RawTxInfo, TxCommitResult};
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

type Key = (String, Vec<u8>);

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<Key, Result<Option<Vec<u8>>, TransportError>>>,
    calls: Mutex<Vec<Key>>,
    broadcasts: Mutex<Vec<(Vec<u8>, BroadcastMode)>>,
    commit: Mutex<TxCommitResult>,
    search_rows: Mutex<Vec<RawTxInfo>>,
    searches: Mutex<Vec<(String, u32, u32)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unregistered `(path, data)` pairs answer "absent"
    pub fn respond(&self, path: &str, data: &[u8], bytes: Option<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .insert((path.to_string(), data.to_vec()), Ok(bytes));
    }

    pub fn fail(&self, path: &str, data: &[u8], err: TransportError) {
        self.responses
            .lock()
            .unwrap()
            .insert((path.to_string(), data.to_vec()), Err(err));
    }

    pub fn set_commit(&self, commit: TxCommitResult) {
        *self.commit.lock().unwrap() = commit;
    }

    pub fn set_search_rows(&self, rows: Vec<RawTxInfo>) {
        *self.search_rows.lock().unwrap() = rows;
    }

    pub fn calls(&self) -> Vec<Key> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|(path, _)| path).collect()
    }

    pub fn broadcasts(&self) -> Vec<(Vec<u8>, BroadcastMode)> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<(String, u32, u32)> {
        self.searches.lock().unwrap().clone()
    }

    /// Nothing at all reached the node
    pub fn is_untouched(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
            && self.broadcasts.lock().unwrap().is_empty()
            && self.searches.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl NodeTransport for MockTransport {
    async fn abci_query(
        &self,
        path: &str,
        data: &[u8],
        _prove: bool,
    ) -> Result<QueryResult, TransportError> {
        let key = (path.to_string(), data.to_vec());
        self.calls.lock().unwrap().push(key.clone());
        match self.responses.lock().unwrap().get(&key) {
            Some(Ok(Some(bytes))) => Ok(QueryResult::found(bytes.clone(), 1)),
            Some(Ok(None)) | None => Ok(QueryResult::absent(1)),
            Some(Err(e)) => Err(e.clone()),
        }
    }

    async fn broadcast_tx(
        &self,
        tx: &[u8],
        mode: BroadcastMode,
    ) -> Result<TxCommitResult, TransportError> {
        self.broadcasts.lock().unwrap().push((tx.to_vec(), mode));
        Ok(self.commit.lock().unwrap().clone())
    }

    async fn tx_search(
        &self,
        query: &str,
        _prove: bool,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawTxInfo>, TransportError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), page, per_page));
        Ok(self.search_rows.lock().unwrap().clone())
    }
}
