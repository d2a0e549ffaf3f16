//! JSON-RPC over HTTP transport
//!
//! Speaks the node's JSON-RPC 2.0 surface:
//!     abci_query          — store lookups and custom queries
//!     broadcast_tx_commit — synchronous broadcast (waits for the block)
//!     broadcast_tx_async  — fire-and-forget broadcast
//!     tx_search           — indexed transaction search
//!
//! Byte fields arrive base64-encoded, except the async broadcast `data`
//! which is hex. Numeric fields may arrive as JSON strings or numbers.
//!
//! No timeout is set here; pass a configured `reqwest::Client` through
//! `with_client` to bound calls.

use super::transport::{
    BroadcastMode, NodeTransport, QueryResult, RawTxInfo, TxCommitResult, TxResult,
};
use crate::error::TransportError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

// ── Wire structures ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

/// Numbers the node sometimes quotes
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum StrOrNum {
    Str(String),
    Num(i64),
}

impl Default for StrOrNum {
    fn default() -> Self {
        StrOrNum::Num(0)
    }
}

impl StrOrNum {
    pub(super) fn to_i64(&self) -> Result<i64, TransportError> {
        match self {
            StrOrNum::Num(n) => Ok(*n),
            StrOrNum::Str(s) if s.is_empty() => Ok(0),
            StrOrNum::Str(s) => s
                .parse()
                .map_err(|_| TransportError::Malformed(format!("expected integer, got {:?}", s))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AbciQueryResult {
    response: AbciResponse,
}

#[derive(Debug, Default, Deserialize)]
struct AbciResponse {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    log: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    height: StrOrNum,
}

#[derive(Debug, Default, Deserialize)]
struct ExecResult {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    log: String,
}

#[derive(Debug, Deserialize)]
struct BroadcastCommitResult {
    #[serde(default)]
    check_tx: ExecResult,
    #[serde(default)]
    deliver_tx: ExecResult,
    #[serde(default)]
    hash: String,
    #[serde(default)]
    height: StrOrNum,
}

#[derive(Debug, Deserialize)]
struct BroadcastAsyncResult {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    data: String,
    #[serde(default)]
    log: String,
    #[serde(default)]
    hash: String,
}

#[derive(Debug, Deserialize)]
struct TxSearchResult {
    #[serde(default)]
    txs: Vec<TxSearchRow>,
}

#[derive(Debug, Deserialize)]
struct TxSearchRow {
    hash: String,
    height: StrOrNum,
    tx: String,
    #[serde(default)]
    tx_result: ExecResult,
}

// ── Decoding helpers ────────────────────────────────────────────────

pub(super) fn decode_base64(field: &str, s: &str) -> Result<Vec<u8>, TransportError> {
    BASE64
        .decode(s)
        .map_err(|e| TransportError::Malformed(format!("{}: invalid base64: {}", field, e)))
}

fn decode_opt_base64(field: &str, s: &Option<String>) -> Result<Vec<u8>, TransportError> {
    match s {
        Some(s) => decode_base64(field, s),
        None => Ok(Vec::new()),
    }
}

fn abci_to_query_result(res: AbciQueryResult) -> Result<QueryResult, TransportError> {
    let resp = res.response;
    if resp.code != 0 {
        return Err(TransportError::Node {
            code: resp.code,
            log: resp.log,
        });
    }
    let height = resp.height.to_i64()?;
    match resp.value {
        Some(v) => Ok(QueryResult::found(decode_base64("value", &v)?, height)),
        None => Ok(QueryResult::absent(height)),
    }
}

fn commit_to_result(res: BroadcastCommitResult) -> Result<TxCommitResult, TransportError> {
    let ok = res.check_tx.code == 0 && res.deliver_tx.code == 0;
    // check failure wins: deliver never ran
    let (code, log) = if res.check_tx.code != 0 {
        (res.check_tx.code, res.check_tx.log)
    } else {
        (res.deliver_tx.code, res.deliver_tx.log)
    };
    Ok(TxCommitResult {
        ok,
        log,
        hash: res.hash,
        code,
        data: decode_opt_base64("deliver_tx.data", &res.deliver_tx.data)?,
        height: res.height.to_i64()?,
    })
}

fn async_to_result(res: BroadcastAsyncResult) -> Result<TxCommitResult, TransportError> {
    let data = hex::decode(&res.data)
        .map_err(|e| TransportError::Malformed(format!("data: invalid hex: {}", e)))?;
    Ok(TxCommitResult {
        ok: res.code == 0,
        log: res.log,
        hash: res.hash,
        code: res.code,
        data,
        height: 0,
    })
}

fn search_to_rows(res: TxSearchResult) -> Result<Vec<RawTxInfo>, TransportError> {
    res.txs
        .into_iter()
        .map(|row| {
            Ok(RawTxInfo {
                height: row.height.to_i64()?,
                tx: decode_base64("tx", &row.tx)?,
                result: TxResult {
                    code: row.tx_result.code,
                    data: decode_opt_base64("tx_result.data", &row.tx_result.data)?,
                    log: row.tx_result.log,
                },
                hash: row.hash,
            })
        })
        .collect()
}

/// `tcp://host:port` → `http://host:port`; http(s) passes through
pub fn normalize_http_url(url: &str) -> Result<String, TransportError> {
    if let Some(rest) = url.strip_prefix("tcp://") {
        return Ok(format!("http://{}", rest));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(url.to_string());
    }
    Err(TransportError::InvalidUrl(url.to_string()))
}

// ── Transport ───────────────────────────────────────────────────────

pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    request_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: &str) -> Result<Self, TransportError> {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: &str, client: reqwest::Client) -> Result<Self, TransportError> {
        Ok(Self {
            url: normalize_http_url(url)?,
            client,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<R, TransportError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!("rpc call #{} {}", id, method);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let body: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))?;

        if let Some(err) = body.error {
            let message = match err.data {
                Some(data) if !data.is_empty() => format!("{}: {}", err.message, data),
                _ => err.message,
            };
            return Err(TransportError::Rpc {
                code: err.code,
                message,
            });
        }

        body.result
            .ok_or_else(|| TransportError::Malformed(format!("{}: response missing result", method)))
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    async fn abci_query(
        &self,
        path: &str,
        data: &[u8],
        prove: bool,
    ) -> Result<QueryResult, TransportError> {
        let params = json!({
            "path": path,
            "data": hex::encode(data),
            "height": "0",
            "prove": prove,
        });
        let res: AbciQueryResult = self.call("abci_query", params).await?;
        abci_to_query_result(res)
    }

    async fn broadcast_tx(
        &self,
        tx: &[u8],
        mode: BroadcastMode,
    ) -> Result<TxCommitResult, TransportError> {
        let params = json!({ "tx": BASE64.encode(tx) });
        match mode {
            BroadcastMode::Sync => {
                let res: BroadcastCommitResult = self.call("broadcast_tx_commit", params).await?;
                commit_to_result(res)
            }
            BroadcastMode::Async => {
                let res: BroadcastAsyncResult = self.call("broadcast_tx_async", params).await?;
                async_to_result(res)
            }
        }
    }

    async fn tx_search(
        &self,
        query: &str,
        prove: bool,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawTxInfo>, TransportError> {
        let params = json!({
            "query": query,
            "prove": prove,
            "page": page.to_string(),
            "per_page": per_page.to_string(),
        });
        let res: TxSearchResult = self.call("tx_search", params).await?;
        search_to_rows(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_http_url("tcp://127.0.0.1:26657").unwrap(),
            "http://127.0.0.1:26657"
        );
        assert_eq!(
            normalize_http_url("http://dataseed5.ninicoin.io:80").unwrap(),
            "http://dataseed5.ninicoin.io:80"
        );
        assert!(matches!(
            normalize_http_url("ftp://node"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_abci_value_and_absent() {
        let res: AbciQueryResult = serde_json::from_value(json!({
            "response": { "code": 0, "log": "", "value": "AQID", "height": "55" }
        }))
        .unwrap();
        assert_eq!(abci_to_query_result(res).unwrap(), QueryResult::found(vec![1, 2, 3], 55));

        let res: AbciQueryResult = serde_json::from_value(json!({
            "response": { "code": 0, "value": null, "height": 56 }
        }))
        .unwrap();
        assert_eq!(abci_to_query_result(res).unwrap(), QueryResult::absent(56));
    }

    #[test]
    fn test_abci_node_error() {
        let res: AbciQueryResult = serde_json::from_value(json!({
            "response": { "code": 6, "log": "unknown query path", "height": "0" }
        }))
        .unwrap();
        assert_eq!(
            abci_to_query_result(res).unwrap_err(),
            TransportError::Node {
                code: 6,
                log: "unknown query path".into()
            }
        );
    }

    #[test]
    fn test_commit_result() {
        let res: BroadcastCommitResult = serde_json::from_value(json!({
            "check_tx": { "code": 0, "log": "" },
            "deliver_tx": { "code": 0, "data": "NDI=", "log": "Msg 0: " },
            "hash": "AB12",
            "height": "1000"
        }))
        .unwrap();
        let commit = commit_to_result(res).unwrap();
        assert!(commit.ok);
        assert_eq!(commit.data, b"42".to_vec());
        assert_eq!(commit.height, 1000);
        assert_eq!(commit.hash, "AB12");
    }

    #[test]
    fn test_commit_check_failure() {
        let res: BroadcastCommitResult = serde_json::from_value(json!({
            "check_tx": { "code": 65541, "log": "insufficient fee" },
            "deliver_tx": {},
            "hash": "AB12",
            "height": "0"
        }))
        .unwrap();
        let commit = commit_to_result(res).unwrap();
        assert!(!commit.ok);
        assert_eq!(commit.code, 65541);
        assert_eq!(commit.log, "insufficient fee");
    }

    #[test]
    fn test_async_result() {
        let res: BroadcastAsyncResult = serde_json::from_value(json!({
            "code": 0, "data": "", "log": "", "hash": "FF00"
        }))
        .unwrap();
        let commit = async_to_result(res).unwrap();
        assert!(commit.ok);
        assert!(commit.data.is_empty());
    }

    #[test]
    fn test_search_rows() {
        let res: TxSearchResult = serde_json::from_value(json!({
            "txs": [{
                "hash": "AA",
                "height": "7",
                "tx": "AQI=",
                "tx_result": { "code": 0, "log": "ok" }
            }],
            "total_count": "1"
        }))
        .unwrap();
        let rows = search_to_rows(res).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].height, 7);
        assert_eq!(rows[0].tx, vec![1, 2]);
        assert_eq!(rows[0].result.log, "ok");
    }

    #[test]
    fn test_bad_base64_is_malformed() {
        let res: AbciQueryResult = serde_json::from_value(json!({
            "response": { "code": 0, "value": "!!!", "height": "1" }
        }))
        .unwrap();
        assert!(matches!(
            abci_to_query_result(res),
            Err(TransportError::Malformed(_))
        ));
    }
}
