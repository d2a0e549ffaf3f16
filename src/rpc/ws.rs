//! Websocket event source
//!
//! Opens one websocket per subscription, sends the JSON-RPC `subscribe`
//! request and hands back a bounded channel. A reader task parses each
//! confirmed-transaction notification into a `RawEvent` and pushes it in
//! arrival order.
//!
//! The reader task ends (closing the channel) when:
//!     - the socket closes or a read fails
//!     - the node rejects the subscription
//!     - the receiver is dropped
//!
//! There is no reconnect. A closed channel is the caller's signal that the
//! subscription is over.

use super::http::{decode_base64, StrOrNum};
use super::transport::{EventSource, RawEvent};
use crate::error::TransportError;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

pub const TX_EVENT_TYPE: &str = "tendermint/event/Tx";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Deserialize)]
struct WsResponse {
    #[serde(default)]
    result: Option<WsResult>,
    #[serde(default)]
    error: Option<WsError>,
}

#[derive(Debug, Deserialize)]
struct WsError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsResult {
    #[serde(default)]
    data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
struct EventData {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TxEventValue {
    #[serde(rename = "TxResult")]
    tx_result: TxEventResult,
}

#[derive(Debug, Deserialize)]
struct TxEventResult {
    height: StrOrNum,
    tx: String,
}

/// What one text frame carried
#[derive(Debug, PartialEq)]
enum Frame {
    Event(RawEvent),
    /// Subscribe acknowledgment or other frame without event data
    Empty,
    /// Event of a type other than Tx
    Skipped(String),
}

fn parse_frame(text: &str) -> Result<Frame, TransportError> {
    let resp: WsResponse =
        serde_json::from_str(text).map_err(|e| TransportError::Malformed(e.to_string()))?;

    if let Some(err) = resp.error {
        let message = match err.data {
            Some(data) if !data.is_empty() => format!("{}: {}", err.message, data),
            _ => err.message,
        };
        return Err(TransportError::Rpc {
            code: err.code,
            message,
        });
    }

    let data = match resp.result.and_then(|r| r.data) {
        Some(data) => data,
        None => return Ok(Frame::Empty),
    };
    if data.kind != TX_EVENT_TYPE {
        return Ok(Frame::Skipped(data.kind));
    }

    let value: TxEventValue = serde_json::from_value(data.value)
        .map_err(|e| TransportError::Malformed(format!("Tx event: {}", e)))?;
    Ok(Frame::Event(RawEvent {
        height: value.tx_result.height.to_i64()?,
        tx: decode_base64("tx", &value.tx_result.tx)?,
    }))
}

/// http→ws, https→wss, tcp→ws; appends `/websocket`
pub fn websocket_url(rpc_url: &str) -> Result<String, TransportError> {
    let base = rpc_url.trim_end_matches('/');
    let converted = if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("tcp://") {
        format!("ws://{}", rest)
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(TransportError::InvalidUrl(rpc_url.to_string()));
    };

    if converted.ends_with("/websocket") {
        Ok(converted)
    } else {
        Ok(format!("{}/websocket", converted))
    }
}

pub struct WsEventSource {
    url: String,
}

impl WsEventSource {
    /// Accepts the node's RPC URL (http/https/tcp) or a websocket URL
    pub fn new(rpc_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            url: websocket_url(rpc_url)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventSource for WsEventSource {
    async fn subscribe(
        &self,
        query: &str,
        buffer: usize,
    ) -> Result<mpsc::Receiver<RawEvent>, TransportError> {
        let (ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::Websocket(e.to_string()))?;
        let (mut write, read) = ws.split();

        let request = json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "subscribe",
            "params": { "query": query },
        });
        write
            .send(Message::text(request.to_string()))
            .await
            .map_err(|e| TransportError::Websocket(e.to_string()))?;

        info!("Subscribed to {:?} at {}", query, self.url);

        let (tx, rx) = mpsc::channel(buffer.max(1));
        tokio::spawn(read_loop(write, read, tx, self.url.clone()));
        Ok(rx)
    }
}

async fn read_loop(
    mut write: SplitSink<WsStream, Message>,
    mut read: SplitStream<WsStream>,
    tx: mpsc::Sender<RawEvent>,
    url: String,
) {
    loop {
        let msg = tokio::select! {
            _ = tx.closed() => {
                debug!("{}: subscriber dropped", url);
                break;
            }
            msg = read.next() => msg,
        };

        match msg {
            Some(Ok(Message::Text(text))) => match parse_frame(text.as_str()) {
                Ok(Frame::Event(event)) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(Frame::Empty) => {}
                Ok(Frame::Skipped(kind)) => {
                    warn!("{}: skipping event of type {}", url, kind);
                }
                Err(e @ TransportError::Rpc { .. }) => {
                    warn!("{}: subscription rejected: {}", url, e);
                    break;
                }
                Err(e) => {
                    warn!("{}: unreadable frame: {}", url, e);
                }
            },
            Some(Ok(Message::Ping(data))) => {
                let _ = write.send(Message::Pong(data)).await;
            }
            Some(Ok(Message::Close(frame))) => {
                info!("{}: websocket closed: {:?}", url, frame);
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("{}: websocket read failed: {}", url, e);
                break;
            }
            None => {
                info!("{}: websocket stream ended", url);
                break;
            }
        }
    }

    let _ = write.close().await;
}
