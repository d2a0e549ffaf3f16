//! Event Monitor type definitions

use crate::rpc::TX_EVENT_QUERY;
use crate::types::ChainNetwork;
use serde::Serialize;

/// Idle → Subscribed → Terminated. No way back from Terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Subscribed,
    Terminated,
}

/// Counters reported when a worker stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub events: u64,
    pub decode_failures: u64,
    pub dispatched: u64,
    pub last_height: i64,
}

/// Per-network worker settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Label used in alerts and logs (e.g. "prod")
    pub name: String,
    /// Address rendering profile
    pub network: ChainNetwork,
    pub event_query: String,
    pub buffer_size: usize,
    /// Heartbeat every N heights; 0 disables
    pub heartbeat_interval: i64,
}

impl MonitorSettings {
    pub fn new(name: impl Into<String>, network: ChainNetwork) -> Self {
        Self {
            name: name.into(),
            network,
            event_query: TX_EVENT_QUERY.to_string(),
            buffer_size: 100,
            heartbeat_interval: 100,
        }
    }
}

/// Remembers the last distinct height seen
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightTracker {
    last: Option<i64>,
}

impl HeightTracker {
    /// `Some(is_heartbeat)` on a height change, `None` when unchanged
    pub fn observe(&mut self, height: i64, interval: i64) -> Option<bool> {
        if self.last == Some(height) {
            return None;
        }
        self.last = Some(height);
        Some(interval > 0 && height % interval == 0)
    }

    pub fn last(&self) -> Option<i64> {
        self.last
    }
}
