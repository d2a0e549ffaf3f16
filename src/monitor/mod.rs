//! Event Monitor
//!
//! Purpose:
//!     Watch confirmed-transaction events on one network, decode each
//!     transaction, and raise an alert for every token issuance, pair
//!     listing and pair-listing proposal it contains.
//!
//! Architecture:
//!     types.rs    — MonitorState, MonitorStats, MonitorSettings, HeightTracker
//!     classify.rs — Msg → Alert (total match) + alert text
//!     watcher.rs  — NetworkMonitor: subscription loop
//!
//! Usage:
//!     One NetworkMonitor per network, each in its own tokio task. Workers
//!     share nothing but the shutdown flag.

pub mod classify;
pub mod types;
pub mod watcher;

pub use classify::{classify, Alert};
pub use types::{HeightTracker, MonitorSettings, MonitorState, MonitorStats};
pub use watcher::NetworkMonitor;
