//! Wire types for the `/api/stats` payload.

use serde::{Deserialize, Serialize};

/// One entry in the server's scrolling message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Display name of the sender, `ip:port` for raw TCP clients.
    pub from: String,
    /// Wall-clock stamp in `%H:%M:%S` form, formatted server-side.
    pub time: String,
    pub message: String,
    /// Epoch seconds at receipt. Absent from older payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// One `/api/stats` payload: server state at poll time.
///
/// `total_connections` is monotonic non-decreasing from the server's view of
/// a session; `connected_clients` and `messages` preserve server order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub active_connections: u64,
    pub total_connections: u64,
    pub total_bytes_received: u64,
    pub total_bytes_sent: u64,
    #[serde(default)]
    pub connected_clients: Vec<String>,
    #[serde(default)]
    pub messages: Vec<LogMessage>,
}
