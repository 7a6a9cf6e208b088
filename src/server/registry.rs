//! Shared traffic statistics, lock-guarded across all connections.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{Local, Utc};

use crate::snapshot::{LogMessage, StatsSnapshot};

/// The message log keeps this many entries; the oldest is dropped first.
pub const MESSAGE_LOG_CAP: usize = 100;

#[derive(Debug, Default)]
struct RegistryInner {
    active_connections: u64,
    total_connections: u64,
    total_bytes_received: u64,
    total_bytes_sent: u64,
    connected_clients: Vec<String>,
    messages: VecDeque<LogMessage>,
}

/// Shared counters behind one mutex, cloned into every connection task.
#[derive(Debug, Clone, Default)]
pub struct TrafficRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl TrafficRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client connected: bump active and total, record its display name.
    pub fn client_connected(&self, client_id: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.active_connections += 1;
            inner.total_connections += 1;
            inner.connected_clients.push(client_id.to_string());
        }
    }

    /// A client went away: drop active and remove the first matching name.
    pub fn client_disconnected(&self, client_id: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.active_connections = inner.active_connections.saturating_sub(1);
            if let Some(pos) = inner.connected_clients.iter().position(|c| c == client_id) {
                inner.connected_clients.remove(pos);
            }
        }
    }

    /// Record one received message: byte accounting plus a stamped log
    /// entry, capped at [`MESSAGE_LOG_CAP`].
    pub fn record_message(&self, from: &str, body: &str) {
        let entry = LogMessage {
            from: from.to_string(),
            time: Local::now().format("%H:%M:%S").to_string(),
            message: body.to_string(),
            timestamp: Some(Utc::now().timestamp_millis() as f64 / 1000.0),
        };
        if let Ok(mut inner) = self.inner.lock() {
            inner.total_bytes_received += body.len() as u64;
            inner.messages.push_back(entry);
            while inner.messages.len() > MESSAGE_LOG_CAP {
                inner.messages.pop_front();
            }
        }
    }

    /// Account for bytes sent back to a client.
    pub fn record_sent(&self, bytes: usize) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.total_bytes_sent += bytes as u64;
        }
    }

    /// Current state as one `/api/stats` payload.
    pub fn snapshot(&self) -> StatsSnapshot {
        self.inner
            .lock()
            .map(|inner| StatsSnapshot {
                active_connections: inner.active_connections,
                total_connections: inner.total_connections,
                total_bytes_received: inner.total_bytes_received,
                total_bytes_sent: inner.total_bytes_sent,
                connected_clients: inner.connected_clients.clone(),
                messages: inner.messages.iter().cloned().collect(),
            })
            .unwrap_or_default()
    }
}
