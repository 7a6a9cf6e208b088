//! Region model and render state for the stats dashboard.
//!
//! `Dashboard` decides *what* gets written each tick (and when the message
//! region is left alone); a [`Surface`] decides how a region looks. The
//! terminal view, the HTML view, and test recorders all sit behind the one
//! trait.

use crate::format::format_bytes;
use crate::snapshot::{LogMessage, StatsSnapshot};

/// The seven display regions of the dashboard. Each one maps to a stable
/// element identifier on the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    ActiveConnections,
    TotalConnections,
    BytesReceived,
    BytesSent,
    ClientsList,
    Messages,
    StatusBadge,
}

impl Region {
    /// Stable identifier of the hosting element for this region.
    pub fn dom_id(self) -> &'static str {
        match self {
            Region::ActiveConnections => "activeConnections",
            Region::TotalConnections => "totalConnections",
            Region::BytesReceived => "bytesReceived",
            Region::BytesSent => "bytesSent",
            Region::ClientsList => "clientsList",
            Region::Messages => "messages",
            Region::StatusBadge => "statusBadge",
        }
    }
}

/// Connection state shown in the status badge region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Live,
    ConnectionError,
}

/// A render target for snapshot data.
///
/// `Dashboard` calls the setters it decides to update; a region whose setter
/// is not called on a tick keeps whatever it showed before. `flush` marks
/// the end of a tick so full-frame surfaces can redraw once.
pub trait Surface: Send {
    /// Plain-integer counter regions.
    fn set_counter(&mut self, region: Region, value: u64);
    /// Byte-count regions, already formatted ("1.5 KB").
    fn set_bytes(&mut self, region: Region, formatted: &str);
    /// Connected-client chips, in server order. Empty means "show the
    /// empty-state placeholder".
    fn set_clients(&mut self, names: &[String]);
    /// Full re-render of the message log, newest first. Empty means "show
    /// the waiting placeholder".
    fn set_messages(&mut self, newest_first: &[LogMessage]);
    fn set_status(&mut self, status: Status);
    fn flush(&mut self) {}
}

/// Render state carried between ticks.
///
/// The message region is only re-rendered when the message *count* changes.
/// That is a cheap heuristic, not a content diff: in-place edits at the same
/// count go undetected. Kept on purpose; the log is append-only server-side.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    last_message_count: usize,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_message_count(&self) -> usize {
        self.last_message_count
    }

    /// Apply a successful snapshot to `out`.
    ///
    /// Counters, byte totals, the client list, and the status badge are
    /// written every tick; the message region only when its length moved.
    pub fn apply<S: Surface + ?Sized>(&mut self, snap: &StatsSnapshot, out: &mut S) {
        out.set_counter(Region::ActiveConnections, snap.active_connections);
        out.set_counter(Region::TotalConnections, snap.total_connections);
        out.set_bytes(Region::BytesReceived, &format_bytes(snap.total_bytes_received));
        out.set_bytes(Region::BytesSent, &format_bytes(snap.total_bytes_sent));
        out.set_clients(&snap.connected_clients);

        if snap.messages.is_empty() {
            out.set_messages(&[]);
            self.last_message_count = 0;
        } else if snap.messages.len() != self.last_message_count {
            let newest_first: Vec<LogMessage> =
                snap.messages.iter().rev().cloned().collect();
            out.set_messages(&newest_first);
            self.last_message_count = snap.messages.len();
        }

        out.set_status(Status::Live);
        out.flush();
    }

    /// Apply a failed poll: only the status badge changes, every previously
    /// rendered region keeps its last value.
    pub fn apply_error<S: Surface + ?Sized>(&mut self, out: &mut S) {
        out.set_status(Status::ConnectionError);
        out.flush();
    }
}
