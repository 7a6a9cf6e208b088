//! Crate-level error type.
//!
//! Poll failures are deliberately coarse: connect failures, non-2xx replies,
//! and malformed payloads are all recoverable and all handled the same way by
//! the watch loop (log, show the error badge, try again next tick).

use thiserror::Error;

/// Errors surfaced by the watcher, the line client, and the server.
///
/// Each variant carries enough context to diagnose the failure without
/// needing to inspect the originating error directly.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A TCP-level connection could not be established.
    #[error("connection failed to {url}: {detail}")]
    Connect { url: String, detail: String },

    /// The remote server replied with a non-2xx HTTP status code.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Response body could not be parsed as a stats snapshot.
    #[error("invalid stats payload from {url}: {detail}")]
    Json { url: String, detail: String },

    /// Socket or terminal I/O failure outside the HTTP path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
