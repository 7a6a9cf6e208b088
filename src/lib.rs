//! # traffic-watch
//!
//! A live dashboard for a small TCP/WebSocket traffic server. The watcher
//! polls the server's `GET /api/stats` endpoint once per second, parses the
//! JSON snapshot, and renders connection counts, byte totals, client chips,
//! and a scrolling message log — to the terminal or as HTML. The same crate
//! carries the server being watched and a line client for feeding it
//! traffic.
//!
//! ```rust,ignore
//! let config = PollerConfig::new("http://127.0.0.1:8080");
//! let poller = StatsPoller::new(config, TermSurface::new("http://127.0.0.1:8080"));
//! let mut handle = poller.start();
//! tokio::signal::ctrl_c().await?;
//! handle.stop().await;
//! ```

pub mod cli;
pub mod client;
pub mod error;
pub mod format;
pub mod html;
pub mod poller;
pub mod render;
pub mod server;
pub mod snapshot;
pub mod term;

pub use error::WatchError;
pub use poller::{PollerConfig, PollerHandle, StatsPoller};
pub use render::{Dashboard, Region, Status, Surface};
pub use snapshot::{LogMessage, StatsSnapshot};
