//! # Traffic server
//!
//! The ingest side the watcher watches:
//!
//! 1. **Ingest listener** — raw TCP and WebSocket clients on one port, each
//!    message acked and folded into the shared [`TrafficRegistry`].
//! 2. **Web listener** — `GET /api/stats` (JSON, CORS-enabled) and `GET /`
//!    (server-rendered dashboard page) for browsers and pollers.

pub mod ingest;
pub mod registry;
pub mod web;

pub use registry::TrafficRegistry;

use colored::*;
use tokio::net::TcpListener;

use crate::error::WatchError;

/// Ports for the two listeners.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Raw TCP / WebSocket ingest port.
    pub tcp_port: u16,
    /// Dashboard and stats API port.
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tcp_port: 9999,
            http_port: 8080,
        }
    }
}

/// Bind both listeners and serve until one of them fails.
pub async fn run(config: ServerConfig) -> Result<(), WatchError> {
    let registry = TrafficRegistry::new();
    let ingest_listener = TcpListener::bind(("0.0.0.0", config.tcp_port)).await?;
    let web_listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;

    banner(&config);

    tokio::try_join!(
        ingest::run_ingest(ingest_listener, registry.clone()),
        web::run_web(web_listener, registry),
    )?;
    Ok(())
}

fn banner(config: &ServerConfig) {
    let ip = local_ip();
    eprintln!("{}", "traffic server started".bold().bright_green());
    eprintln!(
        "{}",
        format!("  dashboard   http://{ip}:{}", config.http_port).bright_cyan()
    );
    eprintln!(
        "{}",
        format!("  stats API   http://{ip}:{}/api/stats", config.http_port).bright_cyan()
    );
    eprintln!(
        "{}",
        format!("  ingest      tcp://{ip}:{} (TCP and WebSocket)", config.tcp_port).bright_cyan()
    );
    eprintln!("{}", "  Press Ctrl+C to stop.".bright_blue());
}

/// LAN address of this host, found by routing a UDP socket toward a public
/// address (no packet is sent). Falls back to loopback.
fn local_ip() -> String {
    let probe = std::net::UdpSocket::bind("0.0.0.0:0").and_then(|socket| {
        socket.connect("8.8.8.8:80")?;
        socket.local_addr()
    });
    match probe {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => "127.0.0.1".to_string(),
    }
}
