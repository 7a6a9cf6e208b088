use std::time::Duration;

use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use traffic_watch::cli::Args;
use traffic_watch::client;
use traffic_watch::poller::{PollerConfig, StatsPoller};
use traffic_watch::server::{self, ServerConfig};
use traffic_watch::term::TermSurface;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();

    // Server mode
    if args.serve {
        server::run(ServerConfig {
            tcp_port: args.tcp_port,
            http_port: args.http_port,
        })
        .await?;
        return Ok(());
    }

    // One-shot line client
    if let Some(message) = args.send.as_deref() {
        let reply = client::send_once(&args.host, args.tcp_port, message).await?;
        println!("{}", format!("server: {reply}").bright_blue());
        return Ok(());
    }

    // Interactive line client
    if args.chat {
        client::interactive(&args.host, args.tcp_port).await?;
        return Ok(());
    }

    // Watch mode (default)
    let mut config = PollerConfig::new(args.url.clone());
    config.poll_interval = Duration::from_millis(args.interval_ms.max(1));
    config.request_timeout = Duration::from_millis(args.timeout_ms.max(1));
    let mut poller = StatsPoller::new(config, TermSurface::new(&args.url));

    if args.once {
        if let Err(e) = poller.poll_once().await {
            eprintln!("{}", format!("poll failed: {e}").bright_red());
            return Err(e.into());
        }
        return Ok(());
    }

    let mut handle = poller.start();
    tokio::signal::ctrl_c().await?;
    handle.stop().await;
    Ok(())
}
