use clap::Parser;

#[derive(Parser)]
#[command(name = "traffic-watch")]
#[command(version)]
#[command(about = "Live dashboard, server, and line client for traffic-handler stats")]
pub struct Args {
    /// Base URL of the stats server to watch
    #[arg(default_value = "http://127.0.0.1:8080")]
    pub url: String,

    /// Poll interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "5000")]
    pub timeout_ms: u64,

    /// Render a single frame and exit instead of polling
    #[arg(long)]
    pub once: bool,

    /// Run the traffic server (TCP/WebSocket ingest plus web dashboard)
    #[arg(long)]
    pub serve: bool,

    /// HTTP port for the dashboard and stats API (serve mode)
    #[arg(long, default_value = "8080")]
    pub http_port: u16,

    /// TCP port for raw traffic clients (serve and send/chat modes)
    #[arg(long, default_value = "9999")]
    pub tcp_port: u16,

    /// Send one message to the server's TCP port, print the ACK, and exit
    #[arg(long)]
    pub send: Option<String>,

    /// Interactive line client against the server's TCP port
    #[arg(long)]
    pub chat: bool,

    /// Host for --send / --chat
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}
