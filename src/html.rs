//! HTML surface and the embedded dashboard page.
//!
//! Markup is built per region so the server can drop each fragment into the
//! element carrying that region's id. All server-supplied strings go through
//! [`escape_html`] before insertion; the stats server is not assumed trusted.

use std::collections::HashMap;

use crate::format::escape_html;
use crate::render::{Region, Status, Surface};
use crate::snapshot::{LogMessage, StatsSnapshot};

pub const EMPTY_CLIENTS: &str = r#"<p class="empty-state">No clients connected</p>"#;
pub const EMPTY_MESSAGES: &str = r#"<p class="empty-state">Waiting for messages...</p>"#;
pub const STATUS_LIVE: &str = r#"<span class="status-ok">● Live</span>"#;
pub const STATUS_ERROR: &str = r#"<span class="status-err">⚠️ Connection Error</span>"#;

/// One chip per connected client, in server order.
pub fn client_chip(name: &str) -> String {
    format!(
        r#"<div class="client-chip"><span>👤</span> {}</div>"#,
        escape_html(name)
    )
}

/// One message entry: sender, timestamp, body.
pub fn message_item(msg: &LogMessage) -> String {
    format!(
        concat!(
            r#"<div class="message-item">"#,
            r#"<div class="message-header">"#,
            r#"<span class="message-from">{}</span>"#,
            r#"<span class="message-time">{}</span>"#,
            r#"</div>"#,
            r#"<div class="message-text">{}</div>"#,
            r#"</div>"#
        ),
        escape_html(&msg.from),
        escape_html(&msg.time),
        escape_html(&msg.message)
    )
}

/// Surface that renders each region to a markup fragment.
#[derive(Debug, Default)]
pub struct HtmlSurface {
    regions: HashMap<Region, String>,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup for `region`, empty if never written.
    pub fn region(&self, region: Region) -> &str {
        self.regions.get(&region).map(String::as_str).unwrap_or("")
    }
}

impl Surface for HtmlSurface {
    fn set_counter(&mut self, region: Region, value: u64) {
        self.regions.insert(region, value.to_string());
    }

    fn set_bytes(&mut self, region: Region, formatted: &str) {
        self.regions.insert(region, formatted.to_string());
    }

    fn set_clients(&mut self, names: &[String]) {
        let markup = if names.is_empty() {
            EMPTY_CLIENTS.to_string()
        } else {
            names.iter().map(|n| client_chip(n)).collect::<Vec<_>>().join("")
        };
        self.regions.insert(Region::ClientsList, markup);
    }

    fn set_messages(&mut self, newest_first: &[LogMessage]) {
        let markup = if newest_first.is_empty() {
            EMPTY_MESSAGES.to_string()
        } else {
            newest_first.iter().map(message_item).collect::<Vec<_>>().join("")
        };
        self.regions.insert(Region::Messages, markup);
    }

    fn set_status(&mut self, status: Status) {
        let markup = match status {
            Status::Live => STATUS_LIVE,
            Status::ConnectionError => STATUS_ERROR,
        };
        self.regions.insert(Region::StatusBadge, markup.to_string());
    }
}

const PAGE_STYLE: &str = "\
*{margin:0;padding:0;box-sizing:border-box}\
body{background:#0d1117;color:#c9d1d9;font-family:'Cascadia Code','Fira Code',monospace;padding:24px}\
header{display:flex;align-items:center;justify-content:space-between;border-bottom:1px solid #21262d;padding-bottom:12px;margin-bottom:20px}\
header h1{font-size:1.2rem;color:#58a6ff}\
.status-ok{color:#3fb950}.status-err{color:#f85149}\
.cards{display:grid;grid-template-columns:repeat(auto-fit,minmax(180px,1fr));gap:12px;margin-bottom:20px}\
.card{background:#161b22;border:1px solid #21262d;border-radius:8px;padding:14px}\
.card .label{display:block;font-size:.7rem;color:#8b949e;text-transform:uppercase;letter-spacing:.5px}\
.card .value{font-size:1.4rem;font-weight:700}\
.panel{background:#161b22;border:1px solid #21262d;border-radius:8px;padding:14px;margin-bottom:16px}\
.panel h2{font-size:.85rem;color:#8b949e;text-transform:uppercase;letter-spacing:.5px;margin-bottom:10px}\
.client-chip{display:inline-flex;gap:6px;background:#21262d;border-radius:999px;padding:4px 12px;margin:0 6px 6px 0;font-size:.85rem}\
.message-item{border-bottom:1px solid #21262d;padding:8px 0}\
.message-header{display:flex;justify-content:space-between;font-size:.75rem;margin-bottom:2px}\
.message-from{color:#58a6ff}.message-time{color:#8b949e}\
.message-text{font-size:.9rem;white-space:pre-wrap;word-wrap:break-word}\
.empty-state{color:#484f58;font-size:.85rem}";

/// Render the full dashboard page for one snapshot.
///
/// The page refreshes itself once per second, matching the poll cadence, so
/// each load is one server-side render through the same region pipeline the
/// terminal uses.
pub fn render_page(snapshot: &StatsSnapshot) -> String {
    let mut surface = HtmlSurface::new();
    let mut dashboard = crate::render::Dashboard::new();
    dashboard.apply(snapshot, &mut surface);

    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta http-equiv=\"refresh\" content=\"1\">\n",
            "<title>Traffic Watch</title>\n",
            "<style>{style}</style>\n</head>\n<body>\n",
            "<header><h1>Traffic Watch</h1>",
            "<div id=\"statusBadge\">{status}</div></header>\n",
            "<section class=\"cards\">\n",
            "<div class=\"card\"><span class=\"label\">Active Connections</span>",
            "<span class=\"value\" id=\"activeConnections\">{active}</span></div>\n",
            "<div class=\"card\"><span class=\"label\">Total Connections</span>",
            "<span class=\"value\" id=\"totalConnections\">{total}</span></div>\n",
            "<div class=\"card\"><span class=\"label\">Bytes Received</span>",
            "<span class=\"value\" id=\"bytesReceived\">{received}</span></div>\n",
            "<div class=\"card\"><span class=\"label\">Bytes Sent</span>",
            "<span class=\"value\" id=\"bytesSent\">{sent}</span></div>\n",
            "</section>\n",
            "<section class=\"panel\"><h2>Connected Clients</h2>",
            "<div id=\"clientsList\">{clients}</div></section>\n",
            "<section class=\"panel\"><h2>Messages</h2>",
            "<div id=\"messages\">{messages}</div></section>\n",
            "</body>\n</html>\n"
        ),
        style = PAGE_STYLE,
        status = surface.region(Region::StatusBadge),
        active = surface.region(Region::ActiveConnections),
        total = surface.region(Region::TotalConnections),
        received = surface.region(Region::BytesReceived),
        sent = surface.region(Region::BytesSent),
        clients = surface.region(Region::ClientsList),
        messages = surface.region(Region::Messages),
    )
}
