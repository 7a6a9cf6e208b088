//! Full-frame terminal surface.
//!
//! Region setters stash pre-styled strings; `flush` clears the screen and
//! redraws the whole frame once per tick.

use std::io::{self, Write};

use colored::*;

use crate::render::{Region, Status, Surface};
use crate::snapshot::LogMessage;

pub struct TermSurface {
    source: String,
    active: String,
    total: String,
    received: String,
    sent: String,
    clients: String,
    messages: String,
    status: String,
}

impl TermSurface {
    /// `source` is the base URL being watched, shown in the frame header.
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            active: "-".to_string(),
            total: "-".to_string(),
            received: "-".to_string(),
            sent: "-".to_string(),
            clients: "(no clients connected)".dimmed().to_string(),
            messages: "(waiting for messages...)".dimmed().to_string(),
            status: "connecting...".dimmed().to_string(),
        }
    }
}

impl Surface for TermSurface {
    fn set_counter(&mut self, region: Region, value: u64) {
        match region {
            Region::ActiveConnections => self.active = value.to_string(),
            Region::TotalConnections => self.total = value.to_string(),
            _ => {}
        }
    }

    fn set_bytes(&mut self, region: Region, formatted: &str) {
        match region {
            Region::BytesReceived => self.received = formatted.to_string(),
            Region::BytesSent => self.sent = formatted.to_string(),
            _ => {}
        }
    }

    fn set_clients(&mut self, names: &[String]) {
        if names.is_empty() {
            self.clients = "(no clients connected)".dimmed().to_string();
        } else {
            self.clients = names
                .iter()
                .map(|name| format!("[{name}]").bright_blue().to_string())
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    fn set_messages(&mut self, newest_first: &[LogMessage]) {
        if newest_first.is_empty() {
            self.messages = "(waiting for messages...)".dimmed().to_string();
        } else {
            self.messages = newest_first
                .iter()
                .map(|m| {
                    format!(
                        "  {} {} {}",
                        m.time.dimmed(),
                        format!("{}:", m.from).bright_cyan(),
                        m.message
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
        }
    }

    fn set_status(&mut self, status: Status) {
        self.status = match status {
            Status::Live => "● Live".bright_green().to_string(),
            Status::ConnectionError => "⚠ Connection Error".bright_red().to_string(),
        };
    }

    fn flush(&mut self) {
        // Home the cursor and clear before redrawing the frame.
        print!("\x1b[2J\x1b[H");
        println!("{}  {}", "TRAFFIC WATCH".bold(), self.status);
        println!("{}", format!("watching {}", self.source).dimmed());
        println!();
        println!("  Active connections  {}", self.active.bold());
        println!("  Total connections   {}", self.total.bold());
        println!("  Bytes received      {}", self.received.bold());
        println!("  Bytes sent          {}", self.sent.bold());
        println!();
        println!("  {}", "Connected clients".bold());
        println!("  {}", self.clients);
        println!();
        println!("  {}", "Messages (newest first)".bold());
        println!("{}", self.messages);
        let _ = io::stdout().flush();
    }
}
