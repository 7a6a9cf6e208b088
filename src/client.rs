//! Line client for the traffic server's TCP port.
//!
//! The wire protocol is unframed: send a chunk, read one `ACK: <message>`
//! chunk back.

use std::io::Write as _;

use colored::*;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::WatchError;

/// Send one message and return the server's reply.
pub async fn send_once(host: &str, port: u16, message: &str) -> Result<String, WatchError> {
    let mut stream = TcpStream::connect((host, port)).await?;
    stream.write_all(message.as_bytes()).await?;

    let mut buf = vec![0u8; 1024];
    let n = stream.read(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
}

/// Interactive session: one message per stdin line, `quit` exits.
pub async fn interactive(host: &str, port: u16) -> Result<(), WatchError> {
    let mut stream = TcpStream::connect((host, port)).await?;
    println!("{}", format!("connected to {host}:{port}").bright_green());
    println!("{}", "type a message per line, \"quit\" to exit".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buf = vec![0u8; 1024];

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("quit") {
            break;
        }

        stream.write_all(message.as_bytes()).await?;
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            println!("{}", "server closed the connection".bright_red());
            break;
        }
        println!(
            "{}",
            format!("server: {}", String::from_utf8_lossy(&buf[..n])).bright_blue()
        );
    }

    println!("{}", "disconnected".dimmed());
    Ok(())
}
