//! Dashboard web endpoint: `/` and `/api/stats` over hand-rolled HTTP/1.1.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::warn;

use crate::error::WatchError;
use crate::html::render_page;
use crate::server::registry::TrafficRegistry;

pub async fn run_web(listener: TcpListener, registry: TrafficRegistry) -> Result<(), WatchError> {
    loop {
        let (stream, _addr) = listener.accept().await?;
        let registry = registry.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_request(stream, registry).await {
                warn!(error = %e, "dashboard request failed");
            }
        });
    }
}

async fn handle_request(
    mut stream: TcpStream,
    registry: TrafficRegistry,
) -> Result<(), WatchError> {
    let mut buf = vec![0u8; 8192];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);

    // Request line: "GET /path?query HTTP/1.1"
    let first_line = request.lines().next().unwrap_or("");
    let mut parts = first_line.split_whitespace();
    let _method = parts.next().unwrap_or("");
    let path_and_query = parts.next().unwrap_or("/");
    let path = path_and_query.split('?').next().unwrap_or("/");

    match path {
        "/" => {
            let body = render_page(&registry.snapshot());
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nCache-Control: no-cache\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body,
            );
            stream.write_all(response.as_bytes()).await?;
        }
        "/api/stats" => {
            let body = serde_json::to_string(&registry.snapshot())
                .unwrap_or_else(|_| "{}".to_string());
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nAccess-Control-Allow-Origin: *\r\nCache-Control: no-cache\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body,
            );
            stream.write_all(response.as_bytes()).await?;
        }
        _ => {
            let response =
                "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nNot Found";
            stream.write_all(response.as_bytes()).await?;
        }
    }

    Ok(())
}
