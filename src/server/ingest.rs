//! Traffic ingest: one listener, two client kinds.
//!
//! Each accepted connection is peeked to decide its protocol. WebSocket
//! upgrade requests (browsers) are accepted via tungstenite; anything else
//! speaks the raw-chunk TCP protocol of the line client. Both kinds get an
//! `ACK: <message>` reply per message and identical stats accounting.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::WebSocketStream;
use tracing::{info, warn};

use futures_util::{SinkExt, StreamExt};

use crate::error::WatchError;
use crate::server::registry::TrafficRegistry;

/// Accept loop. Runs until the listener fails; per-client errors are logged
/// and never take the loop down.
pub async fn run_ingest(
    listener: TcpListener,
    registry: TrafficRegistry,
) -> Result<(), WatchError> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let registry = registry.clone();
        tokio::spawn(async move {
            let client_id = addr.to_string();
            registry.client_connected(&client_id);
            info!(client = %client_id, "client connected");

            if let Err(e) = handle_client(stream, &client_id, &registry).await {
                warn!(client = %client_id, error = %e, "client session error");
            }

            registry.client_disconnected(&client_id);
            info!(client = %client_id, "client disconnected");
        });
    }
}

async fn handle_client(
    stream: TcpStream,
    client_id: &str,
    registry: &TrafficRegistry,
) -> Result<(), WatchError> {
    // Peek at the first bytes to detect WebSocket upgrade requests.
    let mut peek_buf = [0u8; 512];
    let peek_n = stream.peek(&mut peek_buf).await.unwrap_or(0);
    let head = String::from_utf8_lossy(&peek_buf[..peek_n]).to_string();

    if head.contains("Upgrade: websocket")
        || head.contains("upgrade: websocket")
        || head.contains("Sec-WebSocket-Key")
    {
        match tokio_tungstenite::accept_async(stream).await {
            Ok(ws_stream) => handle_ws_client(ws_stream, client_id, registry).await,
            Err(e) => {
                warn!(client = %client_id, error = %e, "websocket handshake failed");
                Ok(())
            }
        }
    } else {
        handle_tcp_client(stream, client_id, registry).await
    }
}

async fn handle_ws_client(
    mut ws: WebSocketStream<TcpStream>,
    client_id: &str,
    registry: &TrafficRegistry,
) -> Result<(), WatchError> {
    while let Some(frame) = ws.next().await {
        let msg = match frame {
            Ok(m) => m,
            Err(_) => break,
        };
        match msg {
            WsMessage::Text(text) => {
                registry.record_message(client_id, &text);
                info!(client = %client_id, message = %text, "message received");

                let ack = format!("ACK: {text}");
                registry.record_sent(ack.len());
                if ws.send(WsMessage::Text(ack)).await.is_err() {
                    break;
                }
            }
            WsMessage::Ping(payload) => {
                let _ = ws.send(WsMessage::Pong(payload)).await;
            }
            WsMessage::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}

/// Raw TCP clients send unframed chunks; each chunk is trimmed and acked.
async fn handle_tcp_client(
    mut stream: TcpStream,
    client_id: &str,
    registry: &TrafficRegistry,
) -> Result<(), WatchError> {
    let mut buf = vec![0u8; 1024];
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let message = String::from_utf8_lossy(&buf[..n]).trim().to_string();
        if message.is_empty() {
            continue;
        }

        registry.record_message(client_id, &message);
        info!(client = %client_id, message = %message, "message received");

        let ack = format!("ACK: {message}");
        stream.write_all(ack.as_bytes()).await?;
        registry.record_sent(ack.len());
    }
    Ok(())
}
