//! End-to-end poller behavior against canned HTTP responders.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use traffic_watch::poller::{PollerConfig, StatsPoller};
use traffic_watch::render::{Region, Status, Surface};
use traffic_watch::snapshot::{LogMessage, StatsSnapshot};
use traffic_watch::WatchError;

#[derive(Default)]
struct RecordingSurface {
    counters: Vec<(Region, u64)>,
    bytes: Vec<(Region, String)>,
    clients_calls: Vec<Vec<String>>,
    messages_calls: Vec<Vec<LogMessage>>,
    statuses: Vec<Status>,
    flushes: usize,
}

impl Surface for RecordingSurface {
    fn set_counter(&mut self, region: Region, value: u64) {
        self.counters.push((region, value));
    }
    fn set_bytes(&mut self, region: Region, formatted: &str) {
        self.bytes.push((region, formatted.to_string()));
    }
    fn set_clients(&mut self, names: &[String]) {
        self.clients_calls.push(names.to_vec());
    }
    fn set_messages(&mut self, newest_first: &[LogMessage]) {
        self.messages_calls.push(newest_first.to_vec());
    }
    fn set_status(&mut self, status: Status) {
        self.statuses.push(status);
    }
    fn flush(&mut self) {
        self.flushes += 1;
    }
}

/// Serve the given pre-built HTTP responses, one per connection, in order.
async fn spawn_responder(responses: Vec<String>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind responder");
    let addr = listener.local_addr().expect("responder addr");
    tokio::spawn(async move {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });
    addr
}

fn ok_json(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body,
    )
}

fn http_error(status_line: &str) -> String {
    format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
}

fn snapshot_json(messages: &[(&str, &str)]) -> String {
    let snap = StatsSnapshot {
        active_connections: 3,
        total_connections: 17,
        total_bytes_received: 1536,
        total_bytes_sent: 1048576,
        connected_clients: vec!["10.0.0.5:51234".to_string(), "10.0.0.6:51235".to_string()],
        messages: messages
            .iter()
            .map(|(from, body)| LogMessage {
                from: from.to_string(),
                time: "14:03:22".to_string(),
                message: body.to_string(),
                timestamp: None,
            })
            .collect(),
    };
    serde_json::to_string(&snap).expect("serialize snapshot")
}

fn poller_at(addr: SocketAddr) -> StatsPoller<RecordingSurface> {
    let mut config = PollerConfig::new(format!("http://{addr}"));
    config.connect_timeout = Duration::from_millis(500);
    config.request_timeout = Duration::from_secs(2);
    StatsPoller::new(config, RecordingSurface::default())
}

#[tokio::test]
async fn fetch_stats_parses_a_live_payload() {
    let addr = spawn_responder(vec![ok_json(&snapshot_json(&[("a:1", "hello")]))]).await;
    let poller = poller_at(addr);

    let snap = poller.fetch_stats().await.expect("fetch");
    assert_eq!(snap.active_connections, 3);
    assert_eq!(snap.total_connections, 17);
    assert_eq!(snap.connected_clients.len(), 2);
    assert_eq!(snap.messages[0].message, "hello");
}

#[tokio::test]
async fn non_2xx_status_maps_to_http_error() {
    let addr = spawn_responder(vec![http_error("503 Service Unavailable")]).await;
    let poller = poller_at(addr);

    let err = poller.fetch_stats().await.expect_err("must fail");
    assert!(matches!(err, WatchError::Http { status: 503, .. }), "got {err:?}");
}

#[tokio::test]
async fn non_json_body_maps_to_json_error() {
    let addr = spawn_responder(vec![ok_json("this is not a snapshot")]).await;
    let poller = poller_at(addr);

    let err = poller.fetch_stats().await.expect_err("must fail");
    assert!(matches!(err, WatchError::Json { .. }), "got {err:?}");
}

#[tokio::test]
async fn poll_once_updates_every_region() {
    let addr = spawn_responder(vec![ok_json(&snapshot_json(&[("a:1", "hi")]))]).await;
    let mut poller = poller_at(addr);

    poller.poll_once().await.expect("poll");

    let out = poller.surface();
    assert!(out.counters.contains(&(Region::ActiveConnections, 3)));
    assert!(out.counters.contains(&(Region::TotalConnections, 17)));
    assert!(out.bytes.contains(&(Region::BytesReceived, "1.5 KB".to_string())));
    assert!(out.bytes.contains(&(Region::BytesSent, "1 MB".to_string())));
    assert_eq!(out.clients_calls.len(), 1);
    assert_eq!(out.clients_calls[0].len(), 2);
    assert_eq!(out.messages_calls.len(), 1);
    assert_eq!(out.statuses, vec![Status::Live]);
    assert_eq!(out.flushes, 1);
}

#[tokio::test]
async fn failure_shows_badge_only_and_next_success_clears_it() {
    // First poll gets a garbage body, second a real snapshot.
    let addr = spawn_responder(vec![
        ok_json("oops"),
        ok_json(&snapshot_json(&[("a:1", "back")])),
    ])
    .await;
    let mut poller = poller_at(addr);

    poller.poll_once().await.expect_err("garbage body must fail");
    {
        let out = poller.surface();
        assert_eq!(out.statuses, vec![Status::ConnectionError]);
        assert!(out.counters.is_empty(), "counters must stay untouched on failure");
        assert!(out.bytes.is_empty());
        assert!(out.clients_calls.is_empty());
        assert!(out.messages_calls.is_empty());
    }

    poller.poll_once().await.expect("recovery poll");
    let out = poller.surface();
    assert_eq!(out.statuses, vec![Status::ConnectionError, Status::Live]);
    assert!(out.counters.contains(&(Region::ActiveConnections, 3)));
}

#[tokio::test]
async fn unchanged_message_count_skips_the_rerender() {
    let addr = spawn_responder(vec![
        ok_json(&snapshot_json(&[("a:1", "one"), ("a:1", "two")])),
        ok_json(&snapshot_json(&[("b:2", "other"), ("b:2", "content")])),
        ok_json(&snapshot_json(&[("a:1", "one"), ("a:1", "two"), ("a:1", "three")])),
    ])
    .await;
    let mut poller = poller_at(addr);

    poller.poll_once().await.expect("first poll");
    assert_eq!(poller.surface().messages_calls.len(), 1);

    // Same count, different contents: region untouched.
    poller.poll_once().await.expect("second poll");
    assert_eq!(poller.surface().messages_calls.len(), 1);

    // Count moved: full re-render, newest first.
    poller.poll_once().await.expect("third poll");
    let out = poller.surface();
    assert_eq!(out.messages_calls.len(), 2);
    let rendered = &out.messages_calls[1];
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0].message, "three");
    assert_eq!(rendered[2].message, "one");
}

#[tokio::test]
async fn connection_refused_maps_to_connect_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut poller = poller_at(addr);
    let err = poller.poll_once().await.expect_err("must fail");
    assert!(matches!(err, WatchError::Connect { .. }), "got {err:?}");
    assert_eq!(poller.surface().statuses, vec![Status::ConnectionError]);
}

#[tokio::test]
async fn started_poller_stops_idempotently() {
    let addr = spawn_responder(vec![ok_json(&snapshot_json(&[]))]).await;
    let mut config = PollerConfig::new(format!("http://{addr}"));
    config.poll_interval = Duration::from_millis(20);
    config.connect_timeout = Duration::from_millis(200);
    config.request_timeout = Duration::from_millis(500);
    let poller = StatsPoller::new(config, RecordingSurface::default());

    let mut handle = poller.start();
    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.stop().await;
    assert!(handle.is_stopped());
    handle.stop().await;
    assert!(handle.is_stopped());
}
