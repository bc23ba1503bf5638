//! End-to-end tests against a live server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dso_server::server::{serve, ErrorResponse};
use dso_server::ServerConfig;
use dso_synth::WaveformSet;
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, Arc::new(config), async move {
            let _ = rx.await;
        }));
        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }

    /// Sends raw bytes and returns (status code, head, body).
    async fn send(&self, raw: &[u8]) -> (u16, String, Vec<u8>) {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(raw).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        split_response(&response)
    }

    async fn post(&self, origin: Option<&str>, json: &str) -> (u16, String, Vec<u8>) {
        let origin_header = origin
            .map(|o| format!("Origin: {}\r\n", o))
            .unwrap_or_default();
        let raw = format!(
            "POST /modulate HTTP/1.1\r\nHost: localhost\r\n{}Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            origin_header,
            json.len(),
            json
        );
        self.send(raw.as_bytes()).await
    }
}

/// Splits a raw response into (status code, head, body).
fn split_response(response: &[u8]) -> (u16, String, Vec<u8>) {
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response should have a header terminator");
    let head = String::from_utf8(response[..split].to_vec()).unwrap();
    let body = response[split + 4..].to_vec();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    (status, head, body)
}

#[tokio::test]
async fn test_post_modulate_returns_four_signals() {
    let server = TestServer::start(ServerConfig::default()).await;

    let (status, head, body) = server
        .post(
            Some("http://localhost:3000"),
            r#"{"type": "ASK", "amplitude": 2, "frequency": 1, "bitstream": "1"}"#,
        )
        .await;

    assert_eq!(status, 200);
    assert!(head.contains("Access-Control-Allow-Origin: http://localhost:3000"));
    let waves: WaveformSet = serde_json::from_slice(&body).unwrap();
    assert_eq!(waves.time.len(), 1000);
    assert_eq!(waves.modulated, waves.carrier);

    server.stop().await;
}

#[tokio::test]
async fn test_pwm_scenario_over_http() {
    let server = TestServer::start(ServerConfig::default()).await;

    let (status, _, body) = server
        .post(None, r#"{"type": "PWM", "amplitude": 1, "bitstream": "10"}"#)
        .await;

    assert_eq!(status, 200);
    let waves: WaveformSet = serde_json::from_slice(&body).unwrap();
    assert!(waves.digital[..1000].iter().all(|&d| d == 1));
    assert!(waves.modulated[..750].iter().all(|&v| v == 1.0));
    assert!(waves.modulated[750..1000].iter().all(|&v| v == 0.0));
    assert!(waves.modulated[1000..1250].iter().all(|&v| v == 1.0));
    assert!(waves.modulated[1250..].iter().all(|&v| v == 0.0));

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_type_is_client_error() {
    let server = TestServer::start(ServerConfig::default()).await;

    let (status, _, body) = server.post(None, r#"{"type": "XYZ", "bitstream": "1"}"#).await;

    assert_eq!(status, 400);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(!error.success);
    assert_eq!(error.errors[0].code, "V007");

    server.stop().await;
}

#[tokio::test]
async fn test_preflight_from_frontend_origin() {
    let server = TestServer::start(ServerConfig::default()).await;

    let (status, head, body) = server
        .send(
            b"OPTIONS /modulate HTTP/1.1\r\nOrigin: https://dso-one.vercel.app\r\nAccess-Control-Request-Method: POST\r\n\r\n",
        )
        .await;

    assert_eq!(status, 204);
    assert!(body.is_empty());
    assert!(head.contains("Access-Control-Allow-Origin: https://dso-one.vercel.app"));
    assert!(head.contains("Access-Control-Allow-Methods: POST, OPTIONS"));

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let config = ServerConfig {
        max_body_bytes: 16,
        ..ServerConfig::default()
    };
    let server = TestServer::start(config).await;

    let (status, _, _) = server.post(None, r#"{"bitstream": "0101010101"}"#).await;
    assert_eq!(status, 413);

    server.stop().await;
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let server = TestServer::start(ServerConfig::default()).await;

    let (status, head, _) = server
        .send(b"GET /modulate HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await;
    assert_eq!(status, 405);
    assert!(head.contains("Allow: POST, OPTIONS"));

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_response_survives_unread_upload() {
    let config = ServerConfig {
        max_body_bytes: 16,
        ..ServerConfig::default()
    };
    let server = TestServer::start(config).await;

    let body = vec![b'1'; 2 * 1024 * 1024];
    let mut raw = format!(
        "POST /modulate HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .into_bytes();
    raw.extend_from_slice(&body);

    let (status, _, body) = server.send(&raw).await;
    assert_eq!(status, 413);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.errors[0].code, "HTTP_004");

    server.stop().await;
}

#[tokio::test]
async fn test_expect_continue_handshake() {
    let server = TestServer::start(ServerConfig::default()).await;

    let json = r#"{"type": "PAM", "bitstream": "1"}"#;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    let head = format!(
        "POST /modulate HTTP/1.1\r\nHost: localhost\r\nExpect: 100-continue\r\nContent-Length: {}\r\n\r\n",
        json.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();

    let interim = b"HTTP/1.1 100 Continue\r\n\r\n";
    let mut buf = vec![0u8; interim.len()];
    tokio::time::timeout(Duration::from_secs(5), stream.read_exact(&mut buf))
        .await
        .expect("interim response should arrive")
        .unwrap();
    assert_eq!(buf, interim.to_vec());

    stream.write_all(json.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let (status, _, body) = split_response(&response);
    assert_eq!(status, 200);
    let waves: WaveformSet = serde_json::from_slice(&body).unwrap();
    assert_eq!(waves.modulated, vec![1.0; 1000]);

    server.stop().await;
}

#[tokio::test]
async fn test_stalled_request_gets_timeout() {
    let config = ServerConfig {
        read_timeout: Duration::from_millis(200),
        ..ServerConfig::default()
    };
    let server = TestServer::start(config).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"POST /modulate HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10\r\n\r\n{")
        .await
        .unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("server should close a stalled connection")
        .unwrap();
    let (status, _, _) = split_response(&response);
    assert_eq!(status, 408);

    server.stop().await;
}
