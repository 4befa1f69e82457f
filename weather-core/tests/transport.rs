//! Tests for HttpTransport against a throwaway local HTTP responder.

use serde::Deserialize;
use std::time::Duration;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};
use weather_core::{
    CancellationToken, Coordinates, Error, HttpRequest, HttpTransport, Method, Transport,
    TransportError,
};

/// Serves one canned response and hands back the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let raw = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        let _ = tx.send(raw);
    });

    (format!("http://{addr}"), rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(5)).expect("client")
}

#[derive(Debug, Deserialize, PartialEq)]
struct Echo {
    ok: bool,
}

#[tokio::test]
async fn success_decodes_body() {
    let (base, rx) = serve_once("200 OK", r#"[{"lat":51.51,"lon":-0.13}]"#).await;

    let coords: Option<Vec<Coordinates>> = transport()
        .send(HttpRequest::get(format!("{base}/geo?q=London")), &CancellationToken::new())
        .await
        .expect("send");

    assert_eq!(coords, Some(vec![Coordinates { latitude: 51.51, longitude: -0.13 }]));
    let raw = rx.await.expect("request captured");
    assert!(raw.starts_with("GET /geo?q=London HTTP/1.1"));
    assert!(!raw.to_ascii_lowercase().contains("authorization"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_client_serves_concurrent_requests() {
    let (geo_base, geo_rx) = serve_once("200 OK", r#"[{"lat":59.91,"lon":10.75}]"#).await;
    let (echo_base, echo_rx) = serve_once("200 OK", r#"{"ok":true}"#).await;

    let shared = transport();
    let other = shared.clone();
    let cancel = CancellationToken::new();

    let (coords, echo) = tokio::join!(
        shared.send::<Vec<Coordinates>>(HttpRequest::get(format!("{geo_base}/geo?q=Oslo")), &cancel),
        other.send::<Echo>(HttpRequest::get(format!("{echo_base}/echo")), &cancel),
    );

    assert_eq!(
        coords.expect("geocode"),
        Some(vec![Coordinates { latitude: 59.91, longitude: 10.75 }])
    );
    assert_eq!(echo.expect("echo"), Some(Echo { ok: true }));
    assert!(geo_rx.await.expect("geo request").starts_with("GET /geo?q=Oslo "));
    assert!(echo_rx.await.expect("echo request").starts_with("GET /echo "));
}

#[tokio::test]
async fn empty_body_is_absent_not_error() {
    let (base, _rx) = serve_once("200 OK", "").await;

    let out: Option<Echo> = transport()
        .send(HttpRequest::get(base), &CancellationToken::new())
        .await
        .expect("send");

    assert_eq!(out, None);
}

#[tokio::test]
async fn non_success_status_is_request_failed() {
    let (base, _rx) = serve_once("404 Not Found", r#"{"cod":"404","message":"city not found"}"#).await;

    let err = transport()
        .send::<Echo>(HttpRequest::get(base), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::RequestFailed { status, reason } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn post_sends_json_body_and_bearer_token() {
    let (base, rx) = serve_once("200 OK", r#"{"ok":true}"#).await;

    let request = HttpRequest::new(Method::POST, format!("{base}/echo"))
        .with_body(serde_json::json!({"city": "Oslo"}))
        .with_bearer("tok-123");
    let out: Option<Echo> = transport().send(request, &CancellationToken::new()).await.expect("send");

    assert_eq!(out, Some(Echo { ok: true }));
    let raw = rx.await.expect("request captured");
    let lower = raw.to_ascii_lowercase();
    assert!(raw.starts_with("POST /echo HTTP/1.1"));
    assert!(lower.contains("authorization: bearer tok-123"));
    assert!(lower.contains("content-type: application/json"));
    assert!(raw.ends_with(r#"{"city":"Oslo"}"#));
}

#[tokio::test]
async fn get_never_carries_body() {
    let (base, rx) = serve_once("200 OK", r#"{"ok":true}"#).await;

    let request = HttpRequest::get(base).with_body(serde_json::json!({"ignored": true}));
    let _: Option<Echo> = transport().send(request, &CancellationToken::new()).await.expect("send");

    let raw = rx.await.expect("request captured");
    assert!(!raw.contains("ignored"));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = transport()
        .send::<Echo>(HttpRequest::get(format!("http://{addr}/")), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Http(_))));
}

#[tokio::test]
async fn cancelled_token_short_circuits() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = transport()
        .send::<Echo>(HttpRequest::get("http://127.0.0.1:9/"), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn cancellation_interrupts_a_stalled_call() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        // Accept and never answer.
        let (_socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = transport()
        .send::<Echo>(HttpRequest::get(format!("http://{addr}/")), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}
