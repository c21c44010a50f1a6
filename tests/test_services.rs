use std::collections::HashMap;
use std::sync::Arc;

use env_logger::{Builder, Env, Target};
use fetcher::{FetchError, Fetcher, FormDataFactory, HostEnvironment, NativeHost, ReqwestTransport, ResponseBody, TextHost};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

struct ReceivedRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

fn init_test_env() {
    // several tests share the process, only the first init wins
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .target(Target::Stdout)
        .format_timestamp_millis()
        .is_test(true)
        .try_init();
}

async fn read_request(socket: &mut TcpStream) -> ReceivedRequest {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap().split(' ');
    let method = request_line.next().unwrap().to_string();
    let path = request_line.next().unwrap().to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let content_length: usize = headers.get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before body was complete");
        data.extend_from_slice(&buf[..n]);
    }

    ReceivedRequest {
        method,
        path,
        headers,
        body: data[header_end..header_end + content_length].to_vec(),
    }
}

async fn write_response(socket: &mut TcpStream, status: &str, headers: &[(&str, String)], body: &[u8]) {
    let mut out = format!("HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n", status, body.len());
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");

    socket.write_all(out.as_bytes()).await.unwrap();
    socket.write_all(body).await.unwrap();
    socket.shutdown().await.unwrap();
}

async fn handle(mut socket: TcpStream) {
    let request = read_request(&mut socket).await;
    match request.path.as_str() {
        "/json" => {
            let body = format!(r#"{{"method":"{}"}}"#, request.method);
            write_response(&mut socket, "200 OK", &[("Content-Type", String::from("application/json"))], body.as_bytes()).await;
        }
        "/echo" => {
            let received_type = request.headers.get("content-type").cloned().unwrap_or_default();
            let headers = [
                ("Content-Type", String::from("text/plain")),
                ("X-Received-Content-Type", received_type),
                ("Set-Cookie", String::from("first=1")),
                ("Set-Cookie", String::from("second=2")),
            ];
            write_response(&mut socket, "200 OK", &headers, &request.body).await;
        }
        _ => {
            write_response(&mut socket, "404 Not Found", &[("Content-Type", String::from("text/plain"))], b"no such route").await;
        }
    }
}

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => break,
            };
            tokio::spawn(handle(socket));
        }
    });
    format!("http://{}", addr)
}

fn build_fetcher(host: Arc<dyn HostEnvironment>) -> Fetcher {
    // proxy settings from the environment must not reroute loopback traffic
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    Fetcher::new(Arc::new(ReqwestTransport::with_client(client)), host, Arc::new(FormDataFactory))
}

#[tokio::test]
async fn test_e2e_json_round_trip() {
    init_test_env();
    let base = start_server().await;

    let response = build_fetcher(Arc::new(NativeHost))
        .put(&format!("{}/json", base))
        .send(json!({"name": "pen"}))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), &ResponseBody::Json(json!({"method": "PUT"})));
    assert_eq!(response.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_e2e_multipart_upload() {
    init_test_env();
    let base = start_server().await;

    let response = build_fetcher(Arc::new(NativeHost))
        .post(&format!("{}/echo", base))
        .set("X-Trace", "e2e")
        .attach("f", b"payload".to_vec(), Some("name.txt"))
        .await
        .unwrap();

    let received_type = response.header("x-received-content-type").unwrap();
    assert!(received_type.starts_with("multipart/form-data; boundary="));
    assert!(response.text().contains("name=\"f\"; filename=\"name.txt\""));
    assert!(response.text().contains("payload"));
    // reqwest exposes every value, the first one is kept
    assert_eq!(response.header("set-cookie"), Some("first=1"));
}

#[tokio::test]
async fn test_e2e_text_host_echo() {
    init_test_env();
    let base = start_server().await;

    let response = build_fetcher(Arc::new(TextHost))
        .post(&format!("{}/echo", base))
        .send("plain body ✓")
        .await
        .unwrap();

    assert_eq!(response.text(), "plain body ✓");
    assert_eq!(response.body().as_bytes().map(<[u8]>::len), Some("plain body ✓".encode_utf16().count() * 2));
}

#[tokio::test]
async fn test_e2e_not_found_is_error() {
    init_test_env();
    let base = start_server().await;

    let mut statuses = Vec::new();
    build_fetcher(Arc::new(NativeHost))
        .get(&format!("{}/missing", base))
        .end(|outcome| statuses.push(outcome.map(|r| r.status()).map_err(|e| e.status())))
        .await;

    assert_eq!(statuses, vec![Err(Some(404))]);
}

#[tokio::test]
async fn test_e2e_unreachable_host() {
    init_test_env();
    // bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();

    let err = build_fetcher(Arc::new(NativeHost))
        .get(&format!("http://{}/", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}
