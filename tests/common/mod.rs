//! Shared utilities for integration testing.
//!
//! Provides mock origins that capture what the proxy actually sent them, and
//! a helper that boots the proxy on an ephemeral port.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

use parking_edge::config::EdgeConfig;
use parking_edge::http::HttpServer;
use parking_edge::lifecycle::Shutdown;

/// One request as seen by a mock origin. Not every suite reads every field.
#[allow(dead_code)]
#[derive(Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
    delay: Duration,
    hits: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Handle onto a running mock origin.
pub struct MockOrigin {
    addr: SocketAddr,
    hits: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockOrigin {
    /// Origin string suitable for proxy configuration.
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests this origin has served.
    #[allow(dead_code)]
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Everything this origin captured, in arrival order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock origin that answers every request with a fixed response and
/// records what it received.
pub async fn start_mock_origin(
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
) -> MockOrigin {
    start_origin(status, headers, body, Duration::ZERO).await
}

/// Start a mock origin that records each request, then stalls for `delay`
/// before answering. For driving the proxy's upstream timeout.
#[allow(dead_code)]
pub async fn start_slow_origin(delay: Duration) -> MockOrigin {
    start_origin(200, &[], "late", delay).await
}

async fn start_origin(
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
    delay: Duration,
) -> MockOrigin {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let hits = Arc::new(AtomicU32::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        headers,
        body,
        delay,
        hits: hits.clone(),
        requests: requests.clone(),
    };

    let app = Router::new().fallback(capture_handler).with_state(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockOrigin {
        addr,
        hits,
        requests,
    }
}

async fn capture_handler(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(CapturedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body: bytes.to_vec(),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let mut response = Response::new(Body::from(state.body));
    *response.status_mut() = StatusCode::from_u16(state.status).unwrap();
    for &(name, value) in state.headers {
        response
            .headers_mut()
            .append(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    response
}

/// Default proxy configuration pointed at `upstream_origin`, metrics off.
pub fn proxy_config(upstream_origin: String) -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.upstream.origin = upstream_origin;
    config.observability.metrics_enabled = false;
    config
}

/// Start the proxy on an ephemeral port. Returns its base URL and the
/// shutdown handle that stops it.
pub async fn start_proxy(config: EdgeConfig) -> (String, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(&config).expect("failed to build proxy");

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{addr}"), shutdown)
}

/// A client that talks to the proxy directly and never follows redirects.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
