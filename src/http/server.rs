//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the Axum router that funnels every path into the proxy handler
//! - Classify each request and act on the decision: forward, redirect, or
//!   fall through
//! - Forward requests to the citation backend with method, headers, and body
//!   intact, and relay whatever comes back
//! - Map transport failures to gateway statuses (504 on timeout, 502
//!   otherwise)
//!
//! # Design Decisions
//! - One wildcard route instead of per-endpoint routes: the backend owns its
//!   API surface, and the proxy must keep working when endpoints are added
//! - The outbound client never follows redirects; origin 3xx responses
//!   belong to the client
//! - Requests hold no shared mutable state, so every handler invocation is
//!   independent and the server needs no locks

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::EdgeConfig;
use crate::http::request::{forwardable_headers, should_forward_body, RequestIdExt, RequestIdLayer};
use crate::http::response::{apply_cors, relay_response};
use crate::observability::metrics;
use crate::routing::{normalize_origin, upstream_url, RouteDecision, RouteTable};

/// Shared application state handed to every handler invocation.
#[derive(Clone)]
pub struct AppState {
    routes: Arc<RouteTable>,
    client: reqwest::Client,
    upstream_origin: Arc<str>,
    passthrough_origin: Option<Arc<str>>,
}

/// HTTP server for the edge proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the server and its outbound client from validated configuration.
    pub fn new(config: &EdgeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .connect_timeout(Duration::from_secs(config.upstream.connect_secs))
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .build()?;

        let state = AppState {
            routes: Arc::new(RouteTable::from_config(&config.routing)),
            client,
            upstream_origin: Arc::from(normalize_origin(&config.upstream.origin)),
            passthrough_origin: config
                .passthrough
                .origin
                .as_deref()
                .map(|origin| Arc::from(normalize_origin(origin))),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve connections until the shutdown signal fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let address = listener.local_addr()?;
        tracing::info!(address = %address, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Classify the request path and dispatch on the decision.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    match state.routes.decide(&path) {
        RouteDecision::ApiPassthrough { upstream_path } => {
            let url = upstream_url(&state.upstream_origin, upstream_path, query.as_deref());
            let mut response = forward(&state, request, &url, &request_id).await;
            apply_cors(response.headers_mut());
            metrics::record_request(method.as_str(), response.status(), "api", start);
            response
        }
        RouteDecision::AppPrefixed { upstream_path } => {
            let url = upstream_url(&state.upstream_origin, upstream_path, query.as_deref());
            let response = forward(&state, request, &url, &request_id).await;
            metrics::record_request(method.as_str(), response.status(), "app", start);
            response
        }
        RouteDecision::RedirectToSlash => {
            let location = match &query {
                Some(q) => format!("{}/?{}", state.routes.app_prefix(), q),
                None => format!("{}/", state.routes.app_prefix()),
            };
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                location = %location,
                "Redirecting bare app prefix"
            );
            let response = permanent_redirect(&location);
            metrics::record_request(method.as_str(), response.status(), "redirect", start);
            response
        }
        RouteDecision::Unrelated => {
            let response = match state.passthrough_origin.clone() {
                Some(origin) => {
                    let url = upstream_url(&origin, &path, query.as_deref());
                    forward(&state, request, &url, &request_id).await
                }
                None => {
                    tracing::debug!(
                        request_id = %request_id,
                        path = %path,
                        "No passthrough origin configured"
                    );
                    (StatusCode::NOT_FOUND, "Not found").into_response()
                }
            };
            metrics::record_request(method.as_str(), response.status(), "unrelated", start);
            response
        }
    }
}

/// Forward a request to `url` and relay the origin's answer.
///
/// GET and HEAD go out bodyless unless the client framed a body; every
/// other method streams the inbound body through untouched.
async fn forward(state: &AppState, request: Request<Body>, url: &str, request_id: &str) -> Response {
    let target = match Url::parse(url) {
        Ok(target) => target,
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                url = %url,
                error = %error,
                "Assembled an unparseable outbound URL"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid upstream URL").into_response();
        }
    };

    let (parts, body) = request.into_parts();
    let has_body = should_forward_body(&parts.method, &parts.headers);
    let headers = forwardable_headers(&parts.headers);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        source = %parts.uri,
        destination = %target,
        "Forwarding request"
    );

    let mut outbound = state.client.request(parts.method, target).headers(headers);
    if has_body {
        outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    match outbound.send().await {
        Ok(origin_response) => relay_response(origin_response),
        Err(error) => {
            let status = if error.is_timeout() {
                StatusCode::GATEWAY_TIMEOUT
            } else {
                StatusCode::BAD_GATEWAY
            };
            tracing::error!(
                request_id = %request_id,
                destination = %url,
                error = %error,
                "Upstream request failed"
            );
            (status, "Upstream request failed").into_response()
        }
    }
}

/// Build the 301 answer for the bare app prefix. The target is
/// origin-relative so it lands on whatever host the client used.
fn permanent_redirect(location: &str) -> Response {
    let value = match HeaderValue::from_str(location) {
        Ok(value) => value,
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target").into_response()
        }
    };

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    response.headers_mut().insert(header::LOCATION, value);
    response
}
