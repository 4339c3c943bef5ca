//! Request identity and forwarding preparation.
//!
//! # Responsibilities
//! - Assign every inbound request an ID (caller-provided `x-request-id` or a
//!   fresh UUID) and carry it through the handler for log correlation
//! - Select the header set that travels to the origin
//!
//! # Design Decisions
//! - The ID lives in request extensions only. Forwarded traffic must reach
//!   the origin byte-for-byte as the client sent it, so the proxy never
//!   writes the ID into the header map.
//! - End-to-end headers pass through untouched. Transport-owned headers
//!   (host, hop-by-hop, message framing) describe the client connection and
//!   are recomputed by the outbound client for the origin connection.

use std::fmt;
use std::task::{Context, Poll};

use axum::http::header::{
    HeaderMap, HeaderName, CONNECTION, CONTENT_LENGTH, EXPECT, HOST, PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::{Method, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying a caller-assigned request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Headers owned by the transport layer, never forwarded to an origin.
///
/// A plain array, not a `&[...]` borrow: `HeaderName` is interior-mutable
/// (custom names hold `Bytes`), which the const evaluator refuses to hand
/// out references to.
const TRANSPORT_HEADERS: [HeaderName; 11] = [
    HOST,
    CONNECTION,
    HeaderName::from_static("keep-alive"),
    PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION,
    TE,
    TRAILER,
    TRANSFER_ENCODING,
    UPGRADE,
    CONTENT_LENGTH,
    EXPECT,
];

/// Unique identifier attached to each request for tracing.
#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    /// Take the caller's ID when one is present, otherwise mint a new one.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        request
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(|id| Self(id.to_string()))
            .unwrap_or_else(Self::generate)
    }

    /// Generate a fresh UUID-backed ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access to the request ID stored in request extensions.
pub trait RequestIdExt {
    /// The ID attached by [`RequestIdLayer`], or `"unknown"` before it runs.
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.extensions()
            .get::<RequestId>()
            .map(RequestId::as_str)
            .unwrap_or("unknown")
    }
}

/// Tower layer that attaches a [`RequestId`] to every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Clone, Debug)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let id = RequestId::from_request(&request);
        request.extensions_mut().insert(id);
        self.inner.call(request)
    }
}

/// Clone the end-to-end headers of an inbound request for forwarding.
///
/// Duplicate values (e.g. repeated `accept` entries) are preserved in order.
pub fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !TRANSPORT_HEADERS.contains(name) {
            forwarded.append(name.clone(), value.clone());
        }
    }
    forwarded
}

/// Whether a forwarded request should carry the inbound body stream.
///
/// GET and HEAD go out bodyless unless the client explicitly framed a body.
/// Every other method streams whatever the client sent: an HTTP/2 request
/// may stream a body with neither `Content-Length` nor `Transfer-Encoding`,
/// so for those methods the framing headers say nothing.
pub fn should_forward_body(method: &Method, headers: &HeaderMap) -> bool {
    if *method == Method::GET || *method == Method::HEAD {
        return headers
            .get(CONTENT_LENGTH)
            .map(|len| len.as_bytes() != b"0")
            .unwrap_or(false)
            || headers.contains_key(TRANSFER_ENCODING);
    }

    true
}
