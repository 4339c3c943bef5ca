//! Response relay and transformation.
//!
//! # Responsibilities
//! - Relay origin responses verbatim: status code, end-to-end headers, and
//!   body bytes, streamed without buffering
//! - Drop hop-by-hop headers, which describe the origin connection rather
//!   than the client connection
//! - Stamp the CORS contract onto API responses, exactly once per header

use axum::body::Body;
use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONNECTION, PROXY_AUTHENTICATE, TE,
    TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::response::Response;

/// Hop-by-hop headers never relayed to the client. `content-length` stays:
/// the origin's framing of a fixed-size body holds for the relayed copy.
/// A plain array rather than a `&[...]` borrow, which the const evaluator
/// rejects for the interior-mutable `HeaderName`.
const HOP_BY_HOP_HEADERS: [HeaderName; 7] = [
    CONNECTION,
    HeaderName::from_static("keep-alive"),
    PROXY_AUTHENTICATE,
    TE,
    TRAILER,
    TRANSFER_ENCODING,
    UPGRADE,
];

/// Relay an origin response to the client.
///
/// Status and end-to-end headers are copied as received; the body is wired
/// through as a stream so large pages and JSON payloads never buffer here.
pub fn relay_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let headers = relayable_headers(upstream.headers());

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Grant browser clients cross-origin access to API responses.
///
/// `insert` replaces every previously held value for these names, so each
/// header appears exactly once even when the origin already set its own.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

fn relayable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !HOP_BY_HOP_HEADERS.contains(name) {
            relayed.append(name.clone(), value.clone());
        }
    }
    relayed
}
