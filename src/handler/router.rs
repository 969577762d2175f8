//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, then dispatch to
//! the container passthrough or to the asset store behind a size guard.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::{Request, Response};

use crate::config::AppState;
use crate::http::{self, Body};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{match_route, RouteTarget};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Body>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Body>, Infallible> {
    let started = Instant::now();
    let access_log = state.access_log_enabled();
    let entry = access_log.then(|| access_entry(&req, peer_addr));

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let (response, upstream) = dispatch(req, &state).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        entry.upstream = upstream;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route the request; returns the response and, for passthrough, the container id
async fn dispatch(req: Request<Body>, state: &AppState) -> (Response<Body>, Option<String>) {
    let route = match_route(req.method(), req.uri().path(), &state.routes);

    match route.map(|r| &r.target) {
        Some(RouteTarget::Container { id }) => {
            // Passthrough: neither the request nor the response is touched
            let resp = state.containers.fetch(id, req).await;
            (resp, Some(id.clone()))
        }
        Some(RouteTarget::Assets) => {
            if let Some(rejected) = check_body_size(&req, state.config.http.max_body_size) {
                return (rejected, None);
            }
            // The asset store only looks at the head; the body is dropped unread
            let (parts, _body) = req.into_parts();
            let resp = state.assets.fetch(&parts).await;
            (with_server_header(resp, &state.config.http.server_name), None)
        }
        None => (http::build_404_response(), None),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(req: &Request<Body>, max_body_size: u64) -> Option<Response<Body>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn with_server_header(mut resp: Response<Body>, server_name: &str) -> Response<Body> {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        resp.headers_mut().insert(SERVER, value);
    }
    resp
}

fn access_entry(req: &Request<Body>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}
