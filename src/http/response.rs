//! HTTP response building module
//!
//! Builders for the few status responses the router produces itself.

use hyper::Response;

use super::{empty, full, Body};

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Body> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(empty())
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Body> {
    build_text_response(404, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Body> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full("405 Method Not Allowed"))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Body> {
    build_text_response(413, "413 Payload Too Large")
}

/// Build 502 Bad Gateway response, returned when a backend instance cannot be reached
pub fn build_502_response() -> Response<Body> {
    build_text_response(502, "502 Bad Gateway")
}

/// Build a file response with `ETag` and cache control
pub fn build_cached_response(
    data: Vec<u8>,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Body> {
    let content_length = data.len();
    let body = if is_head { empty() } else { full(data) };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(empty())
        })
}

fn build_text_response(status: u16, text: &'static str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(full(text))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(full(text))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_status_bodies() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"404 Not Found");

        assert_eq!(build_413_response().status(), 413);
        assert_eq!(build_502_response().status(), 502);
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD");
    }

    #[tokio::test]
    async fn test_cached_response_head_has_no_body() {
        let resp = build_cached_response(b"hello".to_vec(), "text/plain", "\"abc\"", true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "5");
        assert_eq!(resp.headers()["ETag"], "\"abc\"");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
