//! HTTP protocol layer module
//!
//! Shared response body type and builders used by both the asset store and
//! the container passthrough.

pub mod cache;
pub mod mime;
pub mod response;

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_502_response,
};

/// Response body for every route: buffered for local responses, streamed for
/// proxied ones
pub type Body = UnsyncBoxBody<Bytes, hyper::Error>;

/// Buffered body from anything convertible to `Bytes`
pub fn full(data: impl Into<Bytes>) -> Body {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> Body {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}
