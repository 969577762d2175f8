//! Request handler module
//!
//! Dispatches each request to the backend passthrough or the asset store.

pub mod router;

pub use router::handle_request;
