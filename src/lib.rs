//! Edge router for the RustOwl playground
//!
//! `POST /api/analyze` is passed through untouched to a backend container
//! instance; every other request is answered from the static asset
//! directory. [`client::AnalyzeClient`] is the typed caller for the analysis
//! endpoint.

pub mod assets;
pub mod client;
pub mod config;
pub mod container;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod schema;
pub mod server;

pub use client::AnalyzeClient;
pub use error::{ClientError, Error, ForwardError, SchemaError};
pub use schema::{AnalyzeRequest, LspCursorResponse};
