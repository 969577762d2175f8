//! Analysis API client
//!
//! Talks to the edge router the way the playground frontend does: one
//! `analyze` call per cursor move and a fire-and-forget `health` probe used to
//! wake the backend early. Neither call retries or caches.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::error::ClientError;
use crate::routing::ANALYZE_PATH;
use crate::schema::{self, AnalyzeRequest, LspCursorResponse};

const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct AnalyzeClient {
    base_url: String,
    http: Client<HttpConnector, Full<Bytes>>,
}

impl AnalyzeClient {
    /// `base_url` is the router origin, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Analyze `source` at the cursor
    ///
    /// Best effort: a transport failure and a response that fails validation
    /// both yield `None`, and the caller shows nothing.
    pub async fn analyze(
        &self,
        source: &str,
        line: u32,
        character: u32,
    ) -> Option<LspCursorResponse> {
        match self.try_analyze(source, line, character).await {
            Ok(resp) => Some(resp),
            Err(e) => {
                tracing::debug!(error = %e, "analyze produced no result");
                None
            }
        }
    }

    /// Same request as [`analyze`](Self::analyze), keeping the failure reason
    pub async fn try_analyze(
        &self,
        source: &str,
        line: u32,
        character: u32,
    ) -> Result<LspCursorResponse, ClientError> {
        let body = serde_json::to_vec(&AnalyzeRequest {
            source: source.to_string(),
            line,
            character,
        })
        .map_err(ClientError::Encode)?;

        let req = Request::post(format!("{}{ANALYZE_PATH}", self.base_url))
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))?;

        // The status is not inspected: an error page simply fails validation
        let resp = self.http.request(req).await?;
        let raw = resp.into_body().collect().await?.to_bytes();
        Ok(schema::parse(&raw)?)
    }

    /// Liveness probe; the result is discarded and every error swallowed
    pub async fn health(&self) {
        let Ok(req) = Request::get(format!("{}{HEALTH_PATH}", self.base_url))
            .body(Full::new(Bytes::new()))
        else {
            return;
        };
        if let Err(e) = self.http.request(req).await {
            tracing::debug!(error = %e, "health probe failed");
        }
    }
}
