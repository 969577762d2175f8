//! Static asset store
//!
//! Resolves a request path to a file under the configured directory. This is
//! the catch-all behind the router: it answers `GET`/`HEAD`, returns `404` on a
//! miss and `405` for any other method.

use std::path::{Path, PathBuf};

use hyper::http::request::Parts;
use hyper::{Method, Response};
use tokio::fs;

use crate::config::AssetsConfig;
use crate::http::{self, cache, mime, Body};
use crate::logger;

pub struct AssetStore {
    root: PathBuf,
    index_files: Vec<String>,
}

impl AssetStore {
    pub fn new(config: &AssetsConfig) -> Self {
        Self {
            root: PathBuf::from(&config.dir),
            index_files: config.index_files.clone(),
        }
    }

    /// Serve the asset addressed by the request head
    pub async fn fetch(&self, req: &Parts) -> Response<Body> {
        let is_head = match req.method {
            Method::GET => false,
            Method::HEAD => true,
            _ => return http::build_405_response(),
        };

        let Some(file) = self.resolve(req.uri.path()).await else {
            return http::build_404_response();
        };

        let content = match fs::read(&file).await {
            Ok(c) => c,
            Err(e) => {
                logger::log_error(&format!("Failed to read asset '{}': {e}", file.display()));
                return http::build_404_response();
            }
        };

        let etag = cache::generate_etag(&content);
        let if_none_match = req
            .headers
            .get(hyper::header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());
        if cache::is_not_modified(if_none_match, &etag) {
            return http::build_304_response(&etag);
        }

        let content_type = mime::content_type_for(&file);
        http::response::build_cached_response(content, content_type, &etag, is_head)
    }

    /// Map a URL path to a file inside the root, trying index files for
    /// directories. Returns `None` for misses and for anything resolving
    /// outside the root.
    async fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = path.trim_start_matches('/');
        let mut candidate = self.root.join(relative);

        if relative.is_empty() || relative.ends_with('/') || is_dir(&candidate).await {
            for index in &self.index_files {
                let index_path = candidate.join(index);
                if is_file(&index_path).await {
                    candidate = index_path;
                    break;
                }
            }
        }

        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Asset directory not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                return None;
            }
        };

        // Misses are the common case, not worth logging
        let resolved = fs::canonicalize(&candidate).await.ok()?;
        if !resolved.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {path} -> {}",
                resolved.display()
            ));
            return None;
        }

        is_file(&resolved).await.then_some(resolved)
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::Request;

    fn store(dir: &Path) -> AssetStore {
        AssetStore::new(&AssetsConfig {
            dir: dir.to_string_lossy().into_owned(),
            index_files: vec!["index.html".to_string()],
        })
    }

    fn get(path: &str) -> Parts {
        parts_of(Request::builder().uri(path).body(()).unwrap())
    }

    fn parts_of(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    async fn body_string(resp: Response<Body>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>owl</h1>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_index_for_root() {
        let dir = fixture();
        let resp = store(dir.path()).fetch(&get("/")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(body_string(resp).await, "<h1>owl</h1>");
    }

    #[tokio::test]
    async fn test_serves_nested_file() {
        let dir = fixture();
        let resp = store(dir.path()).fetch(&get("/assets/app.js")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = fixture();
        let resp = store(dir.path()).fetch(&get("/health")).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_directory_without_index_is_404() {
        let dir = fixture();
        let resp = store(dir.path()).fetch(&get("/assets/")).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("dist");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "nope").unwrap();

        let resp = store(&root).fetch(&get("/../secret.txt")).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_non_get_is_405() {
        let dir = fixture();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/index.html")
            .body(())
            .unwrap();
        let resp = store(dir.path()).fetch(&parts_of(req)).await;
        assert_eq!(resp.status(), 405);
    }

    #[tokio::test]
    async fn test_etag_round_trip_gives_304() {
        let dir = fixture();
        let assets = store(dir.path());
        let first = assets.fetch(&get("/index.html")).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/index.html")
            .header("If-None-Match", &etag)
            .body(())
            .unwrap();
        let second = assets.fetch(&parts_of(req)).await;
        assert_eq!(second.status(), 304);
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let dir = fixture();
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/index.html")
            .body(())
            .unwrap();
        let resp = store(dir.path()).fetch(&parts_of(req)).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "12");
        assert!(body_string(resp).await.is_empty());
    }
}
