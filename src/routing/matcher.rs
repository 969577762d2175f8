//! Route matching module
//!
//! An ordered route table; the first route whose method filter and path
//! pattern both accept the request wins.

use hyper::Method;

/// Path the analysis endpoint is served on
pub const ANALYZE_PATH: &str = "/api/analyze";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one path exactly
    Exact(String),
    /// Matches every path
    Any,
}

/// Where a matched request is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Raw passthrough to the backend instance with this id
    Container { id: String },
    /// Static asset store
    Assets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// `None` accepts any method
    pub method: Option<Method>,
    pub path: PathPattern,
    pub target: RouteTarget,
}

impl Route {
    /// `POST /api/analyze` to the container, everything else to the assets
    pub fn default_table(container_id: &str) -> Vec<Self> {
        vec![
            Self {
                method: Some(Method::POST),
                path: PathPattern::Exact(ANALYZE_PATH.to_string()),
                target: RouteTarget::Container {
                    id: container_id.to_string(),
                },
            },
            Self {
                method: None,
                path: PathPattern::Any,
                target: RouteTarget::Assets,
            },
        ]
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        let method_ok = self.method.as_ref().map_or(true, |m| m == method);
        let path_ok = match &self.path {
            PathPattern::Exact(p) => p == path,
            PathPattern::Any => true,
        };
        method_ok && path_ok
    }
}

/// Find the first matching route for a given method and path
pub fn match_route<'a>(method: &Method, path: &str, routes: &'a [Route]) -> Option<&'a Route> {
    routes.iter().find(|route| route.matches(method, path))
}
