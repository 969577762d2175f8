//! Routing module
//!
//! Ordered method + path matching over a small route table.

mod matcher;

pub use matcher::{match_route, PathPattern, Route, RouteTarget, ANALYZE_PATH};
