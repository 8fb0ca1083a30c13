//! URL composition for resources.
//!
//! Resource URLs are never stored. They are rebuilt on every call by walking
//! the ownership chain (see [`Parent`](crate::rest::Parent)) and joining the
//! pieces with the helpers below.
//!
//! # Example
//!
//! ```rust
//! use contiamo::rest::{join_url, resolve_url};
//!
//! assert_eq!(join_url("https://api.contiamo.com/projects", "p1"), "https://api.contiamo.com/projects/p1");
//!
//! let base = "https://api.contiamo.com/projects/p1";
//! assert_eq!(resolve_url(base, None, Some("apps/a1/sql")), format!("{base}/apps/a1/sql"));
//! assert_eq!(resolve_url(base, Some("https://elsewhere.test/x"), None), "https://elsewhere.test/x");
//! ```

/// Joins a base URL and a path component with exactly one `/`.
#[must_use]
pub fn join_url(base: &str, component: &str) -> String {
    let base = base.trim_end_matches('/');
    let component = component.trim_start_matches('/');
    if component.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{component}")
    }
}

/// Picks the URL for a low-level verb call.
///
/// `url` replaces `instance_url` when given; `sub_path` is then appended.
#[must_use]
pub fn resolve_url(instance_url: &str, url: Option<&str>, sub_path: Option<&str>) -> String {
    let base = url.unwrap_or(instance_url);
    sub_path.map_or_else(|| base.to_string(), |sub_path| join_url(base, sub_path))
}
