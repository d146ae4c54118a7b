//! Canonical form for request paths
//!
//! Both registration and dispatch normalize through here, so trailing
//! slashes, duplicate separators and query strings never tell routes apart.

/// Reduce a raw path to canonical form: strip any query string, drop empty
/// segments, rejoin with exactly one leading separator.
///
/// Total and idempotent; the empty string normalizes to `"/"`.
pub fn normalize(raw: &str) -> String {
    let path = raw.split('?').next().unwrap_or("");
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
