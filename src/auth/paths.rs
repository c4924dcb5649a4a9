//! Excluded-path matching for the authentication gate.
//!
//! Matching is loose. A path is exempt when, for some entry `e`:
//!
//! 1. `path == e`,
//! 2. `e` starts with `path` (so every prefix of an excluded path is exempt,
//!    including `/`, `/api` and the empty path),
//! 3. `path` starts with `e`, or
//! 4. `e` ends with `*` and `path` starts with `e` minus the `*`.
//!
//! No trailing-slash normalisation happens here.

/// `true` when `path` needs authentication given `excluded_paths`.
///
/// A missing path or an empty exclusion list always requires auth.
pub fn require_auth(path: Option<&str>, excluded_paths: &[&str]) -> bool {
    let Some(path) = path else {
        return true;
    };
    !excluded_paths.iter().any(|entry| is_excluded(path, entry))
}

fn is_excluded(path: &str, entry: &str) -> bool {
    if path == entry || entry.starts_with(path) || path.starts_with(entry) {
        return true;
    }
    entry
        .strip_suffix('*')
        .is_some_and(|stem| path.starts_with(stem))
}
