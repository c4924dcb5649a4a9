//! `Authorization: Basic` credential decoding.
//!
//! Each stage takes the previous stage's output and returns `None` on any
//! malformed input, so the whole pipeline chains with `?`.

use base64::Engine;

const BASIC_PREFIX: &str = "Basic ";

/// Base64 payload after the exact `"Basic "` prefix.
pub fn extract_base64_authorization_header(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix(BASIC_PREFIX)
}

/// Decode standard base64 into UTF-8 text.
pub fn decode_base64_authorization_header(encoded: Option<&str>) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded?)
        .ok()?;
    String::from_utf8(bytes).ok()
}

/// Split `user:password` on the first `:`.
///
/// The password may itself contain `:`.
pub fn extract_user_credentials(decoded: Option<&str>) -> Option<(String, String)> {
    let (user, password) = decoded?.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}
