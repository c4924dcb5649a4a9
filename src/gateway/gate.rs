//! Per-request authentication gate, run before route dispatch.
//!
//! 1. No strategy configured: allow.
//! 2. Path excluded: allow.
//! 3. Credential material absent: 401.
//! 4. Material present but resolves to nobody: 403.
//! 5. Otherwise allow, with [`CurrentUser`] in the request extensions.

use super::{ApiError, AppState};
use crate::auth::{Auth, AuthStrategy};
use crate::users::User;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Paths reachable without authentication.
pub const EXCLUDED_PATHS: [&str; 3] = [
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
];

/// Additionally excluded under the session strategy, so a session can be
/// obtained in the first place.
pub const SESSION_LOGIN_PATH: &str = "/api/v1/auth_session/login/";

/// Identity resolved by the gate for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Exclusion list in force for `auth`.
pub fn excluded_paths(auth: &AuthStrategy) -> Vec<&'static str> {
    let mut paths = EXCLUDED_PATHS.to_vec();
    if auth.as_session().is_some() {
        paths.push(SESSION_LOGIN_PATH);
    }
    paths
}

/// axum middleware enforcing the configured strategy.
pub async fn request_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(auth) = state.auth.as_deref() else {
        return Ok(next.run(request).await);
    };

    let path = request.uri().path().to_owned();
    if !auth.require_auth(Some(&path), &excluded_paths(auth)) {
        return Ok(next.run(request).await);
    }

    let headers = request.headers();
    if !auth.has_credentials(Some(headers)) {
        tracing::debug!(path = path.as_str(), "Rejected: no credentials");
        return Err(ApiError::Unauthorized);
    }

    let Some(user) = auth.current_user(Some(headers)) else {
        tracing::debug!(path = path.as_str(), "Rejected: credentials resolve to no user");
        return Err(ApiError::Forbidden);
    };

    tracing::debug!(path = path.as_str(), user_id = user.id.as_str(), "Authenticated");
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthType;
    use crate::users::{UserLookup, UserStore};
    use std::sync::Arc;

    fn strategy(auth_type: AuthType) -> AuthStrategy {
        let users: Arc<dyn UserLookup> = Arc::new(UserStore::in_memory());
        AuthStrategy::from_type(auth_type, "sid", users).unwrap()
    }

    #[test]
    fn fixed_exclusions_for_basic() {
        let paths = excluded_paths(&strategy(AuthType::Basic));
        assert_eq!(paths, EXCLUDED_PATHS.to_vec());
    }

    #[test]
    fn session_strategy_also_exempts_login() {
        let auth = strategy(AuthType::Session);
        let paths = excluded_paths(&auth);
        assert!(paths.contains(&SESSION_LOGIN_PATH));
        assert!(!auth.require_auth(Some("/api/v1/auth_session/login"), &paths));
        assert!(auth.require_auth(Some("/api/v1/auth_session/logout"), &paths));
    }
}
