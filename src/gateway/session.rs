//! Session login/logout endpoints.
//!
//! Only live under the session strategy; with any other strategy both
//! answer 404.
//!
//! ## Flow
//!
//! 1. `POST /api/v1/auth_session/login` with form `email` + `password`
//! 2. On success → user JSON + `Set-Cookie: <session_name>=<session id>`
//! 3. Later requests carry the cookie; the gate resolves it to the user
//! 4. `DELETE /api/v1/auth_session/logout` drops the session

use super::{ApiError, AppState};
use crate::auth::{Auth, AuthStrategy};
use crate::users::UserLookup;
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Json, Response},
    Form,
};

/// Login form fields. Both are optional so that a missing field becomes a
/// 400 with a specific message instead of an extractor rejection.
#[derive(Debug, Default, serde::Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/v1/auth_session/login
pub async fn handle_login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let session_auth = state
        .auth
        .as_deref()
        .and_then(AuthStrategy::as_session)
        .ok_or(ApiError::NotFound)?;

    let form = form.map(|Form(f)| f).unwrap_or_default();
    let email = form
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("email missing"))?;
    let password = form
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("password missing"))?;

    let user = state
        .users
        .find_by_email(&email)
        .ok_or(ApiError::UnknownEmail)?;
    if !state.users.verify_password(&user, &password) {
        tracing::debug!(user_id = user.id.as_str(), "Session login: wrong password");
        return Err(ApiError::WrongPassword);
    }

    let session_id = session_auth
        .create_session(Some(&user.id))
        .ok_or_else(|| ApiError::Internal("session creation failed".into()))?;
    tracing::debug!(
        user_id = user.id.as_str(),
        live_sessions = session_auth.sessions().len(),
        "Session login"
    );
    let cookie = format!("{}={}; Path=/", session_auth.session_name(), session_id);
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(format!("invalid session cookie: {e}")))?;

    let mut response = Json(user.to_json()).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// DELETE /api/v1/auth_session/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_auth = state
        .auth
        .as_deref()
        .and_then(AuthStrategy::as_session)
        .ok_or(ApiError::NotFound)?;

    if !session_auth.destroy_session(Some(&headers)) {
        return Err(ApiError::NotFound);
    }
    tracing::debug!(
        live_sessions = session_auth.sessions().len(),
        "Session logout"
    );
    Ok(Json(serde_json::json!({})))
}
