//! `/api/v1/users` handlers.

use super::{ApiError, AppState, CurrentUser};
use crate::users::{User, UserLookup};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::Value;

/// GET /api/v1/users: every user, without password digests.
pub async fn handle_list(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.users.all().iter().map(User::to_json).collect())
}

/// GET /api/v1/users/{user_id}: `me` is the identity resolved by the gate.
pub async fn handle_get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    current: Option<Extension<CurrentUser>>,
) -> Result<Json<Value>, ApiError> {
    if user_id == "me" {
        let Some(Extension(CurrentUser(user))) = current else {
            return Err(ApiError::NotFound);
        };
        return Ok(Json(user.to_json()));
    }
    let user = state.users.find_by_id(&user_id).ok_or(ApiError::NotFound)?;
    Ok(Json(user.to_json()))
}

/// POST /api/v1/users: `{email, password, first_name?, last_name?}`.
pub async fn handle_create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Ok(Json(body)) = body else {
        return Err(ApiError::bad_request("Wrong format"));
    };
    if !body.is_object() {
        return Err(ApiError::bad_request("Wrong format"));
    }

    let email = non_empty_str(&body, "email").ok_or_else(|| ApiError::bad_request("email missing"))?;
    let password =
        non_empty_str(&body, "password").ok_or_else(|| ApiError::bad_request("password missing"))?;

    let mut user = User::new(email, password);
    user.first_name = non_empty_str(&body, "first_name").map(str::to_string);
    user.last_name = non_empty_str(&body, "last_name").map(str::to_string);

    let user = state
        .users
        .insert(user)
        .map_err(|e| ApiError::bad_request(format!("Can't create User: {e}")))?;
    tracing::info!(user_id = user.id.as_str(), "User created");
    Ok((StatusCode::CREATED, Json(user.to_json())).into_response())
}

/// PUT /api/v1/users/{user_id}: updates `first_name` / `last_name`.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    if state.users.find_by_id(&user_id).is_none() {
        return Err(ApiError::NotFound);
    }
    let Ok(Json(body)) = body else {
        return Err(ApiError::bad_request("Wrong format"));
    };
    if !body.is_object() {
        return Err(ApiError::bad_request("Wrong format"));
    }

    let first_name = body.get("first_name").and_then(Value::as_str).map(str::to_string);
    let last_name = body.get("last_name").and_then(Value::as_str).map(str::to_string);

    let user = state
        .users
        .update(&user_id, |user| {
            if first_name.is_some() {
                user.first_name = first_name;
            }
            if last_name.is_some() {
                user.last_name = last_name;
            }
        })?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user.to_json()))
}

/// DELETE /api/v1/users/{user_id}
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.users.remove(&user_id)? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(user_id = user_id.as_str(), "User deleted");
    Ok(Json(serde_json::json!({})))
}

fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
}
