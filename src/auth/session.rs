//! Session-cookie authentication.

use super::{has_authorization_header, Auth};
use crate::session::SessionStore;
use crate::users::{User, UserLookup};
use axum::http::HeaderMap;
use std::sync::Arc;

/// Identity tracked by a server-issued session id stored in a cookie.
pub struct SessionAuth {
    session_name: String,
    sessions: Arc<SessionStore>,
    users: Arc<dyn UserLookup>,
}

impl SessionAuth {
    pub fn new(
        session_name: impl Into<String>,
        sessions: Arc<SessionStore>,
        users: Arc<dyn UserLookup>,
    ) -> Self {
        Self {
            session_name: session_name.into(),
            sessions,
            users,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Open a session for `user_id` and return its id.
    pub fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        Some(self.sessions.create(user_id?))
    }

    pub fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.sessions.user_id_for(session_id?)
    }

    /// Drop the session named by the request's cookie.
    ///
    /// `false` when there is no request, no cookie, or no such session. An
    /// existing entry is removed even if its user id is empty.
    pub fn destroy_session(&self, request: Option<&HeaderMap>) -> bool {
        let Some(session_id) = self.session_cookie(request) else {
            return false;
        };
        self.sessions.destroy(&session_id)
    }
}

impl Auth for SessionAuth {
    fn session_name(&self) -> &str {
        &self.session_name
    }

    fn current_user(&self, request: Option<&HeaderMap>) -> Option<User> {
        let session_id = self.session_cookie(request);
        let user_id = self.user_id_for_session_id(session_id.as_deref())?;
        self.users.find_by_id(&user_id)
    }

    /// Either the session cookie or an `Authorization` header counts.
    fn has_credentials(&self, request: Option<&HeaderMap>) -> bool {
        self.session_cookie(request).is_some() || has_authorization_header(request)
    }
}
