//! HTTP Basic authentication against the user table.

use super::{codec, Auth};
use crate::users::{User, UserLookup};
use axum::http::HeaderMap;
use std::sync::Arc;

/// `Authorization: Basic base64(email:password)` strategy.
pub struct BasicAuth {
    session_name: String,
    users: Arc<dyn UserLookup>,
}

impl BasicAuth {
    pub fn new(session_name: impl Into<String>, users: Arc<dyn UserLookup>) -> Self {
        Self {
            session_name: session_name.into(),
            users,
        }
    }

    pub fn extract_base64_authorization_header<'a>(&self, header: Option<&'a str>) -> Option<&'a str> {
        codec::extract_base64_authorization_header(header)
    }

    pub fn decode_base64_authorization_header(&self, encoded: Option<&str>) -> Option<String> {
        codec::decode_base64_authorization_header(encoded)
    }

    pub fn extract_user_credentials(&self, decoded: Option<&str>) -> Option<(String, String)> {
        codec::extract_user_credentials(decoded)
    }

    /// User registered under `email` whose password matches, if any.
    pub fn user_object_from_credentials(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Option<User> {
        let (email, password) = (email?, password?);
        let user = self.users.find_by_email(email)?;
        if !self.users.verify_password(&user, password) {
            tracing::debug!(user_id = user.id.as_str(), "Basic auth password mismatch");
            return None;
        }
        Some(user)
    }
}

impl Auth for BasicAuth {
    fn session_name(&self) -> &str {
        &self.session_name
    }

    fn current_user(&self, request: Option<&HeaderMap>) -> Option<User> {
        let header = self.authorization_header(request);
        let encoded = self.extract_base64_authorization_header(header);
        let decoded = self.decode_base64_authorization_header(encoded);
        let (email, password) = self.extract_user_credentials(decoded.as_deref())?;
        self.user_object_from_credentials(Some(&email), Some(&password))
    }
}
