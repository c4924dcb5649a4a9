//! Pluggable authentication strategies.
//!
//! Provides:
//! - The [`Auth`] capability contract (path gating, header/cookie access,
//!   identity resolution)
//! - [`BaseAuth`]: the bare contract, which never resolves an identity
//! - [`BasicAuth`]: `Authorization: Basic base64(email:password)`
//! - [`SessionAuth`]: opaque session id in a cookie, resolved server-side
//! - [`AuthStrategy`]: the closed set of strategies, chosen once at startup
//!
//! ## Design Decisions
//! - Every lookup and decode step returns `Option` and degrades to `None`;
//!   turning that into 401/403 is the gateway's job.
//! - "No request" is modelled as `None` for the header map so the contract
//!   stays total.

pub mod basic;
pub mod codec;
pub mod paths;
pub mod session;

pub use basic::BasicAuth;
pub use session::SessionAuth;

use crate::session::SessionStore;
use crate::users::{User, UserLookup};
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default session cookie name when none is configured.
pub const DEFAULT_SESSION_NAME: &str = "_my_session_id";

/// Capability contract shared by every strategy.
pub trait Auth: Send + Sync {
    /// Name of the cookie that carries the session id.
    fn session_name(&self) -> &str;

    /// Whether `path` needs authentication. See [`paths::require_auth`].
    fn require_auth(&self, path: Option<&str>, excluded_paths: &[&str]) -> bool {
        paths::require_auth(path, excluded_paths)
    }

    /// Raw `Authorization` header value, unparsed. A value that is not
    /// visible ASCII reads as `None` here; presence is still reported by
    /// [`has_authorization_header`].
    fn authorization_header<'a>(&self, request: Option<&'a HeaderMap>) -> Option<&'a str> {
        request?.get(header::AUTHORIZATION)?.to_str().ok()
    }

    /// Value of the configured session cookie.
    fn session_cookie(&self, request: Option<&HeaderMap>) -> Option<String> {
        cookie_value(request?, self.session_name())
    }

    /// Identity behind the request. Unauthenticated unless a strategy says
    /// otherwise.
    fn current_user(&self, _request: Option<&HeaderMap>) -> Option<User> {
        None
    }

    /// Whether the request carries the credential material this strategy
    /// reads. A request without it is rejected with 401 before
    /// [`Auth::current_user`] is consulted.
    fn has_credentials(&self, request: Option<&HeaderMap>) -> bool {
        has_authorization_header(request)
    }
}

/// Whether an `Authorization` header is present at all, whatever its bytes.
pub fn has_authorization_header(request: Option<&HeaderMap>) -> bool {
    request.is_some_and(|headers| headers.contains_key(header::AUTHORIZATION))
}

/// Find cookie `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
}

/// The bare contract: requires an `Authorization` header but never
/// resolves anyone.
#[derive(Debug, Clone)]
pub struct BaseAuth {
    session_name: String,
}

impl BaseAuth {
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
        }
    }
}

impl Default for BaseAuth {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_NAME)
    }
}

impl Auth for BaseAuth {
    fn session_name(&self) -> &str {
        &self.session_name
    }
}

/// Configured strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// No gate: every request is allowed.
    #[default]
    None,
    /// The bare contract ([`BaseAuth`]).
    Auth,
    #[serde(alias = "basic_auth")]
    Basic,
    #[serde(alias = "session_auth")]
    Session,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Auth => "auth",
            Self::Basic => "basic",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "auth" => Ok(Self::Auth),
            "basic" | "basic_auth" => Ok(Self::Basic),
            "session" | "session_auth" => Ok(Self::Session),
            other => anyhow::bail!(
                "Unknown auth type '{other}' (expected none, auth, basic_auth or session_auth)"
            ),
        }
    }
}

/// The strategy in force for this process.
pub enum AuthStrategy {
    Base(BaseAuth),
    Basic(BasicAuth),
    Session(SessionAuth),
}

impl AuthStrategy {
    /// Build the strategy named by `auth_type`, or `None` for
    /// [`AuthType::None`].
    pub fn from_type(
        auth_type: AuthType,
        session_name: &str,
        users: Arc<dyn UserLookup>,
    ) -> Option<Self> {
        match auth_type {
            AuthType::None => None,
            AuthType::Auth => Some(Self::Base(BaseAuth::new(session_name))),
            AuthType::Basic => Some(Self::Basic(BasicAuth::new(session_name, users))),
            AuthType::Session => Some(Self::Session(SessionAuth::new(
                session_name,
                Arc::new(SessionStore::new()),
                users,
            ))),
        }
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::Base(_) => AuthType::Auth,
            Self::Basic(_) => AuthType::Basic,
            Self::Session(_) => AuthType::Session,
        }
    }

    /// The session strategy, when that is what is configured.
    pub fn as_session(&self) -> Option<&SessionAuth> {
        match self {
            Self::Session(s) => Some(s),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Auth {
        match self {
            Self::Base(a) => a,
            Self::Basic(a) => a,
            Self::Session(a) => a,
        }
    }
}

impl Auth for AuthStrategy {
    fn session_name(&self) -> &str {
        self.inner().session_name()
    }

    fn require_auth(&self, path: Option<&str>, excluded_paths: &[&str]) -> bool {
        self.inner().require_auth(path, excluded_paths)
    }

    fn authorization_header<'a>(&self, request: Option<&'a HeaderMap>) -> Option<&'a str> {
        self.inner().authorization_header(request)
    }

    fn session_cookie(&self, request: Option<&HeaderMap>) -> Option<String> {
        self.inner().session_cookie(request)
    }

    fn current_user(&self, request: Option<&HeaderMap>) -> Option<User> {
        self.inner().current_user(request)
    }

    fn has_credentials(&self, request: Option<&HeaderMap>) -> bool {
        self.inner().has_credentials(request)
    }
}
