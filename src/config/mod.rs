//! Gateway configuration: a TOML file overlaid with environment variables.
//!
//! Precedence (highest first): environment, config file, built-in defaults.
//!
//! | TOML key            | env            | default           |
//! |---------------------|----------------|-------------------|
//! | `gateway.host`      | `API_HOST`     | `0.0.0.0`         |
//! | `gateway.port`      | `API_PORT`     | `5000`            |
//! | `auth.auth_type`    | `AUTH_TYPE`    | `none`            |
//! | `auth.session_name` | `SESSION_NAME` | `_my_session_id`  |
//! | `users.path`        | `USERS_FILE`   | unset (in-memory) |

use crate::auth::{AuthType, DEFAULT_SESSION_NAME};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    pub users: UsersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    /// Which strategy guards the API. Fixed for the process lifetime.
    pub auth_type: AuthType,
    /// Cookie carrying the session id.
    pub session_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_type: AuthType::None,
            session_name: DEFAULT_SESSION_NAME.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UsersConfig {
    /// JSON file backing the user table. Memory-only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for this process.
    ///
    /// An explicit `path` must exist. Without one, the platform config
    /// directory's `config.toml` is used when present. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// `<config dir>/authgate/config.toml` for the current platform.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "authgate")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay values from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("API_HOST") {
            self.gateway.host = host.trim().to_string();
        }
        if let Some(port) = get("API_PORT") {
            self.gateway.port = port
                .trim()
                .parse()
                .with_context(|| format!("API_PORT must be a port number, got '{port}'"))?;
        }
        if let Some(auth_type) = get("AUTH_TYPE") {
            self.auth.auth_type = auth_type.parse()?;
        }
        if let Some(name) = get("SESSION_NAME") {
            self.auth.session_name = name.trim().to_string();
        }
        if let Some(path) = get("USERS_FILE") {
            self.users.path = Some(PathBuf::from(path.trim()));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
