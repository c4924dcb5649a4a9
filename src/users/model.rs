use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A registered user.
///
/// `password` holds the lowercase hex SHA-256 digest of the plaintext and is
/// persisted, but never rendered to API clients (see [`User::to_json`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "_password")]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a fresh UUID and the given plaintext password.
    pub fn new(email: &str, password: &str) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
            password: Some(hash_password(password)),
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// `false` when no password is stored; otherwise compares digests.
    pub fn is_valid_password(&self, plaintext: &str) -> bool {
        match self.password.as_deref() {
            Some(stored) => stored == hash_password(plaintext),
            None => false,
        }
    }

    /// Human-readable name built from whichever of first/last/email are set.
    pub fn display_name(&self) -> String {
        match (
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        ) {
            (None, None, None) => String::new(),
            (None, None, Some(email)) => email.to_string(),
            (Some(first), None, _) => first.to_string(),
            (None, Some(last), _) => last.to_string(),
            (Some(first), Some(last), _) => format!("{first} {last}"),
        }
    }

    /// Public representation for API responses (no password digest).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "email": self.email,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "created_at": self.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "updated_at": self.updated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        })
    }
}

/// Lowercase hex SHA-256 of `plaintext`, the stored password format.
pub fn hash_password(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_digest_is_lowercase_sha256_hex() {
        assert_eq!(
            hash_password("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn valid_password_matches_digest() {
        let user = User::new("alice@example.com", "secret");
        assert!(user.is_valid_password("secret"));
        assert!(!user.is_valid_password("Secret"));
        assert!(!user.is_valid_password(""));
    }

    #[test]
    fn missing_password_never_validates() {
        let mut user = User::new("alice@example.com", "secret");
        user.password = None;
        assert!(!user.is_valid_password("secret"));
    }

    #[test]
    fn display_name_prefers_names_over_email() {
        let mut user = User::new("alice@example.com", "pw");
        assert_eq!(user.display_name(), "alice@example.com");

        user.first_name = Some("Alice".into());
        assert_eq!(user.display_name(), "Alice");

        user.last_name = Some("Liddell".into());
        assert_eq!(user.display_name(), "Alice Liddell");

        user.first_name = None;
        assert_eq!(user.display_name(), "Liddell");

        user.last_name = None;
        user.email = None;
        assert_eq!(user.display_name(), "");
    }

    #[test]
    fn json_view_omits_password() {
        let user = User::new("alice@example.com", "secret");
        let json = user.to_json();
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("password").is_none());
        assert!(json.get("_password").is_none());
    }

    #[test]
    fn serialized_record_round_trips_digest() {
        let user = User::new("alice@example.com", "secret");
        let raw = serde_json::to_string(&user).unwrap();
        assert!(raw.contains("\"_password\""));
        let back: User = serde_json::from_str(&raw).unwrap();
        assert!(back.is_valid_password("secret"));
    }
}
