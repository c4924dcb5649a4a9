//! In-memory user table with optional JSON file persistence.
//!
//! The file (when configured) is read once at startup and rewritten in full
//! after every mutation. Users keep their insertion order so that
//! `find_by_email` returns the first registration for a duplicated email.
//!
//! Mutations build the new table on a copy and only swap it in once the
//! file write succeeded, so a failed write leaves memory and disk agreeing.
//! The write is a blocking `std::fs::write` made under the write lock, which
//! serialises writers; the file is small and mutations are rare.

use super::{User, UserLookup};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

/// Thread-safe user table.
pub struct UserStore {
    users: RwLock<Vec<User>>,
    path: Option<PathBuf>,
}

impl UserStore {
    /// Empty store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Open (or create on first write) a JSON-backed store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let users = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read users file {}", path.display()))?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<User>>(&raw)
                    .with_context(|| format!("Malformed users file {}", path.display()))?
            }
        } else {
            Vec::new()
        };
        tracing::info!(path = %path.display(), count = users.len(), "User store loaded");
        Ok(Self {
            users: RwLock::new(users),
            path: Some(path.to_path_buf()),
        })
    }

    /// Snapshot of every user, in insertion order.
    pub fn all(&self) -> Vec<User> {
        self.users.read().clone()
    }

    pub fn count(&self) -> usize {
        self.users.read().len()
    }

    /// Add a user and persist.
    pub fn insert(&self, user: User) -> Result<User> {
        let mut users = self.users.write();
        let mut next = users.clone();
        next.push(user.clone());
        self.persist(&next)?;
        *users = next;
        Ok(user)
    }

    /// Apply `f` to the user with `id` and persist. Returns the updated user,
    /// or `None` when no such user exists.
    pub fn update<F>(&self, id: &str, f: F) -> Result<Option<User>>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write();
        let mut next = users.clone();
        let Some(user) = next.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        f(user);
        user.updated_at = chrono::Utc::now();
        let updated = user.clone();
        self.persist(&next)?;
        *users = next;
        Ok(Some(updated))
    }

    /// Remove the user with `id`. Returns whether a user was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut users = self.users.write();
        let mut next = users.clone();
        next.retain(|u| u.id != id);
        if next.len() == users.len() {
            return Ok(false);
        }
        self.persist(&next)?;
        *users = next;
        Ok(true)
    }

    fn persist(&self, users: &[User]) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string_pretty(users)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write users file {}", path.display()))?;
        Ok(())
    }
}

impl UserLookup for UserStore {
    fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned()
    }

    fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }
}
