//! User records and the lookup adapter the authentication strategies consume.
//!
//! The strategies only ever see [`UserLookup`]; the concrete [`UserStore`]
//! is an in-memory table with optional JSON file persistence.

pub mod model;
pub mod store;

pub use model::{hash_password, User};
pub use store::UserStore;

/// Narrow read interface over the user table.
///
/// Every method degrades to `None`/`false` instead of failing, so strategy
/// pipelines can short-circuit with `?` on `Option`.
pub trait UserLookup: Send + Sync {
    /// First user registered with `email`, if any.
    fn find_by_email(&self, email: &str) -> Option<User>;

    /// User with the given id, if any.
    fn find_by_id(&self, id: &str) -> Option<User>;

    /// Check `plaintext` against the user's stored digest.
    fn verify_password(&self, user: &User, plaintext: &str) -> bool {
        user.is_valid_password(plaintext)
    }
}
