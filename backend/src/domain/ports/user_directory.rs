//! Driving port for user lookup and registration.

use async_trait::async_trait;

use crate::domain::{Error, User};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by username, case-insensitively.
    async fn find_user(&self, username: &str) -> Result<Option<User>, Error>;

    /// Register a username, normalised to lowercase.
    async fn create_user(&self, username: &str) -> Result<User, Error>;
}
