//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The normalised username is already registered.
        DuplicateUsername { username: String } => "username {username} already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, enforcing username uniqueness.
    async fn insert(&self, user: &User) -> Result<User, UserRepositoryError>;

    /// Fetch a user by normalised username.
    async fn find_by_username(&self, username: &Username)
    -> Result<Option<User>, UserRepositoryError>;
}
