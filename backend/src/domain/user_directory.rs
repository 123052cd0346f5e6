//! User directory service implementing the [`UserDirectory`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{UserDirectory, UserRepository, UserRepositoryError};
use crate::domain::{Error, IdentifierAllocator, User, UserId, Username};

/// Message returned when a username lookup finds nothing.
pub const USER_NOT_FOUND: &str = "User Not Found";
/// Message returned when a blank username is submitted.
pub const USERNAME_REQUIRED: &str = "Username Required";
/// Message returned when a username is already registered.
pub const USERNAME_IN_USE: &str = "Username In Use";

pub(crate) fn map_user_repository_error(err: UserRepositoryError) -> Error {
    match err {
        UserRepositoryError::Connection { message } => {
            error!(%message, "user store unavailable");
            Error::service_unavailable("User store unavailable")
        }
        UserRepositoryError::Query { message } => {
            error!(%message, "user store query failed");
            Error::internal("User store error")
        }
        UserRepositoryError::DuplicateUsername { .. } => Error::duplicate(USERNAME_IN_USE),
    }
}

/// Registers and resolves users.
#[derive(Clone)]
pub struct UserDirectoryService<U> {
    users: Arc<U>,
    ids: Arc<dyn IdentifierAllocator>,
}

impl<U> UserDirectoryService<U> {
    /// Create a directory over `users`, allocating identifiers from `ids`.
    pub fn new(users: Arc<U>, ids: Arc<dyn IdentifierAllocator>) -> Self {
        Self { users, ids }
    }
}

#[async_trait]
impl<U> UserDirectory for UserDirectoryService<U>
where
    U: UserRepository,
{
    async fn find_user(&self, username: &str) -> Result<Option<User>, Error> {
        let Ok(username) = Username::new(username) else {
            return Ok(None);
        };
        self.users
            .find_by_username(&username)
            .await
            .map_err(map_user_repository_error)
    }

    async fn create_user(&self, username: &str) -> Result<User, Error> {
        let username = Username::new(username).map_err(|_| {
            Error::invalid_request(USERNAME_REQUIRED).with_details(serde_json::json!({
                "field": "username",
                "code": "missing_field",
            }))
        })?;
        let user = User::new(UserId::allocate(self.ids.as_ref()), username);
        let created = self
            .users
            .insert(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %created.id(), username = %created.username(), "user created");
        Ok(created)
    }
}
