//! Process-local `UserRepository`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, Username};

use super::POISONED;

/// User store keeping registrations in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, UserRepositoryError> {
        self.users
            .lock()
            .map_err(|_| UserRepositoryError::connection(POISONED))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<User, UserRepositoryError> {
        let mut users = self.lock()?;
        if users
            .iter()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserRepositoryError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let users = self.lock()?;
        Ok(users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }
}
