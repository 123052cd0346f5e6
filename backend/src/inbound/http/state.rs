//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BoardCommand, BoardQuery, BoardRepository, UserDirectory, UserRepository,
};
use crate::domain::{BoardService, IdentifierAllocator, UserDirectoryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserDirectory>,
    pub boards: Arc<dyn BoardCommand>,
    pub board_queries: Arc<dyn BoardQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        boards: Arc<dyn BoardCommand>,
        board_queries: Arc<dyn BoardQuery>,
    ) -> Self {
        Self {
            users,
            boards,
            board_queries,
        }
    }

    /// Wire the domain services over a pair of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use kanban_backend::domain::RandomIdentifierAllocator;
    /// use kanban_backend::inbound::http::state::HttpState;
    /// use kanban_backend::outbound::memory::{InMemoryBoardRepository, InMemoryUserRepository};
    ///
    /// let state = HttpState::from_repositories(
    ///     Arc::new(InMemoryBoardRepository::new()),
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(RandomIdentifierAllocator),
    /// );
    /// # let _ = state;
    /// ```
    pub fn from_repositories<B, U>(
        boards: Arc<B>,
        users: Arc<U>,
        ids: Arc<dyn IdentifierAllocator>,
    ) -> Self
    where
        B: BoardRepository + 'static,
        U: UserRepository + 'static,
    {
        let directory = UserDirectoryService::new(Arc::clone(&users), Arc::clone(&ids));
        let engine = Arc::new(BoardService::new(boards, users, ids));
        Self::new(Arc::new(directory), engine.clone(), engine)
    }
}
