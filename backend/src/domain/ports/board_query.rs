//! Driving port for board reads.

use async_trait::async_trait;

use crate::domain::{Board, Error};

#[async_trait]
pub trait BoardQuery: Send + Sync {
    /// Fetch a board by identifier.
    async fn get_board(&self, board_id: &str) -> Result<Board, Error>;

    /// List every board owned by an existing user.
    async fn list_user_boards(&self, username: &str) -> Result<Vec<Board>, Error>;

    /// Fetch an existing user's board by name.
    async fn find_user_board(&self, username: &str, name: &str) -> Result<Board, Error>;
}
