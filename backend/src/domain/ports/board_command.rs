//! Driving port for board mutations.
//!
//! Identifiers arrive as raw strings straight from the caller; implementations
//! validate them before touching storage.

use async_trait::async_trait;

use crate::domain::{Board, BoardDraft, Error, Section, Ticket, TicketDraft};

/// Replace a whole board document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceBoardRequest {
    pub board_id: String,
    /// Version the caller last read; required.
    pub expected_version: Option<u64>,
    pub board: BoardDraft,
}

/// Address a section of a board by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRequest {
    pub board_id: String,
    pub title: String,
}

/// Append a section to a user's board addressed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBoardSectionRequest {
    pub username: String,
    pub board_name: String,
    pub title: String,
}

/// Append a ticket to a titled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTicketRequest {
    pub board_id: String,
    pub section_title: String,
    pub ticket: TicketDraft,
}

/// Remove a ticket from a titled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveTicketRequest {
    pub board_id: String,
    pub section_title: String,
    pub ticket_id: String,
}

#[async_trait]
pub trait BoardCommand: Send + Sync {
    /// Create a board, stamping fresh identifiers throughout.
    async fn create_board(&self, board: BoardDraft) -> Result<Board, Error>;

    /// Create a board owned by an existing user.
    async fn create_user_board(&self, username: &str, board: BoardDraft) -> Result<Board, Error>;

    /// Replace a board if nobody changed it since the caller read it.
    async fn replace_board(&self, request: ReplaceBoardRequest) -> Result<Board, Error>;

    /// Delete a board.
    async fn delete_board(&self, board_id: &str) -> Result<(), Error>;

    /// Append an empty section, returning the board's sections.
    async fn add_section(&self, request: SectionRequest) -> Result<Vec<Section>, Error>;

    /// Append an empty section to a user's named board, returning its
    /// sections.
    async fn add_user_board_section(
        &self,
        request: UserBoardSectionRequest,
    ) -> Result<Vec<Section>, Error>;

    /// Remove a section by title.
    async fn remove_section(&self, request: SectionRequest) -> Result<(), Error>;

    /// Append a ticket, returning the section's tickets.
    async fn add_ticket(&self, request: AddTicketRequest) -> Result<Vec<Ticket>, Error>;

    /// Remove a ticket from a section.
    async fn remove_ticket(&self, request: RemoveTicketRequest) -> Result<(), Error>;
}
