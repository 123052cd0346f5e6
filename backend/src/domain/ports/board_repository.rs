//! Driven port for board document storage.
//!
//! Every method is one atomic operation on a single board document. Nested
//! mutations never read the document and write it back in separate steps;
//! adapters apply them in place so concurrent appends to one board all
//! survive. Each successful mutation increments the stored version.

use async_trait::async_trait;

use crate::domain::{Board, BoardId, BoardName, Section, SectionTitle, Ticket, TicketId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by board repository adapters.
    pub enum BoardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "board repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "board repository query failed: {message}",
        /// The creator already owns a board with this name.
        DuplicateName { creator: String, name: String } =>
            "board {name} already exists for {creator}",
        /// The board already has a section with this title.
        DuplicateSectionTitle { title: String } => "section {title} already exists",
        /// The stored version differs from the one the caller read.
        VersionMismatch { expected: u64, actual: u64 } =>
            "board version mismatch: expected {expected}, found {actual}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Insert a new board, enforcing `(creator, name)` uniqueness.
    async fn insert(&self, board: &Board) -> Result<Board, BoardRepositoryError>;

    /// Fetch a board by identifier.
    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError>;

    /// Fetch a creator's board by name.
    async fn find_by_creator_and_name(
        &self,
        creator: &Username,
        name: &BoardName,
    ) -> Result<Option<Board>, BoardRepositoryError>;

    /// List a creator's boards in insertion order.
    async fn list_by_creator(&self, creator: &Username) -> Result<Vec<Board>, BoardRepositoryError>;

    /// Delete a board, returning the removed document.
    async fn delete_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError>;

    /// Replace a board when its stored version equals `expected_version`.
    ///
    /// The stored document takes `expected_version + 1`. Returns `None` when
    /// the board does not exist.
    async fn replace(
        &self,
        board: &Board,
        expected_version: u64,
    ) -> Result<Option<Board>, BoardRepositoryError>;

    /// Append a section, returning the updated board or `None` when the board
    /// does not exist.
    async fn append_section(
        &self,
        id: &BoardId,
        section: &Section,
    ) -> Result<Option<Board>, BoardRepositoryError>;

    /// Append a section to the creator's board with this name, returning the
    /// updated board or `None` when no such board exists.
    async fn append_section_by_name(
        &self,
        creator: &Username,
        name: &BoardName,
        section: &Section,
    ) -> Result<Option<Board>, BoardRepositoryError>;

    /// Remove the section with the given title, returning the number of
    /// boards modified.
    async fn remove_section_by_title(
        &self,
        id: &BoardId,
        title: &SectionTitle,
    ) -> Result<u64, BoardRepositoryError>;

    /// Append a ticket to the titled section.
    ///
    /// Returns the board after the update, unmodified when no section
    /// matches, or `None` when the board does not exist.
    async fn append_ticket_to_section(
        &self,
        id: &BoardId,
        title: &SectionTitle,
        ticket: &Ticket,
    ) -> Result<Option<Board>, BoardRepositoryError>;

    /// Remove a ticket from the titled section, returning the number of
    /// boards modified.
    async fn remove_ticket_from_section(
        &self,
        id: &BoardId,
        title: &SectionTitle,
        ticket_id: &TicketId,
    ) -> Result<u64, BoardRepositoryError>;
}
