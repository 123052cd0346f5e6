//! Board aggregate mutation engine.
//!
//! [`BoardService`] implements the board driving ports. Each operation
//! validates the caller's identifiers and preconditions, allocates any new
//! identifiers, and then issues exactly one atomic write to the
//! [`BoardRepository`]. Replacement reads the current revision first so kept
//! nested identifiers can be checked against it, then writes under a version
//! guard. Storage faults are logged here and replaced with
//! generic errors before they leave the domain.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    AddTicketRequest, BoardCommand, BoardQuery, BoardRepository, BoardRepositoryError,
    RemoveTicketRequest, ReplaceBoardRequest, SectionRequest, UserBoardSectionRequest,
    UserRepository,
};
use crate::domain::user_directory::{USER_NOT_FOUND, map_user_repository_error};
use crate::domain::{
    Board, BoardDraft, BoardId, BoardName, BoardValidationError, Error, IdentifierAllocator,
    Section, SectionId, SectionTitle, Ticket, TicketId, Username,
};

/// Message returned when a board lookup finds nothing.
pub const BOARD_NOT_FOUND: &str = "Board Not Found";
/// Message returned when a creator already owns a board with the same name.
pub const BOARD_NAME_EXISTS: &str = "Board Name Already Exists";
/// Message returned when a section title lookup finds nothing.
pub const SECTION_NOT_FOUND: &str = "Section Not Found";
/// Message returned when a board already has a section with the same title.
pub const SECTION_TITLE_EXISTS: &str = "Section Title Already Exists";
/// Message returned when a ticket lookup finds nothing.
pub const TICKET_NOT_FOUND: &str = "Ticket Not Found";
/// Message returned when a replacement raced another mutation.
pub const BOARD_MODIFIED: &str = "Board Was Modified";

fn invalid_identifier(field: &str, value: &str) -> Error {
    Error::invalid_request(format!("{field} must be a valid identifier")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_id",
    }))
}

fn parse_board_id(raw: &str) -> Result<BoardId, Error> {
    BoardId::parse(raw).map_err(|err| invalid_identifier("boardId", err.value()))
}

fn parse_ticket_id(raw: &str) -> Result<TicketId, Error> {
    TicketId::parse(raw).map_err(|err| invalid_identifier("ticketId", err.value()))
}

fn blank_field(field: &str) -> Error {
    Error::invalid_request(format!("{field} must not be empty")).with_details(json!({
        "field": field,
        "code": "empty_field",
    }))
}

fn parse_title(raw: String) -> Result<SectionTitle, Error> {
    SectionTitle::new(raw).map_err(|_| blank_field("title"))
}

fn map_validation_error(err: BoardValidationError) -> Error {
    match err {
        BoardValidationError::EmptyName => blank_field("name"),
        BoardValidationError::EmptyCreator => blank_field("creator"),
        BoardValidationError::EmptySectionTitle => blank_field("title"),
        BoardValidationError::DuplicateSectionTitle { title } => {
            Error::duplicate(SECTION_TITLE_EXISTS).with_details(json!({
                "title": title,
                "code": "duplicate_section_title",
            }))
        }
    }
}

fn map_repository_error(err: BoardRepositoryError) -> Error {
    match err {
        BoardRepositoryError::Connection { message } => {
            error!(%message, "board store unavailable");
            Error::service_unavailable("Board store unavailable")
        }
        BoardRepositoryError::Query { message } => {
            error!(%message, "board store query failed");
            Error::internal("Board store error")
        }
        BoardRepositoryError::DuplicateName { .. } => Error::duplicate(BOARD_NAME_EXISTS),
        BoardRepositoryError::DuplicateSectionTitle { title } => {
            map_validation_error(BoardValidationError::DuplicateSectionTitle { title })
        }
        BoardRepositoryError::VersionMismatch { expected, actual } => {
            Error::conflict(BOARD_MODIFIED).with_details(json!({
                "expectedVersion": expected,
                "actualVersion": actual,
                "code": "version_mismatch",
            }))
        }
    }
}

/// Board engine implementing [`BoardCommand`] and [`BoardQuery`].
#[derive(Clone)]
pub struct BoardService<B, U> {
    boards: Arc<B>,
    users: Arc<U>,
    ids: Arc<dyn IdentifierAllocator>,
}

impl<B, U> BoardService<B, U> {
    /// Create an engine over the board and user stores.
    pub fn new(boards: Arc<B>, users: Arc<U>, ids: Arc<dyn IdentifierAllocator>) -> Self {
        Self { boards, users, ids }
    }
}

impl<B, U> BoardService<B, U>
where
    B: BoardRepository,
    U: UserRepository,
{
    async fn require_user(&self, username: &str) -> Result<Username, Error> {
        let username = Username::new(username).map_err(|_| Error::not_found(USER_NOT_FOUND))?;
        self.users
            .find_by_username(&username)
            .await
            .map_err(map_user_repository_error)?
            .map(|user| user.username().clone())
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn insert(&self, draft: BoardDraft) -> Result<Board, Error> {
        let board = Board::create(draft, self.ids.as_ref()).map_err(map_validation_error)?;
        let created = self
            .boards
            .insert(&board)
            .await
            .map_err(map_repository_error)?;
        info!(board_id = %created.id(), creator = %created.creator(), "board created");
        Ok(created)
    }
}

#[async_trait]
impl<B, U> BoardCommand for BoardService<B, U>
where
    B: BoardRepository,
    U: UserRepository,
{
    async fn create_board(&self, board: BoardDraft) -> Result<Board, Error> {
        self.insert(board).await
    }

    async fn create_user_board(&self, username: &str, board: BoardDraft) -> Result<Board, Error> {
        let creator = self.require_user(username).await?;
        self.insert(BoardDraft {
            creator: creator.into(),
            ..board
        })
        .await
    }

    async fn replace_board(&self, request: ReplaceBoardRequest) -> Result<Board, Error> {
        let ReplaceBoardRequest {
            board_id,
            expected_version,
            board,
        } = request;
        let id = parse_board_id(&board_id)?;
        let expected_version = expected_version.ok_or_else(|| {
            Error::invalid_request("version is required").with_details(json!({
                "field": "version",
                "code": "missing_field",
            }))
        })?;
        let current = self
            .boards
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))?;
        if current.version() != expected_version {
            return Err(map_repository_error(
                BoardRepositoryError::version_mismatch(expected_version, current.version()),
            ));
        }
        // Kept nested ids were checked against `current`; the version guard on
        // the write pins the stored document to that same revision.
        let replacement = Board::replacement(&current, board, self.ids.as_ref())
            .map_err(map_validation_error)?;

        let replaced = self
            .boards
            .replace(&replacement, expected_version)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))?;
        info!(board_id = %id, version = replaced.version(), "board replaced");
        Ok(replaced)
    }

    async fn delete_board(&self, board_id: &str) -> Result<(), Error> {
        let id = parse_board_id(board_id)?;
        self.boards
            .delete_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))?;
        info!(board_id = %id, "board deleted");
        Ok(())
    }

    async fn add_section(&self, request: SectionRequest) -> Result<Vec<Section>, Error> {
        let id = parse_board_id(&request.board_id)?;
        let title = parse_title(request.title)?;
        let section = Section::new(SectionId::allocate(self.ids.as_ref()), title);

        let board = self
            .boards
            .append_section(&id, &section)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))?;
        info!(board_id = %id, section_id = %section.id(), "section added");
        Ok(board.into_sections())
    }

    async fn add_user_board_section(
        &self,
        request: UserBoardSectionRequest,
    ) -> Result<Vec<Section>, Error> {
        let UserBoardSectionRequest {
            username,
            board_name,
            title,
        } = request;
        let creator = self.require_user(&username).await?;
        let Ok(name) = BoardName::new(board_name) else {
            return Err(Error::not_found(BOARD_NOT_FOUND));
        };
        let title = parse_title(title)?;
        let section = Section::new(SectionId::allocate(self.ids.as_ref()), title);

        let board = self
            .boards
            .append_section_by_name(&creator, &name, &section)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))?;
        info!(board_id = %board.id(), section_id = %section.id(), "section added");
        Ok(board.into_sections())
    }

    async fn remove_section(&self, request: SectionRequest) -> Result<(), Error> {
        let id = parse_board_id(&request.board_id)?;
        let title = parse_title(request.title)?;

        let modified = self
            .boards
            .remove_section_by_title(&id, &title)
            .await
            .map_err(map_repository_error)?;
        if modified == 0 {
            return Err(Error::not_found(SECTION_NOT_FOUND));
        }
        info!(board_id = %id, title = %title, "section removed");
        Ok(())
    }

    async fn add_ticket(&self, request: AddTicketRequest) -> Result<Vec<Ticket>, Error> {
        let AddTicketRequest {
            board_id,
            section_title,
            ticket,
        } = request;
        let id = parse_board_id(&board_id)?;
        let title = parse_title(section_title)?;
        let ticket = Ticket::from_draft(TicketId::allocate(self.ids.as_ref()), ticket);

        let board = self
            .boards
            .append_ticket_to_section(&id, &title, &ticket)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))?;
        let section = board
            .section(&title)
            .ok_or_else(|| Error::not_found(SECTION_NOT_FOUND))?;
        info!(board_id = %id, ticket_id = %ticket.id, "ticket added");
        Ok(section.tickets().to_vec())
    }

    async fn remove_ticket(&self, request: RemoveTicketRequest) -> Result<(), Error> {
        let id = parse_board_id(&request.board_id)?;
        let ticket_id = parse_ticket_id(&request.ticket_id)?;
        let title = parse_title(request.section_title)?;

        let modified = self
            .boards
            .remove_ticket_from_section(&id, &title, &ticket_id)
            .await
            .map_err(map_repository_error)?;
        if modified == 0 {
            return Err(Error::not_found(TICKET_NOT_FOUND));
        }
        info!(board_id = %id, ticket_id = %ticket_id, "ticket removed");
        Ok(())
    }
}

#[async_trait]
impl<B, U> BoardQuery for BoardService<B, U>
where
    B: BoardRepository,
    U: UserRepository,
{
    async fn get_board(&self, board_id: &str) -> Result<Board, Error> {
        let id = parse_board_id(board_id)?;
        self.boards
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))
    }

    async fn list_user_boards(&self, username: &str) -> Result<Vec<Board>, Error> {
        let creator = self.require_user(username).await?;
        self.boards
            .list_by_creator(&creator)
            .await
            .map_err(map_repository_error)
    }

    async fn find_user_board(&self, username: &str, name: &str) -> Result<Board, Error> {
        let creator = self.require_user(username).await?;
        let Ok(name) = BoardName::new(name) else {
            return Err(Error::not_found(BOARD_NOT_FOUND));
        };
        self.boards
            .find_by_creator_and_name(&creator, &name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(BOARD_NOT_FOUND))
    }
}

#[cfg(test)]
#[path = "board_service_tests.rs"]
mod tests;
