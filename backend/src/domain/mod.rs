//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed board model shared by the HTTP and
//! persistence layers, and the services that enforce its invariants. Keep
//! types free of transport concerns and document serialisation contracts in
//! each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Board (alias to `board::Board`) — board aggregate with sections and tickets.
//! - User (alias to `user::User`) — registered user identity.
//! - BoardService — engine behind the board driving ports.
//! - UserDirectoryService — engine behind the user driving port.

pub mod board;
pub mod board_service;
pub mod error;
pub mod identifier;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory;

pub use self::board::{
    Board, BoardDraft, BoardName, BoardParts, BoardValidationError, INITIAL_BOARD_VERSION,
    Section, SectionDraft, SectionTitle, Ticket, TicketDraft,
};
pub use self::board_service::{
    BOARD_MODIFIED, BOARD_NAME_EXISTS, BOARD_NOT_FOUND, BoardService, SECTION_NOT_FOUND,
    SECTION_TITLE_EXISTS, TICKET_NOT_FOUND,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identifier::{
    BoardId, IdentifierAllocator, IdentifierValidationError, RandomIdentifierAllocator,
    SectionId, SequentialIdentifierAllocator, TicketId, UserId, is_valid_id,
};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserValidationError, Username};
pub use self::user_directory::{
    USER_NOT_FOUND, USERNAME_IN_USE, USERNAME_REQUIRED, UserDirectoryService,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use kanban_backend::domain::{ApiResult, Board, Error};
///
/// fn lookup() -> ApiResult<Board> {
///     Err(Error::not_found("Board Not Found"))
/// }
/// # assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
