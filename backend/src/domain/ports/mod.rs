//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`BoardCommand`, `BoardQuery`, `UserDirectory`) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod board_command;
mod board_query;
mod board_repository;
mod user_directory;
mod user_repository;

pub use board_command::{
    AddTicketRequest, BoardCommand, RemoveTicketRequest, ReplaceBoardRequest, SectionRequest,
    UserBoardSectionRequest,
};
pub use board_query::BoardQuery;
#[cfg(test)]
pub use board_repository::MockBoardRepository;
pub use board_repository::{BoardRepository, BoardRepositoryError};
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
