//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`, and every database error is mapped onto the port's error
//! type.
//!
//! # Example
//!
//! ```no_run
//! use kanban_backend::outbound::persistence::{
//!     DbPool, DieselBoardRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://boards@localhost/boards";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let boards = DieselBoardRepository::new(pool);
//! # let _ = boards;
//! # Ok(())
//! # }
//! ```

mod diesel_board_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_board_repository::DieselBoardRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
