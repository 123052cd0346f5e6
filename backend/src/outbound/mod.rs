//! Outbound adapters implementing domain ports for storage.
//!
//! - **memory**: process-local repositories guarded by a mutex, used when no
//!   database is configured and in tests.
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic beyond applying each
//! port operation atomically.

pub mod memory;
pub mod persistence;
