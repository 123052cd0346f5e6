//! In-memory repository adapters.
//!
//! Each adapter keeps its documents behind one `std::sync::Mutex` and applies
//! every port operation while holding the lock, so concurrent callers observe
//! each mutation in full or not at all. No lock is ever held across an
//! `.await`.

mod board_repository;
mod user_repository;

pub use board_repository::InMemoryBoardRepository;
pub use user_repository::InMemoryUserRepository;

const POISONED: &str = "in-memory store lock poisoned";
