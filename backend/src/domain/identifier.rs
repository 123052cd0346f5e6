//! Opaque identifiers for users, boards, sections, and tickets.
//!
//! Identifiers travel as canonical lowercase hyphenated UUID strings. Inbound
//! values are checked with [`is_valid_id`] before any lookup; anything other
//! than the canonical form is rejected. Fresh identifiers come from an
//! [`IdentifierAllocator`] so tests can substitute a deterministic sequence.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the canonical hyphenated form.
const CANONICAL_LEN: usize = 36;

/// Returns `true` only for canonical lowercase hyphenated UUID strings.
///
/// # Examples
/// ```
/// use kanban_backend::domain::is_valid_id;
///
/// assert!(is_valid_id("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
/// assert!(!is_valid_id("not-an-id"));
/// assert!(!is_valid_id("3FA85F64-5717-4562-B3FC-2C963F66AFA6"));
/// ```
#[must_use]
pub fn is_valid_id(candidate: &str) -> bool {
    parse_canonical(candidate).is_some()
}

/// Parse a canonical identifier string.
pub(crate) fn parse_canonical(candidate: &str) -> Option<Uuid> {
    if candidate.len() != CANONICAL_LEN {
        return None;
    }
    let uuid = Uuid::try_parse(candidate).ok()?;
    let mut buffer = Uuid::encode_buffer();
    let canonical = uuid.hyphenated().encode_lower(&mut buffer);
    (&*canonical == candidate).then_some(uuid)
}

/// Raised when an identifier string is not in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a lowercase hyphenated UUID: {value}")]
pub struct IdentifierValidationError {
    value: String,
}

impl IdentifierValidationError {
    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Source of fresh identifiers.
pub trait IdentifierAllocator: Send + Sync {
    /// Produce an identifier never returned before by this allocator.
    fn allocate(&self) -> Uuid;
}

/// Allocator backed by random version 4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentifierAllocator;

impl IdentifierAllocator for RandomIdentifierAllocator {
    fn allocate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic allocator yielding `00000000-0000-0000-0000-000000000001`,
/// `...002`, and so on.
#[derive(Debug, Default)]
pub struct SequentialIdentifierAllocator {
    next: AtomicU64,
}

impl SequentialIdentifierAllocator {
    /// Start a sequence whose first identifier is `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start.saturating_sub(1)),
        }
    }
}

impl IdentifierAllocator for SequentialIdentifierAllocator {
    fn allocate(&self) -> Uuid {
        let value = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(value))
    }
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Draw a fresh identifier from `allocator`.
            #[must_use]
            pub fn allocate(allocator: &dyn IdentifierAllocator) -> Self {
                Self(allocator.allocate())
            }

            /// Parse a canonical identifier string.
            ///
            /// # Errors
            /// Returns [`IdentifierValidationError`] for any non-canonical input.
            pub fn parse(raw: &str) -> Result<Self, IdentifierValidationError> {
                parse_canonical(raw)
                    .map(Self)
                    .ok_or_else(|| IdentifierValidationError {
                        value: raw.to_owned(),
                    })
            }

            /// Access the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }
    };
}

define_identifier! {
    /// Stable user identifier.
    UserId
}

define_identifier! {
    /// Stable board identifier.
    BoardId
}

define_identifier! {
    /// Identifier of a section within a board.
    SectionId
}

define_identifier! {
    /// Identifier of a ticket within a section or the completed list.
    TicketId
}
