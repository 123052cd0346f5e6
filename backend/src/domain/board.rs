//! Board aggregate: boards own ordered sections, sections own tickets, and a
//! separate completed list archives tickets outside any section.
//!
//! Boards are built from drafts. Drafts carry whatever identifiers the client
//! sent; [`Board::create`] discards them and stamps fresh ones everywhere,
//! while [`Board::replacement`] keeps only those already issued to the board
//! being replaced.
//!
//! ## Invariants
//! - Board names and section titles are non-blank.
//! - Section titles are unique within a board.
//! - Every identifier in one board (board, sections, tickets) is distinct.
//! - `version` increases by one with every successful mutation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identifier::parse_canonical;
use crate::domain::{BoardId, IdentifierAllocator, SectionId, TicketId, Username};

/// Version assigned to newly created boards.
pub const INITIAL_BOARD_VERSION: u64 = 1;

/// Validation errors raised while building or mutating a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardValidationError {
    #[error("board name must not be empty")]
    EmptyName,
    #[error("board creator must not be empty")]
    EmptyCreator,
    #[error("section title must not be empty")]
    EmptySectionTitle,
    #[error("section title {title} appears more than once")]
    DuplicateSectionTitle { title: String },
}

macro_rules! define_label {
    ($(#[$meta:meta])* $name:ident => $empty:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate a label, rejecting blank input.
            ///
            /// # Errors
            /// Returns a [`BoardValidationError`] when the value is blank.
            pub fn new(raw: impl Into<String>) -> Result<Self, BoardValidationError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err($empty);
                }
                Ok(Self(raw))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = BoardValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_label! {
    /// Board name, unique per creator.
    BoardName => BoardValidationError::EmptyName
}

define_label! {
    /// Section title, unique per board.
    SectionTitle => BoardValidationError::EmptySectionTitle
}

/// Unvalidated ticket as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub id: Option<String>,
    pub name: String,
    pub priority: String,
    pub body: String,
    pub done: bool,
}

/// Unvalidated section as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDraft {
    pub id: Option<String>,
    pub title: String,
    pub tickets: Vec<TicketDraft>,
}

/// Unvalidated board document as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardDraft {
    pub name: String,
    pub creator: String,
    pub sections: Vec<SectionDraft>,
    pub completed: Vec<TicketDraft>,
}

/// A unit of work on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub done: bool,
}

impl Ticket {
    /// Build a ticket from a draft, ignoring any identifier the draft carries.
    #[must_use]
    pub fn from_draft(id: TicketId, draft: TicketDraft) -> Self {
        let TicketDraft {
            id: _,
            name,
            priority,
            body,
            done,
        } = draft;
        Self {
            id,
            name,
            priority,
            body,
            done,
        }
    }
}

/// Named column of tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,
    title: SectionTitle,
    #[serde(default)]
    tickets: Vec<Ticket>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(id: SectionId, title: SectionTitle) -> Self {
        Self {
            id,
            title,
            tickets: Vec::new(),
        }
    }

    /// Section identifier.
    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Section title.
    #[must_use]
    pub fn title(&self) -> &SectionTitle {
        &self.title
    }

    /// Tickets in insertion order.
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }
}

/// Stored components of a board, used by adapters to rehydrate it.
#[derive(Debug, Clone)]
pub struct BoardParts {
    pub id: BoardId,
    pub name: String,
    pub creator: String,
    pub version: u64,
    pub sections: Vec<Section>,
    pub completed: Vec<Ticket>,
}

/// Board aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    id: BoardId,
    name: BoardName,
    creator: Username,
    version: u64,
    sections: Vec<Section>,
    completed: Vec<Ticket>,
}

/// Hands out identifiers for one board document, never repeating a value.
///
/// Supplied identifiers survive only when they appear in `known_sections` or
/// `known_tickets`, the identifiers already issued to the stored board.
struct IdentifierStamp<'a> {
    allocator: &'a dyn IdentifierAllocator,
    issued: HashSet<Uuid>,
    known_sections: HashSet<Uuid>,
    known_tickets: HashSet<Uuid>,
}

impl<'a> IdentifierStamp<'a> {
    fn new(allocator: &'a dyn IdentifierAllocator) -> Self {
        Self {
            allocator,
            issued: HashSet::new(),
            known_sections: HashSet::new(),
            known_tickets: HashSet::new(),
        }
    }

    fn with_known(allocator: &'a dyn IdentifierAllocator, current: &Board) -> Self {
        let mut stamp = Self::new(allocator);
        stamp.issued.insert(*current.id.as_uuid());
        for section in &current.sections {
            stamp.known_sections.insert(*section.id.as_uuid());
            stamp
                .known_tickets
                .extend(section.tickets.iter().map(|ticket| *ticket.id.as_uuid()));
        }
        stamp
            .known_tickets
            .extend(current.completed.iter().map(|ticket| *ticket.id.as_uuid()));
        stamp
    }

    fn fresh(&mut self) -> Uuid {
        loop {
            let candidate = self.allocator.allocate();
            let reserved = self.known_sections.contains(&candidate)
                || self.known_tickets.contains(&candidate);
            if !reserved && self.issued.insert(candidate) {
                return candidate;
            }
        }
    }

    fn keep_or_fresh(&mut self, supplied: Option<&str>, known_tickets: bool) -> Uuid {
        let known = if known_tickets {
            &self.known_tickets
        } else {
            &self.known_sections
        };
        let kept = supplied
            .and_then(parse_canonical)
            .filter(|uuid| known.contains(uuid));
        match kept {
            Some(uuid) if self.issued.insert(uuid) => uuid,
            _ => self.fresh(),
        }
    }

    fn section_id(&mut self, supplied: Option<&str>) -> SectionId {
        SectionId::from_uuid(self.keep_or_fresh(supplied, false))
    }

    fn tickets(&mut self, drafts: Vec<TicketDraft>) -> Vec<Ticket> {
        drafts
            .into_iter()
            .map(|draft| {
                let id = TicketId::from_uuid(self.keep_or_fresh(draft.id.as_deref(), true));
                Ticket::from_draft(id, draft)
            })
            .collect()
    }
}

fn ensure_unique_titles<'t>(
    titles: impl IntoIterator<Item = &'t str>,
) -> Result<(), BoardValidationError> {
    let mut seen = HashSet::new();
    for title in titles {
        if !seen.insert(title) {
            return Err(BoardValidationError::DuplicateSectionTitle {
                title: title.to_owned(),
            });
        }
    }
    Ok(())
}

impl Board {
    /// Build a new board, stamping fresh identifiers on the board and on every
    /// nested section and ticket.
    ///
    /// # Errors
    /// Returns [`BoardValidationError`] when the name, creator, or any section
    /// title is blank, or when section titles repeat.
    pub fn create(
        draft: BoardDraft,
        allocator: &dyn IdentifierAllocator,
    ) -> Result<Self, BoardValidationError> {
        let mut stamp = IdentifierStamp::new(allocator);
        let id = BoardId::from_uuid(stamp.fresh());
        Self::assemble(id, INITIAL_BOARD_VERSION, draft, &mut stamp)
    }

    /// Build the document that replaces `current`.
    ///
    /// The board id and version come from `current`. A nested identifier is
    /// kept only when `current` already holds a section (or ticket) with that
    /// identifier and the draft uses it once; everything else is re-stamped.
    /// Storing the result must be guarded by `current.version()` so the kept
    /// identifiers are checked against the exact document being replaced.
    ///
    /// # Errors
    /// Returns [`BoardValidationError`] under the same rules as
    /// [`Board::create`].
    pub fn replacement(
        current: &Self,
        draft: BoardDraft,
        allocator: &dyn IdentifierAllocator,
    ) -> Result<Self, BoardValidationError> {
        let mut stamp = IdentifierStamp::with_known(allocator, current);
        Self::assemble(current.id, current.version, draft, &mut stamp)
    }

    fn assemble(
        id: BoardId,
        version: u64,
        draft: BoardDraft,
        stamp: &mut IdentifierStamp<'_>,
    ) -> Result<Self, BoardValidationError> {
        let BoardDraft {
            name,
            creator,
            sections,
            completed,
        } = draft;
        let name = BoardName::new(name)?;
        let creator = Username::new(creator).map_err(|_| BoardValidationError::EmptyCreator)?;
        ensure_unique_titles(sections.iter().map(|section| section.title.as_str()))?;

        let mut built = Vec::with_capacity(sections.len());
        for section in sections {
            let title = SectionTitle::new(section.title)?;
            let section_id = stamp.section_id(section.id.as_deref());
            let tickets = stamp.tickets(section.tickets);
            built.push(Section {
                id: section_id,
                title,
                tickets,
            });
        }
        let completed = stamp.tickets(completed);

        Ok(Self {
            id,
            name,
            creator,
            version,
            sections: built,
            completed,
        })
    }

    /// Rehydrate a stored board.
    ///
    /// # Errors
    /// Returns [`BoardValidationError`] when stored data violates the board
    /// invariants.
    pub fn from_parts(parts: BoardParts) -> Result<Self, BoardValidationError> {
        let BoardParts {
            id,
            name,
            creator,
            version,
            sections,
            completed,
        } = parts;
        ensure_unique_titles(sections.iter().map(|section| section.title.as_ref()))?;
        Ok(Self {
            id,
            name: BoardName::new(name)?,
            creator: Username::new(creator).map_err(|_| BoardValidationError::EmptyCreator)?,
            version,
            sections,
            completed,
        })
    }

    /// Board identifier.
    #[must_use]
    pub fn id(&self) -> &BoardId {
        &self.id
    }

    /// Board name.
    #[must_use]
    pub fn name(&self) -> &BoardName {
        &self.name
    }

    /// Owning user's normalised username.
    #[must_use]
    pub fn creator(&self) -> &Username {
        &self.creator
    }

    /// Optimistic concurrency version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sections in insertion order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Completed tickets in insertion order.
    #[must_use]
    pub fn completed(&self) -> &[Ticket] {
        &self.completed
    }

    /// Look up a section by exact title.
    #[must_use]
    pub fn section(&self, title: &SectionTitle) -> Option<&Section> {
        self.sections.iter().find(|section| &section.title == title)
    }

    /// Consume the board, returning its sections.
    #[must_use]
    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// Overwrite the stored version.
    #[must_use]
    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// Append a section at the end of the board.
    ///
    /// # Errors
    /// Returns [`BoardValidationError::DuplicateSectionTitle`] when a section
    /// with the same title already exists.
    pub fn append_section(&mut self, section: Section) -> Result<(), BoardValidationError> {
        if self.section(&section.title).is_some() {
            return Err(BoardValidationError::DuplicateSectionTitle {
                title: section.title.into(),
            });
        }
        self.sections.push(section);
        self.touch();
        Ok(())
    }

    /// Remove the section titled `title`. Returns whether anything changed.
    pub fn remove_section(&mut self, title: &SectionTitle) -> bool {
        let before = self.sections.len();
        self.sections.retain(|section| &section.title != title);
        let removed = self.sections.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Append a ticket to the section titled `title`. Returns whether the
    /// section exists.
    pub fn append_ticket(&mut self, title: &SectionTitle, ticket: Ticket) -> bool {
        let Some(section) = self
            .sections
            .iter_mut()
            .find(|section| &section.title == title)
        else {
            return false;
        };
        section.tickets.push(ticket);
        self.touch();
        true
    }

    /// Remove a ticket from the section titled `title`. Returns whether a
    /// ticket was removed.
    pub fn remove_ticket(&mut self, title: &SectionTitle, ticket_id: &TicketId) -> bool {
        let Some(section) = self
            .sections
            .iter_mut()
            .find(|section| &section.title == title)
        else {
            return false;
        };
        let before = section.tickets.len();
        section.tickets.retain(|ticket| &ticket.id != ticket_id);
        let removed = section.tickets.len() != before;
        if removed {
            self.touch();
        }
        removed
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
