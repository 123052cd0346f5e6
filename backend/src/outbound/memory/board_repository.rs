//! Process-local `BoardRepository`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{BoardRepository, BoardRepositoryError};
use crate::domain::{
    Board, BoardId, BoardName, BoardValidationError, Section, SectionTitle, Ticket, TicketId,
    Username,
};

use super::POISONED;

fn map_validation_error(err: BoardValidationError) -> BoardRepositoryError {
    match err {
        BoardValidationError::DuplicateSectionTitle { title } => {
            BoardRepositoryError::duplicate_section_title(title)
        }
        other => BoardRepositoryError::query(other.to_string()),
    }
}

/// Board store keeping documents in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryBoardRepository {
    boards: Mutex<Vec<Board>>,
}

impl InMemoryBoardRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Board>>, BoardRepositoryError> {
        self.boards
            .lock()
            .map_err(|_| BoardRepositoryError::connection(POISONED))
    }

    /// Apply `mutate` to the first stored board matching `select` under the
    /// store lock.
    fn with_board_where<T>(
        &self,
        select: impl Fn(&Board) -> bool,
        mutate: impl FnOnce(&mut Board) -> Result<T, BoardRepositoryError>,
    ) -> Result<Option<T>, BoardRepositoryError> {
        let mut boards = self.lock()?;
        boards
            .iter_mut()
            .find(|board| select(board))
            .map(mutate)
            .transpose()
    }

    fn with_board<T>(
        &self,
        id: &BoardId,
        mutate: impl FnOnce(&mut Board) -> Result<T, BoardRepositoryError>,
    ) -> Result<Option<T>, BoardRepositoryError> {
        self.with_board_where(|board| board.id() == id, mutate)
    }
}

fn name_taken(boards: &[Board], candidate: &Board) -> bool {
    boards.iter().any(|existing| {
        existing.id() != candidate.id()
            && existing.creator() == candidate.creator()
            && existing.name() == candidate.name()
    })
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn insert(&self, board: &Board) -> Result<Board, BoardRepositoryError> {
        let mut boards = self.lock()?;
        if name_taken(&boards, board) {
            return Err(BoardRepositoryError::duplicate_name(
                board.creator().as_ref(),
                board.name().as_ref(),
            ));
        }
        boards.push(board.clone());
        Ok(board.clone())
    }

    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        let boards = self.lock()?;
        Ok(boards.iter().find(|board| board.id() == id).cloned())
    }

    async fn find_by_creator_and_name(
        &self,
        creator: &Username,
        name: &BoardName,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let boards = self.lock()?;
        Ok(boards
            .iter()
            .find(|board| board.creator() == creator && board.name() == name)
            .cloned())
    }

    async fn list_by_creator(
        &self,
        creator: &Username,
    ) -> Result<Vec<Board>, BoardRepositoryError> {
        let boards = self.lock()?;
        Ok(boards
            .iter()
            .filter(|board| board.creator() == creator)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        let mut boards = self.lock()?;
        Ok(boards
            .iter()
            .position(|board| board.id() == id)
            .map(|index| boards.remove(index)))
    }

    async fn replace(
        &self,
        board: &Board,
        expected_version: u64,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        let mut boards = self.lock()?;
        let Some(actual) = boards
            .iter()
            .find(|stored| stored.id() == board.id())
            .map(Board::version)
        else {
            return Ok(None);
        };
        if actual != expected_version {
            return Err(BoardRepositoryError::version_mismatch(
                expected_version,
                actual,
            ));
        }
        if name_taken(&boards, board) {
            return Err(BoardRepositoryError::duplicate_name(
                board.creator().as_ref(),
                board.name().as_ref(),
            ));
        }
        let replaced = board.clone().with_version(expected_version + 1);
        Ok(boards
            .iter_mut()
            .find(|stored| stored.id() == board.id())
            .map(|stored| {
                *stored = replaced.clone();
                replaced
            }))
    }

    async fn append_section(
        &self,
        id: &BoardId,
        section: &Section,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        self.with_board(id, |board| {
            board
                .append_section(section.clone())
                .map_err(map_validation_error)?;
            Ok(board.clone())
        })
    }

    async fn append_section_by_name(
        &self,
        creator: &Username,
        name: &BoardName,
        section: &Section,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        self.with_board_where(
            |board| board.creator() == creator && board.name() == name,
            |board| {
                board
                    .append_section(section.clone())
                    .map_err(map_validation_error)?;
                Ok(board.clone())
            },
        )
    }

    async fn remove_section_by_title(
        &self,
        id: &BoardId,
        title: &SectionTitle,
    ) -> Result<u64, BoardRepositoryError> {
        let removed = self.with_board(id, |board| Ok(board.remove_section(title)))?;
        Ok(u64::from(removed.unwrap_or(false)))
    }

    async fn append_ticket_to_section(
        &self,
        id: &BoardId,
        title: &SectionTitle,
        ticket: &Ticket,
    ) -> Result<Option<Board>, BoardRepositoryError> {
        self.with_board(id, |board| {
            board.append_ticket(title, ticket.clone());
            Ok(board.clone())
        })
    }

    async fn remove_ticket_from_section(
        &self,
        id: &BoardId,
        title: &SectionTitle,
        ticket_id: &TicketId,
    ) -> Result<u64, BoardRepositoryError> {
        let removed = self.with_board(id, |board| Ok(board.remove_ticket(title, ticket_id)))?;
        Ok(u64::from(removed.unwrap_or(false)))
    }
}
