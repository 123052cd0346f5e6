//! Integration tests for the Diesel board and user repositories.
//!
//! These run against the PostgreSQL database named by
//! `BOARDS_TEST_DATABASE_URL`, applying the embedded migrations first. When the
//! variable is unset the tests print a notice and return early. Every board
//! uses a freshly generated creator so runs do not interfere with each other.

use std::sync::Arc;

use futures::future::join_all;
use kanban_backend::domain::ports::{
    BoardRepository, BoardRepositoryError, UserRepository, UserRepositoryError,
};
use kanban_backend::domain::{
    Board, BoardDraft, BoardName, IdentifierAllocator, RandomIdentifierAllocator, Section,
    SectionDraft, SectionId, SectionTitle, Ticket, TicketDraft, TicketId, User, UserId, Username,
};
use kanban_backend::outbound::persistence::{
    DbPool, DieselBoardRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use uuid::Uuid;

const DATABASE_URL_VAR: &str = "BOARDS_TEST_DATABASE_URL";

async fn pool() -> Option<DbPool> {
    let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
        eprintln!("SKIP-TEST-CLUSTER: {DATABASE_URL_VAR} is not set");
        return None;
    };
    run_pending_migrations(&url)
        .await
        .expect("migrations apply");
    Some(
        DbPool::new(PoolConfig::new(url).with_max_size(4))
            .await
            .expect("pool builds"),
    )
}

fn unique_creator() -> String {
    format!("user-{}", Uuid::new_v4().simple())
}

fn draft(creator: &str) -> BoardDraft {
    BoardDraft {
        name: "Sprint1".to_owned(),
        creator: creator.to_owned(),
        sections: vec![SectionDraft {
            id: None,
            title: "Todo".to_owned(),
            tickets: vec![TicketDraft {
                name: "write docs".to_owned(),
                priority: "high".to_owned(),
                ..TicketDraft::default()
            }],
        }],
        completed: Vec::new(),
    }
}

fn title(raw: &str) -> SectionTitle {
    SectionTitle::new(raw).expect("valid title")
}

#[tokio::test]
async fn insert_then_find_round_trips_nested_documents() {
    let Some(pool) = pool().await else { return };
    let repo = DieselBoardRepository::new(pool);
    let ids = RandomIdentifierAllocator;
    let creator = unique_creator();
    let board = Board::create(draft(&creator), &ids).expect("valid board");

    repo.insert(&board).await.expect("insert");
    let found = repo
        .find_by_id(board.id())
        .await
        .expect("find")
        .expect("board exists");
    let by_name = repo
        .find_by_creator_and_name(
            board.creator(),
            &BoardName::new("Sprint1").expect("valid name"),
        )
        .await
        .expect("find by name");

    assert_eq!(found, board);
    assert_eq!(by_name, Some(board.clone()));
    assert_eq!(
        repo.list_by_creator(board.creator()).await.expect("list"),
        vec![board]
    );
}

#[tokio::test]
async fn duplicate_name_for_same_creator_is_rejected() {
    let Some(pool) = pool().await else { return };
    let repo = DieselBoardRepository::new(pool);
    let ids = RandomIdentifierAllocator;
    let creator = unique_creator();
    repo.insert(&Board::create(draft(&creator), &ids).expect("board"))
        .await
        .expect("first insert");

    let err = repo
        .insert(&Board::create(draft(&creator), &ids).expect("board"))
        .await
        .expect_err("duplicate name");

    assert!(matches!(err, BoardRepositoryError::DuplicateName { .. }));
}

#[tokio::test]
async fn replace_checks_version_and_bumps_it() {
    let Some(pool) = pool().await else { return };
    let repo = DieselBoardRepository::new(pool);
    let ids = RandomIdentifierAllocator;
    let creator = unique_creator();
    let board = Board::create(draft(&creator), &ids).expect("board");
    repo.insert(&board).await.expect("insert");
    let renamed = Board::replacement(
        &board,
        BoardDraft {
            name: "Renamed".to_owned(),
            ..draft(&creator)
        },
        &ids,
    )
    .expect("replacement");

    let replaced = repo
        .replace(&renamed, 1)
        .await
        .expect("replace")
        .expect("board exists");
    let stale = repo.replace(&renamed, 1).await.expect_err("stale version");

    assert_eq!(replaced.version(), 2);
    assert_eq!(replaced.name().as_ref(), "Renamed");
    assert!(matches!(
        stale,
        BoardRepositoryError::VersionMismatch {
            expected: 1,
            actual: 2
        }
    ));
}

#[tokio::test]
async fn section_and_ticket_edits_apply_atomically() {
    let Some(pool) = pool().await else { return };
    let repo = DieselBoardRepository::new(pool);
    let ids = RandomIdentifierAllocator;
    let board = Board::create(draft(&unique_creator()), &ids).expect("board");
    repo.insert(&board).await.expect("insert");

    let backlog = Section::new(SectionId::allocate(&ids), title("Backlog"));
    let with_backlog = repo
        .append_section(board.id(), &backlog)
        .await
        .expect("append section")
        .expect("board exists");
    let duplicate = repo
        .append_section(
            board.id(),
            &Section::new(SectionId::allocate(&ids), title("Backlog")),
        )
        .await
        .expect_err("duplicate title");

    let ticket = Ticket::from_draft(
        TicketId::allocate(&ids),
        TicketDraft {
            name: "review".to_owned(),
            ..TicketDraft::default()
        },
    );
    let with_ticket = repo
        .append_ticket_to_section(board.id(), &title("Backlog"), &ticket)
        .await
        .expect("append ticket")
        .expect("board exists");
    let missing_section = repo
        .append_ticket_to_section(board.id(), &title("Nope"), &ticket)
        .await
        .expect("append to missing section")
        .expect("board exists");
    let removed_ticket = repo
        .remove_ticket_from_section(board.id(), &title("Backlog"), &ticket.id)
        .await
        .expect("remove ticket");
    let removed_again = repo
        .remove_ticket_from_section(board.id(), &title("Backlog"), &ticket.id)
        .await
        .expect("remove ticket again");
    let removed_section = repo
        .remove_section_by_title(board.id(), &title("Backlog"))
        .await
        .expect("remove section");

    assert_eq!(with_backlog.sections().len(), 2);
    assert_eq!(with_backlog.version(), 2);
    assert!(matches!(
        duplicate,
        BoardRepositoryError::DuplicateSectionTitle { .. }
    ));
    assert_eq!(
        with_ticket
            .section(&title("Backlog"))
            .map(|section| section.tickets().to_vec()),
        Some(vec![ticket])
    );
    assert_eq!(missing_section.version(), with_ticket.version());
    assert_eq!(removed_ticket, 1);
    assert_eq!(removed_again, 0);
    assert_eq!(removed_section, 1);
}

#[tokio::test]
async fn section_append_by_name_selects_the_creators_board() {
    let Some(pool) = pool().await else { return };
    let repo = DieselBoardRepository::new(pool);
    let ids = RandomIdentifierAllocator;
    let board = Board::create(draft(&unique_creator()), &ids).expect("board");
    repo.insert(&board).await.expect("insert");
    let name = BoardName::new("Sprint1").expect("valid name");
    let stranger = Username::new(unique_creator()).expect("username");

    let updated = repo
        .append_section_by_name(
            board.creator(),
            &name,
            &Section::new(SectionId::allocate(&ids), title("Review")),
        )
        .await
        .expect("append section")
        .expect("board exists");
    let duplicate = repo
        .append_section_by_name(
            board.creator(),
            &name,
            &Section::new(SectionId::allocate(&ids), title("Review")),
        )
        .await
        .expect_err("duplicate title");
    let missing = repo
        .append_section_by_name(
            &stranger,
            &name,
            &Section::new(SectionId::allocate(&ids), title("Review")),
        )
        .await
        .expect("append for unknown creator");

    assert_eq!(updated.id(), board.id());
    assert_eq!(updated.version(), 2);
    assert!(updated.section(&title("Review")).is_some());
    assert!(matches!(
        duplicate,
        BoardRepositoryError::DuplicateSectionTitle { .. }
    ));
    assert!(missing.is_none());
}

#[tokio::test]
async fn concurrent_section_appends_are_not_lost() {
    let Some(pool) = pool().await else { return };
    let repo = Arc::new(DieselBoardRepository::new(pool));
    let ids = RandomIdentifierAllocator;
    let board = Board::create(draft(&unique_creator()), &ids).expect("board");
    repo.insert(&board).await.expect("insert");

    let sections: Vec<Section> = (0..8)
        .map(|n| Section::new(SectionId::allocate(&ids), title(&format!("Lane {n}"))))
        .collect();
    let results = join_all(sections.iter().map(|section| {
        let repo = Arc::clone(&repo);
        let id = *board.id();
        async move { repo.append_section(&id, section).await }
    }))
    .await;
    assert!(results.iter().all(|result| matches!(result, Ok(Some(_)))));

    let stored = repo
        .find_by_id(board.id())
        .await
        .expect("find")
        .expect("board exists");
    assert_eq!(stored.sections().len(), 1 + sections.len());
    assert_eq!(stored.version(), 1 + sections.len() as u64);
}

#[tokio::test]
async fn delete_returns_the_removed_board_once() {
    let Some(pool) = pool().await else { return };
    let repo = DieselBoardRepository::new(pool);
    let board = Board::create(draft(&unique_creator()), &RandomIdentifierAllocator).expect("board");
    repo.insert(&board).await.expect("insert");

    let first = repo.delete_by_id(board.id()).await.expect("delete");
    let second = repo.delete_by_id(board.id()).await.expect("delete again");

    assert_eq!(first.map(|deleted| *deleted.id()), Some(*board.id()));
    assert!(second.is_none());
}

#[tokio::test]
async fn usernames_are_unique() {
    let Some(pool) = pool().await else { return };
    let repo = DieselUserRepository::new(pool);
    let ids = RandomIdentifierAllocator;
    let username = Username::new(unique_creator()).expect("username");

    let user = User::new(UserId::from_uuid(ids.allocate()), username.clone());
    repo.insert(&user).await.expect("insert");
    let err = repo
        .insert(&User::new(UserId::from_uuid(ids.allocate()), username.clone()))
        .await
        .expect_err("duplicate username");

    assert!(matches!(err, UserRepositoryError::DuplicateUsername { .. }));
    assert_eq!(
        repo.find_by_username(&username).await.expect("find"),
        Some(user)
    );
}
