//! Diesel row structs. Internal to the persistence adapters.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{boards, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
}

/// Insertable struct for registering users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
}

/// Row struct for reading board documents.
///
/// Also loadable by name so the raw JSONB updates can return it.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BoardRow {
    pub id: Uuid,
    pub name: String,
    pub creator: String,
    pub version: i64,
    pub sections: serde_json::Value,
    pub completed: serde_json::Value,
}

/// Insertable struct for creating board documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = boards)]
pub(crate) struct NewBoardRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub creator: &'a str,
    pub version: i64,
    pub sections: &'a serde_json::Value,
    pub completed: &'a serde_json::Value,
}

/// Changeset for whole-document replacement. The version is bumped
/// separately in SQL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = boards)]
pub(crate) struct BoardUpdate<'a> {
    pub name: &'a str,
    pub creator: &'a str,
    pub sections: &'a serde_json::Value,
    pub completed: &'a serde_json::Value,
}
