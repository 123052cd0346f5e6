//! Diesel table definitions.
//!
//! Keep these in sync with `backend/migrations`.

diesel::table! {
    /// Registered users. `username` is stored lowercased and is unique.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Board documents.
    ///
    /// Sections and completed tickets are JSONB arrays so nested appends and
    /// removals run as single-row updates. `(creator, name)` is unique.
    boards (id) {
        id -> Uuid,
        name -> Varchar,
        creator -> Varchar,
        /// Optimistic concurrency version, bumped by every mutation.
        version -> Int8,
        sections -> Jsonb,
        completed -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, boards);
