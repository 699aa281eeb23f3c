//! Database schema and migrations for filehub.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,           -- Argon2id PHC string
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
    deleted_at  TEXT
);

CREATE INDEX idx_users_deleted_at ON users(deleted_at);
"#,
    // v2: file metadata; bytes live on disk under storage_path
    r#"
CREATE TABLE files (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name     TEXT NOT NULL,
    size          INTEGER NOT NULL,
    mime_type     TEXT NOT NULL,
    storage_path  TEXT NOT NULL,
    owner_id      INTEGER NOT NULL REFERENCES users(id),
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at    TEXT NOT NULL DEFAULT (datetime('now')),
    deleted_at    TEXT
);

CREATE INDEX idx_files_owner_id ON files(owner_id);
CREATE UNIQUE INDEX idx_files_storage_path_live ON files(storage_path) WHERE deleted_at IS NULL;
"#,
];
