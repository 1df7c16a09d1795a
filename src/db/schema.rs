//! SQL DDL for initializing the credential storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, so ids are never handed out twice
/// - `username` as typed, `username_key` its lowercase form carrying the UNIQUE constraint
/// - `salt`/`hash` BLOBs holding the Argon2id verifier
/// - `created_at` TEXT (RFC3339)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    username_key TEXT NOT NULL,
    salt BLOB NOT NULL,
    hash BLOB NOT NULL,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username_key ON users(username_key);
"#;
