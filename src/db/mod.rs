//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: `UsersStorage`, one connection per operation

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbUser, NewUser, UserId, UserRecord};
pub use schema::SQLITE_INIT;
pub use sqlite::UsersStorage;
