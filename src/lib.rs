pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod service;

pub use config::Config;
pub use error::{RegisterError, StorageError};
pub use service::CredentialStore;
