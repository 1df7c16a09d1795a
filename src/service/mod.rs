pub mod bootstrap;
pub mod credential_store;
pub mod password;
pub mod username;

pub use credential_store::CredentialStore;
