use crate::error::StorageError;
use crate::service::password::Credential;
use crate::service::username::Username;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub type UserId = i64;

/// Row of the `users` table as stored.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: UserId,
    pub username: String,
    pub username_key: String,
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// A user whose stored verifier has been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub credential: Credential,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for UserRecord {
    type Error = StorageError;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        let credential =
            Credential::from_parts(&row.salt, &row.hash).map_err(|reason| {
                StorageError::CorruptRecord {
                    id: row.id,
                    reason: reason.to_string(),
                }
            })?;
        Ok(Self {
            id: row.id,
            username: row.username,
            credential,
            created_at: row.created_at,
        })
    }
}

/// Values bound into an INSERT.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub username_key: String,
    pub credential: Credential,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: Username, credential: Credential) -> Self {
        let (username, username_key) = username.into_parts();
        Self {
            username,
            username_key,
            credential,
            created_at: Utc::now(),
        }
    }
}
