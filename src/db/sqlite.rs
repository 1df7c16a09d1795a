use crate::db::models::{DbUser, NewUser, UserId};
use crate::db::schema::SQLITE_INIT;
use crate::error::StorageError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Access to the `users` table.
///
/// Holds no open handle: every operation connects, runs its statements and
/// closes the connection before returning. Error paths drop the connection,
/// which releases it as well.
#[derive(Clone, Debug)]
pub struct UsersStorage {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl UsersStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, StorageError> {
        self.options
            .connect()
            .await
            .map_err(|source| StorageError::Unavailable {
                path: self.path.clone(),
                source,
            })
    }

    /// Create the table and unique index if missing.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let mut result = Ok(());
        // execute statements one by one (sqlx::query runs a single statement)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            if let Err(e) = sqlx::query(s).execute(&mut conn).await {
                result = Err(e);
                break;
            }
        }
        release(conn).await;
        result.map_err(|source| StorageError::Unavailable {
            path: self.path.clone(),
            source,
        })
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let mut conn = self.connect().await?;
        let res = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut conn)
            .await;
        release(conn).await;
        Ok(res?)
    }

    /// Insert a user. Returns `None` when `username_key` is already taken.
    ///
    /// The unique index decides: of two racing inserts for the same key exactly one gets an id.
    pub async fn insert(&self, user: &NewUser) -> Result<Option<UserId>, StorageError> {
        let mut conn = self.connect().await?;
        let res = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, username_key, salt, hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(username_key) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.username_key)
        .bind(user.credential.salt.to_vec())
        .bind(user.credential.hash.to_vec())
        .bind(user.created_at)
        .fetch_optional(&mut conn)
        .await;
        release(conn).await;
        Ok(res?)
    }

    /// Insert a user only if the table holds no rows at all.
    /// Returns `None` when the table was not empty.
    pub async fn insert_if_empty(&self, user: &NewUser) -> Result<Option<UserId>, StorageError> {
        let mut conn = self.connect().await?;
        let res = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, username_key, salt, hash, created_at)
            SELECT ?, ?, ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM users)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.username_key)
        .bind(user.credential.salt.to_vec())
        .bind(user.credential.hash.to_vec())
        .bind(user.created_at)
        .fetch_optional(&mut conn)
        .await;
        release(conn).await;
        Ok(res?)
    }

    pub async fn find_by_key(&self, username_key: &str) -> Result<Option<DbUser>, StorageError> {
        let mut conn = self.connect().await?;
        let res = sqlx::query_as::<_, DbUser>(
            r#"SELECT id, username, username_key, salt, hash, created_at
               FROM users WHERE username_key = ?"#,
        )
        .bind(username_key)
        .fetch_optional(&mut conn)
        .await;
        release(conn).await;
        Ok(res?)
    }

    /// All usernames as registered, oldest first.
    pub async fn list_usernames(&self) -> Result<Vec<String>, StorageError> {
        let mut conn = self.connect().await?;
        let res = sqlx::query_scalar::<_, String>("SELECT username FROM users ORDER BY id")
            .fetch_all(&mut conn)
            .await;
        release(conn).await;
        Ok(res?)
    }
}

async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "closing sqlite connection failed");
    }
}
