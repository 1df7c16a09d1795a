use crate::config::{BootstrapConfig, Config};
use crate::db::models::{NewUser, UserId, UserRecord};
use crate::db::sqlite::UsersStorage;
use crate::error::{RegisterError, StorageError};
use crate::service::bootstrap::ensure_bootstrap_user;
use crate::service::password::PasswordHasher;
use crate::service::username::Username;
use tracing::{debug, info};

/// Persistent set of users with unique usernames and salted password verifiers.
#[derive(Clone)]
pub struct CredentialStore {
    storage: UsersStorage,
    hasher: PasswordHasher,
    bootstrap: BootstrapConfig,
}

impl CredentialStore {
    pub fn new(cfg: &Config) -> Result<Self, StorageError> {
        Ok(Self::with_parts(
            UsersStorage::new(&cfg.basic.database_path),
            PasswordHasher::new(&cfg.hashing)?,
            cfg.bootstrap.clone(),
        ))
    }

    pub fn with_parts(
        storage: UsersStorage,
        hasher: PasswordHasher,
        bootstrap: BootstrapConfig,
    ) -> Self {
        Self {
            storage,
            hasher,
            bootstrap,
        }
    }

    /// Open or create the store, ensure the schema, and seed `admin` into an empty store.
    /// Safe to call on every startup.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        let path = self.storage.path().to_path_buf();
        self.storage.init_schema().await?;
        let seeded = ensure_bootstrap_user(&self.storage, &self.hasher, &self.bootstrap)
            .await
            .map_err(|e| match e {
                StorageError::Database(source) => StorageError::Unavailable {
                    path: path.clone(),
                    source,
                },
                other => other,
            })?;
        info!(
            path = %path.display(),
            seeded = seeded.is_some(),
            "Credential store initialized"
        );
        Ok(())
    }

    /// Add a user. The username is trimmed; uniqueness ignores case.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserId, RegisterError> {
        let username =
            Username::parse(username).ok_or(RegisterError::InvalidInput { field: "username" })?;
        if password.is_empty() {
            return Err(RegisterError::InvalidInput { field: "password" });
        }

        // uniqueness is enforced by the insert below; this only skips hashing for known names
        if self.storage.find_by_key(username.key()).await?.is_some() {
            debug!(username = username.as_str(), "Registration rejected; name taken");
            return Err(RegisterError::UsernameTaken(username.as_str().to_string()));
        }

        let credential = self.hasher.derive_blocking(password.to_string()).await?;
        let name = username.as_str().to_string();
        match self
            .storage
            .insert(&NewUser::new(username, credential))
            .await?
        {
            Some(id) => {
                info!(id, username = %name, "User registered");
                Ok(id)
            }
            None => {
                debug!(username = %name, "Registration lost insert race; name taken");
                Err(RegisterError::UsernameTaken(name))
            }
        }
    }

    /// `Ok(false)` both for an unknown user and for a wrong password; the two
    /// paths do the same hashing work.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, StorageError> {
        let row = match Username::parse(username) {
            Some(name) => self.storage.find_by_key(name.key()).await?,
            None => None,
        };
        let record = row.map(UserRecord::try_from).transpose()?;
        let ok = self
            .hasher
            .verify_blocking(
                password.to_string(),
                record.as_ref().map(|r| r.credential.clone()),
            )
            .await?;
        debug!(success = ok, "Login attempt");
        Ok(ok)
    }

    /// Usernames in registration order.
    pub async fn list_usernames(&self) -> Result<Vec<String>, StorageError> {
        self.storage.list_usernames().await
    }
}
