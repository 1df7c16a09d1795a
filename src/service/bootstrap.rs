//! Default account seeding.

use crate::config::BootstrapConfig;
use crate::db::models::{NewUser, UserId};
use crate::db::sqlite::UsersStorage;
use crate::error::StorageError;
use crate::service::password::PasswordHasher;
use crate::service::username::Username;
use tracing::{debug, info, warn};

pub const BOOTSTRAP_USERNAME: &str = "admin";

/// Insert the `admin` account if the store holds no users at all.
///
/// Returns the new id, or `None` when the store already had users. The insert
/// itself is conditional on emptiness, so concurrent callers seed at most one row.
pub async fn ensure_bootstrap_user(
    storage: &UsersStorage,
    hasher: &PasswordHasher,
    config: &BootstrapConfig,
) -> Result<Option<UserId>, StorageError> {
    if storage.count().await? > 0 {
        debug!("Bootstrap user not needed; store already populated");
        return Ok(None);
    }

    let credential = hasher.derive_blocking(config.password.clone()).await?;
    let username = Username::from_static(BOOTSTRAP_USERNAME);
    let Some(id) = storage
        .insert_if_empty(&NewUser::new(username, credential))
        .await?
    else {
        debug!("Store populated concurrently; bootstrap skipped");
        return Ok(None);
    };

    info!(id, username = BOOTSTRAP_USERNAME, "Bootstrap user created");
    if config.uses_default_password() {
        warn!(
            username = BOOTSTRAP_USERNAME,
            "Bootstrap user has the default password; change it or set CREDVAULT_BOOTSTRAP__PASSWORD"
        );
    }
    Ok(Some(id))
}
