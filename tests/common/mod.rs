#![allow(dead_code)]

use credvault::config::{BootstrapConfig, HashingConfig};
use credvault::db::UsersStorage;
use credvault::service::password::PasswordHasher;
use credvault::CredentialStore;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const BOOTSTRAP_PASSWORD: &str = "bootstrap-pw";

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique sqlite path under the system temp dir; removed on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "credvault-{tag}-{}-{}-{}.sqlite",
            std::process::id(),
            nanos,
            SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        Self { path }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn cheap_hashing() -> HashingConfig {
    HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn store_at(path: &Path) -> CredentialStore {
    store_with_hashing(path, &cheap_hashing())
}

pub fn store_with_hashing(path: &Path, hashing: &HashingConfig) -> CredentialStore {
    CredentialStore::with_parts(
        UsersStorage::new(path),
        PasswordHasher::new(hashing).expect("valid hashing params"),
        BootstrapConfig {
            password: BOOTSTRAP_PASSWORD.to_string(),
        },
    )
}

pub async fn initialized_store(db: &TempDb) -> CredentialStore {
    let store = store_at(&db.path);
    store.initialize().await.expect("initialize failed");
    store
}
