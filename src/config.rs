use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "CREDVAULT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const ENV_PREFIX: &str = "CREDVAULT_";

/// Password seeded for the bootstrap `admin` account.
/// Deployments must override it (`CREDVAULT_BOOTSTRAP__PASSWORD`) or change it after first login.
pub const DEFAULT_BOOTSTRAP_PASSWORD: &str = "password";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub bootstrap: BootstrapConfig,
    pub hashing: HashingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    /// SQLite file holding the `users` table; created if absent.
    pub database_path: PathBuf,
    pub loglevel: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("users.db"),
            loglevel: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            password: DEFAULT_BOOTSTRAP_PASSWORD.to_string(),
        }
    }
}

impl BootstrapConfig {
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_BOOTSTRAP_PASSWORD
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Config {
    /// Layer defaults, the optional TOML file and `CREDVAULT_*` environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Resolve the config file path from `CREDVAULT_CONFIG`, then load.
    pub fn from_env() -> Result<Self, figment::Error> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load(path)
    }
}
