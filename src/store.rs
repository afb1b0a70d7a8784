use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::{Account, SessionUser};

const USERS_KEY: &str = "users";
const SESSION_KEY: &str = "user";
const DARK_MODE_KEY: &str = "darkMode";
const PROBE_KEY: &str = ".probe";

/// File-per-key string store under a data directory.
///
/// Mirrors the browser localStorage contract: string values, whole-value
/// overwrites, last write wins. No locking; two concurrent writers race.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.key_path(key), value)
            .with_context(|| format!("Failed to write key '{}'", key))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove key '{}'", key)),
        }
    }
}

/// Durable account table plus the persisted session projection.
///
/// There is no partial-update API: every mutation reads the full table,
/// modifies it in memory, and writes it back.
#[derive(Debug, Clone)]
pub struct AccountStore {
    store: LocalStore,
}

impl AccountStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(LocalStore::open(dir)?))
    }

    /// The full account table. An absent or malformed table is empty, not an
    /// error.
    pub fn list_accounts(&self) -> Vec<Account> {
        let Some(raw) = self.store.get(USERS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("Malformed account table, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        let raw = serde_json::to_string(accounts).context("Failed to serialize account table")?;
        self.store.set(USERS_KEY, &raw)
    }

    pub fn load_session(&self) -> Option<SessionUser> {
        let raw = self.store.get(SESSION_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save_session(&self, user: &SessionUser) -> Result<()> {
        let raw = serde_json::to_string(user).context("Failed to serialize session")?;
        self.store.set(SESSION_KEY, &raw)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.store.remove(SESSION_KEY)
    }

    pub fn dark_mode(&self) -> bool {
        self.store.get(DARK_MODE_KEY).as_deref() == Some("true")
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }

    pub fn avatar(&self, email: &str) -> Option<String> {
        self.store.get(&format!("userAvatar_{}", email))
    }

    pub fn set_avatar(&self, email: &str, data_uri: &str) -> Result<()> {
        self.store.set(&format!("userAvatar_{}", email), data_uri)
    }

    /// Round-trip a probe key to confirm the data directory accepts writes.
    pub fn probe(&self) -> Result<()> {
        self.store.set(PROBE_KEY, "ok")?;
        self.store.remove(PROBE_KEY)
    }
}
