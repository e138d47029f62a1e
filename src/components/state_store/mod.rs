//! Durable key-value run state.
//!
//! The device loses all memory between refresh cycles, so the first-run
//! marker, the retry counter and the cached access token live in a small
//! persistent store. Writes must be committed before any power transition:
//! the cycle never hands out a power directive before its last `set`.

use crate::error::{state_store_error, CalResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Key of the first-run marker
pub const FIRST_RUN_KEY: &str = "first_run";

/// Value of the first-run marker once a cold start has completed
pub const FIRST_RUN_MARKER: &str = "updated";

/// Key of the consecutive-failure counter (decimal string)
pub const RETRY_KEY: &str = "retry_count";

/// Key of the cached calendar access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Durable key-to-string mapping that survives power loss
pub trait StateStore: Send {
    /// Read a value; absent keys yield `None`
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value and commit it durably before returning
    fn set(&mut self, key: &str, value: &str) -> CalResult<()>;
}

/// Snapshot of the persisted run state, read once at cycle start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub first_run_completed: bool,
    pub retry_count: u32,
    pub access_token: String,
}

impl RunState {
    /// Load the snapshot from the store, defaulting absent keys
    pub fn load(store: &dyn StateStore) -> Self {
        let first_run_completed =
            store.get(FIRST_RUN_KEY).as_deref() == Some(FIRST_RUN_MARKER);

        let retry_count = store
            .get(RETRY_KEY)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);

        let access_token = store.get(ACCESS_TOKEN_KEY).unwrap_or_default();

        Self {
            first_run_completed,
            retry_count,
            access_token,
        }
    }
}

/// File-backed store: a TOML table of strings, rewritten and flushed on
/// every `set`.
pub struct FileStateStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStateStore {
    /// Open the store, loading any existing state file
    pub fn open(path: impl AsRef<Path>) -> CalResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<BTreeMap<String, String>>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(state_store_error(&format!(
                    "Failed to read state file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self { path, entries })
    }

    fn commit(&self) -> CalResult<()> {
        let toml_str = toml::to_string(&self.entries)?;
        let mut file = fs::File::create(&self.path)?;
        file.write_all(toml_str.as_bytes())?;
        // A crash between write and sleep must not replay stale state
        file.sync_all()?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> CalResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.commit()
    }
}
