//! JSON-file repository of user profiles keyed by username.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::UserProfile;
use crate::store::StoreError;

/// In-memory profile map backed by one pretty-printed JSON document.
///
/// The document maps username to profile. Every write replaces the whole file
/// through a temporary sibling and a rename, so an interrupted save leaves the
/// previous contents intact.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
    users: BTreeMap<String, UserProfile>,
}

impl UserStore {
    /// Opens the store at `path` and loads whatever it already holds.
    ///
    /// A missing or unreadable file yields an empty store.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            users: BTreeMap::new(),
        };
        store.load_all();
        store
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory map with the file contents.
    ///
    /// Read or parse failures are logged and leave the store empty.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load_all(&mut self) -> &BTreeMap<String, UserProfile> {
        self.users = match Self::read_file(&self.path) {
            Ok(Some(users)) => {
                info!(count = users.len(), "Users loaded");
                users
            }
            Ok(None) => {
                info!("No existing users file found, starting fresh");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(error = %e, "Users file unreadable, starting fresh");
                BTreeMap::new()
            }
        };
        &self.users
    }

    fn read_file(path: &Path) -> Result<Option<BTreeMap<String, UserProfile>>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let users = serde_json::from_str(&content)?;
        Ok(Some(users))
    }

    /// Registers a new player.
    ///
    /// Returns false for a blank name or a name already taken. Surrounding
    /// whitespace is trimmed before the name is used as the key.
    #[instrument(skip(self))]
    pub fn register(&mut self, username: &str) -> bool {
        let username = username.trim();
        if username.is_empty() {
            warn!("Rejected blank username");
            return false;
        }
        if self.users.contains_key(username) {
            warn!(username, "Username already registered");
            return false;
        }

        let profile = UserProfile::new(username.to_string());
        self.users.insert(username.to_string(), profile);
        info!(username, "User registered");
        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to persist new user");
        }
        true
    }

    /// Looks up a profile by username, trimmed the same way as [`Self::register`].
    #[instrument(skip(self))]
    pub fn login(&self, username: &str) -> Option<UserProfile> {
        let found = self.users.get(username.trim()).cloned();
        debug!(found = found.is_some(), "Login lookup");
        found
    }

    /// Whether the username is registered.
    pub fn user_exists(&self, username: &str) -> bool {
        self.users.contains_key(username.trim())
    }

    /// Upserts the profile and writes the store to disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written. The in-memory
    /// copy is updated regardless and goes out with the next save.
    #[instrument(skip(self, profile), fields(username = %profile.username()))]
    pub fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        self.users.insert(profile.username().clone(), profile.clone());
        self.flush()
    }

    /// All profiles, best score first, ties by username.
    #[instrument(skip(self))]
    pub fn all_users(&self) -> Vec<&UserProfile> {
        let mut users: Vec<&UserProfile> = self.users.values().collect();
        users.sort_by(|a, b| {
            b.best_score()
                .cmp(a.best_score())
                .then_with(|| a.username().cmp(b.username()))
        });
        users
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True when no user is registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    #[instrument(skip(self), fields(path = %self.path.display(), count = self.users.len()))]
    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.users)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        if let Err(e) = Self::write_and_replace(&tmp_path, &self.path, json.as_bytes()) {
            if tmp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp_path) {
                    warn!(error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(e);
        }

        debug!("Users file written");
        Ok(())
    }

    fn write_and_replace(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut tmp_file = File::create(tmp_path).map_err(|e| {
            StoreError::new(format!(
                "Failed to create temp file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;
        tmp_file.write_all(bytes)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(tmp_path, path).map_err(|e| {
            StoreError::new(format!(
                "Failed to rename temp file '{}' to '{}': {}",
                tmp_path.display(),
                path.display(),
                e
            ))
        })
    }
}
