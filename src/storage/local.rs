use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use strum_macros::Display;
use tracing::{debug, instrument, warn};

use super::errors::StorageError;
use crate::ranking::{now_millis, Match, Player};

/// Named records kept in the local durable store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LocalKey {
    #[strum(to_string = "padelPlayers")]
    Players,
    #[strum(to_string = "padelMatches")]
    Matches,
    #[strum(to_string = "lastSyncTimestamp")]
    LastSyncTimestamp,
    #[strum(to_string = "editModeEnabled")]
    EditModeEnabled,
}

/// Synchronous local tier holding full JSON snapshots of both collections.
///
/// Every snapshot write advances `lastSyncTimestamp`, which the periodic
/// reconciliation compares against the session's own marker.
pub trait LocalStore: Send + Sync {
    fn load_players(&self) -> Result<Vec<Player>, StorageError>;
    /// Persists the players snapshot and returns the new sync timestamp
    fn save_players(&self, players: &[Player]) -> Result<i64, StorageError>;
    fn load_matches(&self) -> Result<Vec<Match>, StorageError>;
    /// Persists the matches snapshot and returns the new sync timestamp
    fn save_matches(&self, matches: &[Match]) -> Result<i64, StorageError>;
    fn last_sync_timestamp(&self) -> Result<Option<i64>, StorageError>;
    fn edit_mode_enabled(&self) -> Result<bool, StorageError>;
    fn set_edit_mode_enabled(&self, enabled: bool) -> Result<(), StorageError>;
}

/// Raw string storage underneath a [`SnapshotStore`], in the manner of a
/// browser key-value store
pub trait SnapshotBackend: Send + Sync {
    fn read(&self, key: LocalKey) -> Result<Option<String>, StorageError>;
    fn write(&self, key: LocalKey, value: &str) -> Result<(), StorageError>;
}

/// [`LocalStore`] over any [`SnapshotBackend`]
pub struct SnapshotStore<B> {
    backend: B,
}

/// Process-local store for development and testing
pub type InMemoryLocalStore = SnapshotStore<MemoryBackend>;

/// Store persisting one JSON file per key inside a data directory
pub type FileLocalStore = SnapshotStore<FileBackend>;

impl<B: SnapshotBackend> SnapshotStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Stamps a write, keeping the marker strictly increasing even when two
    /// writes land within the same millisecond
    fn touch_sync_timestamp(&self) -> Result<i64, StorageError> {
        let previous = self.last_sync_timestamp()?.unwrap_or(i64::MIN);
        let stamp = now_millis().max(previous.saturating_add(1));
        self.backend
            .write(LocalKey::LastSyncTimestamp, &stamp.to_string())?;
        Ok(stamp)
    }
}

impl<B: SnapshotBackend> LocalStore for SnapshotStore<B> {
    #[instrument(skip(self))]
    fn load_players(&self) -> Result<Vec<Player>, StorageError> {
        match self.backend.read(LocalKey::Players)? {
            Some(raw) => {
                let players: Vec<Player> = serde_json::from_str(&raw)?;
                debug!(count = players.len(), "Loaded players snapshot");
                Ok(players)
            }
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self, players), fields(count = players.len()))]
    fn save_players(&self, players: &[Player]) -> Result<i64, StorageError> {
        let raw = serde_json::to_string(players)?;
        self.backend.write(LocalKey::Players, &raw)?;
        self.touch_sync_timestamp()
    }

    #[instrument(skip(self))]
    fn load_matches(&self) -> Result<Vec<Match>, StorageError> {
        match self.backend.read(LocalKey::Matches)? {
            Some(raw) => {
                let matches: Vec<Match> = serde_json::from_str(&raw)?;
                debug!(count = matches.len(), "Loaded matches snapshot");
                Ok(matches)
            }
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self, matches), fields(count = matches.len()))]
    fn save_matches(&self, matches: &[Match]) -> Result<i64, StorageError> {
        let raw = serde_json::to_string(matches)?;
        self.backend.write(LocalKey::Matches, &raw)?;
        self.touch_sync_timestamp()
    }

    fn last_sync_timestamp(&self) -> Result<Option<i64>, StorageError> {
        let Some(raw) = self.backend.read(LocalKey::LastSyncTimestamp)? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(stamp) => Ok(Some(stamp)),
            Err(e) => {
                warn!(error = %e, raw = %raw, "Ignoring unreadable sync timestamp");
                Ok(None)
            }
        }
    }

    fn edit_mode_enabled(&self) -> Result<bool, StorageError> {
        Ok(self
            .backend
            .read(LocalKey::EditModeEnabled)?
            .map(|raw| raw.trim() == "true")
            .unwrap_or(false))
    }

    fn set_edit_mode_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.backend
            .write(LocalKey::EditModeEnabled, &enabled.to_string())
    }
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<LocalKey, String>>,
}

impl SnapshotBackend for MemoryBackend {
    fn read(&self, key: LocalKey) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("local store lock poisoned".to_string()))?;
        Ok(entries.get(&key).cloned())
    }

    fn write(&self, key: LocalKey, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("local store lock poisoned".to_string()))?;
        entries.insert(key, value.to_string());
        Ok(())
    }
}

impl Default for InMemoryLocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLocalStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::default())
    }

    /// Overwrites a raw record, bypassing serialization
    pub fn put_raw(&self, key: LocalKey, value: &str) -> Result<(), StorageError> {
        self.backend.write(key, value)
    }
}

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    fn path_for(&self, key: LocalKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotBackend for FileBackend {
    fn read(&self, key: LocalKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: LocalKey, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl FileLocalStore {
    /// Opens (creating if needed) a store rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened local snapshot store");
        Ok(Self::with_backend(FileBackend { dir }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_match() -> Match {
        Match {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 4, 20).unwrap(),
            team_a: [1, 2],
            team_b: [3, 4],
            score_a: 6,
            score_b: 1,
            created_at: 10,
            updated_at: 10,
        }
    }

    #[test]
    fn empty_store_loads_empty_collections() {
        let store = InMemoryLocalStore::new();
        assert!(store.load_players().unwrap().is_empty());
        assert!(store.load_matches().unwrap().is_empty());
        assert_eq!(store.last_sync_timestamp().unwrap(), None);
        assert!(!store.edit_mode_enabled().unwrap());
    }

    #[test]
    fn every_write_advances_sync_timestamp() {
        let store = InMemoryLocalStore::new();
        let first = store.save_players(&[Player::new(1, "Ana", "#3498db")]).unwrap();
        let second = store.save_matches(&[sample_match()]).unwrap();

        assert!(second > first);
        assert_eq!(store.last_sync_timestamp().unwrap(), Some(second));
        assert_eq!(store.load_matches().unwrap(), vec![sample_match()]);
    }

    #[test]
    fn corrupt_snapshot_is_a_serialization_error() {
        let store = InMemoryLocalStore::new();
        store.put_raw(LocalKey::Players, "{not json").unwrap();

        assert!(matches!(
            store.load_players(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::open(dir.path()).unwrap();
        store.save_players(&[Player::new(3, "Carla", "#2ecc71")]).unwrap();
        store.set_edit_mode_enabled(true).unwrap();

        let reopened = FileLocalStore::open(dir.path()).unwrap();
        let players = reopened.load_players().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Carla");
        assert!(reopened.edit_mode_enabled().unwrap());
        assert!(dir.path().join("padelPlayers.json").exists());
    }
}
