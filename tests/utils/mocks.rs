use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use padel_ranking::{
    storage::LocalKey, InMemoryLocalStore, LocalStore, Match, Player, StorageError,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Local store whose writes can be made to fail, standing in for a full disk
/// or a revoked storage permission
pub struct FlakyLocalStore {
    inner: InMemoryLocalStore,
    fail_writes: AtomicBool,
    failed_writes: AtomicUsize,
}

impl FlakyLocalStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryLocalStore::new(),
            fail_writes: AtomicBool::new(false),
            failed_writes: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::SeqCst)
    }

    /// Overwrites a stored record with arbitrary text
    pub fn corrupt(&self, key: LocalKey, raw: &str) {
        self.inner.put_raw(key, raw).unwrap();
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            self.failed_writes.fetch_add(1, Ordering::SeqCst);
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl LocalStore for FlakyLocalStore {
    fn load_players(&self) -> Result<Vec<Player>, StorageError> {
        self.inner.load_players()
    }

    fn save_players(&self, players: &[Player]) -> Result<i64, StorageError> {
        self.check_writable()?;
        self.inner.save_players(players)
    }

    fn load_matches(&self) -> Result<Vec<Match>, StorageError> {
        self.inner.load_matches()
    }

    fn save_matches(&self, matches: &[Match]) -> Result<i64, StorageError> {
        self.check_writable()?;
        self.inner.save_matches(matches)
    }

    fn last_sync_timestamp(&self) -> Result<Option<i64>, StorageError> {
        self.inner.last_sync_timestamp()
    }

    fn edit_mode_enabled(&self) -> Result<bool, StorageError> {
        self.inner.edit_mode_enabled()
    }

    fn set_edit_mode_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.check_writable()?;
        self.inner.set_edit_mode_enabled(enabled)
    }
}
