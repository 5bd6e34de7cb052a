// Public API - what other modules can use
pub use backup::{BackupStore, InMemoryBackupStore, SqliteBackupStore};
pub use errors::{RemoteError, StorageError};
pub use local::{FileLocalStore, InMemoryLocalStore, LocalKey, LocalStore};
pub use remote::{bounded, InMemoryRemoteStore, PostgresRemoteStore, RemoteStore};
pub use wire::{Collection, MatchDocument, PlayerDocument};

// Internal modules
pub mod backup;
mod errors;
pub mod local;
pub mod remote;
pub mod wire;
