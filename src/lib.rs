// Library crate for the padel club ranking tracker
// This file exposes the public API for the binary and integration tests

pub mod api;
pub mod config;
pub mod ranking;
pub mod shared;
pub mod storage;
pub mod sync;

// Re-export commonly used types for easier access in tests
pub use config::TrackerConfig;
pub use ranking::{Match, MatchId, Player, PlayerId, RatingEngine, TeamStats};
pub use shared::{AppError, AppState};
pub use storage::{
    BackupStore, InMemoryBackupStore, InMemoryLocalStore, InMemoryRemoteStore, LocalStore,
    RemoteError, RemoteStore, StorageError,
};
pub use sync::{
    CoordinatorConfig, ExportFile, LoadSource, MatchDraft, Mutation, SyncConfig,
    SyncCoordinator, SyncState, TrackerError,
};
