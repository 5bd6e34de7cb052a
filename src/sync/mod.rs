// Public API - what other modules can use
pub use coordinator::{
    CoordinatorConfig, DeletedPlayer, LoadReport, LoadSource, Mutation, PlayerEdit,
    ReconcileOutcome, SyncCoordinator, TrackerStatus,
};
pub use errors::TrackerError;
pub use remote_writer::RemoteStatus;
pub use session::SyncState;
pub use sync_task::{start_sync_task, SyncConfig};
pub use transfer::{ExportFile, ImportSummary};
pub use validation::MatchDraft;

// Internal modules
mod coordinator;
mod errors;
mod remote_writer;
mod session;
mod sync_task;
pub mod transfer;
pub mod validation;
