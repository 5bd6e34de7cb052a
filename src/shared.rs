use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::sync::{SyncCoordinator, TrackerError};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SyncCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<SyncCoordinator>) -> Self {
        Self { coordinator }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(msg) => AppError::BadRequest(msg),
            TrackerError::Parse(msg) => AppError::BadRequest(msg),
            TrackerError::NotFound(what) => AppError::NotFound(what),
            TrackerError::EditModeDisabled => AppError::Forbidden(TrackerError::EditModeDisabled.to_string()),
            TrackerError::NotLoaded => AppError::Unavailable(TrackerError::NotLoaded.to_string()),
            TrackerError::Storage(e) => AppError::StorageError(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::StorageError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::storage::{InMemoryBackupStore, InMemoryLocalStore, LocalStore, RemoteStore};
    use crate::sync::CoordinatorConfig;

    pub const TEST_PASSPHRASE: &str = "test-pass";

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        local: Option<Arc<dyn LocalStore>>,
        remote: Option<Arc<dyn RemoteStore>>,
        players: Vec<String>,
        edit_mode: bool,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                local: None,
                remote: None,
                players: Vec::new(),
                edit_mode: true,
            }
        }

        pub fn with_local_store(mut self, local: Arc<dyn LocalStore>) -> Self {
            self.local = Some(local);
            self
        }

        pub fn with_remote_store(mut self, remote: Arc<dyn RemoteStore>) -> Self {
            self.remote = Some(remote);
            self
        }

        pub fn with_players(mut self, names: &[&str]) -> Self {
            self.players = names.iter().map(|n| n.to_string()).collect();
            self
        }

        pub fn locked(mut self) -> Self {
            self.edit_mode = false;
            self
        }

        /// Loads the session, seeds the players and leaves edit mode as
        /// requested
        pub async fn build(self) -> AppState {
            let config = CoordinatorConfig {
                edit_passphrase: TEST_PASSPHRASE.to_string(),
                ..CoordinatorConfig::default()
            };
            let coordinator = SyncCoordinator::new(
                self.local
                    .unwrap_or_else(|| Arc::new(InMemoryLocalStore::new())),
                Arc::new(InMemoryBackupStore::new()),
                self.remote,
                config,
            );
            coordinator.load().await.unwrap();
            coordinator.unlock_edit_mode(TEST_PASSPHRASE).await.unwrap();
            for name in &self.players {
                coordinator.add_player(name).await.unwrap();
            }
            if !self.edit_mode {
                coordinator.lock_edit_mode().await;
            }
            AppState::new(Arc::new(coordinator))
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
