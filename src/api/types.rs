use serde::{Deserialize, Serialize};

use crate::sync::Mutation;

/// Request payload for registering a player
#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
}

/// Request payload for unlocking edit mode
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub passphrase: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Envelope for mutating commands.
///
/// `degraded` is set when the change is live in memory but could not be
/// written to the local store; `warning` then carries that local error.
/// Remote propagation happens after the response, so remote failures are
/// reported through `GET /status` (`remote.failed`, `remote.lastError`).
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse<T> {
    pub data: T,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

impl<T> From<Mutation<T>> for MutationResponse<T> {
    fn from(mutation: Mutation<T>) -> Self {
        Self {
            degraded: mutation.is_degraded(),
            warning: mutation.degraded.as_ref().map(|e| e.to_string()),
            data: mutation.value,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EditModeResponse {
    pub edit_mode: bool,
}
