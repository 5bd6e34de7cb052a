use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::shared::AppState;

// Public API - what other modules can use
pub use types::{
    CreatePlayerRequest, EditModeResponse, HistoryQuery, MutationResponse, UnlockRequest,
};

// Internal modules
pub mod handlers;
mod types;

/// All tracker routes, bound to the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/players",
            get(handlers::list_players).post(handlers::create_player),
        )
        .route(
            "/players/:id",
            patch(handlers::update_player).delete(handlers::delete_player),
        )
        .route(
            "/matches",
            get(handlers::list_matches).post(handlers::create_match),
        )
        .route(
            "/matches/:id",
            put(handlers::update_match).delete(handlers::delete_match),
        )
        .route("/ranking", get(handlers::ranking))
        .route("/ranking/top", get(handlers::top_players))
        .route("/teams", get(handlers::team_ranking))
        .route("/highlights", get(handlers::highlights))
        .route("/recompute", post(handlers::recompute))
        .route("/export", get(handlers::export_data))
        .route("/import", post(handlers::import_data))
        .route("/edit-mode/unlock", post(handlers::unlock_edit_mode))
        .route("/edit-mode/lock", post(handlers::lock_edit_mode))
        .route("/status", get(handlers::status))
        .with_state(state)
}
