use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{
    CreatePlayerRequest, EditModeResponse, HistoryQuery, MutationResponse, UnlockRequest,
};
use crate::ranking::queries::{RankingHighlights, DEFAULT_HISTORY_LIMIT};
use crate::ranking::{Match, MatchId, Player, PlayerId, RecomputeSummary, TeamStats};
use crate::shared::{AppError, AppState};
use crate::sync::{
    DeletedPlayer, ExportFile, ImportSummary, MatchDraft, Mutation, PlayerEdit, TrackerStatus,
};

type Mutated<T> = Result<Json<MutationResponse<T>>, AppError>;

/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(State(state): State<AppState>) -> Json<Vec<Player>> {
    Json(state.coordinator.players().await)
}

/// POST /players
#[instrument(name = "create_player", skip(state))]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Mutated<Player> {
    let mutation = state.coordinator.add_player(&request.name).await?;
    info!(player_id = mutation.value.id, "Player created via API");
    Ok(Json(mutation.into()))
}

/// PATCH /players/:id
#[instrument(name = "update_player", skip(state))]
pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
    Json(edit): Json<PlayerEdit>,
) -> Mutated<Player> {
    Ok(Json(state.coordinator.edit_player(id, edit).await?.into()))
}

/// DELETE /players/:id
///
/// Also removes every match the player took part in
#[instrument(name = "delete_player", skip(state))]
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Mutated<DeletedPlayer> {
    Ok(Json(state.coordinator.delete_player(id).await?.into()))
}

/// GET /matches?limit=N
///
/// Most recent first; defaults to the last 15
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<Match>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Json(state.coordinator.match_history(limit).await)
}

/// POST /matches
#[instrument(name = "create_match", skip(state))]
pub async fn create_match(
    State(state): State<AppState>,
    Json(draft): Json<MatchDraft>,
) -> Mutated<Match> {
    let mutation = state.coordinator.register_match(draft).await?;
    info!(match_id = mutation.value.id, "Match registered via API");
    Ok(Json(mutation.into()))
}

/// PUT /matches/:id
#[instrument(name = "update_match", skip(state))]
pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(draft): Json<MatchDraft>,
) -> Mutated<Match> {
    Ok(Json(state.coordinator.edit_match(id, draft).await?.into()))
}

/// DELETE /matches/:id
#[instrument(name = "delete_match", skip(state))]
pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Mutated<Match> {
    Ok(Json(state.coordinator.delete_match(id).await?.into()))
}

/// GET /ranking
#[instrument(name = "ranking", skip(state))]
pub async fn ranking(State(state): State<AppState>) -> Json<Vec<Player>> {
    Json(state.coordinator.ranking().await)
}

/// GET /ranking/top
#[instrument(name = "top_players", skip(state))]
pub async fn top_players(State(state): State<AppState>) -> Json<Vec<Player>> {
    Json(state.coordinator.top_players().await)
}

/// GET /teams
#[instrument(name = "team_ranking", skip(state))]
pub async fn team_ranking(State(state): State<AppState>) -> Json<Vec<TeamStats>> {
    Json(state.coordinator.team_ranking().await)
}

/// GET /highlights
#[instrument(name = "highlights", skip(state))]
pub async fn highlights(State(state): State<AppState>) -> Json<RankingHighlights> {
    Json(state.coordinator.highlights().await)
}

/// POST /recompute
#[instrument(name = "recompute", skip(state))]
pub async fn recompute(State(state): State<AppState>) -> Mutated<RecomputeSummary> {
    Ok(Json(state.coordinator.recompute_rankings().await?.into()))
}

/// GET /export
#[instrument(name = "export_data", skip(state))]
pub async fn export_data(State(state): State<AppState>) -> Json<ExportFile> {
    Json(state.coordinator.export_data().await)
}

/// POST /import
///
/// Takes the raw export document so malformed files surface as parse errors
#[instrument(name = "import_data", skip(state, body))]
pub async fn import_data(State(state): State<AppState>, body: String) -> Mutated<ImportSummary> {
    Ok(Json(state.coordinator.import_data(&body).await?.into()))
}

/// POST /edit-mode/unlock
#[instrument(name = "unlock_edit_mode", skip(state, request))]
pub async fn unlock_edit_mode(
    State(state): State<AppState>,
    Json(request): Json<UnlockRequest>,
) -> Mutated<EditModeResponse> {
    let mutation = state
        .coordinator
        .unlock_edit_mode(&request.passphrase)
        .await?;
    Ok(Json(respond_edit_mode(mutation, true)))
}

/// POST /edit-mode/lock
#[instrument(name = "lock_edit_mode", skip(state))]
pub async fn lock_edit_mode(
    State(state): State<AppState>,
) -> Json<MutationResponse<EditModeResponse>> {
    let mutation = state.coordinator.lock_edit_mode().await;
    Json(respond_edit_mode(mutation, false))
}

fn respond_edit_mode(
    mutation: Mutation<()>,
    edit_mode: bool,
) -> MutationResponse<EditModeResponse> {
    MutationResponse {
        data: EditModeResponse { edit_mode },
        degraded: mutation.is_degraded(),
        warning: mutation.degraded.map(|e| e.to_string()),
    }
}

/// GET /status
#[instrument(name = "status", skip(state))]
pub async fn status(State(state): State<AppState>) -> Json<TrackerStatus> {
    Json(state.coordinator.status().await)
}
