use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument, warn};

use super::errors::TrackerError;
use super::remote_writer::{RemoteJob, RemoteQueue, RemoteStatus, RemoteWriter};
use super::session::{check_id_headroom, Session, SyncState};
use super::transfer::{parse_import, ExportFile, ImportSummary};
use super::validation::{
    ensure_unique_name, normalize_name, today_at_offset, validate_match, MatchDraft,
};
use crate::ranking::palette::{is_palette_color, pick_unique_color, DEFAULT_COLOR};
use crate::ranking::queries::{self, RankingHighlights};
use crate::ranking::{
    compute_team_stats, now_millis, rebuild_all_ratings, Match, MatchId, Player, PlayerId,
    RatingEngine, RecomputeSummary, TeamStats,
};
use crate::storage::{BackupStore, LocalStore, RemoteError, RemoteStore, StorageError};

/// Settings for the coordinator itself; the periodic task has its own
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Upper bound for every remote call
    pub remote_timeout: Duration,
    /// Passphrase that unlocks edit mode
    pub edit_passphrase: String,
    /// Offset used to pick "today" for matches submitted without a date
    pub date_utc_offset_hours: i32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(5),
            edit_passphrase: "544".to_string(),
            date_utc_offset_hours: -3,
        }
    }
}

/// Result of a mutating command.
///
/// `degraded` carries the local write failure when the change could only be
/// kept in memory.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub degraded: Option<StorageError>,
}

impl<T> Mutation<T> {
    fn new(value: T, degraded: Option<StorageError>) -> Self {
        Self { value, degraded }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Tier the session was populated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum LoadSource {
    Remote,
    Local,
    Backup,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub source: LoadSource,
    pub players: usize,
    pub matches: usize,
    pub edit_mode: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    pub reloaded_from_local: bool,
    pub persisted: bool,
    pub remote_resync_queued: bool,
}

/// Changes applied by `edit_player`; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerEdit {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPlayer {
    pub player: Player,
    pub removed_matches: Vec<MatchId>,
}

/// Point-in-time view of the coordinator for status endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStatus {
    pub state: SyncState,
    pub edit_mode: bool,
    pub last_sync: i64,
    pub players: usize,
    pub matches: usize,
    pub remote: Option<RemoteStatus>,
}

#[derive(Debug, Clone, Copy)]
enum Collections {
    Players,
    Both,
}

/// Owns the live session and keeps the storage tiers in step with it.
///
/// Every command mutates memory first, then writes the local store
/// synchronously, then queues the remote propagation.
pub struct SyncCoordinator {
    session: Mutex<Session>,
    local: Arc<dyn LocalStore>,
    backup: Arc<dyn BackupStore>,
    remote: Option<RemoteQueue>,
    engine: RatingEngine,
    config: CoordinatorConfig,
}

impl SyncCoordinator {
    /// Builds a coordinator. With a remote store this spawns the remote write
    /// worker, so it must run inside a Tokio runtime.
    pub fn new(
        local: Arc<dyn LocalStore>,
        backup: Arc<dyn BackupStore>,
        remote: Option<Arc<dyn RemoteStore>>,
        config: CoordinatorConfig,
    ) -> Self {
        let remote = remote
            .map(|store| RemoteQueue::spawn(RemoteWriter::new(store, config.remote_timeout)));
        Self {
            session: Mutex::new(Session::new()),
            local,
            backup,
            remote,
            engine: RatingEngine::default(),
            config,
        }
    }

    // ---- lifecycle ----

    /// Populates the session: remote when it has players, else the local
    /// snapshot, else the backup when the snapshot is unreadable.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<LoadReport, TrackerError> {
        if let Some(queue) = &self.remote {
            queue.flush().await;
        }

        let mut session = self.session.lock().await;
        let edit_mode = self.local.edit_mode_enabled().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read edit mode flag, starting locked");
            false
        });

        let (source, mut players, matches) = match self.fetch_remote_snapshot().await {
            Some((players, matches)) => (LoadSource::Remote, players, matches),
            None => self.load_local_or_backup().await?,
        };
        backfill_colors(&mut players);
        if source == LoadSource::Backup {
            // the backup keeps entities deleted since their last mirror
            rebuild_all_ratings(&self.engine, &mut players, &matches);
        }

        session.replace(players, matches)?;
        if let Some(floor) = self.remote_match_id_floor().await {
            session.raise_match_id_floor(floor);
        }
        session.set_edit_mode(edit_mode);

        if source == LoadSource::Local {
            let stamp = self.local.last_sync_timestamp().ok().flatten().unwrap_or(0);
            session.set_last_sync(stamp);
            session.set_state(SyncState::Loaded);
        } else if let Some(e) = self.persist(&mut session, Collections::Both) {
            warn!(error = %e, source = %source, "Loaded data could not be written locally");
        }

        let report = LoadReport {
            source,
            players: session.players().len(),
            matches: session.matches().len(),
            edit_mode,
        };
        info!(
            source = %report.source,
            players = report.players,
            matches = report.matches,
            "Tracker data loaded"
        );
        Ok(report)
    }

    /// Periodic tick: adopt a newer local snapshot, write memory back to the
    /// local store and mirror it to the backup. When an earlier remote write
    /// failed, the whole snapshot is queued for the remote store as well.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, TrackerError> {
        let mut session = self.session.lock().await;
        if session.state() == SyncState::Cold {
            debug!("Skipping reconcile before first load");
            return Ok(ReconcileOutcome::default());
        }

        let mut outcome = ReconcileOutcome::default();
        match self.local.last_sync_timestamp() {
            Ok(Some(_)) if session.state() == SyncState::Dirty => {
                debug!("Memory holds unsaved changes, not adopting local snapshot");
            }
            Ok(Some(stored)) if stored > session.last_sync() => {
                let adopted = self.load_local().map_err(TrackerError::from).and_then(
                    |(mut players, matches)| {
                        backfill_colors(&mut players);
                        session.replace(players, matches)
                    },
                );
                match adopted {
                    Ok(()) => {
                        outcome.reloaded_from_local = true;
                        info!(stored, memory = session.last_sync(), "Adopted newer local snapshot");
                    }
                    Err(e) => warn!(error = %e, "Newer local snapshot unusable, keeping memory"),
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not read local sync timestamp"),
        }

        let degraded = self.persist(&mut session, Collections::Both);
        outcome.persisted = degraded.is_none();

        let players = session.players().to_vec();
        let matches = session.matches().to_vec();
        drop(session);
        self.mirror_to_backup(&players, &matches).await;

        if let Some(queue) = self.remote.as_ref().filter(|q| q.is_behind()) {
            info!("Remote store missed writes, queueing full resync");
            queue.submit_resync(players, matches);
            outcome.remote_resync_queued = true;
        }

        match degraded {
            Some(e) => Err(e.into()),
            None => Ok(outcome),
        }
    }

    /// Final reconcile, then waits for queued remote writes.
    ///
    /// Returns the remote failures not yet reported by an earlier flush.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Vec<RemoteError> {
        if let Err(e) = self.reconcile().await {
            error!(error = %e, "Final reconcile failed");
        }
        let failures = self.flush_remote().await;
        info!(remote_failures = failures.len(), "Tracker shut down");
        failures
    }

    /// Waits for every queued remote write
    pub async fn flush_remote(&self) -> Vec<RemoteError> {
        match &self.remote {
            Some(queue) => queue.flush().await,
            None => Vec::new(),
        }
    }

    // ---- edit mode ----

    #[instrument(skip(self, passphrase))]
    pub async fn unlock_edit_mode(&self, passphrase: &str) -> Result<Mutation<()>, TrackerError> {
        if passphrase != self.config.edit_passphrase {
            warn!("Rejected edit mode passphrase");
            return Err(TrackerError::validation("incorrect passphrase"));
        }
        Ok(self.set_edit_mode(true).await)
    }

    #[instrument(skip(self))]
    pub async fn lock_edit_mode(&self) -> Mutation<()> {
        self.set_edit_mode(false).await
    }

    async fn set_edit_mode(&self, enabled: bool) -> Mutation<()> {
        let mut session = self.session.lock().await;
        session.set_edit_mode(enabled);
        let degraded = self.local.set_edit_mode_enabled(enabled).err();
        if let Some(e) = &degraded {
            error!(error = %e, "Could not persist edit mode flag");
        }
        info!(enabled, "Edit mode changed");
        Mutation::new((), degraded)
    }

    // ---- player commands ----

    #[instrument(skip(self))]
    pub async fn add_player(&self, name: &str) -> Result<Mutation<Player>, TrackerError> {
        let mut session = self.editable_session().await?;
        let name = normalize_name(name)?;
        ensure_unique_name(&name, session.players(), None)?;

        let color = pick_unique_color(session.players());
        let id = session.allocate_player_id()?;
        let player = Player::new(id, name, color);
        session.players_mut().push(player.clone());

        let degraded = self.persist(&mut session, Collections::Players);
        let pushed = player.clone();
        self.submit_remote("push_player", move |w| {
            async move { w.push_player(&pushed).await }.boxed()
        });

        info!(player_id = id, name = %player.name, color = %player.color, "Player added");
        Ok(Mutation::new(player, degraded))
    }

    #[instrument(skip(self))]
    pub async fn edit_player(
        &self,
        id: PlayerId,
        edit: PlayerEdit,
    ) -> Result<Mutation<Player>, TrackerError> {
        let mut session = self.editable_session().await?;
        if session.player(id).is_none() {
            return Err(TrackerError::NotFound(format!("player {}", id)));
        }

        let name = match edit.name.as_deref() {
            Some(raw) => {
                let name = normalize_name(raw)?;
                ensure_unique_name(&name, session.players(), Some(id))?;
                Some(name)
            }
            None => None,
        };
        if let Some(color) = edit.color.as_deref() {
            if !is_palette_color(color) {
                return Err(TrackerError::Validation(format!(
                    "{} is not a palette color",
                    color
                )));
            }
        }

        let player = session
            .player_mut(id)
            .ok_or_else(|| TrackerError::NotFound(format!("player {}", id)))?;
        if let Some(name) = name {
            player.name = name;
        }
        if let Some(color) = edit.color {
            player.color = color;
        }
        player.updated_at = now_millis();
        let updated = player.clone();

        let degraded = self.persist(&mut session, Collections::Players);
        let pushed = updated.clone();
        self.submit_remote("update_player", move |w| {
            async move { w.upsert_player(&pushed).await }.boxed()
        });

        info!(player_id = id, name = %updated.name, "Player edited");
        Ok(Mutation::new(updated, degraded))
    }

    /// Removes the player together with every match they took part in, then
    /// recomputes everyone else's statistics.
    #[instrument(skip(self))]
    pub async fn delete_player(&self, id: PlayerId) -> Result<Mutation<DeletedPlayer>, TrackerError> {
        let mut session = self.editable_session().await?;
        let index = session
            .players()
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| TrackerError::NotFound(format!("player {}", id)))?;

        let player = session.players_mut().remove(index);
        let removed_matches: Vec<MatchId> = session
            .matches()
            .iter()
            .filter(|m| m.involves(id))
            .map(|m| m.id)
            .collect();
        session.matches_mut().retain(|m| !m.involves(id));

        let (players, matches) = session.split_mut();
        rebuild_all_ratings(&self.engine, players, matches);

        let degraded = self.persist(&mut session, Collections::Both);
        let remaining = session.players().to_vec();
        let dropped = removed_matches.clone();
        self.submit_remote("delete_player", move |w| {
            async move {
                w.delete_player(id).await?;
                for match_id in dropped {
                    w.delete_match(match_id).await?;
                }
                w.upsert_players(&remaining).await
            }
            .boxed()
        });

        info!(
            player_id = id,
            removed_matches = removed_matches.len(),
            "Player deleted"
        );
        Ok(Mutation::new(
            DeletedPlayer {
                player,
                removed_matches,
            },
            degraded,
        ))
    }

    // ---- match commands ----

    /// Validates, stores and applies a new match incrementally
    #[instrument(skip(self))]
    pub async fn register_match(&self, draft: MatchDraft) -> Result<Mutation<Match>, TrackerError> {
        let mut session = self.editable_session().await?;
        validate_match(&draft, session.players())?;

        let id = session.next_match_id()?;
        let m = self.build_match(id, &draft, None);
        session.matches_mut().push(m.clone());
        self.engine.apply_match_result(&m, session.players_mut());

        let degraded = self.persist(&mut session, Collections::Both);
        let participants: Vec<Player> = session
            .players()
            .iter()
            .filter(|p| m.involves(p.id))
            .cloned()
            .collect();
        let pushed = m.clone();
        self.submit_remote("register_match", move |w| {
            async move {
                w.push_match(&pushed).await?;
                w.upsert_players(&participants).await
            }
            .boxed()
        });

        info!(
            match_id = id,
            score_a = m.score_a,
            score_b = m.score_b,
            "Match registered"
        );
        Ok(Mutation::new(m, degraded))
    }

    /// Replaces a stored match and recomputes from the full log
    #[instrument(skip(self))]
    pub async fn edit_match(
        &self,
        id: MatchId,
        draft: MatchDraft,
    ) -> Result<Mutation<Match>, TrackerError> {
        let mut session = self.editable_session().await?;
        let index = session
            .match_index(id)
            .ok_or_else(|| TrackerError::NotFound(format!("match {}", id)))?;
        validate_match(&draft, session.players())?;

        let created_at = session.matches()[index].created_at;
        let m = self.build_match(id, &draft, Some(created_at));
        session.matches_mut()[index] = m.clone();

        let (players, matches) = session.split_mut();
        rebuild_all_ratings(&self.engine, players, matches);

        let degraded = self.persist(&mut session, Collections::Both);
        let all_players = session.players().to_vec();
        let replaced = m.clone();
        self.submit_remote("edit_match", move |w| {
            async move {
                w.replace_match(&replaced).await?;
                w.upsert_players(&all_players).await
            }
            .boxed()
        });

        info!(match_id = id, "Match edited");
        Ok(Mutation::new(m, degraded))
    }

    #[instrument(skip(self))]
    pub async fn delete_match(&self, id: MatchId) -> Result<Mutation<Match>, TrackerError> {
        let mut session = self.editable_session().await?;
        let index = session
            .match_index(id)
            .ok_or_else(|| TrackerError::NotFound(format!("match {}", id)))?;
        let removed = session.matches_mut().remove(index);

        let (players, matches) = session.split_mut();
        rebuild_all_ratings(&self.engine, players, matches);

        let degraded = self.persist(&mut session, Collections::Both);
        let all_players = session.players().to_vec();
        self.submit_remote("delete_match", move |w| {
            async move {
                w.delete_match(id).await?;
                w.upsert_players(&all_players).await
            }
            .boxed()
        });

        info!(match_id = id, "Match deleted");
        Ok(Mutation::new(removed, degraded))
    }

    /// Rebuilds every player's statistics from the match log
    #[instrument(skip(self))]
    pub async fn recompute_rankings(&self) -> Result<Mutation<RecomputeSummary>, TrackerError> {
        let mut session = self.editable_session().await?;
        let (players, matches) = session.split_mut();
        let summary = rebuild_all_ratings(&self.engine, players, matches);

        let degraded = self.persist(&mut session, Collections::Players);
        let all_players = session.players().to_vec();
        self.submit_remote("recompute_rankings", move |w| {
            async move { w.upsert_players(&all_players).await }.boxed()
        });

        Ok(Mutation::new(summary, degraded))
    }

    // ---- transfer ----

    /// Replaces both collections with an exported snapshot. Player statistics
    /// are taken as stored.
    #[instrument(skip(self, json), fields(bytes = json.len()))]
    pub async fn import_data(&self, json: &str) -> Result<Mutation<ImportSummary>, TrackerError> {
        let mut session = self.editable_session().await?;
        let mut imported = parse_import(json)?;
        let summary = ImportSummary::from(&imported);

        backfill_colors(&mut imported.players);
        session.replace(imported.players, imported.matches)?;

        let degraded = self.persist(&mut session, Collections::Both);
        let players = session.players().to_vec();
        let matches = session.matches().to_vec();
        self.submit_remote("import_data", move |w| {
            async move { w.mirror_snapshot(&players, &matches).await }.boxed()
        });

        info!(
            players = summary.players,
            matches = summary.matches,
            reassigned_ids = summary.reassigned_ids,
            "Data imported"
        );
        Ok(Mutation::new(summary, degraded))
    }

    pub async fn export_data(&self) -> ExportFile {
        let session = self.session.lock().await;
        ExportFile::new(session.players().to_vec(), session.matches().to_vec())
    }

    // ---- queries ----

    /// Players in stored order
    pub async fn players(&self) -> Vec<Player> {
        self.session.lock().await.players().to_vec()
    }

    /// Matches in stored order
    pub async fn matches(&self) -> Vec<Match> {
        self.session.lock().await.matches().to_vec()
    }

    pub async fn ranking(&self) -> Vec<Player> {
        queries::player_ranking(self.session.lock().await.players())
    }

    pub async fn top_players(&self) -> Vec<Player> {
        queries::top_players(self.session.lock().await.players())
    }

    /// Team standings derived from the current match log
    pub async fn team_ranking(&self) -> Vec<TeamStats> {
        let session = self.session.lock().await;
        let teams = compute_team_stats(session.matches(), self.engine.formula());
        queries::team_ranking(teams.values(), session.players())
    }

    pub async fn highlights(&self) -> RankingHighlights {
        let session = self.session.lock().await;
        let teams = compute_team_stats(session.matches(), self.engine.formula());
        RankingHighlights {
            best_player: queries::best_average_player(session.players()),
            best_team: queries::best_average_team(teams.values(), session.players()),
        }
    }

    pub async fn match_history(&self, limit: usize) -> Vec<Match> {
        let session = self.session.lock().await;
        queries::match_history(session.matches(), session.players(), limit)
    }

    pub async fn status(&self) -> TrackerStatus {
        let remote = match &self.remote {
            Some(queue) => Some(queue.status().await),
            None => None,
        };
        let session = self.session.lock().await;
        TrackerStatus {
            state: session.state(),
            edit_mode: session.edit_mode(),
            last_sync: session.last_sync(),
            players: session.players().len(),
            matches: session.matches().len(),
            remote,
        }
    }

    // ---- internals ----

    async fn editable_session(&self) -> Result<MutexGuard<'_, Session>, TrackerError> {
        let session = self.session.lock().await;
        if session.state() == SyncState::Cold {
            return Err(TrackerError::NotLoaded);
        }
        if !session.edit_mode() {
            return Err(TrackerError::EditModeDisabled);
        }
        Ok(session)
    }

    fn build_match(&self, id: MatchId, draft: &MatchDraft, created_at: Option<i64>) -> Match {
        let now = now_millis();
        Match {
            id,
            date: draft
                .date
                .unwrap_or_else(|| today_at_offset(self.config.date_utc_offset_hours)),
            team_a: draft.team_a,
            team_b: draft.team_b,
            score_a: draft.score_a,
            score_b: draft.score_b,
            created_at: created_at.unwrap_or(now),
            updated_at: now,
        }
    }

    /// Writes memory to the local store. On failure the session stays dirty
    /// and the error is handed back for the caller to report.
    fn persist(&self, session: &mut Session, which: Collections) -> Option<StorageError> {
        session.set_state(SyncState::Dirty);
        match self.write_local(session, which) {
            Ok(stamp) => {
                session.set_last_sync(stamp);
                session.set_state(SyncState::Loaded);
                None
            }
            Err(e) => {
                error!(error = %e, "Local write failed, changes kept in memory only");
                Some(e)
            }
        }
    }

    fn write_local(&self, session: &Session, which: Collections) -> Result<i64, StorageError> {
        if let Collections::Both = which {
            self.local.save_matches(session.matches())?;
        }
        self.local.save_players(session.players())
    }

    fn load_local(&self) -> Result<(Vec<Player>, Vec<Match>), StorageError> {
        Ok((self.local.load_players()?, self.local.load_matches()?))
    }

    async fn load_local_or_backup(
        &self,
    ) -> Result<(LoadSource, Vec<Player>, Vec<Match>), TrackerError> {
        let local_err = match self.load_local() {
            Ok((players, matches)) => return Ok((LoadSource::Local, players, matches)),
            Err(e) => e,
        };
        error!(error = %local_err, "Local snapshot unreadable, trying backup");

        let recovered = async {
            let players = self.backup.recover_players().await?;
            let matches = self.backup.recover_matches().await?;
            Ok::<_, StorageError>((players, matches))
        }
        .await;

        match recovered {
            Ok((players, matches)) if !players.is_empty() => {
                warn!(
                    players = players.len(),
                    matches = matches.len(),
                    "Recovered data from backup"
                );
                Ok((LoadSource::Backup, players, matches))
            }
            Ok(_) => Err(unreadable_snapshot(local_err)),
            Err(e) => {
                error!(error = %e, "Backup recovery failed");
                Err(unreadable_snapshot(local_err))
            }
        }
    }

    /// Remote collections, when the remote answers with at least one player
    async fn fetch_remote_snapshot(&self) -> Option<(Vec<Player>, Vec<Match>)> {
        let writer = self.remote.as_ref()?.writer();
        let players = match writer.fetch_players().await {
            Ok(players) if !players.is_empty() => players,
            Ok(_) => {
                debug!("Remote store has no players, using local data");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Remote load failed, using local data");
                return None;
            }
        };
        let mut matches = match writer.fetch_matches().await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "Remote match load failed, using local data");
                return None;
            }
        };
        matches.sort_by_key(|m| m.id);
        if let Err(e) = check_id_headroom(&players, &matches) {
            warn!(error = %e, "Remote snapshot unusable, using local data");
            return None;
        }
        Some((players, matches))
    }

    async fn remote_match_id_floor(&self) -> Option<MatchId> {
        let writer = self.remote.as_ref()?.writer();
        match writer.next_match_id().await {
            Ok(next) => Some(next),
            Err(e) => {
                debug!(error = %e, "Remote match id unavailable");
                None
            }
        }
    }

    async fn mirror_to_backup(&self, players: &[Player], matches: &[Match]) {
        if let Err(e) = self.backup.mirror_players(players).await {
            warn!(error = %e, "Backup mirror of players failed");
        }
        if let Err(e) = self.backup.mirror_matches(matches).await {
            warn!(error = %e, "Backup mirror of matches failed");
        }
    }

    fn submit_remote<F>(&self, operation: &'static str, build: F)
    where
        F: FnOnce(RemoteWriter) -> RemoteJob,
    {
        if let Some(queue) = &self.remote {
            queue.submit(operation, build);
        }
    }
}

fn backfill_colors(players: &mut [Player]) {
    for player in players.iter_mut().filter(|p| p.color.is_empty()) {
        player.color = DEFAULT_COLOR.to_string();
    }
}

fn unreadable_snapshot(err: StorageError) -> TrackerError {
    match err {
        StorageError::Serialization(e) => TrackerError::Parse(e.to_string()),
        other => TrackerError::Storage(other),
    }
}
