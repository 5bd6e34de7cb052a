use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::ranking::{Match, MatchId, Player, PlayerId};
use crate::storage::{bounded, RemoteError, RemoteStore};

/// Remote store calls, each bounded by the configured timeout
#[derive(Clone)]
pub struct RemoteWriter {
    store: Arc<dyn RemoteStore>,
    timeout: Duration,
}

impl RemoteWriter {
    pub fn new(store: Arc<dyn RemoteStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn fetch_players(&self) -> Result<Vec<Player>, RemoteError> {
        bounded(self.timeout, self.store.fetch_players()).await
    }

    pub async fn fetch_matches(&self) -> Result<Vec<Match>, RemoteError> {
        bounded(self.timeout, self.store.fetch_matches()).await
    }

    pub async fn next_match_id(&self) -> Result<MatchId, RemoteError> {
        bounded(self.timeout, self.store.next_match_id()).await
    }

    pub async fn push_player(&self, player: &Player) -> Result<(), RemoteError> {
        bounded(self.timeout, self.store.push_player(player)).await
    }

    /// Updates the player's document, creating it when the store has none
    pub async fn upsert_player(&self, player: &Player) -> Result<(), RemoteError> {
        match bounded(self.timeout, self.store.update_player(player)).await {
            Err(RemoteError::NotFound(_)) => {
                debug!(player_id = player.id, "Remote player missing, pushing instead");
                self.push_player(player).await
            }
            other => other,
        }
    }

    pub async fn upsert_players(&self, players: &[Player]) -> Result<(), RemoteError> {
        for player in players {
            self.upsert_player(player).await?;
        }
        Ok(())
    }

    pub async fn delete_player(&self, id: PlayerId) -> Result<(), RemoteError> {
        tolerate_missing(bounded(self.timeout, self.store.delete_player(id)).await)
    }

    pub async fn push_match(&self, m: &Match) -> Result<(), RemoteError> {
        bounded(self.timeout, self.store.push_match(m)).await
    }

    pub async fn delete_match(&self, id: MatchId) -> Result<(), RemoteError> {
        tolerate_missing(bounded(self.timeout, self.store.delete_match(id)).await)
    }

    /// Drops any document carrying the match id and pushes the new record
    pub async fn replace_match(&self, m: &Match) -> Result<(), RemoteError> {
        self.delete_match(m.id).await?;
        self.push_match(m).await
    }

    /// Makes both remote collections equal to the given snapshot
    #[instrument(skip_all, fields(players = players.len(), matches = matches.len()))]
    pub async fn mirror_snapshot(
        &self,
        players: &[Player],
        matches: &[Match],
    ) -> Result<(), RemoteError> {
        let kept_players: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
        let remote_players = self.fetch_players().await?;
        for stale in remote_players.iter().filter(|p| !kept_players.contains(&p.id)) {
            self.delete_player(stale.id).await?;
        }
        self.upsert_players(players).await?;

        let kept_matches: HashSet<MatchId> = matches.iter().map(|m| m.id).collect();
        let remote_matches = self.fetch_matches().await?;
        for stale in remote_matches.iter().filter(|m| !kept_matches.contains(&m.id)) {
            self.delete_match(stale.id).await?;
        }
        for m in matches {
            self.replace_match(m).await?;
        }
        Ok(())
    }
}

fn tolerate_missing(result: Result<(), RemoteError>) -> Result<(), RemoteError> {
    match result {
        Err(RemoteError::NotFound(what)) => {
            debug!(what = %what, "Remote document already gone");
            Ok(())
        }
        other => other,
    }
}

/// Counters for background remote writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStatus {
    pub completed: u64,
    pub failed: u64,
    pub last_error: Option<String>,
}

pub type RemoteJob = BoxFuture<'static, Result<(), RemoteError>>;

enum Command {
    Run {
        operation: &'static str,
        job: RemoteJob,
        resync: bool,
    },
    Flush(oneshot::Sender<Vec<RemoteError>>),
}

/// Runs remote writes one at a time, in submission order, off the caller's path
pub struct RemoteQueue {
    writer: RemoteWriter,
    sender: mpsc::UnboundedSender<Command>,
    status: Arc<RwLock<RemoteStatus>>,
    behind: Arc<AtomicBool>,
}

impl RemoteQueue {
    /// Spawns the worker; must be called from within a Tokio runtime
    pub fn spawn(writer: RemoteWriter) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let status = Arc::new(RwLock::new(RemoteStatus::default()));
        let behind = Arc::new(AtomicBool::new(false));
        tokio::spawn(run_worker(receiver, Arc::clone(&status), Arc::clone(&behind)));
        Self {
            writer,
            sender,
            status,
            behind,
        }
    }

    /// Queues a write built from a clone of the bounded writer
    pub fn submit<F>(&self, operation: &'static str, build: F)
    where
        F: FnOnce(RemoteWriter) -> RemoteJob,
    {
        self.send(operation, build(self.writer.clone()), false);
    }

    /// True once a write has failed and no full resync has succeeded since
    pub fn is_behind(&self) -> bool {
        self.behind.load(Ordering::Acquire)
    }

    /// Queues a full mirror of the snapshot; a success clears [`Self::is_behind`]
    pub fn submit_resync(&self, players: Vec<Player>, matches: Vec<Match>) {
        let writer = self.writer.clone();
        let job = async move { writer.mirror_snapshot(&players, &matches).await };
        self.send("resync", Box::pin(job), true);
    }

    fn send(&self, operation: &'static str, job: RemoteJob, resync: bool) {
        let command = Command::Run {
            operation,
            job,
            resync,
        };
        if self.sender.send(command).is_err() {
            warn!(operation, "Remote worker stopped, dropping write");
        }
    }

    /// Waits for every write queued so far and returns the failures seen
    /// since the previous flush
    pub async fn flush(&self) -> Vec<RemoteError> {
        let (reply, done) = oneshot::channel();
        if self.sender.send(Command::Flush(reply)).is_err() {
            return Vec::new();
        }
        done.await.unwrap_or_default()
    }

    pub async fn status(&self) -> RemoteStatus {
        self.status.read().await.clone()
    }

    pub fn writer(&self) -> &RemoteWriter {
        &self.writer
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<Command>,
    status: Arc<RwLock<RemoteStatus>>,
    behind: Arc<AtomicBool>,
) {
    let mut unreported = Vec::new();

    while let Some(command) = receiver.recv().await {
        match command {
            Command::Run {
                operation,
                job,
                resync,
            } => match job.await {
                Ok(()) => {
                    debug!(operation, "Remote write completed");
                    if resync {
                        behind.store(false, Ordering::Release);
                        info!("Remote store caught up with local data");
                    }
                    status.write().await.completed += 1;
                }
                Err(e) => {
                    warn!(operation, error = %e, "Remote write failed, local data kept");
                    behind.store(true, Ordering::Release);
                    let mut status = status.write().await;
                    status.failed += 1;
                    status.last_error = Some(e.to_string());
                    unreported.push(e);
                }
            },
            Command::Flush(reply) => {
                let _ = reply.send(std::mem::take(&mut unreported));
            }
        }
    }

    info!("Remote write worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRemoteStore;
    use futures::FutureExt;

    fn queue(store: Arc<InMemoryRemoteStore>) -> RemoteQueue {
        RemoteQueue::spawn(RemoteWriter::new(store, Duration::from_millis(200)))
    }

    #[tokio::test]
    async fn writes_run_in_submission_order() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let queue = queue(Arc::clone(&store));

        let mut ana = Player::new(1, "Ana", "#3498db");
        let first = ana.clone();
        queue.submit("push", move |w| async move { w.push_player(&first).await }.boxed());
        ana.name = "Ana María".to_string();
        queue.submit("update", move |w| async move { w.upsert_player(&ana).await }.boxed());

        assert!(queue.flush().await.is_empty());
        let players = store.fetch_players().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Ana María");
        assert_eq!(queue.status().await.completed, 2);
    }

    #[tokio::test]
    async fn failures_are_reported_once_by_flush() {
        let store = Arc::new(InMemoryRemoteStore::new());
        store.set_online(false);
        let queue = queue(Arc::clone(&store));

        let player = Player::new(1, "Ana", "#3498db");
        queue.submit("push", move |w| async move { w.push_player(&player).await }.boxed());

        let failures = queue.flush().await;
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], RemoteError::Unavailable(_)));
        assert!(queue.flush().await.is_empty());
        assert_eq!(queue.status().await.failed, 1);
    }

    #[tokio::test]
    async fn upsert_pushes_unknown_player() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let writer = RemoteWriter::new(store.clone(), Duration::from_millis(200));

        writer.upsert_player(&Player::new(9, "Iker", "#1abc9c")).await.unwrap();

        assert_eq!(store.fetch_players().await.unwrap()[0].id, 9);
    }
}
