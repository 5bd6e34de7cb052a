use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{PgPool, Row};
use strum::IntoEnumIterator;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::errors::RemoteError;
use super::wire::{Collection, MatchDocument, PlayerDocument};
use crate::ranking::{Match, MatchId, Player, PlayerId};

/// Remote document store mirroring the `jugadores` and `partidos` collections.
///
/// Implementations work in wire documents; the trait surface speaks the core
/// vocabulary and translates at the boundary.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch_players(&self) -> Result<Vec<Player>, RemoteError>;
    async fn push_player(&self, player: &Player) -> Result<(), RemoteError>;
    /// Overwrites the document carrying `player.id`; `NotFound` when absent
    async fn update_player(&self, player: &Player) -> Result<(), RemoteError>;
    async fn delete_player(&self, id: PlayerId) -> Result<(), RemoteError>;
    async fn fetch_matches(&self) -> Result<Vec<Match>, RemoteError>;
    async fn push_match(&self, m: &Match) -> Result<(), RemoteError>;
    async fn delete_match(&self, id: MatchId) -> Result<(), RemoteError>;
    /// `max(existing match ids) + 1`, or 1 for an empty collection
    async fn next_match_id(&self) -> Result<MatchId, RemoteError>;
}

/// Runs a remote call, turning an overrun into [`RemoteError::Timeout`]
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, RemoteError>
where
    F: Future<Output = Result<T, RemoteError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(RemoteError::Timeout(limit)),
    }
}

#[derive(Debug, Clone)]
struct StoredDocument {
    doc_id: String,
    entity_id: u32,
    body: serde_json::Value,
}

/// In-memory document store for development and testing.
///
/// Documents get random ids like a hosted document database would, and the
/// store can be taken offline or slowed down to exercise degraded paths.
#[derive(Debug)]
pub struct InMemoryRemoteStore {
    players: RwLock<Vec<StoredDocument>>,
    matches: RwLock<Vec<StoredDocument>>,
    online: AtomicBool,
    latency: RwLock<Option<Duration>>,
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self {
            players: RwLock::new(Vec::new()),
            matches: RwLock::new(Vec::new()),
            online: AtomicBool::new(true),
            latency: RwLock::new(None),
        }
    }

    /// Simulates losing (or regaining) connectivity
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Delays every call by `latency`
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().await = latency;
    }

    /// Inserts a raw document as another client might have written it
    pub async fn insert_raw(
        &self,
        collection: Collection,
        body: serde_json::Value,
    ) -> Result<(), RemoteError> {
        let raw_id = body
            .get("id")
            .and_then(|id| {
                id.as_u64()
                    .or_else(|| id.as_str().and_then(|s| s.parse().ok()))
            })
            .ok_or_else(|| RemoteError::Malformed("document without id".to_string()))?;
        let entity_id = u32::try_from(raw_id)
            .map_err(|_| RemoteError::Malformed(format!("document id out of range: {raw_id}")))?;
        self.collection(collection).write().await.push(StoredDocument {
            doc_id: Uuid::new_v4().to_string(),
            entity_id,
            body,
        });
        Ok(())
    }

    pub async fn document_count(&self, collection: Collection) -> usize {
        self.collection(collection).read().await.len()
    }

    fn collection(&self, collection: Collection) -> &RwLock<Vec<StoredDocument>> {
        match collection {
            Collection::Players => &self.players,
            Collection::Matches => &self.matches,
        }
    }

    async fn gate(&self) -> Result<(), RemoteError> {
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if !self.online.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("remote store offline".to_string()));
        }
        Ok(())
    }

    async fn fetch<D, T>(&self, collection: Collection) -> Result<Vec<T>, RemoteError>
    where
        D: DeserializeOwned + Into<T>,
    {
        self.gate().await?;
        let docs = self.collection(collection).read().await;
        let mut entities = Vec::with_capacity(docs.len());
        for doc in docs.iter() {
            match serde_json::from_value::<D>(doc.body.clone()) {
                Ok(parsed) => entities.push(parsed.into()),
                Err(e) => {
                    warn!(%collection, doc_id = %doc.doc_id, error = %e, "Skipping malformed document")
                }
            }
        }
        Ok(entities)
    }

    async fn insert<D: Serialize>(
        &self,
        collection: Collection,
        entity_id: u32,
        doc: &D,
    ) -> Result<(), RemoteError> {
        self.gate().await?;
        let body = serde_json::to_value(doc)?;
        let doc_id = Uuid::new_v4().to_string();
        debug!(%collection, %doc_id, entity_id, "Adding remote document");
        self.collection(collection).write().await.push(StoredDocument {
            doc_id,
            entity_id,
            body,
        });
        Ok(())
    }

    async fn remove(&self, collection: Collection, entity_id: u32) -> Result<(), RemoteError> {
        self.gate().await?;
        let mut docs = self.collection(collection).write().await;
        let before = docs.len();
        docs.retain(|doc| doc.entity_id != entity_id);
        if docs.len() == before {
            return Err(RemoteError::NotFound(format!("{collection}/{entity_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    #[instrument(skip(self))]
    async fn fetch_players(&self) -> Result<Vec<Player>, RemoteError> {
        self.fetch::<PlayerDocument, Player>(Collection::Players)
            .await
    }

    #[instrument(skip(self, player), fields(player_id = player.id))]
    async fn push_player(&self, player: &Player) -> Result<(), RemoteError> {
        self.insert(Collection::Players, player.id, &PlayerDocument::from(player))
            .await
    }

    #[instrument(skip(self, player), fields(player_id = player.id))]
    async fn update_player(&self, player: &Player) -> Result<(), RemoteError> {
        self.gate().await?;
        let body = serde_json::to_value(PlayerDocument::from(player))?;
        let mut docs = self.players.write().await;
        let mut found = false;
        for doc in docs.iter_mut().filter(|doc| doc.entity_id == player.id) {
            doc.body = body.clone();
            found = true;
        }
        if !found {
            return Err(RemoteError::NotFound(format!(
                "{}/{}",
                Collection::Players,
                player.id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, id: PlayerId) -> Result<(), RemoteError> {
        self.remove(Collection::Players, id).await
    }

    #[instrument(skip(self))]
    async fn fetch_matches(&self) -> Result<Vec<Match>, RemoteError> {
        self.fetch::<MatchDocument, Match>(Collection::Matches)
            .await
    }

    #[instrument(skip(self, m), fields(match_id = m.id))]
    async fn push_match(&self, m: &Match) -> Result<(), RemoteError> {
        self.insert(Collection::Matches, m.id, &MatchDocument::from(m))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, id: MatchId) -> Result<(), RemoteError> {
        self.remove(Collection::Matches, id).await
    }

    #[instrument(skip(self))]
    async fn next_match_id(&self) -> Result<MatchId, RemoteError> {
        self.gate().await?;
        let docs = self.matches.read().await;
        let max_id = docs.iter().map(|doc| doc.entity_id).max().unwrap_or(0);
        max_id
            .checked_add(1)
            .ok_or_else(|| RemoteError::Malformed(format!("match id out of range: {max_id}")))
    }
}

/// PostgreSQL-backed document store: one table per collection holding the
/// serialized wire document next to its entity id
pub struct PostgresRemoteStore {
    pool: PgPool,
}

impl PostgresRemoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the collection tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), RemoteError> {
        for collection in Collection::iter() {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {collection} (doc_id TEXT PRIMARY KEY, entity_id BIGINT NOT NULL, body TEXT NOT NULL)"
            ))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn fetch<D, T>(&self, collection: Collection) -> Result<Vec<T>, RemoteError>
    where
        D: DeserializeOwned + Into<T>,
    {
        let rows = sqlx::query(&format!(
            "SELECT doc_id, body FROM {collection} ORDER BY entity_id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(%collection, error = %e, "Failed to fetch remote collection");
            RemoteError::from(e)
        })?;

        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            let doc_id: String = row.try_get("doc_id")?;
            let body: String = row.try_get("body")?;
            match serde_json::from_str::<D>(&body) {
                Ok(parsed) => entities.push(parsed.into()),
                Err(e) => {
                    warn!(%collection, %doc_id, error = %e, "Skipping malformed document")
                }
            }
        }
        Ok(entities)
    }

    async fn insert<D: Serialize>(
        &self,
        collection: Collection,
        entity_id: u32,
        doc: &D,
    ) -> Result<(), RemoteError> {
        let body = serde_json::to_string(doc)?;
        sqlx::query(&format!(
            "INSERT INTO {collection} (doc_id, entity_id, body) VALUES ($1, $2, $3)"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(i64::from(entity_id))
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, collection: Collection, entity_id: u32) -> Result<(), RemoteError> {
        let result = sqlx::query(&format!("DELETE FROM {collection} WHERE entity_id = $1"))
            .bind(i64::from(entity_id))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RemoteError::NotFound(format!("{collection}/{entity_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for PostgresRemoteStore {
    #[instrument(skip(self))]
    async fn fetch_players(&self) -> Result<Vec<Player>, RemoteError> {
        self.fetch::<PlayerDocument, Player>(Collection::Players)
            .await
    }

    #[instrument(skip(self, player), fields(player_id = player.id))]
    async fn push_player(&self, player: &Player) -> Result<(), RemoteError> {
        self.insert(Collection::Players, player.id, &PlayerDocument::from(player))
            .await
    }

    #[instrument(skip(self, player), fields(player_id = player.id))]
    async fn update_player(&self, player: &Player) -> Result<(), RemoteError> {
        let body = serde_json::to_string(&PlayerDocument::from(player))?;
        let result = sqlx::query(&format!(
            "UPDATE {} SET body = $1 WHERE entity_id = $2",
            Collection::Players
        ))
        .bind(body)
        .bind(i64::from(player.id))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RemoteError::NotFound(format!(
                "{}/{}",
                Collection::Players,
                player.id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, id: PlayerId) -> Result<(), RemoteError> {
        self.remove(Collection::Players, id).await
    }

    #[instrument(skip(self))]
    async fn fetch_matches(&self) -> Result<Vec<Match>, RemoteError> {
        self.fetch::<MatchDocument, Match>(Collection::Matches)
            .await
    }

    #[instrument(skip(self, m), fields(match_id = m.id))]
    async fn push_match(&self, m: &Match) -> Result<(), RemoteError> {
        self.insert(Collection::Matches, m.id, &MatchDocument::from(m))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, id: MatchId) -> Result<(), RemoteError> {
        self.remove(Collection::Matches, id).await
    }

    #[instrument(skip(self))]
    async fn next_match_id(&self) -> Result<MatchId, RemoteError> {
        let row = sqlx::query(&format!(
            "SELECT COALESCE(MAX(entity_id), 0) AS max_id FROM {}",
            Collection::Matches
        ))
        .fetch_one(&self.pool)
        .await?;
        let max_id: i64 = row.try_get("max_id")?;
        u32::try_from(max_id + 1)
            .map_err(|_| RemoteError::Malformed(format!("match id out of range: {max_id}")))
    }
}
