use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::errors::StorageError;
use crate::ranking::{Match, MatchId, Player, PlayerId};

/// Secondary object store keyed by entity id.
///
/// Writes are upserts: entities removed from the session stay in the backup.
/// Only read back when the local snapshot cannot be loaded.
#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn mirror_players(&self, players: &[Player]) -> Result<(), StorageError>;
    async fn mirror_matches(&self, matches: &[Match]) -> Result<(), StorageError>;
    async fn recover_players(&self) -> Result<Vec<Player>, StorageError>;
    async fn recover_matches(&self) -> Result<Vec<Match>, StorageError>;
}

#[derive(Debug, Default)]
pub struct InMemoryBackupStore {
    players: RwLock<BTreeMap<PlayerId, Player>>,
    matches: RwLock<BTreeMap<MatchId, Match>>,
}

impl InMemoryBackupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BackupStore for InMemoryBackupStore {
    async fn mirror_players(&self, players: &[Player]) -> Result<(), StorageError> {
        let mut stored = self.players.write().await;
        for player in players {
            stored.insert(player.id, player.clone());
        }
        Ok(())
    }

    async fn mirror_matches(&self, matches: &[Match]) -> Result<(), StorageError> {
        let mut stored = self.matches.write().await;
        for m in matches {
            stored.insert(m.id, m.clone());
        }
        Ok(())
    }

    async fn recover_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.read().await.values().cloned().collect())
    }

    async fn recover_matches(&self) -> Result<Vec<Match>, StorageError> {
        Ok(self.matches.read().await.values().cloned().collect())
    }
}

/// SQLite-backed backup, one table per collection
pub struct SqliteBackupStore {
    pool: SqlitePool,
}

impl SqliteBackupStore {
    /// Opens the database at `path`, creating file and tables when missing
    pub async fn open(path: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        debug!(path, "Opened backup store");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        for table in ["players", "matches"] {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (id INTEGER PRIMARY KEY, body TEXT NOT NULL)"
            ))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn put_all(&self, table: &str, rows: Vec<(u32, String)>) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        for (id, body) in rows {
            sqlx::query(&format!(
                "INSERT OR REPLACE INTO {table} (id, body) VALUES (?1, ?2)"
            ))
            .bind(i64::from(id))
            .bind(body)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn read_all(&self, table: &str) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(&format!("SELECT body FROM {table} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("body").map_err(StorageError::from))
            .collect()
    }
}

#[async_trait]
impl BackupStore for SqliteBackupStore {
    #[instrument(skip(self, players), fields(count = players.len()))]
    async fn mirror_players(&self, players: &[Player]) -> Result<(), StorageError> {
        let rows = players
            .iter()
            .map(|p| -> Result<(u32, String), StorageError> {
                Ok((p.id, serde_json::to_string(p)?))
            })
            .collect::<Result<Vec<_>, StorageError>>()?;
        self.put_all("players", rows).await
    }

    #[instrument(skip(self, matches), fields(count = matches.len()))]
    async fn mirror_matches(&self, matches: &[Match]) -> Result<(), StorageError> {
        let rows = matches
            .iter()
            .map(|m| -> Result<(u32, String), StorageError> {
                Ok((m.id, serde_json::to_string(m)?))
            })
            .collect::<Result<Vec<_>, StorageError>>()?;
        self.put_all("matches", rows).await
    }

    #[instrument(skip(self))]
    async fn recover_players(&self) -> Result<Vec<Player>, StorageError> {
        self.read_all("players")
            .await?
            .iter()
            .map(|body| serde_json::from_str(body).map_err(StorageError::from))
            .collect()
    }

    #[instrument(skip(self))]
    async fn recover_matches(&self) -> Result<Vec<Match>, StorageError> {
        self.read_all("matches")
            .await?
            .iter()
            .map(|body| serde_json::from_str(body).map_err(StorageError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mirror_upserts_by_id_and_keeps_removed_entities() {
        let store = InMemoryBackupStore::new();
        let mut ana = Player::new(1, "Ana", "#3498db");
        store
            .mirror_players(&[ana.clone(), Player::new(2, "Bruno", "#e74c3c")])
            .await
            .unwrap();

        ana.rating = 4.5;
        store.mirror_players(&[ana]).await.unwrap();

        let recovered = store.recover_players().await.unwrap();
        assert_eq!(recovered.len(), 2);
        assert_eq!(recovered[0].rating, 4.5);
    }

    #[tokio::test]
    async fn sqlite_backup_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.db");
        let store = SqliteBackupStore::open(path.to_str().unwrap()).await.unwrap();

        store
            .mirror_players(&[Player::new(4, "Diego", "#9b59b6")])
            .await
            .unwrap();

        let recovered = store.recover_players().await.unwrap();
        assert_eq!(recovered.len(), 1);
        assert_eq!(recovered[0].name, "Diego");
        assert!(store.recover_matches().await.unwrap().is_empty());
    }
}
