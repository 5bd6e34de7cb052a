use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use padel_ranking::{
    BackupStore, CoordinatorConfig, InMemoryBackupStore, InMemoryRemoteStore, LocalStore, Match,
    MatchDraft, Player, PlayerId, RemoteStore, SyncCoordinator,
};

use super::mocks::FlakyLocalStore;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const PASSPHRASE: &str = "club-pass";

/// Stores shared between coordinators, like two tabs of the same browser
#[derive(Clone)]
pub struct Tiers {
    pub local: Arc<FlakyLocalStore>,
    pub backup: Arc<InMemoryBackupStore>,
    pub remote: Arc<InMemoryRemoteStore>,
}

impl Tiers {
    pub fn new() -> Self {
        Self {
            local: Arc::new(FlakyLocalStore::new()),
            backup: Arc::new(InMemoryBackupStore::new()),
            remote: Arc::new(InMemoryRemoteStore::new()),
        }
    }

    /// Coordinator over these tiers, not loaded yet
    pub fn coordinator(&self, with_remote: bool, remote_timeout: Duration) -> SyncCoordinator {
        let local: Arc<dyn LocalStore> = self.local.clone();
        let backup: Arc<dyn BackupStore> = self.backup.clone();
        let remote: Arc<dyn RemoteStore> = self.remote.clone();
        SyncCoordinator::new(
            local,
            backup,
            with_remote.then_some(remote),
            CoordinatorConfig {
                remote_timeout,
                edit_passphrase: PASSPHRASE.to_string(),
                ..CoordinatorConfig::default()
            },
        )
    }
}

pub struct TestSetup {
    pub coordinator: Arc<SyncCoordinator>,
    pub tiers: Tiers,
    pub player_ids: Vec<PlayerId>,
}

impl TestSetup {
    /// Registers a match dated 2025-04-01, panicking on rejection
    pub async fn play(
        &self,
        team_a: [PlayerId; 2],
        team_b: [PlayerId; 2],
        a: u32,
        b: u32,
    ) -> Match {
        self.coordinator
            .register_match(draft(team_a, team_b, a, b))
            .await
            .unwrap()
            .into_value()
    }

    pub async fn player(&self, id: PlayerId) -> Player {
        self.coordinator
            .players()
            .await
            .into_iter()
            .find(|p| p.id == id)
            .unwrap()
    }

    /// A second coordinator over the same tiers, loaded and unlocked
    pub async fn second_session(&self) -> SyncCoordinator {
        let other = self.tiers.coordinator(false, Duration::from_millis(200));
        other.load().await.unwrap();
        other.unlock_edit_mode(PASSPHRASE).await.unwrap();
        other
    }
}

pub fn draft(team_a: [PlayerId; 2], team_b: [PlayerId; 2], a: u32, b: u32) -> MatchDraft {
    MatchDraft {
        date: NaiveDate::from_ymd_opt(2025, 4, 1),
        team_a,
        team_b,
        score_a: a,
        score_b: b,
    }
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    tiers: Tiers,
    with_remote: bool,
    remote_timeout: Duration,
    edit_mode: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            tiers: Tiers::new(),
            with_remote: true,
            remote_timeout: Duration::from_millis(200),
            edit_mode: true,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["Ana", "Bruno", "Carla", "Diego"])
    }

    pub fn with_tiers(mut self, tiers: Tiers) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn local_only(mut self) -> Self {
        self.with_remote = false;
        self
    }

    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    pub fn locked(mut self) -> Self {
        self.edit_mode = false;
        self
    }

    pub async fn build(self) -> TestSetup {
        let coordinator = self.tiers.coordinator(self.with_remote, self.remote_timeout);
        coordinator.load().await.unwrap();
        coordinator.unlock_edit_mode(PASSPHRASE).await.unwrap();

        let mut player_ids = Vec::new();
        for name in &self.players {
            let player = coordinator.add_player(name).await.unwrap().into_value();
            player_ids.push(player.id);
        }

        if !self.edit_mode {
            coordinator.lock_edit_mode().await;
        }
        coordinator.flush_remote().await;

        TestSetup {
            coordinator: Arc::new(coordinator),
            tiers: self.tiers,
            player_ids,
        }
    }
}
