use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Player identifier, assigned as `max(existing) + 1`
pub type PlayerId = u32;

/// Match identifier, assigned as `max(existing) + 1`
pub type MatchId = u32;

/// Current wall-clock time as epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A registered club player together with their derived statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    /// One entry per counted match, in the order the matches were applied.
    /// Older snapshots may not carry it at all.
    #[serde(default)]
    pub points_history: Vec<f64>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Player {
    /// Creates a player with zeroed statistics
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id,
            name: name.into(),
            rating: 0.0,
            matches: 0,
            wins: 0,
            losses: 0,
            points_history: Vec::new(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Clears every derived statistic ahead of a full replay
    pub fn reset_stats(&mut self) {
        self.rating = 0.0;
        self.matches = 0;
        self.wins = 0;
        self.losses = 0;
        self.points_history.clear();
    }

    /// Mean of the per-match awards, 0 when the player has no matches
    pub fn average_points(&self) -> f64 {
        average(&self.points_history)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// A doubles match between two pairs of players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub date: NaiveDate,
    pub team_a: [PlayerId; 2],
    pub team_b: [PlayerId; 2],
    pub score_a: u32,
    pub score_b: u32,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Match {
    /// All four participants, team A first
    pub fn participants(&self) -> [PlayerId; 4] {
        [self.team_a[0], self.team_a[1], self.team_b[0], self.team_b[1]]
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.participants().contains(&player_id)
    }

    /// Which side won; `None` only for a tied score, which validation rejects
    pub fn winner(&self) -> Option<Side> {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn team(&self, side: Side) -> [PlayerId; 2] {
        match side {
            Side::A => self.team_a,
            Side::B => self.team_b,
        }
    }

    pub fn score_diff(&self) -> u32 {
        self.score_a.abs_diff(self.score_b)
    }
}

/// One side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Pairing-level statistics derived from the match log. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub key: String,
    /// The pair as listed on the first match seen for this key
    pub players: [PlayerId; 2],
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub points: f64,
    pub points_history: Vec<f64>,
}

impl TeamStats {
    pub fn new(key: String, players: [PlayerId; 2]) -> Self {
        Self {
            key,
            players,
            matches: 0,
            wins: 0,
            losses: 0,
            points: 0.0,
            points_history: Vec::new(),
        }
    }

    pub fn average_points(&self) -> f64 {
        average(&self.points_history)
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
