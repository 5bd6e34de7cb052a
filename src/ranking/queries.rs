use std::cmp::Ordering;

use serde::Serialize;

use super::models::{Match, Player, PlayerId, TeamStats};

/// Number of players highlighted at the top of the ranking
pub const PODIUM_SIZE: usize = 3;

/// Default length of the recent match history
pub const DEFAULT_HISTORY_LIMIT: usize = 15;

/// Headline figures shown next to the rankings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingHighlights {
    pub best_player: Option<PlayerAverage>,
    pub best_team: Option<TeamAverage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAverage {
    pub player_id: PlayerId,
    pub name: String,
    pub average_points: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAverage {
    pub key: String,
    pub players: [PlayerId; 2],
    pub average_points: f64,
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Players ordered by rating, highest first
pub fn player_ranking(players: &[Player]) -> Vec<Player> {
    let mut ranked = players.to_vec();
    ranked.sort_by(|a, b| descending(a.rating, b.rating));
    ranked
}

pub fn top_players(players: &[Player]) -> Vec<Player> {
    player_ranking(players)
        .into_iter()
        .take(PODIUM_SIZE)
        .collect()
}

/// Player with the best points-per-match among those with at least one match
pub fn best_average_player(players: &[Player]) -> Option<PlayerAverage> {
    players
        .iter()
        .filter(|p| p.matches > 0)
        .min_by(|a, b| descending(a.average_points(), b.average_points()))
        .map(|p| PlayerAverage {
            player_id: p.id,
            name: p.name.clone(),
            average_points: p.average_points(),
        })
}

fn team_is_active(team: &TeamStats, players: &[Player]) -> bool {
    team.matches > 0 && team.players.iter().all(|id| players.iter().any(|p| p.id == *id))
}

/// Teams with at least one match and both members still registered, by points
pub fn team_ranking<'a>(
    teams: impl IntoIterator<Item = &'a TeamStats>,
    players: &[Player],
) -> Vec<TeamStats> {
    let mut ranked: Vec<TeamStats> = teams
        .into_iter()
        .filter(|team| team_is_active(team, players))
        .cloned()
        .collect();
    ranked.sort_by(|a, b| descending(a.points, b.points));
    ranked
}

pub fn best_average_team<'a>(
    teams: impl IntoIterator<Item = &'a TeamStats>,
    players: &[Player],
) -> Option<TeamAverage> {
    teams
        .into_iter()
        .filter(|team| team_is_active(team, players))
        .min_by(|a, b| descending(a.average_points(), b.average_points()))
        .map(|team| TeamAverage {
            key: team.key.clone(),
            players: team.players,
            average_points: team.average_points(),
        })
}

/// Most recent matches first (id descending, then date), skipping matches
/// whose participants are no longer all registered
pub fn match_history(matches: &[Match], players: &[Player], limit: usize) -> Vec<Match> {
    let mut recent: Vec<Match> = matches
        .iter()
        .filter(|m| {
            m.participants()
                .iter()
                .all(|id| players.iter().any(|p| p.id == *id))
        })
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.id.cmp(&a.id).then_with(|| b.date.cmp(&a.date)));
    recent.truncate(limit);
    recent
}
