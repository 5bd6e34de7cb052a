use std::collections::HashSet;

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use super::errors::TrackerError;
use crate::ranking::{Player, PlayerId};

/// Players needed on the roster before a match can be registered
pub const MIN_PLAYERS_FOR_MATCH: usize = 4;

/// Match as submitted by the presentation layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDraft {
    /// Defaults to today in the club's time zone
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub team_a: [PlayerId; 2],
    pub team_b: [PlayerId; 2],
    pub score_a: u32,
    pub score_b: u32,
}

/// Trims the name and capitalizes its first letter
pub fn normalize_name(raw: &str) -> Result<String, TrackerError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return Err(TrackerError::validation("player name cannot be empty"));
    };
    Ok(first.to_uppercase().chain(chars).collect())
}

/// Rejects a name already used by another player, ignoring case
pub fn ensure_unique_name(
    name: &str,
    players: &[Player],
    except: Option<PlayerId>,
) -> Result<(), TrackerError> {
    let taken = players
        .iter()
        .any(|p| Some(p.id) != except && p.has_name(name));
    if taken {
        return Err(TrackerError::Validation(format!(
            "a player named \"{}\" already exists",
            name
        )));
    }
    Ok(())
}

/// Gate ahead of registering or editing a match
pub fn validate_match(draft: &MatchDraft, players: &[Player]) -> Result<(), TrackerError> {
    if players.len() < MIN_PLAYERS_FOR_MATCH {
        return Err(TrackerError::Validation(format!(
            "at least {} players are required to register a match",
            MIN_PLAYERS_FOR_MATCH
        )));
    }

    let ids = [draft.team_a[0], draft.team_a[1], draft.team_b[0], draft.team_b[1]];
    let distinct: HashSet<PlayerId> = ids.iter().copied().collect();
    if distinct.len() < ids.len() {
        return Err(TrackerError::validation(
            "a player cannot appear twice in the same match",
        ));
    }

    if let Some(unknown) = ids.iter().find(|id| !players.iter().any(|p| p.id == **id)) {
        return Err(TrackerError::Validation(format!("unknown player id {}", unknown)));
    }

    if draft.score_a == draft.score_b {
        return Err(TrackerError::validation("a match cannot end in a draw"));
    }

    Ok(())
}

/// Today's date at a fixed offset from UTC
pub fn today_at_offset(utc_offset_hours: i32) -> NaiveDate {
    (Utc::now() + Duration::hours(i64::from(utc_offset_hours))).date_naive()
}
