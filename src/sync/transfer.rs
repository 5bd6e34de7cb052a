use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::errors::TrackerError;
use super::session::check_id_headroom;
use crate::ranking::{now_millis, Match, MatchId, Player, PlayerId};

pub const EXPORT_VERSION: &str = "1.0";

/// Full snapshot exchanged through export and import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub last_export: i64,
    pub version: String,
}

impl ExportFile {
    pub fn new(players: Vec<Player>, matches: Vec<Match>) -> Self {
        Self {
            players,
            matches,
            last_export: now_millis(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, TrackerError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Parse(format!("could not serialize export: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportFile {
    players: Vec<Player>,
    matches: Vec<Match>,
    #[serde(default)]
    version: Option<String>,
}

/// Snapshot accepted by import, with duplicate ids already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedData {
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub dropped_duplicates: usize,
    pub reassigned_ids: Vec<(MatchId, MatchId)>,
}

/// What an import replaced the session with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub players: usize,
    pub matches: usize,
    pub dropped_duplicates: usize,
    pub reassigned_ids: usize,
}

impl From<&ImportedData> for ImportSummary {
    fn from(data: &ImportedData) -> Self {
        Self {
            players: data.players.len(),
            matches: data.matches.len(),
            dropped_duplicates: data.dropped_duplicates,
            reassigned_ids: data.reassigned_ids.len(),
        }
    }
}

/// Parses an exported snapshot. Nothing is applied on error.
pub fn parse_import(json: &str) -> Result<ImportedData, TrackerError> {
    let file: ImportFile = serde_json::from_str(json)
        .map_err(|e| TrackerError::Parse(format!("invalid import file: {}", e)))?;

    if let Some(version) = file.version.as_deref() {
        if version != EXPORT_VERSION {
            warn!(version, "Importing snapshot with unexpected version");
        }
    }

    check_id_headroom(&file.players, &file.matches)?;
    let (players, dropped_players) = dedupe_players(file.players);
    let (matches, dropped_matches, reassigned_ids) = dedupe_match_ids(file.matches)?;

    Ok(ImportedData {
        players,
        matches,
        dropped_duplicates: dropped_players + dropped_matches,
        reassigned_ids,
    })
}

/// Keeps the first player seen for each id
fn dedupe_players(players: Vec<Player>) -> (Vec<Player>, usize) {
    let mut seen = HashSet::<PlayerId>::new();
    let before = players.len();
    let kept: Vec<Player> = players
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.id);
            if !fresh {
                warn!(player_id = p.id, "Dropping player with duplicate id");
            }
            fresh
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Drops exact repeats of a match and gives conflicting records sharing an
/// id a fresh `max + 1` id. Stored order is preserved.
fn dedupe_match_ids(
    matches: Vec<Match>,
) -> Result<(Vec<Match>, usize, Vec<(MatchId, MatchId)>), TrackerError> {
    let mut next_id = matches.iter().map(|m| m.id).max().unwrap_or(0).saturating_add(1);
    let mut seen: HashMap<MatchId, Vec<Match>> = HashMap::new();
    let mut kept = Vec::with_capacity(matches.len());
    let mut dropped = 0;
    let mut reassigned = Vec::new();

    for mut m in matches {
        match seen.get_mut(&m.id) {
            None => {
                seen.insert(m.id, vec![m.clone()]);
                kept.push(m);
            }
            Some(previous) if previous.contains(&m) => {
                warn!(match_id = m.id, "Dropping repeated match record");
                dropped += 1;
            }
            Some(previous) => {
                previous.push(m.clone());
                if next_id == MatchId::MAX {
                    return Err(TrackerError::Parse(
                        "no match ids left to resolve conflicts".to_string(),
                    ));
                }
                let original = m.id;
                m.id = next_id;
                next_id += 1;
                warn!(from = original, to = m.id, "Reassigned conflicting match id");
                reassigned.push((original, m.id));
                kept.push(m);
            }
        }
    }

    Ok((kept, dropped, reassigned))
}
