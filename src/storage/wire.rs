//! Document shapes of the remote store and their translation to the core
//! `Player` / `Match` vocabulary.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumIter};

use crate::ranking::{now_millis, Match, Player, PlayerId};

/// Remote collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Collection {
    #[strum(to_string = "jugadores")]
    Players,
    #[strum(to_string = "partidos")]
    Matches,
}

/// Document in the `jugadores` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDocument {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub points_history: Vec<f64>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Document in the `partidos` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDocument {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u32,
    pub fecha: NaiveDate,
    #[serde(rename = "parejaA", deserialize_with = "lenient_pair")]
    pub pareja_a: [PlayerId; 2],
    #[serde(rename = "parejaB", deserialize_with = "lenient_pair")]
    pub pareja_b: [PlayerId; 2],
    #[serde(rename = "puntosA")]
    pub puntos_a: u32,
    #[serde(rename = "puntosB")]
    pub puntos_b: u32,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl From<&Player> for PlayerDocument {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            rating: player.rating,
            matches: player.matches,
            wins: player.wins,
            losses: player.losses,
            points_history: player.points_history.clone(),
            color: player.color.clone(),
            created_at: Some(player.created_at),
            updated_at: Some(player.updated_at),
        }
    }
}

impl From<PlayerDocument> for Player {
    fn from(doc: PlayerDocument) -> Self {
        let now = now_millis();
        Self {
            id: doc.id,
            name: doc.name,
            rating: doc.rating,
            matches: doc.matches,
            wins: doc.wins,
            losses: doc.losses,
            points_history: doc.points_history,
            color: doc.color,
            created_at: doc.created_at.unwrap_or(now),
            updated_at: doc.updated_at.unwrap_or(now),
        }
    }
}

impl From<&Match> for MatchDocument {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id,
            fecha: m.date,
            pareja_a: m.team_a,
            pareja_b: m.team_b,
            puntos_a: m.score_a,
            puntos_b: m.score_b,
            created_at: Some(m.created_at),
            updated_at: Some(m.updated_at),
        }
    }
}

impl From<MatchDocument> for Match {
    fn from(doc: MatchDocument) -> Self {
        let now = now_millis();
        Self {
            id: doc.id,
            date: doc.fecha,
            team_a: doc.pareja_a,
            team_b: doc.pareja_b,
            score_a: doc.puntos_a,
            score_b: doc.puntos_b,
            created_at: doc.created_at.unwrap_or(now),
            updated_at: doc.updated_at.unwrap_or(now),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u32),
    Text(String),
}

impl NumberOrText {
    fn into_id<E: serde::de::Error>(self) -> Result<u32, E> {
        match self {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid numeric id: {s}"))),
        }
    }
}

/// Ids written by older clients may be stored as strings
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    NumberOrText::deserialize(deserializer)?.into_id()
}

fn lenient_pair<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u32; 2], D::Error> {
    let [first, second] = <[NumberOrText; 2]>::deserialize(deserializer)?;
    Ok([first.into_id()?, second.into_id()?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn match_maps_to_spanish_field_names() {
        let m = Match {
            id: 12,
            date: NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(),
            team_a: [1, 2],
            team_b: [3, 4],
            score_a: 6,
            score_b: 4,
            created_at: 100,
            updated_at: 200,
        };

        let doc = serde_json::to_value(MatchDocument::from(&m)).unwrap();
        assert_eq!(
            doc,
            json!({
                "id": 12,
                "fecha": "2025-07-09",
                "parejaA": [1, 2],
                "parejaB": [3, 4],
                "puntosA": 6,
                "puntosB": 4,
                "createdAt": 100,
                "updatedAt": 200
            })
        );
    }

    #[test]
    fn string_ids_and_missing_timestamps_are_tolerated() {
        let doc: MatchDocument = serde_json::from_value(json!({
            "id": "7",
            "fecha": "2025-01-02",
            "parejaA": ["1", 2],
            "parejaB": [3, "4"],
            "puntosA": 3,
            "puntosB": 6
        }))
        .unwrap();

        let m = Match::from(doc);
        assert_eq!(m.id, 7);
        assert_eq!(m.team_a, [1, 2]);
        assert_eq!(m.team_b, [3, 4]);
        assert!(m.created_at > 0);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let result: Result<PlayerDocument, _> =
            serde_json::from_value(json!({"id": "abc", "name": "Ana"}));
        assert!(result.is_err());
    }

    #[test]
    fn collection_names_match_remote_layout() {
        let names: Vec<String> = Collection::iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["jugadores", "partidos"]);
    }
}
