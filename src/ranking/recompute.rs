use serde::Serialize;
use tracing::{debug, info};

use super::engine::RatingEngine;
use super::models::{Match, Player};

/// Outcome of a full replay of the match log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeSummary {
    pub applied: usize,
    pub skipped: usize,
}

/// Resets every player's statistics and replays the match log in stored order.
///
/// Matches referencing a player that no longer exists are skipped entirely;
/// the match records themselves are left untouched.
pub fn rebuild_all_ratings(
    engine: &RatingEngine,
    players: &mut [Player],
    matches: &[Match],
) -> RecomputeSummary {
    for player in players.iter_mut() {
        player.reset_stats();
    }

    let mut summary = RecomputeSummary::default();
    for m in matches {
        if engine.apply_match_result(m, players) {
            summary.applied += 1;
        } else {
            debug!(match_id = m.id, "Match excluded from recompute");
            summary.skipped += 1;
        }
    }

    info!(
        players = players.len(),
        applied = summary.applied,
        skipped = summary.skipped,
        "Rebuilt all ratings"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn players() -> Vec<Player> {
        (1..=5)
            .map(|id| Player::new(id, format!("Player {}", id), "#2ecc71"))
            .collect()
    }

    fn padel_match(id: u32, team_a: [u32; 2], team_b: [u32; 2], score_a: u32, score_b: u32) -> Match {
        Match {
            id,
            date: NaiveDate::from_ymd_opt(2025, 1, id).unwrap(),
            team_a,
            team_b,
            score_a,
            score_b,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn stats(players: &[Player]) -> Vec<(u32, f64, u32, u32, u32, Vec<f64>)> {
        players
            .iter()
            .map(|p| {
                (
                    p.id,
                    p.rating,
                    p.matches,
                    p.wins,
                    p.losses,
                    p.points_history.clone(),
                )
            })
            .collect()
    }

    #[test]
    fn recompute_is_idempotent() {
        let engine = RatingEngine::default();
        let matches = vec![
            padel_match(1, [1, 2], [3, 4], 6, 3),
            padel_match(2, [1, 5], [2, 3], 4, 6),
        ];
        let mut roster = players();

        rebuild_all_ratings(&engine, &mut roster, &matches);
        let once = stats(&roster);
        rebuild_all_ratings(&engine, &mut roster, &matches);

        assert_eq!(stats(&roster), once);
    }

    #[test]
    fn recompute_matches_fresh_incremental_application() {
        let engine = RatingEngine::default();
        let second = padel_match(2, [1, 5], [2, 3], 4, 6);

        let mut replayed = players();
        engine.apply_match_result(&padel_match(1, [1, 2], [3, 4], 6, 3), &mut replayed);
        engine.apply_match_result(&second, &mut replayed);
        rebuild_all_ratings(&engine, &mut replayed, std::slice::from_ref(&second));

        let mut fresh = players();
        engine.apply_match_result(&second, &mut fresh);

        assert_eq!(stats(&replayed), stats(&fresh));
    }

    #[test]
    fn matches_with_deleted_players_are_skipped() {
        let engine = RatingEngine::default();
        let matches = vec![
            padel_match(1, [1, 2], [3, 9], 6, 3),
            padel_match(2, [1, 2], [3, 4], 6, 5),
        ];
        let mut roster = players();

        let summary = rebuild_all_ratings(&engine, &mut roster, &matches);

        assert_eq!(summary, RecomputeSummary { applied: 1, skipped: 1 });
        assert_eq!(roster[0].points_history, vec![3.5]);
        for p in &roster {
            assert_eq!(p.rating, p.points_history.iter().sum::<f64>());
            assert_eq!(p.matches as usize, p.points_history.len());
            assert_eq!(p.matches, p.wins + p.losses);
        }
    }
}
