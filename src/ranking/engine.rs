use tracing::debug;

use super::models::{now_millis, Match, Player, Side};

/// Point constants used for both player ratings and team rankings.
pub mod points {
    /// Flat award for each member of the winning pair
    pub const WINNER_BASE: f64 = 3.0;
    /// Flat award for each member of the losing pair
    pub const LOSER_BASE: f64 = 1.0;
    /// Extra winner points per game of score difference
    pub const DIFF_MULTIPLIER: f64 = 0.5;
}

/// Points handed out by a single match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchAward {
    pub winner: Side,
    pub winner_points: f64,
    pub loser_points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsFormula {
    pub winner_base: f64,
    pub loser_base: f64,
    pub diff_multiplier: f64,
}

impl Default for PointsFormula {
    fn default() -> Self {
        Self {
            winner_base: points::WINNER_BASE,
            loser_base: points::LOSER_BASE,
            diff_multiplier: points::DIFF_MULTIPLIER,
        }
    }
}

impl PointsFormula {
    /// Computes the award for a match. Tied scores yield `None`.
    pub fn award(&self, m: &Match) -> Option<MatchAward> {
        let winner = m.winner()?;
        let extra_points = m.score_diff() as f64 * self.diff_multiplier;
        Some(MatchAward {
            winner,
            winner_points: self.winner_base + extra_points,
            loser_points: self.loser_base,
        })
    }
}

/// Folds match results into player statistics.
///
/// Applying the same match twice counts it twice; callers replaying the log
/// must reset the players first (see [`super::recompute::rebuild_all_ratings`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingEngine {
    formula: PointsFormula,
}

impl RatingEngine {
    pub fn new(formula: PointsFormula) -> Self {
        Self { formula }
    }

    pub fn formula(&self) -> &PointsFormula {
        &self.formula
    }

    /// Applies one match to the four referenced players in place.
    ///
    /// Returns `false` without touching anything when a participant is missing
    /// or the score is tied.
    pub fn apply_match_result(&self, m: &Match, players: &mut [Player]) -> bool {
        let participants = m.participants();
        let all_present = participants
            .iter()
            .all(|id| players.iter().any(|p| p.id == *id));
        if !all_present {
            debug!(match_id = m.id, "Skipping match with missing participant");
            return false;
        }

        let Some(award) = self.formula.award(m) else {
            debug!(match_id = m.id, "Skipping tied match");
            return false;
        };

        let winners = m.team(award.winner);
        let losers = m.team(award.winner.opponent());
        let now = now_millis();

        for player in players.iter_mut() {
            if winners.contains(&player.id) {
                player.rating += award.winner_points;
                player.points_history.push(award.winner_points);
                player.wins += 1;
            } else if losers.contains(&player.id) {
                player.rating += award.loser_points;
                player.points_history.push(award.loser_points);
                player.losses += 1;
            } else {
                continue;
            }
            player.matches += 1;
            player.updated_at = now;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn four_players() -> Vec<Player> {
        ["Ana", "Bruno", "Carla", "Diego"]
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as u32 + 1, *name, "#3498db"))
            .collect()
    }

    fn padel_match(team_a: [u32; 2], team_b: [u32; 2], score_a: u32, score_b: u32) -> Match {
        Match {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            team_a,
            team_b,
            score_a,
            score_b,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn winners_get_base_plus_difference_losers_get_flat_point() {
        let engine = RatingEngine::default();
        let mut players = four_players();

        assert!(engine.apply_match_result(&padel_match([1, 2], [3, 4], 6, 3), &mut players));

        for winner in &players[0..2] {
            assert_eq!(winner.rating, 4.5);
            assert_eq!(winner.points_history, vec![4.5]);
            assert_eq!((winner.wins, winner.losses, winner.matches), (1, 0, 1));
        }
        for loser in &players[2..4] {
            assert_eq!(loser.rating, 1.0);
            assert_eq!(loser.points_history, vec![1.0]);
            assert_eq!((loser.wins, loser.losses, loser.matches), (0, 1, 1));
        }
    }

    #[test]
    fn team_b_can_win() {
        let engine = RatingEngine::default();
        let mut players = four_players();

        engine.apply_match_result(&padel_match([1, 2], [3, 4], 2, 7), &mut players);

        assert_eq!(players[2].rating, 5.5);
        assert_eq!(players[0].rating, 1.0);
        assert_eq!(players[0].losses, 1);
    }

    #[test]
    fn missing_participant_leaves_players_untouched() {
        let engine = RatingEngine::default();
        let mut players = four_players();
        players.pop();
        let before = players.clone();

        assert!(!engine.apply_match_result(&padel_match([1, 2], [3, 4], 6, 3), &mut players));
        assert_eq!(players, before);
    }

    #[test]
    fn applying_twice_double_counts() {
        let engine = RatingEngine::default();
        let mut players = four_players();
        let m = padel_match([1, 2], [3, 4], 6, 4);

        engine.apply_match_result(&m, &mut players);
        engine.apply_match_result(&m, &mut players);

        assert_eq!(players[0].rating, 8.0);
        assert_eq!(players[0].matches, 2);
    }

    #[test]
    fn custom_formula_is_honored() {
        let engine = RatingEngine::new(PointsFormula {
            winner_base: 2.0,
            loser_base: 0.0,
            diff_multiplier: 1.0,
        });
        let award = engine
            .formula()
            .award(&padel_match([1, 2], [3, 4], 6, 1))
            .unwrap();
        assert_eq!(award.winner_points, 7.0);
        assert_eq!(award.loser_points, 0.0);
    }
}
