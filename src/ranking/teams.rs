use std::collections::BTreeMap;

use super::engine::PointsFormula;
use super::models::{Match, PlayerId, Side, TeamStats};

/// Composite key of a pair: both ids sorted ascending, joined with `-`
pub fn team_key(pair: [PlayerId; 2]) -> String {
    let (low, high) = if pair[0] <= pair[1] {
        (pair[0], pair[1])
    } else {
        (pair[1], pair[0])
    };
    format!("{}-{}", low, high)
}

/// Derives pairing statistics from the full match log.
///
/// A pair accumulates on the same key whichever side it was listed on. Tied
/// matches carry no winner and are ignored.
pub fn compute_team_stats(matches: &[Match], formula: &PointsFormula) -> BTreeMap<String, TeamStats> {
    let mut teams: BTreeMap<String, TeamStats> = BTreeMap::new();

    for m in matches {
        let Some(award) = formula.award(m) else {
            continue;
        };

        for side in [Side::A, Side::B] {
            let pair = m.team(side);
            let key = team_key(pair);
            let team = teams
                .entry(key.clone())
                .or_insert_with(|| TeamStats::new(key, pair));

            team.matches += 1;
            let earned = if side == award.winner {
                team.wins += 1;
                award.winner_points
            } else {
                team.losses += 1;
                award.loser_points
            };
            team.points += earned;
            team.points_history.push(earned);
        }
    }

    teams
}
