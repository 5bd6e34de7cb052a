// Public API - what other modules can use
pub use engine::{points, MatchAward, PointsFormula, RatingEngine};
pub use models::{now_millis, Match, MatchId, Player, PlayerId, Side, TeamStats};
pub use recompute::{rebuild_all_ratings, RecomputeSummary};
pub use teams::{compute_team_stats, team_key};

// Internal modules
mod engine;
pub mod models;
pub mod palette;
pub mod queries;
mod recompute;
mod teams;
