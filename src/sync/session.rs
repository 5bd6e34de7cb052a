use serde::Serialize;
use strum_macros::Display;

use super::errors::TrackerError;
use crate::ranking::{Match, MatchId, Player, PlayerId};

/// Rejects snapshots whose ids leave no room to allocate a successor
pub fn check_id_headroom(players: &[Player], matches: &[Match]) -> Result<(), TrackerError> {
    if let Some(p) = players.iter().find(|p| p.id == PlayerId::MAX) {
        return Err(TrackerError::Parse(format!("player id {} is out of range", p.id)));
    }
    if let Some(m) = matches.iter().find(|m| m.id == MatchId::MAX) {
        return Err(TrackerError::Parse(format!("match id {} is out of range", m.id)));
    }
    Ok(())
}

/// Reconciliation state of the in-memory tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum SyncState {
    /// Nothing loaded yet
    Cold,
    /// Memory matches the last successful local write
    Loaded,
    /// Memory changed and the local write has not succeeded yet
    Dirty,
}

/// Live collections of one tracker session
#[derive(Debug)]
pub struct Session {
    players: Vec<Player>,
    matches: Vec<Match>,
    next_player_id: PlayerId,
    match_id_floor: MatchId,
    last_sync: i64,
    edit_mode: bool,
    state: SyncState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            matches: Vec::new(),
            next_player_id: 1,
            match_id_floor: 1,
            last_sync: 0,
            edit_mode: false,
            state: SyncState::Cold,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut Vec<Player> {
        &mut self.players
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn matches_mut(&mut self) -> &mut Vec<Match> {
        &mut self.matches
    }

    /// Players and matches together, for recomputing with the log borrowed
    pub fn split_mut(&mut self) -> (&mut Vec<Player>, &Vec<Match>) {
        (&mut self.players, &self.matches)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn match_index(&self, id: MatchId) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    /// Replaces both collections wholesale and recomputes the id counters.
    /// Out-of-range ids are rejected before anything is swapped in.
    pub fn replace(&mut self, players: Vec<Player>, matches: Vec<Match>) -> Result<(), TrackerError> {
        check_id_headroom(&players, &matches)?;
        self.next_player_id = players.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        self.players = players;
        self.matches = matches;
        Ok(())
    }

    /// Hands out the next player id. Ids freed by deletions are not reused
    /// until the next load.
    pub fn allocate_player_id(&mut self) -> Result<PlayerId, TrackerError> {
        let id = self.next_player_id;
        self.next_player_id = id
            .checked_add(1)
            .ok_or_else(|| TrackerError::validation("no player ids left"))?;
        Ok(id)
    }

    pub fn next_player_id(&self) -> PlayerId {
        self.next_player_id
    }

    /// `max(loaded match ids) + 1`, never below the floor reported by the
    /// remote store at load time
    pub fn next_match_id(&self) -> Result<MatchId, TrackerError> {
        let local_next = self
            .matches
            .iter()
            .map(|m| m.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| TrackerError::validation("no match ids left"))?;
        Ok(local_next.max(self.match_id_floor))
    }

    pub fn raise_match_id_floor(&mut self, floor: MatchId) {
        self.match_id_floor = self.match_id_floor.max(floor);
    }

    pub fn last_sync(&self) -> i64 {
        self.last_sync
    }

    pub fn set_last_sync(&mut self, stamp: i64) {
        self.last_sync = stamp;
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn set_state(&mut self, state: SyncState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_match(id: MatchId) -> Match {
        Match {
            id,
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            team_a: [1, 2],
            team_b: [3, 4],
            score_a: 6,
            score_b: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn replace_recomputes_next_player_id() {
        let mut session = Session::new();
        session
            .replace(
                vec![Player::new(3, "Carla", "#2ecc71"), Player::new(8, "Hugo", "#f39c12")],
                vec![],
            )
            .unwrap();
        assert_eq!(session.next_player_id(), 9);

        session.replace(vec![], vec![]).unwrap();
        assert_eq!(session.next_player_id(), 1);
    }

    #[test]
    fn allocated_ids_are_not_reused_after_deletion() {
        let mut session = Session::new();
        session
            .replace(vec![Player::new(1, "Ana", "#3498db")], vec![])
            .unwrap();

        let id = session.allocate_player_id().unwrap();
        session.players_mut().retain(|p| p.id != 1);

        assert_eq!(id, 2);
        assert_eq!(session.allocate_player_id().unwrap(), 3);
    }

    #[test]
    fn match_ids_follow_max_not_count() {
        let mut session = Session::new();
        session
            .replace(vec![], vec![sample_match(1), sample_match(5)])
            .unwrap();
        assert_eq!(session.next_match_id().unwrap(), 6);

        session.raise_match_id_floor(10);
        assert_eq!(session.next_match_id().unwrap(), 10);
    }

    #[test]
    fn max_ids_are_rejected_without_touching_the_session() {
        let mut session = Session::new();
        session
            .replace(vec![Player::new(1, "Ana", "#3498db")], vec![sample_match(2)])
            .unwrap();

        let result = session.replace(vec![Player::new(u32::MAX, "Zoe", "#3498db")], vec![]);
        assert!(matches!(result, Err(TrackerError::Parse(_))));
        let result = session.replace(vec![], vec![sample_match(u32::MAX)]);
        assert!(matches!(result, Err(TrackerError::Parse(_))));

        assert_eq!(session.players()[0].name, "Ana");
        assert_eq!(session.matches()[0].id, 2);
        assert_eq!(session.next_player_id(), 2);
    }

    #[test]
    fn allocation_stops_at_the_last_id() {
        let mut session = Session::new();
        session
            .replace(vec![Player::new(u32::MAX - 1, "Ana", "#3498db")], vec![])
            .unwrap();

        assert!(matches!(
            session.allocate_player_id(),
            Err(TrackerError::Validation(_))
        ));
        assert_eq!(session.next_player_id(), u32::MAX);
    }
}
