//! Match (game), its score and result, and the bracket slot of playoff matches.

use crate::models::ids::{MatchId, PlayerId, SeasonKey};
use crate::models::playoff::PlayoffInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the match (player 1 or player 2).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// Regular-season match or playoff bracket match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Regular,
    Playoff,
}

/// Games won by each player in one set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub player_1_games: u32,
    pub player_2_games: u32,
}

impl SetScore {
    pub fn new(player_1_games: u32, player_2_games: u32) -> Self {
        Self {
            player_1_games,
            player_2_games,
        }
    }

    /// Side with the higher game count; `None` for a tied (invalid) set.
    pub fn winner(&self) -> Option<Side> {
        use std::cmp::Ordering::*;
        match self.player_1_games.cmp(&self.player_2_games) {
            Greater => Some(Side::One),
            Less => Some(Side::Two),
            Equal => None,
        }
    }
}

/// Score of a completed match. A walkover has no sets.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub sets: Vec<SetScore>,
    #[serde(default)]
    pub walkover: bool,
    /// Side that retired mid-match, if any. Sets played before retiring still count.
    #[serde(default)]
    pub retired: Option<Side>,
}

impl Score {
    pub fn sets(sets: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self {
            sets: sets.into_iter().map(|(a, b)| SetScore::new(a, b)).collect(),
            walkover: false,
            retired: None,
        }
    }

    pub fn walkover() -> Self {
        Self {
            sets: Vec::new(),
            walkover: true,
            retired: None,
        }
    }

    pub fn retired(sets: impl IntoIterator<Item = (u32, u32)>, retired: Side) -> Self {
        Self {
            retired: Some(retired),
            ..Self::sets(sets)
        }
    }
}

/// Both players' ratings right before the match was recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub player_1_before: i32,
    pub player_2_before: i32,
}

impl RatingSnapshot {
    pub fn before(&self, side: Side) -> i32 {
        match side {
            Side::One => self.player_1_before,
            Side::Two => self.player_2_before,
        }
    }
}

/// Outcome of a completed match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Side,
    pub score: Score,
    pub played_at: DateTime<Utc>,
    /// Set when the match was rated (regular, not a walkover).
    #[serde(default)]
    pub ratings: Option<RatingSnapshot>,
}

/// Lifecycle of a match. A result exists only once completed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Postponed,
    Cancelled,
    Completed(MatchResult),
}

/// A single match between two players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub season: SeasonKey,
    pub round: u32,
    pub match_type: MatchType,
    pub player_1: PlayerId,
    pub player_2: PlayerId,
    pub status: MatchStatus,
    /// Bracket slot; only set for playoff matches.
    pub playoff: Option<PlayoffInfo>,
}

impl GameMatch {
    /// New scheduled regular-season match.
    pub fn new(season: SeasonKey, round: u32, player_1: PlayerId, player_2: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            season,
            round,
            match_type: MatchType::Regular,
            player_1,
            player_2,
            status: MatchStatus::Scheduled,
            playoff: None,
        }
    }

    /// New scheduled playoff match for a bracket slot.
    pub fn playoff(
        season: SeasonKey,
        player_1: PlayerId,
        player_2: PlayerId,
        info: PlayoffInfo,
    ) -> Self {
        Self {
            round: info.stage.round(),
            match_type: MatchType::Playoff,
            playoff: Some(info),
            ..Self::new(season, 0, player_1, player_2)
        }
    }

    pub fn is_playoff(&self) -> bool {
        self.match_type == MatchType::Playoff
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match &self.status {
            MatchStatus::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.result().is_some()
    }

    pub fn player(&self, side: Side) -> PlayerId {
        match side {
            Side::One => self.player_1,
            Side::Two => self.player_2,
        }
    }

    /// Which side `player_id` plays on, if they play in this match.
    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if self.player_1 == player_id {
            Some(Side::One)
        } else if self.player_2 == player_id {
            Some(Side::Two)
        } else {
            None
        }
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.side_of(player_id).is_some()
    }

    pub fn winner_id(&self) -> Option<PlayerId> {
        self.result().map(|r| self.player(r.winner))
    }

    pub fn loser_id(&self) -> Option<PlayerId> {
        self.result().map(|r| self.player(r.winner.opponent()))
    }
}
