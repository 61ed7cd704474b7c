//! Identifiers shared by players, matches, registrations and playoff configs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Identifier of a league (club ladder, division...).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeagueId(pub Uuid);

/// Identifier of a season inside a league.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonId(pub Uuid);

impl LeagueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LeagueId {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SeasonId {
    fn default() -> Self {
        Self::new()
    }
}

/// League + season pair. Every match, registration and playoff config is keyed by one.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SeasonKey {
    pub league_id: LeagueId,
    pub season_id: SeasonId,
}

impl SeasonKey {
    pub fn new(league_id: LeagueId, season_id: SeasonId) -> Self {
        Self {
            league_id,
            season_id,
        }
    }
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "league {} / season {}", self.league_id.0, self.season_id.0)
    }
}
