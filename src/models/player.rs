//! Player, Registration, Stats and match history data structures.

use crate::models::game::Score;
use crate::models::ids::{MatchId, PlayerId, SeasonKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Skill level declared at registration. Only picks the initial rating.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Active,
    /// Still listed in the standings, but cannot qualify for the playoffs.
    Withdrawn,
}

/// One player's contribution from a single completed match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub won: bool,
    pub points: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub retired: bool,
    pub conceded_walkover: bool,
}

/// Cumulative regular-season statistics for a registration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub matches_played: u32,
    pub matches_won: u32,
    pub total_points: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub retirements: u32,
    pub walkovers: u32,
}

impl Stats {
    pub fn matches_lost(&self) -> u32 {
        self.matches_played - self.matches_won
    }

    pub fn set_difference(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn game_difference(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }

    /// Fold one match into the totals.
    pub fn add(&mut self, line: &StatLine) {
        self.matches_played += 1;
        self.matches_won += u32::from(line.won);
        self.total_points += line.points;
        self.sets_won += line.sets_won;
        self.sets_lost += line.sets_lost;
        self.games_won += line.games_won;
        self.games_lost += line.games_lost;
        self.retirements += u32::from(line.retired);
        self.walkovers += u32::from(line.conceded_walkover);
    }

    /// Exact inverse of [`Stats::add`] for a line that was previously added.
    pub fn subtract(&mut self, line: &StatLine) {
        self.matches_played = self.matches_played.saturating_sub(1);
        self.matches_won = self.matches_won.saturating_sub(u32::from(line.won));
        self.total_points = self.total_points.saturating_sub(line.points);
        self.sets_won = self.sets_won.saturating_sub(line.sets_won);
        self.sets_lost = self.sets_lost.saturating_sub(line.sets_lost);
        self.games_won = self.games_won.saturating_sub(line.games_won);
        self.games_lost = self.games_lost.saturating_sub(line.games_lost);
        self.retirements = self.retirements.saturating_sub(u32::from(line.retired));
        self.walkovers = self.walkovers.saturating_sub(u32::from(line.conceded_walkover));
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

/// One completed regular match as seen by one player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchHistoryEntry {
    pub match_id: MatchId,
    pub opponent_id: PlayerId,
    pub result: Outcome,
    pub score: Score,
    pub rating_before: i32,
    pub rating_after: i32,
    pub line: StatLine,
    pub played_at: DateTime<Utc>,
    pub round: u32,
}

impl MatchHistoryEntry {
    pub fn rating_delta(&self) -> i32 {
        self.rating_after - self.rating_before
    }
}

/// A player's participation in one league season.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub season: SeasonKey,
    pub level: SkillLevel,
    pub status: RegistrationStatus,
    pub stats: Stats,
    /// Chronological log of completed regular matches.
    pub match_history: Vec<MatchHistoryEntry>,
}

impl Registration {
    pub fn new(season: SeasonKey, level: SkillLevel) -> Self {
        Self {
            season,
            level,
            status: RegistrationStatus::Active,
            stats: Stats::default(),
            match_history: Vec::new(),
        }
    }

    /// Zero stats and history (start of a replay).
    pub fn clear(&mut self) {
        self.stats = Stats::default();
        self.match_history.clear();
    }
}

/// A player and their global rating state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Rating assigned at signup, the start of every replay.
    pub initial_rating: i32,
    pub elo_rating: i32,
    pub highest_elo: i32,
    pub lowest_elo: i32,
    pub registrations: Vec<Registration>,
}

impl Player {
    /// Create a new player with the given name and starting rating. No registrations yet.
    pub fn new(name: impl Into<String>, initial_rating: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initial_rating,
            elo_rating: initial_rating,
            highest_elo: initial_rating,
            lowest_elo: initial_rating,
            registrations: Vec::new(),
        }
    }

    pub fn registration(&self, season: SeasonKey) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.season == season)
    }

    pub fn registration_mut(&mut self, season: SeasonKey) -> Option<&mut Registration> {
        self.registrations.iter_mut().find(|r| r.season == season)
    }

    /// Set a new current rating and widen the running extremes.
    pub fn set_rating(&mut self, rating: i32) {
        self.elo_rating = rating;
        self.highest_elo = self.highest_elo.max(rating);
        self.lowest_elo = self.lowest_elo.min(rating);
    }

    /// Back to the signup rating with extremes collapsed onto it.
    pub fn reset_rating(&mut self) {
        self.elo_rating = self.initial_rating;
        self.highest_elo = self.initial_rating;
        self.lowest_elo = self.initial_rating;
    }

    /// Rebuild highest/lowest from the initial rating and every history entry.
    pub fn recompute_extremes(&mut self) {
        let ratings = self
            .registrations
            .iter()
            .flat_map(|r| r.match_history.iter())
            .map(|e| e.rating_after)
            .chain([self.initial_rating, self.elo_rating]);
        let (lo, hi) = ratings.fold((i32::MAX, i32::MIN), |(lo, hi), r| (lo.min(r), hi.max(r)));
        self.lowest_elo = lo;
        self.highest_elo = hi;
    }
}
