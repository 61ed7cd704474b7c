//! LeagueStore: the in-memory source of truth.
//!
//! Matches are the raw facts. Player ratings and registration stats are derived from them,
//! only ever changed by recording/resetting a result or by a recalculation.

use crate::config::EngineConfig;
use crate::logic::initial_rating;
use crate::models::error::LeagueError;
use crate::models::game::{GameMatch, MatchStatus};
use crate::models::ids::{MatchId, PlayerId, SeasonKey};
use crate::models::player::{Player, Registration, RegistrationStatus, SkillLevel};
use crate::models::playoff::{PlayoffConfig, PlayoffInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statuses a match can be moved to by scheduling (never `completed`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Scheduled,
    Postponed,
    Cancelled,
}

#[derive(Clone, Debug, Default)]
pub struct LeagueStore {
    pub config: EngineConfig,
    players: HashMap<PlayerId, Player>,
    matches: HashMap<MatchId, GameMatch>,
    playoffs: HashMap<SeasonKey, PlayoffConfig>,
}

impl LeagueStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Add a player; the skill level picks their starting rating.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        level: SkillLevel,
    ) -> Result<PlayerId, LeagueError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidPlayerName);
        }
        let player = Player::new(name, initial_rating(level));
        let id = player.id;
        self.players.insert(id, player);
        Ok(id)
    }

    /// Register a player for a league season. Never touches their rating.
    pub fn register(
        &mut self,
        player_id: PlayerId,
        season: SeasonKey,
        level: SkillLevel,
    ) -> Result<(), LeagueError> {
        let player = self.player_mut(player_id)?;
        if player.registration(season).is_some() {
            return Err(LeagueError::DuplicateRegistration { player_id, season });
        }
        player.registrations.push(Registration::new(season, level));
        Ok(())
    }

    pub fn set_registration_status(
        &mut self,
        player_id: PlayerId,
        season: SeasonKey,
        status: RegistrationStatus,
    ) -> Result<(), LeagueError> {
        self.player_mut(player_id)?
            .registration_mut(season)
            .ok_or(LeagueError::NotRegistered { player_id, season })?
            .status = status;
        Ok(())
    }

    /// Schedule a regular-season match between two registered players.
    pub fn schedule_match(
        &mut self,
        season: SeasonKey,
        round: u32,
        player_1: PlayerId,
        player_2: PlayerId,
    ) -> Result<MatchId, LeagueError> {
        if player_1 == player_2 {
            return Err(LeagueError::SamePlayer(player_1));
        }
        for player_id in [player_1, player_2] {
            if self.player(player_id)?.registration(season).is_none() {
                return Err(LeagueError::NotRegistered { player_id, season });
            }
        }
        let m = GameMatch::new(season, round, player_1, player_2);
        let id = m.id;
        self.matches.insert(id, m);
        Ok(id)
    }

    /// Postpone, cancel or reschedule a match that has no result.
    pub fn set_match_status(
        &mut self,
        match_id: MatchId,
        status: ScheduleStatus,
    ) -> Result<(), LeagueError> {
        let m = self
            .matches
            .get_mut(&match_id)
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        if m.is_completed() {
            return Err(LeagueError::InvalidMatchState {
                match_id,
                reason: "match is completed; reset it to unplayed first".into(),
            });
        }
        if m.is_playoff() && status == ScheduleStatus::Cancelled {
            return Err(LeagueError::InvalidMatchState {
                match_id,
                reason: "playoff matches cannot be cancelled".into(),
            });
        }
        m.status = match status {
            ScheduleStatus::Scheduled => MatchStatus::Scheduled,
            ScheduleStatus::Postponed => MatchStatus::Postponed,
            ScheduleStatus::Cancelled => MatchStatus::Cancelled,
        };
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, LeagueError> {
        self.players.get(&id).ok_or(LeagueError::PlayerNotFound(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, LeagueError> {
        self.players
            .get_mut(&id)
            .ok_or(LeagueError::PlayerNotFound(id))
    }

    /// Swap in a fully rebuilt player (end of a recalculation).
    pub(crate) fn replace_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Players holding a registration for the season.
    pub fn registrants(&self, season: SeasonKey) -> impl Iterator<Item = &Player> {
        self.players
            .values()
            .filter(move |p| p.registration(season).is_some())
    }

    pub fn game(&self, id: MatchId) -> Result<&GameMatch, LeagueError> {
        self.matches.get(&id).ok_or(LeagueError::MatchNotFound(id))
    }

    pub(crate) fn game_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, LeagueError> {
        self.matches
            .get_mut(&id)
            .ok_or(LeagueError::MatchNotFound(id))
    }

    pub fn matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.values()
    }

    pub fn season_matches(&self, season: SeasonKey) -> impl Iterator<Item = &GameMatch> {
        self.matches.values().filter(move |m| m.season == season)
    }

    /// Completed regular-season matches of a season: the standings input.
    pub fn completed_regular_matches(&self, season: SeasonKey) -> Vec<&GameMatch> {
        self.season_matches(season)
            .filter(|m| !m.is_playoff() && m.is_completed())
            .collect()
    }

    pub fn playoff_matches(&self, season: SeasonKey) -> impl Iterator<Item = &GameMatch> {
        self.season_matches(season).filter(|m| m.is_playoff())
    }

    /// The playoff match occupying a bracket slot, if it has been created.
    pub fn bracket_match(&self, season: SeasonKey, slot: PlayoffInfo) -> Option<&GameMatch> {
        self.playoff_matches(season)
            .find(|m| m.playoff == Some(slot))
    }

    pub(crate) fn insert_match(&mut self, m: GameMatch) -> MatchId {
        let id = m.id;
        self.matches.insert(id, m);
        id
    }

    /// Remove every playoff match of a season; returns how many were removed.
    pub(crate) fn remove_playoff_matches(&mut self, season: SeasonKey) -> usize {
        let before = self.matches.len();
        self.matches
            .retain(|_, m| !(m.season == season && m.is_playoff()));
        before - self.matches.len()
    }

    pub fn playoff_config(&self, season: SeasonKey) -> Option<&PlayoffConfig> {
        self.playoffs.get(&season)
    }

    pub(crate) fn playoff_config_mut(&mut self, season: SeasonKey) -> &mut PlayoffConfig {
        self.playoffs.entry(season).or_default()
    }
}
