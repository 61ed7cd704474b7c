//! LeagueError: every way a command or engine call can be rejected.

use crate::models::ids::{MatchId, PlayerId, SeasonKey};
use crate::models::playoff::{PlayoffGroup, PlayoffStage};

/// Errors that can occur during league operations. All of them are caller/input errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// The match is not in a state that allows this action (e.g. already completed or cancelled).
    InvalidMatchState { match_id: MatchId, reason: String },
    /// Not enough eligible players to start the playoffs.
    InsufficientPlayers { required: usize, eligible: usize },
    /// The qualified-player snapshot is locked until the playoffs are reset.
    LockedSnapshotViolation,
    /// A next-round bracket match was requested before both feeders completed.
    FeederNotReady {
        group: PlayoffGroup,
        stage: PlayoffStage,
        match_number: u32,
    },
    /// The bracket has no such slot (group not in play, or match number out of range).
    UnknownBracketSlot {
        group: PlayoffGroup,
        stage: PlayoffStage,
        match_number: u32,
    },
    /// The score is not a valid tennis score (tied set, no sets without walkover...).
    InconsistentScore(String),
    /// A playoff match was handed to the standings aggregator.
    PlayoffMatchInStandings(MatchId),
    /// Playoffs support one or two groups.
    InvalidGroupCount(u8),
    PlayerNotFound(PlayerId),
    MatchNotFound(MatchId),
    /// Player names must not be blank.
    InvalidPlayerName,
    /// A match needs two different players.
    SamePlayer(PlayerId),
    /// The player has no registration for the league season.
    NotRegistered { player_id: PlayerId, season: SeasonKey },
    /// The player is already registered for the league season.
    DuplicateRegistration { player_id: PlayerId, season: SeasonKey },
    /// The season has no playoff bracket yet.
    PlayoffsNotInitialized,
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::InvalidMatchState { match_id, reason } => {
                write!(f, "Match {} cannot be changed: {}", match_id, reason)
            }
            LeagueError::InsufficientPlayers { required, eligible } => write!(
                f,
                "Need at least {} eligible players for the playoffs ({} eligible)",
                required, eligible
            ),
            LeagueError::LockedSnapshotViolation => {
                write!(f, "Qualified players are locked; reset the playoffs first")
            }
            LeagueError::FeederNotReady {
                group,
                stage,
                match_number,
            } => write!(
                f,
                "Group {} {} #{} is waiting for its feeder matches",
                group, stage, match_number
            ),
            LeagueError::UnknownBracketSlot {
                group,
                stage,
                match_number,
            } => write!(
                f,
                "Group {} has no {} #{}",
                group, stage, match_number
            ),
            LeagueError::InconsistentScore(reason) => write!(f, "Inconsistent score: {}", reason),
            LeagueError::PlayoffMatchInStandings(id) => {
                write!(f, "Playoff match {} cannot count towards standings", id)
            }
            LeagueError::InvalidGroupCount(n) => {
                write!(f, "Playoffs need 1 or 2 groups (got {})", n)
            }
            LeagueError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            LeagueError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            LeagueError::InvalidPlayerName => write!(f, "Player name must not be empty"),
            LeagueError::SamePlayer(id) => write!(f, "Player {} cannot play against themselves", id),
            LeagueError::NotRegistered { player_id, season } => {
                write!(f, "Player {} is not registered for {}", player_id, season)
            }
            LeagueError::DuplicateRegistration { player_id, season } => {
                write!(f, "Player {} is already registered for {}", player_id, season)
            }
            LeagueError::PlayoffsNotInitialized => write!(f, "Playoffs have not been initialized"),
        }
    }
}

impl std::error::Error for LeagueError {}
