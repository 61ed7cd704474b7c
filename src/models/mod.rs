//! Data structures for the league: players, registrations, matches, playoff state.

mod error;
mod game;
mod ids;
mod player;
mod playoff;
mod store;

pub use error::LeagueError;
pub use game::{GameMatch, MatchResult, MatchStatus, MatchType, RatingSnapshot, Score, SetScore, Side};
pub use ids::{LeagueId, MatchId, PlayerId, SeasonId, SeasonKey};
pub use player::{
    MatchHistoryEntry, Outcome, Player, Registration, RegistrationStatus, SkillLevel, StatLine,
    Stats,
};
pub use playoff::{
    PlayoffConfig, PlayoffGroup, PlayoffInfo, PlayoffPhase, PlayoffStage, QualifiedPlayer,
    QualifiedPlayers,
};
pub use store::{LeagueStore, ScheduleStatus};
