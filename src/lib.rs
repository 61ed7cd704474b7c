//! Tennis league engine: library with models and business logic for standings, ELO ratings
//! and playoff brackets.

pub mod config;
pub mod logic;
pub mod models;

pub use config::{EngineConfig, DEFAULT_K_FACTOR, PLAYOFF_GROUP_SIZE};
pub use logic::{
    apply_rating_change, compute_standings, create_next_round_match, expected_score,
    games_and_sets_for_match, get_playoff_bracket, get_rating_history, get_standings,
    initial_rating, initialize_playoffs, points_for_match, recalculate_league,
    recalculate_player, record_match_result, reset_match_to_unplayed, reset_playoffs,
    write_standings_csv, Entrant, GamesAndSets, MatchPoints, PlayoffBracket, RatingChange,
    RatingPoint, RecalcReport, RecalcSummary, RecordedResult, SlotOutcome, StandingRow,
};
pub use models::{
    GameMatch, LeagueError, LeagueId, LeagueStore, MatchHistoryEntry, MatchId, MatchResult,
    MatchStatus, MatchType, Outcome, Player, PlayerId, PlayoffConfig, PlayoffGroup, PlayoffInfo,
    PlayoffPhase, PlayoffStage, QualifiedPlayer, QualifiedPlayers, RatingSnapshot, Registration,
    RegistrationStatus, ScheduleStatus, Score, SeasonId, SeasonKey, SetScore, Side, SkillLevel,
    StatLine, Stats,
};
