//! League business logic: scoring, ratings, standings, results, playoffs, recalculation.

mod playoffs;
mod rating;
mod read_model;
mod recalc;
mod results;
mod score;
mod standings;

pub use playoffs::{
    create_next_round_match, initialize_playoffs, on_playoff_match_completed, reset_playoffs,
    SlotOutcome, QUARTERFINAL_SEEDS,
};
pub use rating::{apply_rating_change, expected_score, initial_rating, is_rated, RatingChange};
pub use read_model::{
    get_playoff_bracket, get_rating_history, get_standings, write_standings_csv, Opponent,
    PlayoffBracket, RatingPoint,
};
pub use recalc::{recalculate_league, recalculate_player, RecalcFailure, RecalcReport, RecalcSummary};
pub use results::{record_match_result, reset_match_to_unplayed, RecordedResult};
pub use score::{
    games_and_sets_for_match, points_for_match, points_for_sets, stat_line, validate_score,
    GamesAndSets, MatchPoints,
};
pub use standings::{compute_standings, Entrant, StandingRow};
