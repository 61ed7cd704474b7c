//! Integration tests for the score engine: points and set/game tallies per match.

mod common;

use common::{at, new_season};
use tennis_league::{
    games_and_sets_for_match, points_for_match, GameMatch, MatchResult, MatchStatus, PlayoffGroup,
    PlayoffInfo, PlayoffStage, Score, Side,
};
use uuid::Uuid;

fn completed(score: Score, winner: Side) -> GameMatch {
    let mut m = GameMatch::new(new_season(), 1, Uuid::new_v4(), Uuid::new_v4());
    m.status = MatchStatus::Completed(MatchResult {
        winner,
        score,
        played_at: at(1),
        ratings: None,
    });
    m
}

#[test]
fn three_set_win_gives_two_points_to_one() {
    let m = completed(Score::sets([(6, 4), (3, 6), (7, 5)]), Side::One);
    let points = points_for_match(&m);
    assert_eq!((points.player_1, points.player_2), (2, 1));

    let tally = games_and_sets_for_match(&m);
    assert_eq!((tally.player_1_sets, tally.player_2_sets), (2, 1));
    assert_eq!((tally.player_1_games, tally.player_2_games), (16, 15));
}

#[test]
fn straight_sets_win_gives_three_points() {
    let m = completed(Score::sets([(3, 6), (4, 6)]), Side::Two);
    let points = points_for_match(&m);
    assert_eq!((points.player_1, points.player_2), (0, 3));
}

#[test]
fn walkover_gives_two_points_and_twelve_nil_games() {
    // Player 2 forfeits.
    let m = completed(Score::walkover(), Side::One);
    let points = points_for_match(&m);
    assert_eq!((points.player_1, points.player_2), (2, 0));

    let tally = games_and_sets_for_match(&m);
    assert_eq!((tally.player_1_games, tally.player_2_games), (12, 0));
    assert_eq!((tally.player_1_sets, tally.player_2_sets), (2, 0));
}

#[test]
fn walkover_for_player_two_mirrors() {
    let m = completed(Score::walkover(), Side::Two);
    let points = points_for_match(&m);
    assert_eq!((points.player_1, points.player_2), (0, 2));
    let tally = games_and_sets_for_match(&m);
    assert_eq!((tally.player_1_games, tally.player_2_games), (0, 12));
}

#[test]
fn retirement_counts_the_sets_played() {
    // Player 2 retires at 6-3 3-1 down.
    let m = completed(Score::retired([(6, 3), (3, 1)], Side::Two), Side::One);
    let tally = games_and_sets_for_match(&m);
    assert_eq!((tally.player_1_games, tally.player_2_games), (9, 4));
    assert_eq!(points_for_match(&m).player_1, 3);
}

#[test]
fn unplayed_match_gives_nothing() {
    let m = GameMatch::new(new_season(), 1, Uuid::new_v4(), Uuid::new_v4());
    let points = points_for_match(&m);
    assert_eq!((points.player_1, points.player_2), (0, 0));
    assert_eq!(games_and_sets_for_match(&m).player_1_games, 0);
}

#[test]
fn playoff_match_gives_no_league_points() {
    let info = PlayoffInfo::new(PlayoffGroup::A, PlayoffStage::Quarterfinal, 1);
    let mut m = GameMatch::playoff(new_season(), Uuid::new_v4(), Uuid::new_v4(), info);
    m.status = MatchStatus::Completed(MatchResult {
        winner: Side::One,
        score: Score::sets([(6, 0), (6, 0)]),
        played_at: at(1),
        ratings: None,
    });
    let points = points_for_match(&m);
    assert_eq!((points.player_1, points.player_2), (0, 0));
}

#[test]
fn points_never_exceed_three_and_walkover_is_exactly_two() {
    let scores = [
        (Score::sets([(6, 0), (6, 0)]), Side::One),
        (Score::sets([(6, 4), (4, 6), (6, 2)]), Side::One),
        (Score::sets([(4, 6), (7, 6), (3, 6)]), Side::Two),
        (Score::sets([(0, 6), (1, 6)]), Side::Two),
        (Score::retired([(6, 4), (2, 3)], Side::Two), Side::One),
        (Score::retired([(2, 6)], Side::One), Side::Two),
    ];
    for (score, winner) in scores {
        let p = points_for_match(&completed(score, winner));
        assert!(p.player_1 + p.player_2 <= 3);
    }
    let p = points_for_match(&completed(Score::walkover(), Side::Two));
    assert_eq!(p.player_1 + p.player_2, 2);
}
