//! Integration tests for recording results and resetting matches to unplayed.

mod common;

use common::{at, league_with_players, play};
use tennis_league::{
    get_rating_history, record_match_result, reset_match_to_unplayed, LeagueError, MatchStatus,
    Outcome, ScheduleStatus, Score, SetScore, Side,
};

#[test]
fn result_updates_both_registrations() {
    let (mut store, season, ids) = league_with_players(2);
    let m = play(&mut store, season, ids[0], ids[1], ids[0], Score::sets([(6, 4), (3, 6), (7, 5)]), 1);

    let winner = store.player(ids[0]).unwrap().registration(season).unwrap();
    assert_eq!(winner.stats.matches_played, 1);
    assert_eq!(winner.stats.matches_won, 1);
    assert_eq!(winner.stats.total_points, 2);
    assert_eq!((winner.stats.games_won, winner.stats.games_lost), (16, 15));
    assert_eq!(winner.match_history.len(), 1);
    assert_eq!(winner.match_history[0].result, Outcome::Win);
    assert_eq!(winner.match_history[0].opponent_id, ids[1]);

    let loser = store.player(ids[1]).unwrap().registration(season).unwrap();
    assert_eq!(loser.stats.total_points, 1);
    assert_eq!(loser.stats.matches_lost(), 1);

    let recorded = store.game(m).unwrap().result().unwrap();
    assert_eq!(recorded.winner, Side::One);
    let snapshot = recorded.ratings.unwrap();
    assert_eq!((snapshot.player_1_before, snapshot.player_2_before), (1200, 1200));
}

#[test]
fn recording_twice_is_rejected() {
    let (mut store, season, ids) = league_with_players(2);
    let m = play(&mut store, season, ids[0], ids[1], ids[0], Score::sets([(6, 0), (6, 0)]), 1);
    let err = record_match_result(&mut store, m, ids[1], Score::sets([(0, 6), (0, 6)]), at(2));
    assert!(matches!(err, Err(LeagueError::InvalidMatchState { .. })));
    assert_eq!(store.player(ids[0]).unwrap().registration(season).unwrap().stats.matches_played, 1);
}

#[test]
fn cancelled_match_cannot_get_a_result() {
    let (mut store, season, ids) = league_with_players(2);
    let m = store.schedule_match(season, 1, ids[0], ids[1]).unwrap();
    store.set_match_status(m, ScheduleStatus::Cancelled).unwrap();
    let err = record_match_result(&mut store, m, ids[0], Score::sets([(6, 0), (6, 0)]), at(1));
    assert!(matches!(err, Err(LeagueError::InvalidMatchState { .. })));
}

#[test]
fn postponed_match_can_still_be_played() {
    let (mut store, season, ids) = league_with_players(2);
    let m = store.schedule_match(season, 1, ids[0], ids[1]).unwrap();
    store.set_match_status(m, ScheduleStatus::Postponed).unwrap();
    record_match_result(&mut store, m, ids[1], Score::sets([(2, 6), (2, 6)]), at(5)).unwrap();
    assert!(store.game(m).unwrap().is_completed());
}

#[test]
fn completed_match_status_cannot_be_changed_directly() {
    let (mut store, season, ids) = league_with_players(2);
    let m = play(&mut store, season, ids[0], ids[1], ids[0], Score::sets([(6, 0), (6, 0)]), 1);
    assert!(matches!(
        store.set_match_status(m, ScheduleStatus::Cancelled),
        Err(LeagueError::InvalidMatchState { .. })
    ));
}

#[test]
fn inconsistent_scores_leave_state_untouched() {
    let (mut store, season, ids) = league_with_players(2);
    let m = store.schedule_match(season, 1, ids[0], ids[1]).unwrap();
    let before = store.player(ids[0]).unwrap().clone();

    let tied = Score::sets([(6, 4), (6, 6)]);
    let no_sets = Score {
        sets: Vec::new(),
        walkover: false,
        retired: None,
    };
    let walkover_with_sets = Score {
        sets: vec![SetScore::new(6, 0)],
        walkover: true,
        retired: None,
    };
    for score in [tied, no_sets, walkover_with_sets] {
        let err = record_match_result(&mut store, m, ids[0], score, at(1));
        assert!(matches!(err, Err(LeagueError::InconsistentScore(_))));
    }
    // Winner who lost more sets without a retirement.
    let err = record_match_result(&mut store, m, ids[1], Score::sets([(6, 1), (6, 1)]), at(1));
    assert!(matches!(err, Err(LeagueError::InconsistentScore(_))));

    assert_eq!(store.player(ids[0]).unwrap(), &before);
    assert_eq!(store.game(m).unwrap().status, MatchStatus::Scheduled);
}

#[test]
fn implausible_game_counts_are_rejected() {
    let (mut store, season, ids) = league_with_players(2);
    let m = store.schedule_match(season, 1, ids[0], ids[1]).unwrap();
    let before = store.player(ids[0]).unwrap().clone();

    let huge = Score::sets([(u32::MAX, 0), (1, 0)]);
    let long_set = Score::sets([(31, 29), (6, 0)]);
    let six_sets = Score::sets([(6, 0), (0, 6), (6, 0), (0, 6), (6, 0), (6, 0)]);
    for score in [huge, long_set, six_sets] {
        let err = record_match_result(&mut store, m, ids[0], score, at(1));
        assert!(matches!(err, Err(LeagueError::InconsistentScore(_))));
    }
    assert_eq!(store.player(ids[0]).unwrap(), &before);
    assert!(!store.game(m).unwrap().is_completed());

    // An advantage set within the limit still counts.
    record_match_result(&mut store, m, ids[0], Score::sets([(6, 4), (16, 14)]), at(1)).unwrap();
    let stats = &store.player(ids[0]).unwrap().registration(season).unwrap().stats;
    assert_eq!((stats.games_won, stats.games_lost), (22, 18));
}

#[test]
fn winner_must_play_in_the_match() {
    let (mut store, season, ids) = league_with_players(3);
    let m = store.schedule_match(season, 1, ids[0], ids[1]).unwrap();
    let err = record_match_result(&mut store, m, ids[2], Score::sets([(6, 0), (6, 0)]), at(1));
    assert!(matches!(err, Err(LeagueError::InconsistentScore(_))));
}

#[test]
fn scheduling_needs_registered_distinct_players() {
    let (mut store, season, ids) = league_with_players(1);
    let outsider = store
        .add_player("Walk-in", tennis_league::SkillLevel::Beginner)
        .unwrap();
    assert!(matches!(
        store.schedule_match(season, 1, ids[0], outsider),
        Err(LeagueError::NotRegistered { .. })
    ));
    assert!(matches!(
        store.schedule_match(season, 1, ids[0], ids[0]),
        Err(LeagueError::SamePlayer(_))
    ));
}

#[test]
fn retirement_is_recorded_for_the_retiring_player() {
    let (mut store, season, ids) = league_with_players(2);
    // P02 retires while leading by a set.
    play(&mut store, season, ids[0], ids[1], ids[0], Score::retired([(3, 6), (2, 1)], Side::Two), 1);
    let p02 = &store.player(ids[1]).unwrap().registration(season).unwrap().stats;
    assert_eq!(p02.retirements, 1);
    assert_eq!(p02.matches_won, 0);
    assert_eq!(p02.total_points, 1);
    let p01 = &store.player(ids[0]).unwrap().registration(season).unwrap().stats;
    assert_eq!(p01.retirements, 0);
    assert_eq!(p01.matches_won, 1);
    assert_eq!(p01.total_points, 2);
}

#[test]
fn reset_restores_exact_pre_match_values() {
    let (mut store, season, ids) = league_with_players(2);
    play(&mut store, season, ids[0], ids[1], ids[1], Score::sets([(6, 7), (6, 7)]), 1);
    let p1_before = store.player(ids[0]).unwrap().clone();
    let p2_before = store.player(ids[1]).unwrap().clone();

    let m = play(&mut store, season, ids[0], ids[1], ids[0], Score::sets([(6, 1), (6, 1)]), 2);
    assert_ne!(store.player(ids[0]).unwrap(), &p1_before);

    reset_match_to_unplayed(&mut store, m).unwrap();
    assert_eq!(store.player(ids[0]).unwrap(), &p1_before);
    assert_eq!(store.player(ids[1]).unwrap(), &p2_before);
    assert_eq!(store.game(m).unwrap().status, MatchStatus::Scheduled);

    // And it can be played again.
    record_match_result(&mut store, m, ids[1], Score::walkover(), at(3)).unwrap();
}

#[test]
fn reset_without_history_entry_leaves_state_intact() {
    let (mut store, season, ids) = league_with_players(2);
    let m = play(&mut store, season, ids[0], ids[1], ids[0], Score::sets([(6, 3), (6, 3)]), 1);
    store
        .player_mut(ids[1])
        .unwrap()
        .registration_mut(season)
        .unwrap()
        .match_history
        .clear();
    let winner = store.player(ids[0]).unwrap().clone();
    let loser = store.player(ids[1]).unwrap().clone();

    assert!(matches!(
        reset_match_to_unplayed(&mut store, m),
        Err(LeagueError::InvalidMatchState { .. })
    ));
    assert!(store.game(m).unwrap().is_completed());
    assert_eq!(store.player(ids[0]).unwrap(), &winner);
    assert_eq!(store.player(ids[1]).unwrap(), &loser);
}

#[test]
fn reset_of_unplayed_match_is_rejected() {
    let (mut store, season, ids) = league_with_players(2);
    let m = store.schedule_match(season, 1, ids[0], ids[1]).unwrap();
    assert!(matches!(
        reset_match_to_unplayed(&mut store, m),
        Err(LeagueError::InvalidMatchState { .. })
    ));
}

#[test]
fn rating_history_starts_at_signup_rating() {
    let (mut store, season, ids) = league_with_players(3);
    play(&mut store, season, ids[0], ids[1], ids[0], Score::sets([(6, 2), (6, 2)]), 1);
    play(&mut store, season, ids[0], ids[2], ids[2], Score::sets([(2, 6), (2, 6)]), 2);

    let points = get_rating_history(&store, ids[0]).unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!((points[0].match_number, points[0].rating_after), (0, 1200));
    assert!(points[0].opponent.is_none());
    assert_eq!((points[1].match_number, points[1].rating_after), (1, 1216));
    assert_eq!(points[1].result, Some(Outcome::Win));
    assert_eq!(points[1].opponent.as_ref().unwrap().name, "P02");
    assert_eq!(points[2].result, Some(Outcome::Loss));
    assert_eq!(points[2].rating_after, store.player(ids[0]).unwrap().elo_rating);
}
