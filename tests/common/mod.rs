//! Shared builders for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tennis_league::{
    record_match_result, EngineConfig, LeagueId, LeagueStore, MatchId, PlayerId, Score, SeasonId,
    SeasonKey, SkillLevel,
};

/// 18:00 UTC on the given day of March 2024.
pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 18, 0, 0).unwrap()
}

pub fn new_season() -> SeasonKey {
    SeasonKey::new(LeagueId::new(), SeasonId::new())
}

/// Store with `n` intermediate players named P01, P02, ... registered for one season.
pub fn league_with_players(n: usize) -> (LeagueStore, SeasonKey, Vec<PlayerId>) {
    let mut store = LeagueStore::new(EngineConfig::default());
    let season = new_season();
    let ids = (1..=n)
        .map(|i| {
            let id = store
                .add_player(format!("P{i:02}"), SkillLevel::Intermediate)
                .unwrap();
            store.register(id, season, SkillLevel::Intermediate).unwrap();
            id
        })
        .collect();
    (store, season, ids)
}

/// Schedule and record a regular match in one go.
pub fn play(
    store: &mut LeagueStore,
    season: SeasonKey,
    player_1: PlayerId,
    player_2: PlayerId,
    winner: PlayerId,
    score: Score,
    day: u32,
) -> MatchId {
    let id = store.schedule_match(season, day, player_1, player_2).unwrap();
    record_match_result(store, id, winner, score, at(day)).unwrap();
    id
}

/// `n` players where P01 beats P02, P03 beats P04, ... all 6-0 6-0.
///
/// Standings are then P01, P03, P05, ... (3 points each, ordered by name) followed by
/// P02, P04, ... so the seeding is fully determined.
pub fn seeded_league(n: usize) -> (LeagueStore, SeasonKey, Vec<PlayerId>) {
    let (mut store, season, ids) = league_with_players(n);
    for (day, pair) in ids.chunks_exact(2).enumerate() {
        play(
            &mut store,
            season,
            pair[0],
            pair[1],
            pair[0],
            Score::sets([(6, 0), (6, 0)]),
            day as u32 + 1,
        );
    }
    (store, season, ids)
}
