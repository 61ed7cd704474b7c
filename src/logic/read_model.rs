//! Read side: standings table, playoff bracket and rating history views.

use crate::logic::standings::{compute_standings, Entrant, StandingRow};
use crate::models::{
    GameMatch, LeagueError, LeagueStore, MatchId, Outcome, PlayerId, PlayoffPhase, PlayoffStage,
    QualifiedPlayers, SeasonKey,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io;

/// Current standings of a league season, computed from its completed regular matches.
pub fn get_standings(store: &LeagueStore, season: SeasonKey) -> Result<Vec<StandingRow>, LeagueError> {
    let entrants: Vec<Entrant> = store.registrants(season).map(Entrant::from_player).collect();
    compute_standings(store.completed_regular_matches(season), &entrants)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    position: u32,
    name: &'a str,
    matches_played: u32,
    matches_won: u32,
    matches_lost: u32,
    total_points: u32,
    sets_won: u32,
    sets_lost: u32,
    games_won: u32,
    games_lost: u32,
}

/// Write a standings table as CSV (header row included).
pub fn write_standings_csv<W: io::Write>(rows: &[StandingRow], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        let s = &row.stats;
        writer.serialize(CsvRow {
            position: row.position,
            name: &row.name,
            matches_played: s.matches_played,
            matches_won: s.matches_won,
            matches_lost: s.matches_lost(),
            total_points: s.total_points,
            sets_won: s.sets_won,
            sets_lost: s.sets_lost,
            games_won: s.games_won,
            games_lost: s.games_lost,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Playoff state of a season as shown to players and admins.
#[derive(Clone, Debug, Serialize)]
pub struct PlayoffBracket {
    pub enabled: bool,
    pub number_of_groups: u8,
    pub phase: PlayoffPhase,
    pub qualified_players: QualifiedPlayers,
    /// Ordered by group, round, then match number.
    pub matches: Vec<GameMatch>,
}

pub fn get_playoff_bracket(store: &LeagueStore, season: SeasonKey) -> PlayoffBracket {
    let config = store.playoff_config(season).cloned().unwrap_or_default();
    let mut matches: Vec<GameMatch> = store.playoff_matches(season).cloned().collect();
    matches.sort_by_key(|m| {
        m.playoff.map(|p| {
            (
                p.group,
                p.stage.round(),
                p.stage == PlayoffStage::ThirdPlace,
                p.match_number,
            )
        })
    });
    PlayoffBracket {
        enabled: config.enabled,
        number_of_groups: config.number_of_groups,
        phase: config.current_phase,
        qualified_players: config.qualified_players().clone(),
        matches,
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Opponent {
    pub id: PlayerId,
    pub name: String,
}

/// One point on a player's rating chart. Point 0 is the signup rating.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RatingPoint {
    pub match_number: u32,
    pub rating_after: i32,
    pub match_id: Option<MatchId>,
    pub opponent: Option<Opponent>,
    pub result: Option<Outcome>,
    pub played_at: Option<DateTime<Utc>>,
}

/// Chronological rating progression across all of a player's registrations.
pub fn get_rating_history(store: &LeagueStore, player_id: PlayerId) -> Result<Vec<RatingPoint>, LeagueError> {
    let player = store.player(player_id)?;
    let mut entries: Vec<_> = player
        .registrations
        .iter()
        .flat_map(|r| r.match_history.iter())
        .collect();
    entries.sort_by_key(|e| (e.played_at, e.match_id));

    let start = RatingPoint {
        match_number: 0,
        rating_after: player.initial_rating,
        match_id: None,
        opponent: None,
        result: None,
        played_at: None,
    };
    let points = entries.into_iter().zip(1..).map(|(e, n)| RatingPoint {
        match_number: n,
        rating_after: e.rating_after,
        match_id: Some(e.match_id),
        opponent: Some(Opponent {
            id: e.opponent_id,
            name: store
                .player(e.opponent_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        }),
        result: Some(e.result),
        played_at: Some(e.played_at),
    });
    Ok(std::iter::once(start).chain(points).collect())
}
