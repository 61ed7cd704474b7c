//! Standings aggregator: fold completed regular matches of a league season into a ranked table.
//!
//! Pure and re-entrant. The caller filters out playoff matches; handing one in is an error,
//! never silently skipped.

use crate::logic::score::stat_line;
use crate::models::{GameMatch, LeagueError, Player, PlayerId, Side, Stats};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A registered player taking part in the standings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub player_id: PlayerId,
    pub name: String,
}

impl Entrant {
    pub fn new(player_id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
        }
    }

    pub fn from_player(player: &Player) -> Self {
        Self::new(player.id, player.name.clone())
    }
}

/// One row of the standings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    /// 1-based rank.
    pub position: u32,
    pub player_id: PlayerId,
    pub name: String,
    pub stats: Stats,
}

impl StandingRow {
    /// Played at least one completed regular match (may qualify for the playoffs).
    pub fn is_eligible(&self) -> bool {
        self.stats.matches_played > 0
    }
}

/// Ranking order: points, then set difference, then game difference (all descending),
/// then name. Player id makes the order total.
fn rank(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.stats
        .total_points
        .cmp(&a.stats.total_points)
        .then_with(|| b.stats.set_difference().cmp(&a.stats.set_difference()))
        .then_with(|| b.stats.game_difference().cmp(&a.stats.game_difference()))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Build the ranked table for one league season.
///
/// Every entrant gets a row, played or not. Each match must be a completed regular match
/// between two entrants.
pub fn compute_standings<'a>(
    matches: impl IntoIterator<Item = &'a GameMatch>,
    entrants: &[Entrant],
) -> Result<Vec<StandingRow>, LeagueError> {
    let mut rows: HashMap<PlayerId, StandingRow> = entrants
        .iter()
        .map(|e| {
            (
                e.player_id,
                StandingRow {
                    position: 0,
                    player_id: e.player_id,
                    name: e.name.clone(),
                    stats: Stats::default(),
                },
            )
        })
        .collect();

    for m in matches {
        if m.is_playoff() {
            return Err(LeagueError::PlayoffMatchInStandings(m.id));
        }
        if !m.is_completed() {
            return Err(LeagueError::InvalidMatchState {
                match_id: m.id,
                reason: "only completed matches count towards standings".into(),
            });
        }
        for side in [Side::One, Side::Two] {
            let player_id = m.player(side);
            let row = rows.get_mut(&player_id).ok_or(LeagueError::NotRegistered {
                player_id,
                season: m.season,
            })?;
            row.stats.add(&stat_line(m, side));
        }
    }

    let mut table: Vec<StandingRow> = rows.into_values().collect();
    table.sort_by(rank);
    for (i, row) in table.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }
    Ok(table)
}
