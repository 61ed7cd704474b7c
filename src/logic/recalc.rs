//! Recalculation: rebuild a player's rating and registration stats from raw match history.
//!
//! Zero, then replay every completed regular match in chronological order. The replay reads
//! only match facts (scores, recorded pre-match ratings) and signup ratings, so running it
//! again gives the same state. Playoff matches are never replayed.

use crate::logic::rating::{apply_rating_change, is_rated, RatingChange};
use crate::logic::score::{stat_line, validate_score};
use crate::models::{
    GameMatch, LeagueError, LeagueId, LeagueStore, MatchHistoryEntry, Outcome, PlayerId,
    SeasonKey,
};
use log::{info, warn};
use serde::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RecalcSummary {
    pub player_id: PlayerId,
    pub matches_replayed: usize,
    pub elo_rating: i32,
}

/// Per-player outcome of a batch recalculation.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RecalcReport {
    pub recalculated: Vec<RecalcSummary>,
    pub failed: Vec<RecalcFailure>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecalcFailure {
    pub player_id: PlayerId,
    pub error: String,
}

/// Rebuild one player from scratch.
///
/// The rating chain always covers every regular match the player completed. With `league`
/// set, only registrations in that league get their stats and history rebuilt; history
/// entries elsewhere only have their ratings rewritten to follow the chain.
pub fn recalculate_player(
    store: &mut LeagueStore,
    player_id: PlayerId,
    league: Option<LeagueId>,
) -> Result<RecalcSummary, LeagueError> {
    let mut player = store.player(player_id)?.clone();
    let in_scope = |season: SeasonKey| league.map_or(true, |l| season.league_id == l);

    let mut history: Vec<&GameMatch> = store
        .matches()
        .filter(|m| !m.is_playoff() && m.is_completed() && m.involves(player_id))
        .collect();
    history.sort_by_key(|m| (m.result().map(|r| r.played_at), m.id));

    player.reset_rating();
    for registration in player.registrations.iter_mut() {
        if in_scope(registration.season) {
            registration.clear();
        }
    }

    let k_factor = store.config.k_factor;
    for m in &history {
        let (Some(result), Some(side)) = (m.result(), m.side_of(player_id)) else {
            continue;
        };
        validate_score(&result.score, result.winner)?;

        let opponent_id = m.player(side.opponent());
        let before = player.elo_rating;
        let line = stat_line(m, side);
        let change = if is_rated(m) {
            let opponent_before = match result.ratings {
                Some(snapshot) => snapshot.before(side.opponent()),
                None => store.player(opponent_id)?.initial_rating,
            };
            apply_rating_change(before, opponent_before, line.won, k_factor)
        } else {
            RatingChange::unchanged(before, 0)
        };

        if in_scope(m.season) {
            let registration =
                player
                    .registration_mut(m.season)
                    .ok_or(LeagueError::NotRegistered {
                        player_id,
                        season: m.season,
                    })?;
            registration.stats.add(&line);
            registration.match_history.push(MatchHistoryEntry {
                match_id: m.id,
                opponent_id,
                result: if line.won { Outcome::Win } else { Outcome::Loss },
                score: result.score.clone(),
                rating_before: before,
                rating_after: change.new_rating_a,
                line,
                played_at: result.played_at,
                round: m.round,
            });
        } else if let Some(entry) = player
            .registration_mut(m.season)
            .and_then(|r| r.match_history.iter_mut().find(|e| e.match_id == m.id))
        {
            // Out of scope: stats stay, but the entry follows the re-chained rating.
            entry.rating_before = before;
            entry.rating_after = change.new_rating_a;
        }
        player.set_rating(change.new_rating_a);
    }

    let summary = RecalcSummary {
        player_id,
        matches_replayed: history.len(),
        elo_rating: player.elo_rating,
    };
    store.replace_player(player);
    info!(
        "Recalculated player {}: {} matches, rating {}",
        player_id, summary.matches_replayed, summary.elo_rating
    );
    Ok(summary)
}

/// Recalculate every registrant of a season (league scope). One player's failure is
/// reported and does not stop the others; successful players are committed.
pub fn recalculate_league(store: &mut LeagueStore, season: SeasonKey) -> RecalcReport {
    let mut ids: Vec<PlayerId> = store.registrants(season).map(|p| p.id).collect();
    ids.sort();

    let mut report = RecalcReport::default();
    for player_id in ids {
        match recalculate_player(store, player_id, Some(season.league_id)) {
            Ok(summary) => report.recalculated.push(summary),
            Err(e) => {
                warn!("Recalculation failed for player {}: {}", player_id, e);
                report.failed.push(RecalcFailure {
                    player_id,
                    error: e.to_string(),
                });
            }
        }
    }
    info!(
        "Recalculated {}: {} ok, {} failed",
        season,
        report.recalculated.len(),
        report.failed.len()
    );
    report
}
