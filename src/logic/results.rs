//! Recording and undoing match results.
//!
//! Both commands validate everything against the current state first and then commit by
//! swapping in updated copies, so a rejected command leaves the store untouched.

use crate::logic::playoffs::on_playoff_match_completed;
use crate::logic::rating::{is_rated, rate_match, RatingChange};
use crate::logic::score::{stat_line, validate_score};
use crate::models::{
    GameMatch, LeagueError, LeagueStore, MatchHistoryEntry, MatchId, MatchResult, MatchStatus,
    Outcome, Player, PlayerId, PlayoffPhase, PlayoffStage, RatingSnapshot, Score, Side,
};
use chrono::{DateTime, Utc};
use log::info;

/// What recording a result changed.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedResult {
    pub match_id: MatchId,
    /// Rating update with A = player 1 (zero delta for walkovers). `None` for playoff matches.
    pub rating: Option<RatingChange>,
    /// Bracket matches created because this match completed.
    pub created_matches: Vec<MatchId>,
}

/// Apply one side of a completed regular match to a player copy.
fn apply_to_player(player: &mut Player, m: &GameMatch, side: Side, rating_after: i32) -> Result<(), LeagueError> {
    let Some(result) = m.result() else {
        return Ok(());
    };
    let rating_before = player.elo_rating;
    let line = stat_line(m, side);
    let entry = MatchHistoryEntry {
        match_id: m.id,
        opponent_id: m.player(side.opponent()),
        result: if line.won { Outcome::Win } else { Outcome::Loss },
        score: result.score.clone(),
        rating_before,
        rating_after,
        line,
        played_at: result.played_at,
        round: m.round,
    };
    let player_id = player.id;
    let registration = player
        .registration_mut(m.season)
        .ok_or(LeagueError::NotRegistered {
            player_id,
            season: m.season,
        })?;
    registration.stats.add(&line);
    let at = registration
        .match_history
        .partition_point(|e| e.played_at <= entry.played_at);
    registration.match_history.insert(at, entry);
    player.set_rating(rating_after);
    Ok(())
}

/// Record the result of a scheduled or postponed match.
///
/// Regular matches update both players' ratings and registration stats; playoff matches
/// only store the result and may open the next bracket round.
pub fn record_match_result(
    store: &mut LeagueStore,
    match_id: MatchId,
    winner: PlayerId,
    score: Score,
    played_at: DateTime<Utc>,
) -> Result<RecordedResult, LeagueError> {
    let mut m = store.game(match_id)?.clone();
    match m.status {
        MatchStatus::Completed(_) => {
            return Err(LeagueError::InvalidMatchState {
                match_id,
                reason: "result already recorded; reset the match first".into(),
            })
        }
        MatchStatus::Cancelled => {
            return Err(LeagueError::InvalidMatchState {
                match_id,
                reason: "match is cancelled".into(),
            })
        }
        MatchStatus::Scheduled | MatchStatus::Postponed => {}
    }
    let winner_side = m.side_of(winner).ok_or_else(|| {
        LeagueError::InconsistentScore(format!("winner {} does not play in this match", winner))
    })?;
    validate_score(&score, winner_side)?;

    if m.is_playoff() {
        let phase = store
            .playoff_config(m.season)
            .map(|c| c.current_phase)
            .unwrap_or_default();
        // Third-place matches may still be played after the finals closed the playoffs.
        if phase == PlayoffPhase::RegularSeason {
            return Err(LeagueError::InvalidMatchState {
                match_id,
                reason: "playoffs have not started".into(),
            });
        }
    }

    m.status = MatchStatus::Completed(MatchResult {
        winner: winner_side,
        score,
        played_at,
        ratings: None,
    });

    if m.is_playoff() {
        *store.game_mut(match_id)? = m.clone();
        let created_matches = on_playoff_match_completed(store, &m);
        info!("Recorded playoff result for match {}", match_id);
        return Ok(RecordedResult {
            match_id,
            rating: None,
            created_matches,
        });
    }

    let mut player_1 = store.player(m.player_1)?.clone();
    let mut player_2 = store.player(m.player_2)?.clone();
    let rating = rate_match(
        &m,
        player_1.elo_rating,
        player_2.elo_rating,
        store.config.k_factor,
    );
    if is_rated(&m) {
        if let MatchStatus::Completed(result) = &mut m.status {
            result.ratings = Some(RatingSnapshot {
                player_1_before: player_1.elo_rating,
                player_2_before: player_2.elo_rating,
            });
        }
    }
    apply_to_player(&mut player_1, &m, Side::One, rating.new_rating_a)?;
    apply_to_player(&mut player_2, &m, Side::Two, rating.new_rating_b)?;

    store.replace_player(player_1);
    store.replace_player(player_2);
    *store.game_mut(match_id)? = m;
    info!(
        "Recorded result for match {} (rating delta {})",
        match_id, rating.delta
    );
    Ok(RecordedResult {
        match_id,
        rating: Some(rating),
        created_matches: Vec::new(),
    })
}

/// Undo one side of a match on a player copy using the history entry it left behind.
fn revert_for_player(player: &mut Player, m: &GameMatch) -> Result<(), LeagueError> {
    let player_id = player.id;
    let registration = player
        .registration_mut(m.season)
        .ok_or(LeagueError::NotRegistered {
            player_id,
            season: m.season,
        })?;
    let idx = registration
        .match_history
        .iter()
        .position(|e| e.match_id == m.id)
        .ok_or_else(|| LeagueError::InvalidMatchState {
            match_id: m.id,
            reason: format!(
                "player {} has no history entry for this match; recalculate the player first",
                player_id
            ),
        })?;
    let entry = registration.match_history.remove(idx);
    registration.stats.subtract(&entry.line);
    player.elo_rating -= entry.rating_delta();
    player.recompute_extremes();
    Ok(())
}

/// Return a completed match to `scheduled`, exactly undoing what recording it applied.
///
/// Playoff matches can only be reset while nothing downstream in the bracket exists, and
/// finals cannot be reset at all.
pub fn reset_match_to_unplayed(store: &mut LeagueStore, match_id: MatchId) -> Result<(), LeagueError> {
    let mut m = store.game(match_id)?.clone();
    if !m.is_completed() {
        return Err(LeagueError::InvalidMatchState {
            match_id,
            reason: "match has no result to reset".into(),
        });
    }

    if let Some(info) = m.playoff {
        let phase = store
            .playoff_config(m.season)
            .map(|c| c.current_phase)
            .unwrap_or_default();
        let downstream = info
            .next_slots()
            .into_iter()
            .any(|slot| store.bracket_match(m.season, slot).is_some());
        // A final's result drives the phase, which never moves backwards.
        if phase == PlayoffPhase::Completed || downstream || info.stage == PlayoffStage::Final {
            return Err(LeagueError::InvalidMatchState {
                match_id,
                reason: "the bracket has already advanced past this match; reset the playoffs instead"
                    .into(),
            });
        }
    } else {
        let mut player_1 = store.player(m.player_1)?.clone();
        let mut player_2 = store.player(m.player_2)?.clone();
        revert_for_player(&mut player_1, &m)?;
        revert_for_player(&mut player_2, &m)?;
        store.replace_player(player_1);
        store.replace_player(player_2);
    }

    m.status = MatchStatus::Scheduled;
    *store.game_mut(match_id)? = m;
    info!("Reset match {} to unplayed", match_id);
    Ok(())
}
