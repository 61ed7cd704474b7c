//! Playoff rounds: qualification snapshot, quarterfinal seeding, automatic advancement,
//! phase tracking and reset. Single elimination per group, plus a third-place match.

use crate::config::PLAYOFF_GROUP_SIZE;
use crate::logic::standings::{compute_standings, Entrant, StandingRow};
use crate::models::{
    GameMatch, LeagueError, LeagueStore, MatchId, PlayerId, PlayoffGroup, PlayoffInfo,
    PlayoffPhase, PlayoffStage, QualifiedPlayer, QualifiedPlayers, RegistrationStatus, SeasonKey,
};
use log::{debug, info};

/// Quarterfinal pairings by seed, in match-number order.
pub const QUARTERFINAL_SEEDS: [(u32, u32); 4] = [(1, 8), (2, 7), (3, 6), (4, 5)];

/// Outcome of asking for a bracket slot's match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotOutcome {
    Created(MatchId),
    /// The slot already had its match; nothing was created.
    Existing(MatchId),
}

impl SlotOutcome {
    pub fn match_id(self) -> MatchId {
        match self {
            SlotOutcome::Created(id) | SlotOutcome::Existing(id) => id,
        }
    }
}

/// Start the playoffs for a season: lock the qualified players and create the quarterfinals.
///
/// 1. Rank the season with the standings aggregator.
/// 2. Keep active registrants with at least one completed regular match.
/// 3. Top 8 form group A; with two groups, positions 9-16 form group B.
/// 4. Pair seeds 1v8, 2v7, 3v6, 4v5 as quarterfinals 1-4 of each group.
///
/// Returns the created quarterfinal match ids (group A first).
pub fn initialize_playoffs(
    store: &mut LeagueStore,
    season: SeasonKey,
    number_of_groups: u8,
) -> Result<Vec<MatchId>, LeagueError> {
    if !(1..=2).contains(&number_of_groups) {
        return Err(LeagueError::InvalidGroupCount(number_of_groups));
    }
    if store
        .playoff_config(season)
        .is_some_and(|c| c.is_locked() || !c.qualified_players().is_empty())
    {
        return Err(LeagueError::LockedSnapshotViolation);
    }

    let entrants: Vec<Entrant> = store.registrants(season).map(Entrant::from_player).collect();
    let table = compute_standings(store.completed_regular_matches(season), &entrants)?;

    let eligible: Vec<_> = table
        .into_iter()
        .filter(|row| row.is_eligible())
        .filter(|row| {
            store
                .player(row.player_id)
                .ok()
                .and_then(|p| p.registration(season))
                .is_some_and(|r| r.status == RegistrationStatus::Active)
        })
        .collect();
    let required = PLAYOFF_GROUP_SIZE * usize::from(number_of_groups);
    if eligible.len() < required {
        return Err(LeagueError::InsufficientPlayers {
            required,
            eligible: eligible.len(),
        });
    }

    let seeded = |rows: &[StandingRow]| -> Vec<QualifiedPlayer> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| QualifiedPlayer {
                player_id: row.player_id,
                name: row.name.clone(),
                seed: i as u32 + 1,
            })
            .collect()
    };
    let qualified = QualifiedPlayers {
        group_a: seeded(&eligible[..PLAYOFF_GROUP_SIZE]),
        group_b: if number_of_groups == 2 {
            seeded(&eligible[PLAYOFF_GROUP_SIZE..2 * PLAYOFF_GROUP_SIZE])
        } else {
            Vec::new()
        },
    };

    let mut matches = Vec::new();
    for &group in PlayoffGroup::all(number_of_groups) {
        matches.extend(quarterfinals(season, group, qualified.group(group)));
    }

    store
        .playoff_config_mut(season)
        .lock(number_of_groups, qualified)?;
    let ids: Vec<MatchId> = matches.into_iter().map(|m| store.insert_match(m)).collect();
    info!(
        "Initialized playoffs for {} with {} group(s), {} quarterfinals",
        season,
        number_of_groups,
        ids.len()
    );
    Ok(ids)
}

/// Quarterfinal matches for one group, seeds paired per [`QUARTERFINAL_SEEDS`].
fn quarterfinals(season: SeasonKey, group: PlayoffGroup, seeds: &[QualifiedPlayer]) -> Vec<GameMatch> {
    let by_seed = |seed: u32| seeds.iter().find(|q| q.seed == seed).map(|q| q.player_id);
    QUARTERFINAL_SEEDS
        .iter()
        .zip(1..)
        .filter_map(|(&(high, low), match_number)| {
            let info = PlayoffInfo::new(group, PlayoffStage::Quarterfinal, match_number);
            Some(GameMatch::playoff(season, by_seed(high)?, by_seed(low)?, info))
        })
        .collect()
}

/// Winner and loser of a completed bracket slot, or `FeederNotReady` for `waiting`.
fn feeder_outcome(
    store: &LeagueStore,
    season: SeasonKey,
    feeder: PlayoffInfo,
    waiting: PlayoffInfo,
) -> Result<(PlayerId, PlayerId), LeagueError> {
    store
        .bracket_match(season, feeder)
        .and_then(|m| Some((m.winner_id()?, m.loser_id()?)))
        .ok_or(LeagueError::FeederNotReady {
            group: waiting.group,
            stage: waiting.stage,
            match_number: waiting.match_number,
        })
}

/// Create the match for a bracket slot once both feeders are completed.
///
/// Check-then-create: a slot that already has its match is returned as-is, so sibling
/// completions never create the same round twice.
fn ensure_slot(
    store: &mut LeagueStore,
    season: SeasonKey,
    slot: PlayoffInfo,
) -> Result<SlotOutcome, LeagueError> {
    if let Some(existing) = store.bracket_match(season, slot) {
        return Ok(SlotOutcome::Existing(existing.id));
    }
    let Some([first, second]) = slot.feeders() else {
        // Quarterfinals only come from initialization.
        return Err(LeagueError::PlayoffsNotInitialized);
    };
    let (first_winner, first_loser) = feeder_outcome(store, season, first, slot)?;
    let (second_winner, second_loser) = feeder_outcome(store, season, second, slot)?;
    let (player_1, player_2) = match slot.stage {
        PlayoffStage::ThirdPlace => (first_loser, second_loser),
        _ => (first_winner, second_winner),
    };
    let id = store.insert_match(GameMatch::playoff(season, player_1, player_2, slot));
    info!(
        "Created group {} {} #{} for {}",
        slot.group, slot.stage, slot.match_number, season
    );
    Ok(SlotOutcome::Created(id))
}

/// Move the phase forward from the finals' state. Never moves backwards.
fn refresh_phase(store: &mut LeagueStore, season: SeasonKey) {
    let Some(config) = store.playoff_config(season) else {
        return;
    };
    if !config.is_locked() {
        return;
    }
    let groups = PlayoffGroup::all(config.number_of_groups);
    let final_done = |group: PlayoffGroup| {
        store
            .bracket_match(season, PlayoffInfo::new(group, PlayoffStage::Final, 1))
            .is_some_and(|m| m.is_completed())
    };
    let target = if groups.iter().all(|&g| final_done(g)) {
        PlayoffPhase::Completed
    } else if groups.len() == 2 && final_done(PlayoffGroup::A) {
        PlayoffPhase::PlayoffsGroupB
    } else {
        PlayoffPhase::PlayoffsGroupA
    };
    let order = |phase: PlayoffPhase| match phase {
        PlayoffPhase::RegularSeason => 0,
        PlayoffPhase::PlayoffsGroupA => 1,
        PlayoffPhase::PlayoffsGroupB => 2,
        PlayoffPhase::Completed => 3,
    };
    let config = store.playoff_config_mut(season);
    if order(target) > order(config.current_phase) {
        info!("Playoffs for {} moved to {:?}", season, target);
        config.current_phase = target;
    }
}

/// Advance the bracket after a playoff match completed. Returns the matches created.
///
/// A next-round slot whose other feeder is still pending is left alone.
pub fn on_playoff_match_completed(store: &mut LeagueStore, completed: &GameMatch) -> Vec<MatchId> {
    let Some(info) = completed.playoff else {
        return Vec::new();
    };
    let mut created = Vec::new();
    for slot in info.next_slots() {
        match ensure_slot(store, completed.season, slot) {
            Ok(SlotOutcome::Created(id)) => created.push(id),
            Ok(SlotOutcome::Existing(_)) => {}
            Err(e) => debug!("Not advancing to group {} {}: {}", slot.group, slot.stage, e),
        }
    }
    refresh_phase(store, completed.season);
    created
}

/// Operator command: create a next-round match explicitly.
///
/// Unlike automatic advancement, a pending feeder is reported as `FeederNotReady`.
pub fn create_next_round_match(
    store: &mut LeagueStore,
    season: SeasonKey,
    slot: PlayoffInfo,
) -> Result<SlotOutcome, LeagueError> {
    let config = store
        .playoff_config(season)
        .filter(|c| c.is_locked())
        .ok_or(LeagueError::PlayoffsNotInitialized)?;
    let in_play = PlayoffGroup::all(config.number_of_groups).contains(&slot.group);
    if !in_play || slot.match_number == 0 || slot.match_number > slot.stage.slots() {
        return Err(LeagueError::UnknownBracketSlot {
            group: slot.group,
            stage: slot.stage,
            match_number: slot.match_number,
        });
    }
    let outcome = ensure_slot(store, season, slot)?;
    refresh_phase(store, season);
    Ok(outcome)
}

/// Delete every playoff match of the season and go back to the regular season.
///
/// Destructive: the caller is responsible for confirming it. Returns the number of matches removed.
pub fn reset_playoffs(store: &mut LeagueStore, season: SeasonKey) -> usize {
    let removed = store.remove_playoff_matches(season);
    store.playoff_config_mut(season).reset();
    info!("Reset playoffs for {} ({} matches removed)", season, removed);
    removed
}
