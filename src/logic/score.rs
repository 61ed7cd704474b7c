//! Score engine: league points and set/game tallies of a single match. No I/O.

use crate::models::{GameMatch, LeagueError, Score, Side, StatLine};
use serde::{Deserialize, Serialize};

/// Points for the winner of a walkover.
pub const WALKOVER_POINTS: u32 = 2;
/// Games credited to the winner of a walkover (no real sets were played).
pub const WALKOVER_GAMES: u32 = 12;
/// Sets credited to the winner of a walkover.
pub const WALKOVER_SETS: u32 = 2;
/// Most sets a match can have (best of five).
pub const MAX_SETS: usize = 5;
/// Most games either player can have in one set. Leaves room for advantage sets and a
/// match tiebreak entered as points.
pub const MAX_SET_GAMES: u32 = 30;

/// Regular-season points awarded to each player.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchPoints {
    pub player_1: u32,
    pub player_2: u32,
}

impl MatchPoints {
    pub fn for_side(&self, side: Side) -> u32 {
        match side {
            Side::One => self.player_1,
            Side::Two => self.player_2,
        }
    }
}

/// Sets and games won by each player.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GamesAndSets {
    pub player_1_sets: u32,
    pub player_2_sets: u32,
    pub player_1_games: u32,
    pub player_2_games: u32,
}

impl GamesAndSets {
    /// `(sets_won, sets_lost, games_won, games_lost)` from one side's point of view.
    pub fn for_side(&self, side: Side) -> (u32, u32, u32, u32) {
        match side {
            Side::One => (
                self.player_1_sets,
                self.player_2_sets,
                self.player_1_games,
                self.player_2_games,
            ),
            Side::Two => (
                self.player_2_sets,
                self.player_1_sets,
                self.player_2_games,
                self.player_1_games,
            ),
        }
    }
}

/// Points for a player who won `sets_won` and lost `sets_lost` sets.
pub fn points_for_sets(sets_won: u32, sets_lost: u32) -> u32 {
    match (sets_won, sets_lost) {
        (2, 0) => 3,
        (2, 1) => 2,
        (1, 2) => 1,
        (0, 2) => 0,
        _ => 0,
    }
}

/// Sets won by each side, counted from the set scores (walkovers excluded).
fn sets_won(score: &Score) -> (u32, u32) {
    score
        .sets
        .iter()
        .fold((0, 0), |(one, two), set| match set.winner() {
            Some(Side::One) => (one + 1, two),
            Some(Side::Two) => (one, two + 1),
            None => (one, two),
        })
}

/// League points for a completed regular match.
///
/// Unplayed and playoff matches give nothing; a walkover gives the winner
/// [`WALKOVER_POINTS`]; otherwise the set split maps through [`points_for_sets`],
/// with a retirement scored as if the winner had taken the remaining sets.
pub fn points_for_match(m: &GameMatch) -> MatchPoints {
    let Some(result) = m.result() else {
        return MatchPoints::default();
    };
    if m.is_playoff() {
        return MatchPoints::default();
    }
    if result.score.walkover {
        return match result.winner {
            Side::One => MatchPoints {
                player_1: WALKOVER_POINTS,
                player_2: 0,
            },
            Side::Two => MatchPoints {
                player_1: 0,
                player_2: WALKOVER_POINTS,
            },
        };
    }
    let (one, two) = sets_won(&result.score);
    if let Some(retired) = result.score.retired {
        // The winner is credited with finishing the match; the retiring player keeps
        // at most one set.
        let kept = match retired {
            Side::One => one,
            Side::Two => two,
        }
        .min(1);
        let (winner, loser) = (points_for_sets(2, kept), points_for_sets(kept, 2));
        return match result.winner {
            Side::One => MatchPoints {
                player_1: winner,
                player_2: loser,
            },
            Side::Two => MatchPoints {
                player_1: loser,
                player_2: winner,
            },
        };
    }
    MatchPoints {
        player_1: points_for_sets(one, two),
        player_2: points_for_sets(two, one),
    }
}

/// Set and game tallies of a completed match. A walkover counts as 12-0 games, 2-0 sets.
pub fn games_and_sets_for_match(m: &GameMatch) -> GamesAndSets {
    let Some(result) = m.result() else {
        return GamesAndSets::default();
    };
    if result.score.walkover {
        let (sets, games) = (WALKOVER_SETS, WALKOVER_GAMES);
        return match result.winner {
            Side::One => GamesAndSets {
                player_1_sets: sets,
                player_1_games: games,
                ..GamesAndSets::default()
            },
            Side::Two => GamesAndSets {
                player_2_sets: sets,
                player_2_games: games,
                ..GamesAndSets::default()
            },
        };
    }
    let (player_1_sets, player_2_sets) = sets_won(&result.score);
    let (player_1_games, player_2_games) = result
        .score
        .sets
        .iter()
        .fold((0u32, 0u32), |(a, b), set| {
            (a.saturating_add(set.player_1_games), b.saturating_add(set.player_2_games))
        });
    GamesAndSets {
        player_1_sets,
        player_2_sets,
        player_1_games,
        player_2_games,
    }
}

/// Everything one side gets out of a completed match, ready to fold into [`crate::Stats`].
pub fn stat_line(m: &GameMatch, side: Side) -> StatLine {
    let Some(result) = m.result() else {
        return StatLine::default();
    };
    let (sets_won, sets_lost, games_won, games_lost) = games_and_sets_for_match(m).for_side(side);
    let won = result.winner == side;
    StatLine {
        won,
        points: points_for_match(m).for_side(side),
        sets_won,
        sets_lost,
        games_won,
        games_lost,
        retired: result.score.retired == Some(side),
        conceded_walkover: result.score.walkover && !won,
    }
}

/// Reject scores that are not valid tennis results for the given winner.
pub fn validate_score(score: &Score, winner: Side) -> Result<(), LeagueError> {
    let inconsistent = |reason: &str| Err(LeagueError::InconsistentScore(reason.to_string()));

    if score.walkover {
        if !score.sets.is_empty() {
            return inconsistent("a walkover has no sets");
        }
        if score.retired.is_some() {
            return inconsistent("a walkover cannot also be a retirement");
        }
        return Ok(());
    }
    if score.sets.is_empty() {
        return inconsistent("no sets recorded and not a walkover");
    }
    if score.sets.len() > MAX_SETS {
        return Err(LeagueError::InconsistentScore(format!(
            "{} sets recorded, at most {} allowed",
            score.sets.len(),
            MAX_SETS
        )));
    }
    if let Some(i) = score
        .sets
        .iter()
        .position(|s| s.player_1_games.max(s.player_2_games) > MAX_SET_GAMES)
    {
        return Err(LeagueError::InconsistentScore(format!(
            "set {} has more than {} games for one player",
            i + 1,
            MAX_SET_GAMES
        )));
    }
    if let Some(i) = score.sets.iter().position(|s| s.winner().is_none()) {
        return Err(LeagueError::InconsistentScore(format!(
            "set {} is tied",
            i + 1
        )));
    }
    match score.retired {
        Some(side) if side == winner => inconsistent("the winner cannot be the player who retired"),
        Some(_) => Ok(()),
        None => {
            let (one, two) = sets_won(score);
            let (won, lost) = match winner {
                Side::One => (one, two),
                Side::Two => (two, one),
            };
            if won <= lost {
                return inconsistent("the winner must win more sets");
            }
            Ok(())
        }
    }
}
