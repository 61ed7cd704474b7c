//! Rating engine: standard ELO over completed regular matches.

use crate::models::{GameMatch, Side, SkillLevel};
use serde::{Deserialize, Serialize};

/// Starting rating for a skill level (intermediate is also the default level).
pub fn initial_rating(level: SkillLevel) -> i32 {
    match level {
        SkillLevel::Beginner => 1100,
        SkillLevel::Intermediate => 1200,
        SkillLevel::Advanced => 1300,
    }
}

/// Result of one rating update. `delta` is what player A gained (B lost the same).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub new_rating_a: i32,
    pub new_rating_b: i32,
    pub delta: i32,
}

impl RatingChange {
    /// No change: both ratings kept.
    pub fn unchanged(rating_a: i32, rating_b: i32) -> Self {
        Self {
            new_rating_a: rating_a,
            new_rating_b: rating_b,
            delta: 0,
        }
    }

    pub fn delta_a(&self) -> i32 {
        self.delta
    }

    pub fn delta_b(&self) -> i32 {
        -self.delta
    }
}

/// Probability that A beats B.
pub fn expected_score(rating_a: i32, rating_b: i32) -> f64 {
    1.0 / (1.0 + 10_f64.powf(f64::from(rating_b - rating_a) / 400.0))
}

/// ELO update for one match.
///
/// The delta is rounded once and applied with opposite signs, so the update is zero-sum.
pub fn apply_rating_change(rating_a: i32, rating_b: i32, a_won: bool, k_factor: f64) -> RatingChange {
    let actual = if a_won { 1.0 } else { 0.0 };
    let delta = (k_factor * (actual - expected_score(rating_a, rating_b))).round() as i32;
    RatingChange {
        new_rating_a: rating_a + delta,
        new_rating_b: rating_b - delta,
        delta,
    }
}

/// Whether a match moves ratings: completed, regular season, not a walkover.
pub fn is_rated(m: &GameMatch) -> bool {
    match m.result() {
        Some(result) => !m.is_playoff() && !result.score.walkover,
        None => false,
    }
}

/// Rating update for a match given both players' pre-match ratings (A = player 1).
/// Playoffs, walkovers and unplayed matches leave both ratings untouched.
pub fn rate_match(m: &GameMatch, player_1_before: i32, player_2_before: i32, k_factor: f64) -> RatingChange {
    match m.result() {
        Some(result) if is_rated(m) => apply_rating_change(
            player_1_before,
            player_2_before,
            result.winner == Side::One,
            k_factor,
        ),
        _ => RatingChange::unchanged(player_1_before, player_2_before),
    }
}
