//! Playoff configuration, phases and bracket slots.

use crate::models::error::LeagueError;
use crate::models::ids::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parallel playoff bracket: A for positions 1-8, B for 9-16.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffGroup {
    A,
    B,
}

impl PlayoffGroup {
    pub fn all(number_of_groups: u8) -> &'static [PlayoffGroup] {
        if number_of_groups >= 2 {
            &[PlayoffGroup::A, PlayoffGroup::B]
        } else {
            &[PlayoffGroup::A]
        }
    }
}

impl fmt::Display for PlayoffGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayoffGroup::A => write!(f, "A"),
            PlayoffGroup::B => write!(f, "B"),
        }
    }
}

/// Bracket round. Final and third place are played in the same round.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffStage {
    Quarterfinal,
    Semifinal,
    Final,
    ThirdPlace,
}

impl PlayoffStage {
    pub fn round(self) -> u32 {
        match self {
            PlayoffStage::Quarterfinal => 1,
            PlayoffStage::Semifinal => 2,
            PlayoffStage::Final | PlayoffStage::ThirdPlace => 3,
        }
    }

    /// Number of bracket slots in this stage.
    pub fn slots(self) -> u32 {
        match self {
            PlayoffStage::Quarterfinal => 4,
            PlayoffStage::Semifinal => 2,
            PlayoffStage::Final | PlayoffStage::ThirdPlace => 1,
        }
    }

    /// Stage whose matches feed this one, `None` for quarterfinals.
    pub fn feeder_stage(self) -> Option<PlayoffStage> {
        match self {
            PlayoffStage::Quarterfinal => None,
            PlayoffStage::Semifinal => Some(PlayoffStage::Quarterfinal),
            PlayoffStage::Final | PlayoffStage::ThirdPlace => Some(PlayoffStage::Semifinal),
        }
    }
}

impl fmt::Display for PlayoffStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayoffStage::Quarterfinal => "quarterfinal",
            PlayoffStage::Semifinal => "semifinal",
            PlayoffStage::Final => "final",
            PlayoffStage::ThirdPlace => "third place",
        };
        write!(f, "{s}")
    }
}

/// Bracket slot of a playoff match. `(group, stage, match_number)` is unique per season.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PlayoffInfo {
    pub group: PlayoffGroup,
    pub stage: PlayoffStage,
    /// 1-based slot index within the stage.
    pub match_number: u32,
}

impl PlayoffInfo {
    pub fn new(group: PlayoffGroup, stage: PlayoffStage, match_number: u32) -> Self {
        Self {
            group,
            stage,
            match_number,
        }
    }

    /// The two feeder slots of this slot (lower number first), `None` for quarterfinals.
    pub fn feeders(&self) -> Option<[PlayoffInfo; 2]> {
        let stage = self.stage.feeder_stage()?;
        let first = match self.stage {
            PlayoffStage::Semifinal => self.match_number * 2 - 1,
            _ => 1,
        };
        Some([
            PlayoffInfo::new(self.group, stage, first),
            PlayoffInfo::new(self.group, stage, first + 1),
        ])
    }

    /// Slots fed by this slot once it completes.
    pub fn next_slots(&self) -> Vec<PlayoffInfo> {
        match self.stage {
            PlayoffStage::Quarterfinal => vec![PlayoffInfo::new(
                self.group,
                PlayoffStage::Semifinal,
                self.match_number.div_ceil(2),
            )],
            PlayoffStage::Semifinal => vec![
                PlayoffInfo::new(self.group, PlayoffStage::Final, 1),
                PlayoffInfo::new(self.group, PlayoffStage::ThirdPlace, 1),
            ],
            PlayoffStage::Final | PlayoffStage::ThirdPlace => Vec::new(),
        }
    }
}

/// Current phase of a league season.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffPhase {
    #[default]
    RegularSeason,
    PlayoffsGroupA,
    PlayoffsGroupB,
    Completed,
}

/// A player locked into a playoff group with their seed (1 = strongest).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct QualifiedPlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub seed: u32,
}

/// Locked group rosters captured when the playoffs start.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct QualifiedPlayers {
    pub group_a: Vec<QualifiedPlayer>,
    pub group_b: Vec<QualifiedPlayer>,
}

impl QualifiedPlayers {
    pub fn group(&self, group: PlayoffGroup) -> &[QualifiedPlayer] {
        match group {
            PlayoffGroup::A => &self.group_a,
            PlayoffGroup::B => &self.group_b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group_a.is_empty() && self.group_b.is_empty()
    }
}

/// Playoff settings and state for one league season.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayoffConfig {
    pub enabled: bool,
    pub number_of_groups: u8,
    pub current_phase: PlayoffPhase,
    qualified_players: QualifiedPlayers,
}

impl PlayoffConfig {
    pub fn qualified_players(&self) -> &QualifiedPlayers {
        &self.qualified_players
    }

    /// Whether the qualified-player snapshot is locked (the playoffs have started).
    pub fn is_locked(&self) -> bool {
        self.current_phase != PlayoffPhase::RegularSeason
    }

    /// Capture the snapshot and start the playoffs. Only valid during the regular season.
    pub fn lock(
        &mut self,
        number_of_groups: u8,
        qualified: QualifiedPlayers,
    ) -> Result<(), LeagueError> {
        if self.is_locked() || !self.qualified_players.is_empty() {
            return Err(LeagueError::LockedSnapshotViolation);
        }
        self.enabled = true;
        self.number_of_groups = number_of_groups;
        self.qualified_players = qualified;
        self.current_phase = PlayoffPhase::PlayoffsGroupA;
        Ok(())
    }

    /// Back to the regular season with the snapshot cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
