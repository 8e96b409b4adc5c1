// Team facts consumed by the structure engine.
//
// Rosters, scores and life pools are owned by the game-state layer. The
// engine only reads them: gate count and order come from the ordered team
// list, gate colours from each team's `TeamKind`, and sign text from the
// counters below. `TeamInfo` is a plain snapshot of those facts; the game
// layer updates it and asks for a sign refresh.
//
// See also: `zone.rs` which holds the ordered `Vec<TeamInfo>`,
// `sign.rs` for the team gate sign text.

use crate::types::{BlockState, Material};
use serde::{Deserialize, Serialize};

/// Life pool sentinel meaning "never runs out".
pub const UNLIMITED_LIVES: i32 = -1;

/// A team's visual style: the coloured block its gates are built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamKind {
    White,
    Orange,
    Magenta,
    Blue,
    Gold,
    Green,
    Pink,
    Gray,
    Iron,
    Diamond,
    Purple,
    Navy,
    Brown,
    Darkgreen,
    Red,
    Black,
}

impl TeamKind {
    pub const ALL: [TeamKind; 16] = [
        TeamKind::White,
        TeamKind::Orange,
        TeamKind::Magenta,
        TeamKind::Blue,
        TeamKind::Gold,
        TeamKind::Green,
        TeamKind::Pink,
        TeamKind::Gray,
        TeamKind::Iron,
        TeamKind::Diamond,
        TeamKind::Purple,
        TeamKind::Navy,
        TeamKind::Brown,
        TeamKind::Darkgreen,
        TeamKind::Red,
        TeamKind::Black,
    ];

    /// The wool colour index for this kind.
    pub fn wool_variant(self) -> u8 {
        self as u8
    }

    /// Gate block for this kind.
    pub fn block(self) -> BlockState {
        BlockState::new(Material::Wool, self.wool_variant())
    }

    /// Case-insensitive lookup by kind name.
    pub fn from_name(name: &str) -> Option<TeamKind> {
        TeamKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            TeamKind::White => "white",
            TeamKind::Orange => "orange",
            TeamKind::Magenta => "magenta",
            TeamKind::Blue => "blue",
            TeamKind::Gold => "gold",
            TeamKind::Green => "green",
            TeamKind::Pink => "pink",
            TeamKind::Gray => "gray",
            TeamKind::Iron => "iron",
            TeamKind::Diamond => "diamond",
            TeamKind::Purple => "purple",
            TeamKind::Navy => "navy",
            TeamKind::Brown => "brown",
            TeamKind::Darkgreen => "darkgreen",
            TeamKind::Red => "red",
            TeamKind::Black => "black",
        }
    }
}

/// Read-only facts about one registered team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    /// Unique within a zone.
    pub name: String,
    pub kind: TeamKind,
    pub players: u32,
    /// Maximum roster size.
    pub capacity: u32,
    pub points: u32,
    pub max_score: u32,
    pub remaining_lives: i32,
    /// Life pool size, or `UNLIMITED_LIVES`.
    pub life_pool: i32,
}

impl TeamInfo {
    /// A fresh team named after its kind, with an empty roster.
    pub fn new(kind: TeamKind) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            players: 0,
            capacity: 20,
            points: 0,
            max_score: 10,
            remaining_lives: 7,
            life_pool: 7,
        }
    }

    pub fn has_unlimited_lives(&self) -> bool {
        self.life_pool == UNLIMITED_LIVES
    }
}
