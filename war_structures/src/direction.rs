// Wall rotation tables: the single source of left/right/opposite lookups.
//
// A lobby is attached to one of the four cardinal walls of a zone. Every
// relative offset the engine computes (gate fan-out, path clearing, exit
// volumes, sign placement, light placement) is expressed in terms of the
// wall and its left/right pair "as seen by a player in the lobby looking at
// the zone". Those pairs come from one fixed table:
//
//   wall   left   right
//   North  East   West
//   East   South  North
//   South  West   East
//   West   North  South
//
// The table is not derived from `opposite()`; it is a rotation. All
// consumers go through `Wall::left_right()` so the gate map, the cleared
// paths and the exit checks can never disagree.
//
// Also here: yaw bucketing for orientation-anchored lobbies, the sign
// facing codes, and the teleport yaw per wall.
//
// See also: `types.rs` for `Direction` and the grid compass, `lobby.rs`
// which consumes these tables for layout.

use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four cardinal faces of a zone's bounding region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wall {
    North,
    East,
    South,
    West,
}

/// The sideways pair for a wall, as seen looking at the zone from the lobby.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sides {
    pub left: Direction,
    pub right: Direction,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::North, Wall::East, Wall::South, Wall::West];

    /// The grid direction pointing out of the zone through this wall.
    pub const fn to_direction(self) -> Direction {
        match self {
            Wall::North => Direction::North,
            Wall::East => Direction::East,
            Wall::South => Direction::South,
            Wall::West => Direction::West,
        }
    }

    pub const fn opposite(self) -> Wall {
        match self {
            Wall::North => Wall::South,
            Wall::East => Wall::West,
            Wall::South => Wall::North,
            Wall::West => Wall::East,
        }
    }

    pub const fn left_right(self) -> Sides {
        match self {
            Wall::North => Sides {
                left: Direction::East,
                right: Direction::West,
            },
            Wall::East => Sides {
                left: Direction::South,
                right: Direction::North,
            },
            Wall::South => Sides {
                left: Direction::West,
                right: Direction::East,
            },
            Wall::West => Sides {
                left: Direction::North,
                right: Direction::South,
            },
        }
    }

    /// Facing direction for a player yaw in degrees. Any real yaw is
    /// accepted; it is wrapped into `[0, 360)` and truncated to whole
    /// degrees before bucketing.
    ///
    /// 0–45 and 315–360 face West, 45–135 North, 135–225 East,
    /// 225–315 South.
    pub fn facing_from_yaw(yaw: f32) -> Wall {
        let wrapped = if yaw >= 0.0 {
            (yaw % 360.0) as i32
        } else {
            (360.0 + (yaw % 360.0)) as i32
        };
        match wrapped {
            45..=134 => Wall::North,
            135..=224 => Wall::East,
            225..=314 => Wall::South,
            // 0..45, 315..=360
            _ => Wall::West,
        }
    }

    /// The wall a lobby behaves as if attached to when the player placing it
    /// faces along `facing`: the lobby looks back at the player.
    pub fn attached_for_facing(facing: Wall) -> Wall {
        facing.opposite()
    }

    /// Sign facing code for a sign read by someone walking away from the
    /// wall (into the lobby) when `away_from_wall`, or towards it otherwise.
    pub const fn sign_facing(self, away_from_wall: bool) -> u8 {
        match (self, away_from_wall) {
            (Wall::North, true) => 4,
            (Wall::East, true) => 8,
            (Wall::South, true) => 12,
            (Wall::West, true) => 0,
            (Wall::North, false) => 12,
            (Wall::East, false) => 0,
            (Wall::South, false) => 4,
            (Wall::West, false) => 8,
        }
    }

    /// Yaw a player arriving at the zone teleport is turned to.
    pub const fn teleport_yaw(self) -> f32 {
        match self {
            Wall::West => 180.0,
            Wall::South => 90.0,
            Wall::East => 0.0,
            Wall::North => 270.0,
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Wall::North => "north",
            Wall::East => "east",
            Wall::South => "south",
            Wall::West => "west",
        };
        f.write_str(name)
    }
}
