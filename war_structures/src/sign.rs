// Sign text and placement for lobby signage.
//
// Three kinds of sign are written into a lobby:
// - one team sign beside each team gate, read by players walking away from
//   the zone wall into the lobby;
// - the war-hub sign beside the link gate, read by players walking back
//   towards the wall;
// - the zone sign in the middle of the lobby.
//
// Gate signs sit diagonally in front of their gate: one step along the
// reading direction, one step to the left of the wall. The facing code
// comes from `Wall::sign_facing`.
//
// See also: `materialize.rs` which writes these through `SignWriter`,
// `team.rs` for the counters shown on team signs.

use crate::direction::Wall;
use crate::team::TeamInfo;
use crate::types::VoxelCoord;
use crate::world::SignWriter;

/// A sign ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignPlacement {
    pub block: VoxelCoord,
    pub facing: u8,
    pub lines: [String; 4],
}

impl SignPlacement {
    pub fn write(self, signs: &mut impl SignWriter) {
        signs.write_sign(self.block, self.facing, self.lines);
    }
}

pub fn team_sign_lines(team: &TeamInfo) -> [String; 4] {
    let lives = if team.has_unlimited_lives() {
        "unlimited lives".to_string()
    } else {
        format!("{}/{} lives left", team.remaining_lives, team.life_pool)
    };
    [
        format!("Team {}", team.name),
        format!("{}/{} players", team.players, team.capacity),
        format!("{}/{} pts", team.points, team.max_score),
        lives,
    ]
}

pub fn war_hub_sign_lines() -> [String; 4] {
    [
        String::new(),
        "To War hub".to_string(),
        String::new(),
        String::new(),
    ]
}

pub fn zone_sign_lines(zone_name: &str, auto_assign: bool) -> [String; 4] {
    let (third, fourth) = if auto_assign {
        ("Enter the auto-", "assign gate.")
    } else {
        ("", "Pick your team.")
    };
    [
        "Warzone".to_string(),
        zone_name.to_string(),
        third.to_string(),
        fourth.to_string(),
    ]
}

/// Sign beside a gate. `away_from_wall` selects the reading direction:
/// team gates are read walking into the lobby, the link gate walking back.
pub fn gate_sign(
    gate: VoxelCoord,
    wall: Wall,
    away_from_wall: bool,
    lines: [String; 4],
) -> SignPlacement {
    let direction = if away_from_wall {
        wall.to_direction()
    } else {
        wall.opposite().to_direction()
    };
    SignPlacement {
        block: gate.step(direction).step(wall.left_right().left),
        facing: wall.sign_facing(away_from_wall),
        lines,
    }
}

pub fn team_gate_sign(gate: VoxelCoord, wall: Wall, team: &TeamInfo) -> SignPlacement {
    gate_sign(gate, wall, true, team_sign_lines(team))
}

/// The zone sign always faces like a team sign.
pub fn zone_sign(
    block: VoxelCoord,
    wall: Wall,
    zone_name: &str,
    auto_assign: bool,
) -> SignPlacement {
    SignPlacement {
        block,
        facing: wall.sign_facing(true),
        lines: zone_sign_lines(zone_name, auto_assign),
    }
}
