// Structure materializer: writes a computed lobby into the world.
//
// `materialize_lobby()` walks a `LobbyLayout` and performs every voxel
// write, in this order:
// 1. Floor (bottom face) and floor outline, each skipped when its material
//    is air ("leave the terrain as it is").
// 2. War-hub link gate and its sign, only when a war hub exists. The link
//    gate faces back towards the wall.
// 3. Auto-assign gate: frame cells cycle through the registered teams'
//    colours. With no teams only the light under the gate is written.
// 4. Team gates in registration order, each in its team's colour, then
//    every team's gate sign.
// 5. The zone teleport point and the walking path from the wall out to it,
//    so players are never cemented in after a regeneration.
// 6. The zone sign and the two lobby lights.
//
// Before a gate frame is written, a small box in front of the gate is
// cleared to air. Team gates also clear two 3-tall columns diagonally in
// front so a player can step sideways out of the gate.
//
// If no lobby exists yet the pass is skipped with a warning. The zone is
// left without a lobby until an operator anchors one; this is not an error.
//
// See also: `lobby.rs` for the points written here, `sign.rs` for sign
// text, `config.rs` for `LobbyMaterials`.
//
// **Critical constraint: runs after relocation.** The lobby region must
// already hold a snapshot of the terrain; everything written here is
// undone by restoring that snapshot.

use crate::config::StructureConfig;
use crate::direction::{Sides, Wall};
use crate::lobby::{GateLayout, ZoneFacts, ZoneLobby, gate_frame};
use crate::sign::{self, SignPlacement};
use crate::team::{TeamInfo, TeamKind};
use crate::types::{BlockState, Direction, Location, Material, VoxelCoord};
use crate::volume::Region;
use crate::world::{BlockWorld, SignWriter};
use serde::{Deserialize, Serialize};

/// Where players entering the zone from its lobby arrive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Teleport {
    pub location: Location,
    /// Degrees, pointing into the lobby away from the wall.
    pub yaw: f32,
}

/// Summary of one materialization pass.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterializeReport {
    pub teleport: Teleport,
    pub gates_built: usize,
    pub signs_written: usize,
}

/// Cells out from the middle-wall block where the walking path starts.
const PATH_START: i32 = 2;
/// Length of the two-tall walking path column.
const PATH_LENGTH: i32 = 6;

pub fn materialize_lobby<W: BlockWorld + SignWriter>(
    lobby: Option<&ZoneLobby>,
    facts: ZoneFacts<'_>,
    config: &StructureConfig,
    world: &mut W,
) -> Option<MaterializeReport> {
    let Some(lobby) = lobby else {
        log::warn!(
            "zone {} has no lobby geometry; skipping lobby materialization",
            facts.name
        );
        return None;
    };
    let layout = lobby.layout();
    let wall = layout.wall;
    let sides = wall.left_right();
    let world_name = lobby.world_name();
    let materials = &config.lobby_materials;
    let mut gates_built = 0;
    let mut signs_written = 0;

    if !materials.floor.is_air() {
        lobby
            .volume()
            .fill_face(world, Direction::Down, materials.floor);
    }
    if !materials.outline.is_air() {
        lobby.volume().fill_outline(world, materials.outline);
    }

    if config.war_hub_present {
        let gate = layout.link_gate;
        clear_gate_path(world, world_name, gate, wall.opposite().to_direction(), sides, false);
        world.set_block(gate.down(1), materials.light);
        for cell in gate_frame(gate, wall) {
            world.set_block(cell, materials.gate);
        }
        sign::gate_sign(gate, wall, false, sign::war_hub_sign_lines()).write(world);
        gates_built += 1;
        signs_written += 1;
    }

    match &layout.gates {
        GateLayout::AutoAssign(gate) => {
            let gate = *gate;
            clear_gate_path(world, world_name, gate, wall.to_direction(), sides, false);
            world.set_block(gate.down(1), materials.light);
            let kinds: Vec<TeamKind> = facts.teams.iter().map(|t| t.kind).collect();
            if kinds.is_empty() {
                log::debug!("zone {} has no teams; auto-assign gate left bare", facts.name);
            } else {
                for (i, cell) in gate_frame(gate, wall).into_iter().enumerate() {
                    world.set_block(cell, kinds[i % kinds.len()].block());
                }
            }
            gates_built += 1;
        }
        GateLayout::PerTeam(_) => {
            for team in facts.teams {
                let Some(gate) = layout.gates.team_gate(&team.name) else {
                    continue;
                };
                clear_gate_path(world, world_name, gate, wall.to_direction(), sides, true);
                world.set_block(gate.down(1), materials.light);
                let block = team.kind.block();
                for cell in gate_frame(gate, wall) {
                    world.set_block(cell, block);
                }
                log::debug!("team gate {} at {}", team.name, gate);
                gates_built += 1;
            }
            for team in facts.teams {
                if let Some(gate) = layout.gates.team_gate(&team.name) {
                    sign::team_gate_sign(gate, wall, team).write(world);
                    signs_written += 1;
                }
            }
        }
    }

    let teleport = Teleport {
        location: Location::new(world_name, layout.teleport_block),
        yaw: wall.teleport_yaw(),
    };
    clear_walking_path(world, world_name, layout.middle_wall_block, wall);

    sign::zone_sign(layout.zone_sign_block, wall, facts.name, facts.auto_assign).write(world);
    signs_written += 1;

    for light in layout.lights {
        world.set_block(light, materials.light);
    }

    log::info!(
        "materialized lobby for zone {}: {} gates, {} signs",
        facts.name,
        gates_built,
        signs_written
    );
    Some(MaterializeReport {
        teleport,
        gates_built,
        signs_written,
    })
}

/// Rewrite one team's gate sign. Returns `false` when the lobby has no
/// gate for that team (auto-assign mode or unknown team).
pub fn refresh_team_sign(
    lobby: &ZoneLobby,
    team: &TeamInfo,
    signs: &mut impl SignWriter,
) -> bool {
    let layout = lobby.layout();
    match layout.gates.team_gate(&team.name) {
        Some(gate) => {
            sign::team_gate_sign(gate, layout.wall, team).write(signs);
            true
        }
        None => false,
    }
}

/// The sign `refresh_team_sign` would write, without writing it.
pub fn team_sign_for(lobby: &ZoneLobby, team: &TeamInfo) -> Option<SignPlacement> {
    let layout = lobby.layout();
    layout
        .gates
        .team_gate(&team.name)
        .map(|gate| sign::team_gate_sign(gate, layout.wall, team))
}

/// Air box in front of a gate, plus two side columns for gates players walk
/// out of.
fn clear_gate_path(
    world: &mut impl BlockWorld,
    world_name: &str,
    gate: VoxelCoord,
    away: Direction,
    sides: Sides,
    player_columns: bool,
) {
    Region::new(
        world_name,
        gate.step(sides.right),
        gate.step(sides.left).relative(away, 2).up(2),
    )
    .fill(world, Material::Air);
    if player_columns {
        let front = gate.relative(away, 2);
        for side in [sides.right, sides.left] {
            let base = front.relative(side, 2);
            for h in 0..3 {
                world.set_block(base.up(h), BlockState::AIR);
            }
        }
    }
}

/// Clear from the wall out past the teleport point: a 3-wide, 2-tall box
/// and a 2-tall column down the middle.
fn clear_walking_path(
    world: &mut impl BlockWorld,
    world_name: &str,
    middle: VoxelCoord,
    wall: Wall,
) {
    let out = wall.to_direction();
    let sides = wall.left_right();
    let start = middle.relative(out, PATH_START);
    Region::new(
        world_name,
        start.step(sides.left),
        start.step(sides.right).relative(out, 4).up(1),
    )
    .fill(world, Material::Air);
    for k in 0..PATH_LENGTH {
        let cell = start.relative(out, k);
        world.set_block(cell, BlockState::AIR);
        world.set_block(cell.up(1), BlockState::AIR);
    }
}
