// Lobby layout engine: geometry of a zone's staging area and its gates.
//
// A lobby is a box attached to one wall of a zone, 10 deep and six layers
// tall (floor at y-1 through y+4, with `y` the middle-wall block's level),
// wide enough for one gate per team.
// Everything in it is placed relative to the **middle-wall block**: the
// block on the zone wall, one above the lobby floor, at the centre of the
// lobby's width.
//
// ## Anchoring
//
// There are two ways to anchor a lobby, and both end up as a
// `(wall, middle_wall_block)` pair fed to the same layout computation:
// - `LobbyAnchor::Wall(wall)`: the middle block is the midpoint of that
//   wall's span on the zone bounds, at the zone's vertical centre.
// - `LobbyAnchor::Facing { at, yaw }`: the player's yaw is bucketed into a
//   facing direction (`Wall::facing_from_yaw`), the lobby attaches as if to
//   the opposite wall, and the middle block is 6 blocks in front of the
//   player.
//
// ## Layout (`LobbyLayout::compute`)
//
// - Half-width: `max(7, (teams * 4 + 5) / 2)`, with `teams` forced to 1 in
//   auto-assign mode.
// - Gates: auto-assign mode puts one gate on the middle block. Otherwise
//   gates fan out left/right in team registration order:
//     even team count: even index → right `i*2+2`, odd index → left `i*2`
//     odd team count:  index 0 → middle, even index → right `i*2`,
//                      odd index → left `i*2+2`
//   This keeps gates four apart and roughly centred for both parities.
// - War-hub link gate 9 out from the wall, teleport block 6 out, zone sign
//   4 out, two lights at floor level 9 out and `half_width - 1` to each side.
//
// ## Worlds
//
// A lobby lives in the world named by its anchor. Every `&mut impl
// BlockWorld` passed in must be that world's grid; `Warzone` only anchors
// lobbies in the zone's own world.
//
// ## Relocation
//
// `ZoneLobby` owns the lobby's `Region`. Every relocation or regeneration
// restores the previous snapshot, recomputes the layout from the anchor,
// redefines the region and takes a fresh snapshot, in that order, so the
// terrain under an old lobby comes back exactly.
//
// ## Membership queries
//
// Two granularities:
// - exact cell (`is_in_team_gate`, `is_auto_assign_gate`,
//   `is_in_war_hub_link_gate`, `gate_at`): triggers team assignment and
//   travel;
// - footprint (`is_gate_block`, the 10-cell frame; `is_leaving_zone`, the
//   exit box in front of each gate): protection and exit detection.
//
// See also: `direction.rs` for the wall tables, `materialize.rs` which
// writes blocks at the points computed here, `zone.rs` which owns the lobby.

use crate::direction::Wall;
use crate::team::TeamInfo;
use crate::types::{Location, VoxelCoord};
use crate::volume::Region;
use crate::world::BlockWorld;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Blocks the lobby extends out from the zone wall.
pub const LOBBY_DEPTH: i32 = 10;
/// Walkable height of the lobby.
pub const LOBBY_HEIGHT: i32 = 3;
pub const MIN_HALF_WIDTH: i32 = 7;
/// Distance in front of a player to the middle-wall block.
pub const PLAYER_ANCHOR_DISTANCE: i32 = 6;
pub const TELEPORT_DISTANCE: i32 = 6;
pub const ZONE_SIGN_DISTANCE: i32 = 4;
pub const LINK_GATE_DISTANCE: i32 = 9;
pub const LIGHT_DISTANCE: i32 = 9;

/// Lobby half-width for a team count.
pub fn half_width(team_count: usize, auto_assign: bool) -> i32 {
    let teams = if auto_assign { 1 } else { team_count as i32 };
    ((teams * 4 + 5) / 2).max(MIN_HALF_WIDTH)
}

/// Midpoint of `wall`'s span on the zone bounds, at the vertical centre.
pub fn wall_middle_block(bounds: &Region, wall: Wall) -> VoxelCoord {
    let y = bounds.center_y();
    let center = |start: i32, end: i32| start + (end - start + 1) / 2;
    match wall {
        Wall::North => VoxelCoord::new(bounds.min_x(), y, center(bounds.min_z(), bounds.max_z())),
        Wall::East => VoxelCoord::new(center(bounds.min_x(), bounds.max_x()), y, bounds.min_z()),
        Wall::South => VoxelCoord::new(bounds.max_x(), y, center(bounds.min_z(), bounds.max_z())),
        Wall::West => VoxelCoord::new(center(bounds.min_x(), bounds.max_x()), y, bounds.max_z()),
    }
}

/// Opposite corners of the lobby box. One layer below the middle block
/// (floor) up to one above the walkable height, `half` to each side,
/// `LOBBY_DEPTH` outward. "Outward" flips sign per wall, so each case is
/// spelled out.
pub fn lobby_corners(wall: Wall, middle: VoxelCoord, half: i32) -> (VoxelCoord, VoxelCoord) {
    let VoxelCoord { x, y, z } = middle;
    let bottom = y - 1;
    let top = y + 1 + LOBBY_HEIGHT;
    match wall {
        Wall::North => (
            VoxelCoord::new(x, bottom, z + half),
            VoxelCoord::new(x - LOBBY_DEPTH, top, z - half),
        ),
        Wall::East => (
            VoxelCoord::new(x - half, bottom, z),
            VoxelCoord::new(x + half, top, z - LOBBY_DEPTH),
        ),
        Wall::South => (
            VoxelCoord::new(x, bottom, z - half),
            VoxelCoord::new(x + LOBBY_DEPTH, top, z + half),
        ),
        Wall::West => (
            VoxelCoord::new(x + half, bottom, z),
            VoxelCoord::new(x - half, top, z + LOBBY_DEPTH),
        ),
    }
}

/// Where the gates of a lobby are. Auto-assign and per-team gates are
/// mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateLayout {
    AutoAssign(VoxelCoord),
    /// Team name → gate reference block.
    PerTeam(BTreeMap<String, VoxelCoord>),
}

impl GateLayout {
    /// Gate reference blocks for the given teams, fanned out from `middle`.
    pub fn compute(middle: VoxelCoord, wall: Wall, teams: &[TeamInfo], auto_assign: bool) -> Self {
        if auto_assign {
            return GateLayout::AutoAssign(middle);
        }
        let sides = wall.left_right();
        let even_count = teams.len() % 2 == 0;
        let mut gates = BTreeMap::new();
        for (index, team) in teams.iter().enumerate() {
            let i = index as i32;
            let gate = if even_count {
                if index % 2 == 0 {
                    middle.relative(sides.right, i * 2 + 2)
                } else {
                    middle.relative(sides.left, i * 2)
                }
            } else if index == 0 {
                middle
            } else if index % 2 == 0 {
                middle.relative(sides.right, i * 2)
            } else {
                middle.relative(sides.left, i * 2 + 2)
            };
            gates.insert(team.name.clone(), gate);
        }
        GateLayout::PerTeam(gates)
    }

    pub fn team_gate(&self, team: &str) -> Option<VoxelCoord> {
        match self {
            GateLayout::PerTeam(gates) => gates.get(team).copied(),
            GateLayout::AutoAssign(_) => None,
        }
    }

    pub fn auto_assign_gate(&self) -> Option<VoxelCoord> {
        match self {
            GateLayout::AutoAssign(gate) => Some(*gate),
            GateLayout::PerTeam(_) => None,
        }
    }

    /// Every gate a player can walk through to join the zone.
    pub fn player_gates(&self) -> SmallVec<[VoxelCoord; 8]> {
        match self {
            GateLayout::AutoAssign(gate) => SmallVec::from_elem(*gate, 1),
            GateLayout::PerTeam(gates) => gates.values().copied().collect(),
        }
    }
}

/// The seven decorative cells around a gate opening, in the order
/// left, left+1up, left+2up, 2up, right+2up, right+1up, right.
pub fn gate_frame(gate: VoxelCoord, wall: Wall) -> [VoxelCoord; 7] {
    let sides = wall.left_right();
    let left = gate.step(sides.left);
    let right = gate.step(sides.right);
    [left, left.up(1), left.up(2), gate.up(2), right.up(2), right.up(1), right]
}

/// Every cell belonging to a gate: the frame, the two-tall opening, and the
/// light block below.
pub fn gate_footprint(gate: VoxelCoord, wall: Wall) -> SmallVec<[VoxelCoord; 10]> {
    let mut cells: SmallVec<[VoxelCoord; 10]> = SmallVec::new();
    cells.push(gate);
    cells.push(gate.up(1));
    cells.extend(gate_frame(gate, wall));
    cells.push(gate.down(1));
    cells
}

/// The box in front of a gate, on the zone side, that counts as "walking
/// out of the lobby through this gate".
pub fn gate_exit_region(world: &str, gate: VoxelCoord, wall: Wall) -> Region {
    let inside = wall.opposite();
    let sides = inside.left_right();
    let out = gate.step(inside.to_direction());
    Region::new(
        world,
        out.step(sides.left).down(1),
        gate.step(sides.right).up(2),
    )
}

/// How a lobby was anchored. Kept so the lobby can be recomputed when the
/// team count or zone bounds change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LobbyAnchor {
    /// Centred on a zone wall.
    Wall(Wall),
    /// Placed in front of a player standing at `at` with `yaw`.
    Facing { at: VoxelCoord, yaw: f32 },
}

/// Immutable geometry of a lobby, recomputed from
/// `(wall, middle_wall_block, teams, auto_assign)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyLayout {
    pub wall: Wall,
    pub half_width: i32,
    pub middle_wall_block: VoxelCoord,
    pub corners: (VoxelCoord, VoxelCoord),
    pub gates: GateLayout,
    pub link_gate: VoxelCoord,
    pub teleport_block: VoxelCoord,
    pub zone_sign_block: VoxelCoord,
    pub lights: [VoxelCoord; 2],
}

impl LobbyLayout {
    pub fn compute(wall: Wall, middle: VoxelCoord, teams: &[TeamInfo], auto_assign: bool) -> Self {
        let half = half_width(teams.len(), auto_assign);
        let out = wall.to_direction();
        let sides = wall.left_right();
        let light_base = middle.down(1).relative(out, LIGHT_DISTANCE);
        Self {
            wall,
            half_width: half,
            middle_wall_block: middle,
            corners: lobby_corners(wall, middle, half),
            gates: GateLayout::compute(middle, wall, teams, auto_assign),
            link_gate: middle.relative(out, LINK_GATE_DISTANCE),
            teleport_block: middle.relative(out, TELEPORT_DISTANCE),
            zone_sign_block: middle.relative(out, ZONE_SIGN_DISTANCE),
            lights: [
                light_base.relative(sides.left, half - 1),
                light_base.relative(sides.right, half - 1),
            ],
        }
    }
}

/// Zone facts the layout engine reads. Borrowed from the owning zone.
#[derive(Clone, Copy, Debug)]
pub struct ZoneFacts<'a> {
    pub name: &'a str,
    pub bounds: &'a Region,
    pub teams: &'a [TeamInfo],
    pub auto_assign: bool,
}

/// Which gate a player stepped into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateHit {
    Team(String),
    AutoAssign,
    WarHubLink,
}

/// A placed lobby: anchor, computed layout and the reversible footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneLobby {
    anchor: LobbyAnchor,
    layout: LobbyLayout,
    volume: Region,
}

impl ZoneLobby {
    /// Anchor a new lobby to the middle of a zone wall and save the blocks
    /// it covers.
    pub fn attach_to_wall(facts: ZoneFacts<'_>, wall: Wall, world: &mut impl BlockWorld) -> Self {
        let mut lobby = Self::compute(facts, LobbyAnchor::Wall(wall), &facts.bounds.world);
        lobby.volume.save_snapshot(&*world);
        log::info!("lobby for zone {} attached to {} wall", facts.name, wall);
        lobby
    }

    /// Anchor a new lobby in front of a player and save the blocks it covers.
    pub fn place_facing(
        facts: ZoneFacts<'_>,
        at: &Location,
        yaw: f32,
        world: &mut impl BlockWorld,
    ) -> Self {
        let anchor = LobbyAnchor::Facing { at: at.coord, yaw };
        let mut lobby = Self::compute(facts, anchor, &at.world);
        lobby.volume.save_snapshot(&*world);
        log::info!(
            "lobby for zone {} placed at {} facing {} wall",
            facts.name,
            at,
            lobby.wall()
        );
        lobby
    }

    /// Move the lobby to the middle of another wall.
    pub fn move_to_wall(&mut self, facts: ZoneFacts<'_>, wall: Wall, world: &mut impl BlockWorld) {
        let world_name = facts.bounds.world.clone();
        self.relocate(facts, LobbyAnchor::Wall(wall), &world_name, world);
    }

    /// Move the lobby in front of a player.
    pub fn move_facing(
        &mut self,
        facts: ZoneFacts<'_>,
        at: &Location,
        yaw: f32,
        world: &mut impl BlockWorld,
    ) {
        let anchor = LobbyAnchor::Facing { at: at.coord, yaw };
        self.relocate(facts, anchor, &at.world, world);
    }

    /// Recompute geometry from the current anchor, e.g. after the team
    /// count or the auto-assign flag changed.
    pub fn regenerate(&mut self, facts: ZoneFacts<'_>, world: &mut impl BlockWorld) {
        let world_name = match self.anchor {
            LobbyAnchor::Wall(_) => facts.bounds.world.clone(),
            LobbyAnchor::Facing { .. } => self.volume.world.clone(),
        };
        self.relocate(facts, self.anchor, &world_name, world);
    }

    /// Put the terrain back and forget the footprint contents. Used when
    /// the owning zone is deleted.
    pub fn restore_terrain(&mut self, world: &mut impl BlockWorld) -> bool {
        self.volume.restore_snapshot(world)
    }

    fn relocate(
        &mut self,
        facts: ZoneFacts<'_>,
        anchor: LobbyAnchor,
        world_name: &str,
        world: &mut impl BlockWorld,
    ) {
        self.volume.restore_snapshot(world);
        *self = Self::compute(facts, anchor, world_name);
        self.volume.save_snapshot(&*world);
        log::info!(
            "lobby for zone {} regenerated on {} wall, half-width {}",
            facts.name,
            self.layout.wall,
            self.layout.half_width
        );
    }

    fn compute(facts: ZoneFacts<'_>, anchor: LobbyAnchor, world_name: &str) -> Self {
        let (wall, middle) = match anchor {
            LobbyAnchor::Wall(wall) => (wall, wall_middle_block(facts.bounds, wall)),
            LobbyAnchor::Facing { at, yaw } => {
                let facing = Wall::facing_from_yaw(yaw);
                let middle = at.relative(facing.to_direction(), PLAYER_ANCHOR_DISTANCE);
                (Wall::attached_for_facing(facing), middle)
            }
        };
        let layout = LobbyLayout::compute(wall, middle, facts.teams, facts.auto_assign);
        let volume = Region::new(world_name, layout.corners.0, layout.corners.1);
        Self {
            anchor,
            layout,
            volume,
        }
    }

    pub fn anchor(&self) -> LobbyAnchor {
        self.anchor
    }

    pub fn layout(&self) -> &LobbyLayout {
        &self.layout
    }

    pub fn volume(&self) -> &Region {
        &self.volume
    }

    pub fn wall(&self) -> Wall {
        self.layout.wall
    }

    pub fn world_name(&self) -> &str {
        &self.volume.world
    }

    /// Whether `location` is inside the lobby box.
    pub fn contains(&self, location: &Location) -> bool {
        self.volume.contains_location(location)
    }

    fn same_world(&self, location: &Location) -> bool {
        location.world == self.volume.world
    }

    pub fn is_in_team_gate(&self, team: &str, location: &Location) -> bool {
        self.same_world(location) && self.layout.gates.team_gate(team) == Some(location.coord)
    }

    pub fn is_auto_assign_gate(&self, location: &Location) -> bool {
        self.same_world(location) && self.layout.gates.auto_assign_gate() == Some(location.coord)
    }

    pub fn is_in_war_hub_link_gate(&self, location: &Location) -> bool {
        self.same_world(location) && self.layout.link_gate == location.coord
    }

    /// The gate whose reference cell `location` is standing in, if any.
    pub fn gate_at(&self, location: &Location) -> Option<GateHit> {
        if !self.same_world(location) {
            return None;
        }
        match &self.layout.gates {
            GateLayout::AutoAssign(gate) if *gate == location.coord => {
                return Some(GateHit::AutoAssign);
            }
            GateLayout::PerTeam(gates) => {
                if let Some((name, _)) = gates.iter().find(|(_, g)| **g == location.coord) {
                    return Some(GateHit::Team(name.clone()));
                }
            }
            GateLayout::AutoAssign(_) => {}
        }
        if self.layout.link_gate == location.coord {
            return Some(GateHit::WarHubLink);
        }
        None
    }

    /// Whether `block` is part of any team or auto-assign gate. Only blocks
    /// reported against the lobby's own wall count.
    pub fn is_gate_block(&self, block: VoxelCoord, block_wall: Wall) -> bool {
        if block_wall != self.layout.wall {
            return false;
        }
        self.layout
            .gates
            .player_gates()
            .into_iter()
            .any(|gate| gate_footprint(gate, self.layout.wall).contains(&block))
    }

    /// Whether `location` is in the exit box in front of any player gate.
    pub fn is_leaving_zone(&self, location: &Location) -> bool {
        self.layout.gates.player_gates().into_iter().any(|gate| {
            gate_exit_region(&self.volume.world, gate, self.layout.wall).contains_location(location)
        })
    }
}
