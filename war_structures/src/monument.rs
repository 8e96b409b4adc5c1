// Monument: a capturable objective structure inside a zone.
//
// A monument is built around its center block:
// - floor, one layer below the center: a 5×5 slab of the zone's main
//   material with the light material on the four outer corners;
// - holder above the floor: a post in the center column (center and two
//   up) with a crossbar along Z on each of the three layers, minus the
//   middle layer's center so a block can be dropped in.
//
// The footprint region spans one below the center to two above it and two
// blocks out on each horizontal axis. It is snapshotted before the first
// placement and restored when the monument moves or is removed, in the
// same restore → set_corners → save → place order as lobbies.
//
// Ownership is a team name or nothing. `capture`/`uncapture` are
// unconditional; the zone checks that the team is registered and clears
// ownership when a team leaves.
//
// See also: `zone.rs` which owns monuments by name, `config.rs` for
// `ZoneMaterials`.

use crate::config::ZoneMaterials;
use crate::types::{BlockState, Direction, Location, Material, VoxelCoord};
use crate::volume::Region;
use crate::world::BlockWorld;
use serde::{Deserialize, Serialize};

/// A location is near a monument when every axis differs by less than this.
pub const PROXIMITY: u32 = 6;

/// Holder cells relative to the center, as `(dy, dz)` in the center's X
/// column.
const HOLDER: [(i32, i32); 8] = [
    (0, 0),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 1),
    (2, 0),
    (2, -1),
    (2, 1),
];

/// Footprint corners for a monument centered at `center`.
pub fn footprint(center: VoxelCoord) -> (VoxelCoord, VoxelCoord) {
    (
        center
            .down(1)
            .relative(Direction::East, 2)
            .relative(Direction::South, 2),
        center
            .up(2)
            .relative(Direction::West, 2)
            .relative(Direction::North, 2),
    )
}

/// Every block of the monument pattern, floor first.
pub fn pattern(center: VoxelCoord, materials: &ZoneMaterials) -> Vec<(VoxelCoord, BlockState)> {
    let floor_y = center.y - 1;
    let mut blocks = Vec::with_capacity(25 + HOLDER.len());
    for dx in -2i32..=2 {
        for dz in -2i32..=2 {
            let block = if dx.abs() == 2 && dz.abs() == 2 {
                materials.light
            } else {
                materials.main
            };
            blocks.push((VoxelCoord::new(center.x + dx, floor_y, center.z + dz), block));
        }
    }
    for (dy, dz) in HOLDER {
        blocks.push((VoxelCoord::new(center.x, center.y + dy, center.z + dz), materials.main));
    }
    blocks
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monument {
    name: String,
    center: VoxelCoord,
    volume: Region,
    /// Name of the owning team, if captured.
    owner: Option<String>,
}

impl Monument {
    /// Save the terrain under a new monument and build it.
    pub fn new(
        name: impl Into<String>,
        location: &Location,
        world: &mut impl BlockWorld,
        materials: &ZoneMaterials,
    ) -> Self {
        let (a, b) = footprint(location.coord);
        let mut monument = Self {
            name: name.into(),
            center: location.coord,
            volume: Region::new(location.world.clone(), a, b),
            owner: None,
        };
        monument.volume.save_snapshot(&*world);
        monument.place(world, materials);
        monument
    }

    /// Move the monument: put back the old terrain, then save and build at
    /// the new center.
    pub fn set_location(
        &mut self,
        location: &Location,
        world: &mut impl BlockWorld,
        materials: &ZoneMaterials,
    ) {
        self.volume.restore_snapshot(world);
        let (a, b) = footprint(location.coord);
        self.volume.world = location.world.clone();
        self.volume.set_corners(a, b);
        self.center = location.coord;
        self.volume.save_snapshot(&*world);
        self.place(world, materials);
    }

    /// (Re)write the monument blocks and reset ownership.
    pub fn place(&mut self, world: &mut impl BlockWorld, materials: &ZoneMaterials) {
        let c = self.center;
        let air_gap = Region::new(
            self.volume.world.clone(),
            c.relative(Direction::East, 2).relative(Direction::South, 2),
            c.up(2).relative(Direction::West, 2).relative(Direction::North, 2),
        );
        air_gap.fill(world, Material::Air);
        for (coord, block) in pattern(c, materials) {
            world.set_block(coord, block);
        }
        self.owner = None;
        log::info!("monument {} placed at {}", self.name, c);
    }

    /// Restore the terrain the monument was built over.
    pub fn remove(&mut self, world: &mut impl BlockWorld) -> bool {
        self.volume.restore_snapshot(world)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> VoxelCoord {
        self.center
    }

    pub fn location(&self) -> Location {
        Location::new(self.volume.world.clone(), self.center)
    }

    pub fn volume(&self) -> &Region {
        &self.volume
    }

    /// Cube test around the center, not a sphere.
    pub fn is_near(&self, location: &Location) -> bool {
        location.world == self.volume.world
            && self.center.chebyshev_distance(location.coord) < PROXIMITY
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn has_owner(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_owner(&self, team: &str) -> bool {
        self.owner.as_deref() == Some(team)
    }

    pub fn capture(&mut self, team: impl Into<String>) {
        self.owner = Some(team.into());
    }

    pub fn uncapture(&mut self) {
        self.owner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::VoxelWorld;

    fn grass_world() -> VoxelWorld {
        let mut world = VoxelWorld::new(32, 32, 32);
        world.fill_ground(9, BlockState::plain(Material::Grass));
        world
    }

    fn at(x: i32, y: i32, z: i32) -> Location {
        Location::new("world", VoxelCoord::new(x, y, z))
    }

    #[test]
    fn footprint_spans_five_by_five_by_four() {
        let (a, b) = footprint(VoxelCoord::new(10, 10, 10));
        let region = Region::new("world", a, b);
        assert_eq!(region.min(), VoxelCoord::new(8, 9, 8));
        assert_eq!(region.max(), VoxelCoord::new(12, 12, 12));
    }

    #[test]
    fn pattern_has_floor_and_holder() {
        let materials = ZoneMaterials::default();
        let blocks = pattern(VoxelCoord::new(0, 0, 0), &materials);
        assert_eq!(blocks.len(), 25 + 8);
        let lights: Vec<_> = blocks
            .iter()
            .filter(|(_, b)| *b == materials.light)
            .map(|(c, _)| *c)
            .collect();
        assert_eq!(lights.len(), 4);
        assert!(lights.iter().all(|c| c.y == -1 && c.x.abs() == 2 && c.z.abs() == 2));
        // The middle layer's center is left open.
        assert!(!blocks.iter().any(|(c, _)| *c == VoxelCoord::new(0, 1, 0)));
        assert!(blocks.iter().any(|(c, _)| *c == VoxelCoord::new(0, 2, 1)));
    }

    #[test]
    fn new_monument_builds_pattern() {
        let mut world = grass_world();
        let materials = ZoneMaterials::default();
        world.set_material(VoxelCoord::new(11, 11, 10), Material::Stone);
        let monument = Monument::new("alpha", &at(10, 10, 10), &mut world, &materials);

        assert_eq!(world.block(VoxelCoord::new(10, 9, 10)), materials.main);
        assert_eq!(world.block(VoxelCoord::new(12, 9, 12)), materials.light);
        assert_eq!(world.block(VoxelCoord::new(10, 10, 10)), materials.main);
        assert!(world.block(VoxelCoord::new(10, 11, 10)).is_air());
        // Air gap cleared stray terrain.
        assert!(world.block(VoxelCoord::new(11, 11, 10)).is_air());
        assert!(monument.volume().is_saved());
        assert!(!monument.has_owner());
    }

    #[test]
    fn proximity_is_a_cube() {
        let mut world = grass_world();
        let monument = Monument::new("m", &at(10, 10, 10), &mut world, &ZoneMaterials::default());
        assert!(monument.is_near(&at(15, 10, 10)));
        assert!(!monument.is_near(&at(16, 10, 10)));
        assert!(monument.is_near(&at(15, 15, 5)));
        assert!(!monument.is_near(&at(10, 4, 10)));
        assert!(!monument.is_near(&Location::new("nether", VoxelCoord::new(10, 10, 10))));
    }

    #[test]
    fn capture_and_uncapture() {
        let mut world = grass_world();
        let materials = ZoneMaterials::default();
        let mut monument = Monument::new("m", &at(10, 10, 10), &mut world, &materials);
        monument.capture("red");
        assert!(monument.has_owner());
        assert!(monument.is_owner("red"));
        assert!(!monument.is_owner("blue"));
        monument.capture("blue");
        assert_eq!(monument.owner(), Some("blue"));
        monument.uncapture();
        assert!(!monument.has_owner());

        monument.capture("red");
        monument.place(&mut world, &materials);
        assert!(!monument.has_owner());
    }

    #[test]
    fn relocation_restores_old_site() {
        let mut world = grass_world();
        let before = world.clone();
        let materials = ZoneMaterials::default();
        let mut monument = Monument::new("m", &at(10, 10, 10), &mut world, &materials);
        monument.set_location(&at(20, 10, 20), &mut world, &materials);

        let (a, b) = footprint(VoxelCoord::new(10, 10, 10));
        for coord in Region::new("world", a, b).coords() {
            assert_eq!(world.block(coord), before.block(coord), "at {coord}");
        }
        assert_eq!(world.block(VoxelCoord::new(20, 9, 20)), materials.main);
        assert_eq!(monument.center(), VoxelCoord::new(20, 10, 20));

        assert!(monument.remove(&mut world));
        assert_eq!(world.count_material(Material::Obsidian), 0);
        assert_eq!(world.count_material(Material::Glowstone), 0);
    }
}
