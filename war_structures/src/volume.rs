// Axis-aligned block regions with reversible placement.
//
// A `Region` is the footprint of a structure: two opposite corners,
// normalized to min/max per axis on construction, tagged with the world it
// lives in. Regions can bulk-fill themselves, fill one face or the
// floor's outline, test containment, and take a snapshot of the blocks they
// cover so a placement can be undone later.
//
// ## Snapshot state
//
// The snapshot is an explicit tagged state (`Snapshot::Empty` /
// `Snapshot::Saved`) rather than a nullable buffer:
// - `save_snapshot` on an `Empty` region captures every block in x-fastest,
//   then z, then y order and moves to `Saved`. On a `Saved` region it keeps
//   the existing snapshot, logs, and returns `false`.
// - `restore_snapshot` on a `Saved` region writes every block back and moves
//   to `Empty`. On an `Empty` region it does nothing and returns `false`.
// - `set_corners` on a `Saved` region drops the snapshot (the stored blocks
//   no longer line up with the new box). Relocating callers restore first.
//
// Relocation ordering for every structure that owns a region:
// restore → set_corners → save → place.
//
// See also: `world.rs` for the `BlockWorld` trait these methods write
// through, `lobby.rs` and `monument.rs` which own regions.

use crate::types::{BlockState, Direction, Location, Material, VoxelCoord};
use crate::world::BlockWorld;
use serde::{Deserialize, Serialize};

/// Saved prior contents of a region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Snapshot {
    #[default]
    Empty,
    /// Blocks in iteration order (x fastest, then z, then y).
    Saved(Vec<BlockState>),
}

/// An axis-aligned box of blocks, inclusive on both corners.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub world: String,
    min: VoxelCoord,
    max: VoxelCoord,
    #[serde(default)]
    snapshot: Snapshot,
}

impl Region {
    /// Build a region from any two opposite corners.
    pub fn new(world: impl Into<String>, a: VoxelCoord, b: VoxelCoord) -> Self {
        let (min, max) = normalize(a, b);
        Self {
            world: world.into(),
            min,
            max,
            snapshot: Snapshot::Empty,
        }
    }

    /// Redefine the box. Drops a held snapshot.
    pub fn set_corners(&mut self, a: VoxelCoord, b: VoxelCoord) {
        if self.is_saved() {
            log::warn!(
                "region in {} redefined while holding a snapshot; prior contents dropped",
                self.world
            );
        }
        let (min, max) = normalize(a, b);
        self.min = min;
        self.max = max;
        self.snapshot = Snapshot::Empty;
    }

    pub fn min(&self) -> VoxelCoord {
        self.min
    }

    pub fn max(&self) -> VoxelCoord {
        self.max
    }

    pub fn min_x(&self) -> i32 {
        self.min.x
    }

    pub fn max_x(&self) -> i32 {
        self.max.x
    }

    pub fn min_y(&self) -> i32 {
        self.min.y
    }

    pub fn max_y(&self) -> i32 {
        self.max.y
    }

    pub fn min_z(&self) -> i32 {
        self.min.z
    }

    pub fn max_z(&self) -> i32 {
        self.max.z
    }

    /// Vertical midpoint, rounding down.
    pub fn center_y(&self) -> i32 {
        (self.min.y + self.max.y).div_euclid(2)
    }

    pub fn size(&self) -> (i32, i32, i32) {
        (
            self.max.x - self.min.x + 1,
            self.max.y - self.min.y + 1,
            self.max.z - self.min.z + 1,
        )
    }

    pub fn volume(&self) -> usize {
        let (sx, sy, sz) = self.size();
        sx as usize * sy as usize * sz as usize
    }

    /// Inclusive bounding-box test on the coordinate alone.
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
            && coord.z >= self.min.z
            && coord.z <= self.max.z
    }

    /// Containment that also requires the same world.
    pub fn contains_location(&self, location: &Location) -> bool {
        location.world == self.world && self.contains(location.coord)
    }

    /// Every coordinate in the region, x fastest, then z, then y.
    pub fn coords(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z)
                .flat_map(move |z| (min.x..=max.x).map(move |x| VoxelCoord::new(x, y, z)))
        })
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.snapshot, Snapshot::Saved(_))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Capture the current contents. Returns `false` (and keeps the earlier
    /// snapshot) if one is already held.
    pub fn save_snapshot(&mut self, world: &impl BlockWorld) -> bool {
        if self.is_saved() {
            log::warn!(
                "region {}..{} in {} already saved; keeping the earlier snapshot",
                self.min,
                self.max,
                self.world
            );
            return false;
        }
        let blocks = self.coords().map(|c| world.block(c)).collect();
        self.snapshot = Snapshot::Saved(blocks);
        true
    }

    /// Write the snapshot back. Returns `false` if nothing was saved.
    pub fn restore_snapshot(&mut self, world: &mut impl BlockWorld) -> bool {
        let blocks = match std::mem::take(&mut self.snapshot) {
            Snapshot::Saved(blocks) => blocks,
            Snapshot::Empty => {
                log::debug!("restore on unsaved region in {}; nothing to do", self.world);
                return false;
            }
        };
        let coords: Vec<VoxelCoord> = self.coords().collect();
        for (coord, block) in coords.into_iter().zip(blocks) {
            world.set_block(coord, block);
        }
        true
    }

    /// Write one material (zero variant) to every block.
    pub fn fill(&self, world: &mut impl BlockWorld, material: Material) {
        let block = BlockState::plain(material);
        for coord in self.coords() {
            world.set_block(coord, block);
        }
    }

    /// Write to the single layer forming the named face.
    pub fn fill_face(&self, world: &mut impl BlockWorld, face: Direction, block: BlockState) {
        let (min, max) = (self.min, self.max);
        for coord in self.coords() {
            let on_face = match face {
                Direction::Down => coord.y == min.y,
                Direction::Up => coord.y == max.y,
                Direction::North => coord.x == min.x,
                Direction::South => coord.x == max.x,
                Direction::East => coord.z == min.z,
                Direction::West => coord.z == max.z,
            };
            if on_face {
                world.set_block(coord, block);
            }
        }
    }

    /// Write to the perimeter of the bottom face.
    pub fn fill_outline(&self, world: &mut impl BlockWorld, block: BlockState) {
        let (min, max) = (self.min, self.max);
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                if x == min.x || x == max.x || z == min.z || z == max.z {
                    world.set_block(VoxelCoord::new(x, min.y, z), block);
                }
            }
        }
    }
}

fn normalize(a: VoxelCoord, b: VoxelCoord) -> (VoxelCoord, VoxelCoord) {
    (
        VoxelCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
        VoxelCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::VoxelWorld;
    use proptest::prelude::*;

    fn stone_world() -> VoxelWorld {
        let mut world = VoxelWorld::new(16, 16, 16);
        world.fill_ground(4, BlockState::plain(Material::Stone));
        world
    }

    #[test]
    fn corners_are_normalized() {
        let region = Region::new("w", VoxelCoord::new(5, 1, 9), VoxelCoord::new(2, 7, 3));
        assert_eq!(region.min(), VoxelCoord::new(2, 1, 3));
        assert_eq!(region.max(), VoxelCoord::new(5, 7, 9));
        assert_eq!(region.size(), (4, 7, 7));
    }

    #[test]
    fn single_block_region_is_legal() {
        let c = VoxelCoord::new(3, 3, 3);
        let region = Region::new("w", c, c);
        assert_eq!(region.volume(), 1);
        assert!(region.contains(c));
        assert_eq!(region.coords().count(), 1);
    }

    #[test]
    fn center_y_rounds_down() {
        let region = Region::new("w", VoxelCoord::new(0, 10, 0), VoxelCoord::new(0, 13, 0));
        assert_eq!(region.center_y(), 11);
        let negative = Region::new("w", VoxelCoord::new(0, -3, 0), VoxelCoord::new(0, 0, 0));
        assert_eq!(negative.center_y(), -2);
    }

    #[test]
    fn contains_location_checks_world() {
        let region = Region::new("a", VoxelCoord::new(0, 0, 0), VoxelCoord::new(2, 2, 2));
        assert!(region.contains_location(&Location::new("a", VoxelCoord::new(1, 1, 1))));
        assert!(!region.contains_location(&Location::new("b", VoxelCoord::new(1, 1, 1))));
    }

    #[test]
    fn save_fill_restore_roundtrip() {
        let mut world = stone_world();
        world.set_block(VoxelCoord::new(3, 4, 3), BlockState::new(Material::Wool, 9));
        let before = world.clone();

        let mut region = Region::new("w", VoxelCoord::new(2, 2, 2), VoxelCoord::new(6, 6, 6));
        assert!(region.save_snapshot(&world));
        region.fill(&mut world, Material::Glass);
        assert_eq!(world.material(VoxelCoord::new(3, 4, 3)), Material::Glass);

        assert!(region.restore_snapshot(&mut world));
        for coord in region.coords() {
            assert_eq!(world.block(coord), before.block(coord), "at {coord}");
        }
        assert_eq!(world.variant(VoxelCoord::new(3, 4, 3)), 9);
        assert!(!region.is_saved());
    }

    #[test]
    fn double_save_keeps_first_snapshot() {
        let mut world = stone_world();
        let mut region = Region::new("w", VoxelCoord::new(0, 4, 0), VoxelCoord::new(1, 4, 1));
        assert!(region.save_snapshot(&world));
        region.fill(&mut world, Material::Glass);
        assert!(!region.save_snapshot(&world));
        region.restore_snapshot(&mut world);
        assert_eq!(world.material(VoxelCoord::new(0, 4, 0)), Material::Stone);
    }

    #[test]
    fn restore_without_save_is_noop() {
        let mut world = stone_world();
        let mut region = Region::new("w", VoxelCoord::new(0, 0, 0), VoxelCoord::new(3, 3, 3));
        assert!(!region.restore_snapshot(&mut world));
        assert_eq!(world.material(VoxelCoord::new(0, 0, 0)), Material::Stone);
    }

    #[test]
    fn set_corners_drops_snapshot() {
        let world = stone_world();
        let mut region = Region::new("w", VoxelCoord::new(0, 0, 0), VoxelCoord::new(1, 1, 1));
        region.save_snapshot(&world);
        region.set_corners(VoxelCoord::new(5, 5, 5), VoxelCoord::new(4, 4, 4));
        assert!(!region.is_saved());
        assert_eq!(region.min(), VoxelCoord::new(4, 4, 4));
    }

    #[test]
    fn fill_face_down_is_floor_layer() {
        let mut world = VoxelWorld::new(8, 8, 8);
        let region = Region::new("w", VoxelCoord::new(1, 2, 1), VoxelCoord::new(3, 5, 4));
        region.fill_face(&mut world, Direction::Down, BlockState::new(Material::Planks, 2));
        assert_eq!(world.count_material(Material::Planks), 3 * 4);
        assert_eq!(world.block(VoxelCoord::new(2, 2, 3)), BlockState::new(Material::Planks, 2));
        assert!(world.block(VoxelCoord::new(2, 3, 3)).is_air());
    }

    #[test]
    fn fill_face_side_layers() {
        let mut world = VoxelWorld::new(8, 8, 8);
        let region = Region::new("w", VoxelCoord::new(1, 1, 1), VoxelCoord::new(3, 3, 3));
        region.fill_face(&mut world, Direction::West, BlockState::plain(Material::Glass));
        assert_eq!(world.count_material(Material::Glass), 9);
        assert_eq!(world.material(VoxelCoord::new(2, 2, 3)), Material::Glass);
        assert!(world.block(VoxelCoord::new(2, 2, 2)).is_air());
    }

    #[test]
    fn fill_outline_is_bottom_perimeter() {
        let mut world = VoxelWorld::new(8, 8, 8);
        let region = Region::new("w", VoxelCoord::new(1, 1, 1), VoxelCoord::new(4, 3, 5));
        region.fill_outline(&mut world, BlockState::plain(Material::Obsidian));
        // 4 x 5 rectangle perimeter = 2*4 + 2*5 - 4.
        assert_eq!(world.count_material(Material::Obsidian), 14);
        assert!(world.block(VoxelCoord::new(2, 1, 3)).is_air());
        assert_eq!(world.material(VoxelCoord::new(1, 1, 3)), Material::Obsidian);
        assert!(world.block(VoxelCoord::new(1, 2, 3)).is_air());
    }

    #[test]
    fn snapshot_survives_serialization() {
        let world = stone_world();
        let mut region = Region::new("w", VoxelCoord::new(0, 3, 0), VoxelCoord::new(2, 5, 2));
        region.save_snapshot(&world);
        let json = serde_json::to_string(&region).unwrap();
        let restored: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(region, restored);
        assert!(restored.is_saved());
    }

    fn coord_strategy() -> impl Strategy<Value = VoxelCoord> {
        (-50i32..50, -50i32..50, -50i32..50).prop_map(|(x, y, z)| VoxelCoord::new(x, y, z))
    }

    proptest! {
        #[test]
        fn normalization_contains_both_corners(a in coord_strategy(), b in coord_strategy()) {
            let region = Region::new("w", a, b);
            let (min, max) = (region.min(), region.max());
            prop_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
            prop_assert!(region.contains(a));
            prop_assert!(region.contains(b));
            prop_assert_eq!(Region::new("w", b, a), region.clone());
        }

        #[test]
        fn one_step_outside_any_face_is_excluded(a in coord_strategy(), b in coord_strategy()) {
            let region = Region::new("w", a, b);
            let (min, max) = (region.min(), region.max());
            prop_assert!(!region.contains(min.step(Direction::North)));
            prop_assert!(!region.contains(min.step(Direction::Down)));
            prop_assert!(!region.contains(min.step(Direction::East)));
            prop_assert!(!region.contains(max.step(Direction::South)));
            prop_assert!(!region.contains(max.step(Direction::Up)));
            prop_assert!(!region.contains(max.step(Direction::West)));
        }
    }
}
