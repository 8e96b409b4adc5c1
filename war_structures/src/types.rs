// Core types shared across the structure engine.
//
// Defines grid coordinates (`VoxelCoord`), the six unit directions used to
// walk the grid (`Direction`), block materials and their variant byte
// (`Material`, `BlockState`), and `Location` (a coordinate tagged with the
// name of the world it belongs to). All types derive `Serialize` and
// `Deserialize` so zones can be persisted and reloaded.
//
// See also: `direction.rs` for the four-way wall rotation tables built on
// top of `Direction`, `world.rs` for the grid that stores `BlockState`s.
//
// **Critical constraint: integer geometry.** Every position the engine
// derives is an integer triple. Fractional player positions are floored
// into a `VoxelCoord` at the boundary (see `Location::from_position`).

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid. Each component is in block units.
///
/// The grid uses the classic block-game compass:
/// - X: south (positive) / north (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: west  (positive) / east  (negative)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate `distance` blocks away along `dir`. Negative distances
    /// walk the opposite way.
    pub fn relative(self, dir: Direction, distance: i32) -> Self {
        let (dx, dy, dz) = dir.offset();
        Self::new(
            self.x + dx * distance,
            self.y + dy * distance,
            self.z + dz * distance,
        )
    }

    /// The face-adjacent coordinate along `dir`.
    pub fn step(self, dir: Direction) -> Self {
        self.relative(dir, 1)
    }

    pub fn up(self, distance: i32) -> Self {
        self.relative(Direction::Up, distance)
    }

    pub fn down(self, distance: i32) -> Self {
        self.relative(Direction::Down, distance)
    }

    /// Largest per-axis absolute difference (Chebyshev distance).
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
            .max((self.z - other.z).unsigned_abs())
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six face directions of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit offset `(dx, dy, dz)` for this direction.
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::North => (-1, 0, 0),
            Direction::South => (1, 0, 0),
            Direction::East => (0, 0, -1),
            Direction::West => (0, 0, 1),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// A block coordinate in a named world. Lobbies anchored at a player's
/// position may live in a different world than their zone, so membership
/// queries compare the world name as well as the coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub coord: VoxelCoord,
}

impl Location {
    pub fn new(world: impl Into<String>, coord: VoxelCoord) -> Self {
        Self {
            world: world.into(),
            coord,
        }
    }

    /// Floor a fractional entity position into the block it stands in.
    pub fn from_position(world: impl Into<String>, position: [f64; 3]) -> Self {
        Self::new(
            world,
            VoxelCoord::new(
                position[0].floor() as i32,
                position[1].floor() as i32,
                position[2].floor() as i32,
            ),
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.world, self.coord)
    }
}

// ---------------------------------------------------------------------------
// Block types
// ---------------------------------------------------------------------------

/// The primary type of a single block in the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    Air,
    Stone,
    Dirt,
    Grass,
    Planks,
    Glass,
    Glowstone,
    Obsidian,
    Wool,
    WallSign,
}

impl Default for Material {
    fn default() -> Self {
        Self::Air
    }
}

/// A block's type plus its variant byte (colour, facing, sub-type).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockState {
    pub material: Material,
    pub variant: u8,
}

impl BlockState {
    pub const AIR: BlockState = BlockState::new(Material::Air, 0);

    pub const fn new(material: Material, variant: u8) -> Self {
        Self { material, variant }
    }

    /// A block of `material` with the zero variant.
    pub const fn plain(material: Material) -> Self {
        Self::new(material, 0)
    }

    pub fn is_air(&self) -> bool {
        self.material == Material::Air
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.material, self.variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_walks_unit_offsets() {
        let origin = VoxelCoord::new(10, 20, 30);
        assert_eq!(origin.relative(Direction::North, 3), VoxelCoord::new(7, 20, 30));
        assert_eq!(origin.relative(Direction::South, 3), VoxelCoord::new(13, 20, 30));
        assert_eq!(origin.relative(Direction::East, 2), VoxelCoord::new(10, 20, 28));
        assert_eq!(origin.relative(Direction::West, 2), VoxelCoord::new(10, 20, 32));
        assert_eq!(origin.up(1), VoxelCoord::new(10, 21, 30));
        assert_eq!(origin.down(2), VoxelCoord::new(10, 18, 30));
    }

    #[test]
    fn opposite_directions_cancel() {
        let origin = VoxelCoord::new(0, 0, 0);
        for dir in Direction::ALL {
            assert_eq!(origin.step(dir).step(dir.opposite()), origin);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn chebyshev_distance_is_max_axis() {
        let a = VoxelCoord::new(0, 0, 0);
        let b = VoxelCoord::new(3, -5, 2);
        assert_eq!(a.chebyshev_distance(b), 5);
        assert_eq!(b.chebyshev_distance(a), 5);
    }

    #[test]
    fn location_floors_negative_positions() {
        let loc = Location::from_position("world", [-0.5, 64.9, 3.2]);
        assert_eq!(loc.coord, VoxelCoord::new(-1, 64, 3));
        assert_eq!(loc.world, "world");
    }

    #[test]
    fn default_block_is_air() {
        assert!(BlockState::default().is_air());
        assert_eq!(BlockState::default(), BlockState::AIR);
    }

    #[test]
    fn block_state_serialization_roundtrip() {
        let block = BlockState::new(Material::Wool, 14);
        let json = serde_json::to_string(&block).unwrap();
        let restored: BlockState = serde_json::from_str(&json).unwrap();
        assert_eq!(block, restored);
    }
}
