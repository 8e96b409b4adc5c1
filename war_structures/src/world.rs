// World access for structure placement, plus a dense in-memory grid.
//
// The engine never owns the host game's block storage. It talks to it
// through two small traits:
// - `BlockWorld`: read and write a block's `BlockState` (type + variant)
//   at a coordinate. Region snapshots, fills, and every gate/monument
//   write go through this.
// - `SignWriter`: put four lines of text with a facing code onto a block.
//
// `VoxelWorld` implements both over a flat `Vec<BlockState>` indexed by
// `x + z * size_x + y * size_x * size_z`, giving O(1) read/write access.
// Out-of-bounds reads return `Air`; out-of-bounds writes are no-ops. Signs
// are kept in a `BTreeMap` beside the grid. It backs the unit and
// integration tests and any headless tooling.
//
// See also: `volume.rs` for snapshot/restore over a `BlockWorld`,
// `materialize.rs` which is generic over `BlockWorld + SignWriter`.
//
// **Critical constraint: single writer.** All calls happen on the host's
// tick thread; nothing here locks.

use crate::types::{BlockState, Material, VoxelCoord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Block storage the engine reads and writes.
pub trait BlockWorld {
    /// Read a block. Unloaded or out-of-range positions read as air.
    fn block(&self, coord: VoxelCoord) -> BlockState;

    /// Write a block (type and variant together).
    fn set_block(&mut self, coord: VoxelCoord, block: BlockState);

    fn material(&self, coord: VoxelCoord) -> Material {
        self.block(coord).material
    }

    fn variant(&self, coord: VoxelCoord) -> u8 {
        self.block(coord).variant
    }

    /// Write a material with the zero variant.
    fn set_material(&mut self, coord: VoxelCoord, material: Material) {
        self.set_block(coord, BlockState::plain(material));
    }

    /// Change only the variant byte, keeping the material.
    fn set_variant(&mut self, coord: VoxelCoord, variant: u8) {
        let material = self.material(coord);
        self.set_block(coord, BlockState::new(material, variant));
    }
}

/// Text rendering collaborator: writes a wall sign onto a block.
pub trait SignWriter {
    fn write_sign(&mut self, coord: VoxelCoord, facing: u8, lines: [String; 4]);
}

/// The four lines and facing code of a sign written into a `VoxelWorld`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignText {
    pub facing: u8,
    pub lines: [String; 4],
}

/// Dense 3D block grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    blocks: Vec<BlockState>,
    signs: BTreeMap<VoxelCoord, SignText>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl VoxelWorld {
    /// Create a new world filled with `Air`.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            blocks: vec![BlockState::AIR; total],
            signs: BTreeMap::new(),
            size_x,
            size_y,
            size_z,
        }
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            let x = coord.x as usize;
            let y = coord.y as usize;
            let z = coord.z as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    /// Fill every column from y = 0 up to and including `top_y` with
    /// `block`. Used to lay test terrain.
    pub fn fill_ground(&mut self, top_y: i32, block: BlockState) {
        for y in 0..=top_y {
            for z in 0..self.size_z as i32 {
                for x in 0..self.size_x as i32 {
                    self.set_block(VoxelCoord::new(x, y, z), block);
                }
            }
        }
    }

    /// The sign written at `coord`, if the block there is still a sign.
    pub fn sign(&self, coord: VoxelCoord) -> Option<&SignText> {
        if self.material(coord) == Material::WallSign {
            self.signs.get(&coord)
        } else {
            None
        }
    }

    /// Count blocks of a given material. Linear scan; test helper.
    pub fn count_material(&self, material: Material) -> usize {
        self.blocks.iter().filter(|b| b.material == material).count()
    }
}

impl BlockWorld for VoxelWorld {
    fn block(&self, coord: VoxelCoord) -> BlockState {
        self.index(coord)
            .map(|i| self.blocks[i])
            .unwrap_or(BlockState::AIR)
    }

    fn set_block(&mut self, coord: VoxelCoord, block: BlockState) {
        if let Some(i) = self.index(coord) {
            self.blocks[i] = block;
            if block.material != Material::WallSign {
                self.signs.remove(&coord);
            }
        }
    }
}

impl SignWriter for VoxelWorld {
    fn write_sign(&mut self, coord: VoxelCoord, facing: u8, lines: [String; 4]) {
        if !self.in_bounds(coord) {
            return;
        }
        self.set_block(coord, BlockState::new(Material::WallSign, facing));
        self.signs.insert(coord, SignText { facing, lines });
    }
}
