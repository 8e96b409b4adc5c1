// Region index: "given a set of regions, which one contains this point?"
//
// Replaces a scan over every zone's lobby with a per-world list. Regions
// are grouped by world name in a `BTreeMap`, and within a world searched in
// insertion order, so lookups are deterministic when regions overlap (the
// earliest registration wins).
//
// Keys are caller-chosen (zone names in practice). Re-inserting a key
// replaces its region, moving it to the end of its world's list.
//
// See also: `volume.rs` for `Region::contains_location`, `zone.rs` for
// `Warzone::lobby_entry` which feeds this index.

use crate::types::Location;
use crate::volume::Region;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct RegionIndex<K> {
    by_world: BTreeMap<String, Vec<(K, Region)>>,
}

impl<K> Default for RegionIndex<K> {
    fn default() -> Self {
        Self {
            by_world: BTreeMap::new(),
        }
    }
}

impl<K: Clone + PartialEq> RegionIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, region: Region) {
        self.remove(&key);
        self.by_world
            .entry(region.world.clone())
            .or_default()
            .push((key, region));
    }

    /// Drop `key` from every world. Returns whether anything was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        let mut removed = false;
        for entries in self.by_world.values_mut() {
            let before = entries.len();
            entries.retain(|(k, _)| k != key);
            removed |= entries.len() != before;
        }
        self.by_world.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// The first key whose region contains `location`.
    pub fn find(&self, location: &Location) -> Option<&K> {
        self.by_world
            .get(&location.world)?
            .iter()
            .find(|(_, region)| region.contains(location.coord))
            .map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.by_world.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_world.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VoxelCoord;

    fn cube(world: &str, origin: i32, size: i32) -> Region {
        Region::new(
            world,
            VoxelCoord::new(origin, origin, origin),
            VoxelCoord::new(origin + size, origin + size, origin + size),
        )
    }

    #[test]
    fn find_by_world_and_point() {
        let mut index = RegionIndex::new();
        index.insert("a".to_string(), cube("world", 0, 4));
        index.insert("b".to_string(), cube("nether", 0, 4));
        let p = VoxelCoord::new(2, 2, 2);
        assert_eq!(index.find(&Location::new("world", p)), Some(&"a".to_string()));
        assert_eq!(index.find(&Location::new("nether", p)), Some(&"b".to_string()));
        assert_eq!(index.find(&Location::new("end", p)), None);
        assert_eq!(index.find(&Location::new("world", VoxelCoord::new(9, 9, 9))), None);
    }

    #[test]
    fn overlapping_regions_resolve_in_insertion_order() {
        let mut index = RegionIndex::new();
        index.insert(1, cube("w", 0, 10));
        index.insert(2, cube("w", 5, 10));
        let p = Location::new("w", VoxelCoord::new(7, 7, 7));
        assert_eq!(index.find(&p), Some(&1));
        // Re-inserting moves the key to the back.
        index.insert(1, cube("w", 0, 10));
        assert_eq!(index.find(&p), Some(&2));
    }

    #[test]
    fn remove_and_reinsert_elsewhere() {
        let mut index = RegionIndex::new();
        index.insert("z", cube("w", 0, 2));
        index.insert("z", cube("other", 0, 2));
        assert_eq!(index.len(), 1);
        assert_eq!(index.find(&Location::new("w", VoxelCoord::new(1, 1, 1))), None);
        assert!(index.remove(&"z"));
        assert!(!index.remove(&"z"));
        assert!(index.is_empty());
    }
}
