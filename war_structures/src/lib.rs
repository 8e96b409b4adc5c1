// war_structures: structure placement for team objective zones.
//
// This crate computes and builds the physical structures of a team
// objective game on a voxel grid: the lobby attached to a zone wall, the
// per-team and auto-assign gates inside it, the war-hub link gate, signs,
// and capturable monuments. It never owns block storage: every read and
// write goes through the `BlockWorld` / `SignWriter` traits, so it can be
// tested headless against the in-memory `VoxelWorld`.
//
// Module overview:
// - `types.rs`:       VoxelCoord, Direction, Material, BlockState, Location.
// - `direction.rs`:   Wall: left/right/opposite tables, yaw bucketing, sign facing codes.
// - `world.rs`:       BlockWorld and SignWriter traits + dense VoxelWorld grid.
// - `volume.rs`:      Region: normalized box with fills and tagged snapshot/restore.
// - `team.rs`:        TeamInfo / TeamKind: read-only team facts.
// - `config.rs`:      StructureConfig: lobby and zone materials, war-hub flag.
// - `lobby.rs`:       Lobby layout engine: anchors, gate fan-out, membership queries.
// - `sign.rs`:        Sign text and placement for gates and the zone sign.
// - `materialize.rs`: Writes a lobby layout into the world.
// - `monument.rs`:    Monument footprint, pattern, proximity and ownership.
// - `registry.rs`:    RegionIndex: which registered region contains a point.
// - `zone.rs`:        Warzone aggregate; applies commands.
// - `command.rs`:     StructureCommand: all structure mutations.
// - `event.rs`:       StructureEvent: what a command did.
//
// **Critical constraint: determinism.** Given the same zone facts and
// commands, the same blocks are written in the same order. Gate maps and
// monument sets are `BTreeMap`s; no hashing, no randomness, no clock.

pub mod command;
pub mod config;
pub mod direction;
pub mod event;
pub mod lobby;
pub mod materialize;
pub mod monument;
pub mod registry;
pub mod sign;
pub mod team;
pub mod types;
pub mod volume;
pub mod world;
pub mod zone;
