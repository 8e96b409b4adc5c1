// Warzone: the zone-owned aggregate of structures.
//
// A `Warzone` holds the facts the structure engine consumes (bounds,
// ordered team list, auto-assign flag, materials config) together with the
// structures it owns: at most one lobby, any number of named monuments, and
// the teleport point the last lobby materialization produced.
//
// Structure changes arrive as `StructureCommand`s through `apply()`, which
// returns the `StructureEvent`s they caused. Team bookkeeping
// (`register_team`, `unregister_team`, `update_team`) is plain data
// mutation; the lobby only picks up a new roster on `RefreshLobby`.
//
// Ownership rule: a monument's owner is always a team registered here.
// `CaptureMonument` for an unknown team is ignored, and unregistering a
// team uncaptures every monument it held.
//
// See also: `command.rs`, `event.rs`, `lobby.rs`, `monument.rs`,
// `materialize.rs`, `registry.rs` for cross-zone lobby lookup.
//
// World rule: every structure lives in the zone's own world, and the
// `BlockWorld` handed to `apply` is that world's grid. `PlaceLobbyAt` and
// `PlaceMonument` naming another world are ignored.
//
// **Critical constraint: serialized edits.** Callers apply commands for one
// zone at a time on the host's tick thread. Two zones whose structures
// overlap must not be edited concurrently.

use crate::command::StructureCommand;
use crate::config::StructureConfig;
use crate::event::StructureEvent;
use crate::lobby::{GateHit, ZoneFacts, ZoneLobby};
use crate::materialize::{self, Teleport};
use crate::monument::Monument;
use crate::team::TeamInfo;
use crate::types::Location;
use crate::volume::Region;
use crate::world::{BlockWorld, SignWriter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Warzone {
    name: String,
    bounds: Region,
    /// Registration order; drives gate order.
    teams: Vec<TeamInfo>,
    auto_assign: bool,
    #[serde(default)]
    config: StructureConfig,
    lobby: Option<ZoneLobby>,
    monuments: BTreeMap<String, Monument>,
    teleport: Option<Teleport>,
}

impl Warzone {
    pub fn new(name: impl Into<String>, bounds: Region) -> Self {
        Self {
            name: name.into(),
            bounds,
            teams: Vec::new(),
            auto_assign: false,
            config: StructureConfig::default(),
            lobby: None,
            monuments: BTreeMap::new(),
            teleport: None,
        }
    }

    pub fn with_config(mut self, config: StructureConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world_name(&self) -> &str {
        &self.bounds.world
    }

    pub fn bounds(&self) -> &Region {
        &self.bounds
    }

    pub fn teams(&self) -> &[TeamInfo] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&TeamInfo> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn auto_assign(&self) -> bool {
        self.auto_assign
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn lobby(&self) -> Option<&ZoneLobby> {
        self.lobby.as_ref()
    }

    pub fn monument(&self, name: &str) -> Option<&Monument> {
        self.monuments.get(name)
    }

    pub fn monuments(&self) -> impl Iterator<Item = &Monument> {
        self.monuments.values()
    }

    pub fn teleport(&self) -> Option<&Teleport> {
        self.teleport.as_ref()
    }

    pub fn facts(&self) -> ZoneFacts<'_> {
        ZoneFacts {
            name: &self.name,
            bounds: &self.bounds,
            teams: &self.teams,
            auto_assign: self.auto_assign,
        }
    }

    // -----------------------------------------------------------------------
    // Team and settings bookkeeping
    // -----------------------------------------------------------------------

    /// Append a team. Returns `false` if the name is taken.
    pub fn register_team(&mut self, team: TeamInfo) -> bool {
        if self.team(&team.name).is_some() {
            log::warn!("zone {} already has a team named {}", self.name, team.name);
            return false;
        }
        self.teams.push(team);
        true
    }

    /// Remove a team and uncapture every monument it owned.
    pub fn unregister_team(&mut self, name: &str) -> Option<TeamInfo> {
        let index = self.teams.iter().position(|t| t.name == name)?;
        let team = self.teams.remove(index);
        for monument in self.monuments.values_mut() {
            if monument.is_owner(name) {
                monument.uncapture();
                log::info!("monument {} lost its owner {}", monument.name(), name);
            }
        }
        Some(team)
    }

    /// Replace a registered team's counters. Returns `false` for an unknown
    /// team name.
    pub fn update_team(&mut self, team: TeamInfo) -> bool {
        match self.teams.iter_mut().find(|t| t.name == team.name) {
            Some(slot) => {
                *slot = team;
                true
            }
            None => false,
        }
    }

    pub fn set_auto_assign(&mut self, auto_assign: bool) {
        self.auto_assign = auto_assign;
    }

    pub fn set_config(&mut self, config: StructureConfig) {
        self.config = config;
    }

    // -----------------------------------------------------------------------
    // Queries for the game layer
    // -----------------------------------------------------------------------

    pub fn gate_at(&self, location: &Location) -> Option<GateHit> {
        self.lobby.as_ref()?.gate_at(location)
    }

    pub fn is_leaving_zone(&self, location: &Location) -> bool {
        self.lobby
            .as_ref()
            .is_some_and(|lobby| lobby.is_leaving_zone(location))
    }

    /// The first monument (by name) whose proximity cube holds `location`.
    pub fn monument_near(&self, location: &Location) -> Option<&Monument> {
        self.monuments.values().find(|m| m.is_near(location))
    }

    /// The lobby region for a `RegionIndex`, if a lobby exists.
    pub fn lobby_entry(&self) -> Option<(String, Region)> {
        self.lobby
            .as_ref()
            .map(|lobby| (self.name.clone(), lobby.volume().clone()))
    }

    // -----------------------------------------------------------------------
    // Command application
    // -----------------------------------------------------------------------

    pub fn apply<W: BlockWorld + SignWriter>(
        &mut self,
        command: StructureCommand,
        world: &mut W,
    ) -> Vec<StructureEvent> {
        match command {
            StructureCommand::AttachLobbyToWall { wall } => {
                let (facts, lobby) = self.lobby_parts();
                if let Some(existing) = lobby.as_mut() {
                    existing.move_to_wall(facts, wall, world);
                } else {
                    *lobby = Some(ZoneLobby::attach_to_wall(facts, wall, world));
                }
                self.materialize(world)
            }
            StructureCommand::PlaceLobbyAt { at, yaw } => {
                if at.world != self.bounds.world {
                    return self.ignored(format!("lobby anchor is in world {}", at.world));
                }
                let (facts, lobby) = self.lobby_parts();
                if let Some(existing) = lobby.as_mut() {
                    existing.move_facing(facts, &at, yaw, world);
                } else {
                    *lobby = Some(ZoneLobby::place_facing(facts, &at, yaw, world));
                }
                self.materialize(world)
            }
            StructureCommand::RefreshLobby => {
                let (facts, lobby) = self.lobby_parts();
                if let Some(existing) = lobby.as_mut() {
                    existing.regenerate(facts, world);
                }
                self.materialize(world)
            }
            StructureCommand::RefreshTeamSign { team } => self.refresh_team_sign(&team, world),
            StructureCommand::PlaceMonument { name, at } => {
                if at.world != self.bounds.world {
                    return self.ignored(format!("monument {name} is in world {}", at.world));
                }
                let materials = &self.config.zone_materials;
                if let Some(monument) = self.monuments.get_mut(&name) {
                    monument.set_location(&at, world, materials);
                } else {
                    let monument = Monument::new(name.clone(), &at, world, materials);
                    self.monuments.insert(name.clone(), monument);
                }
                vec![StructureEvent::MonumentPlaced {
                    name,
                    center: at.coord,
                }]
            }
            StructureCommand::RemoveMonument { name } => match self.monuments.remove(&name) {
                Some(mut monument) => {
                    monument.remove(world);
                    log::info!("monument {} removed from zone {}", name, self.name);
                    vec![StructureEvent::MonumentRemoved { name }]
                }
                None => self.ignored(format!("no monument named {name}")),
            },
            StructureCommand::CaptureMonument { name, team } => {
                if self.team(&team).is_none() {
                    return self.ignored(format!("team {team} is not registered"));
                }
                match self.monuments.get_mut(&name) {
                    Some(monument) => {
                        monument.capture(team.clone());
                        log::info!("monument {} captured by {}", name, team);
                        vec![StructureEvent::MonumentCaptured { name, team }]
                    }
                    None => self.ignored(format!("no monument named {name}")),
                }
            }
            StructureCommand::UncaptureMonument { name } => match self.monuments.get_mut(&name) {
                Some(monument) => {
                    let previous = monument.owner().map(str::to_string);
                    monument.uncapture();
                    log::info!("monument {} uncaptured", name);
                    vec![StructureEvent::MonumentUncaptured { name, previous }]
                }
                None => self.ignored(format!("no monument named {name}")),
            },
        }
    }

    /// Put back the terrain under every structure the zone owns. Used when
    /// the zone is deleted.
    pub fn tear_down(&mut self, world: &mut impl BlockWorld) {
        for monument in self.monuments.values_mut() {
            monument.remove(world);
        }
        self.monuments.clear();
        if let Some(mut lobby) = self.lobby.take() {
            lobby.restore_terrain(world);
        }
        self.teleport = None;
        log::info!("zone {} structures torn down", self.name);
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn lobby_parts(&mut self) -> (ZoneFacts<'_>, &mut Option<ZoneLobby>) {
        (
            ZoneFacts {
                name: &self.name,
                bounds: &self.bounds,
                teams: &self.teams,
                auto_assign: self.auto_assign,
            },
            &mut self.lobby,
        )
    }

    fn materialize<W: BlockWorld + SignWriter>(&mut self, world: &mut W) -> Vec<StructureEvent> {
        let report =
            materialize::materialize_lobby(self.lobby.as_ref(), self.facts(), &self.config, world);
        let (Some(report), Some(lobby)) = (report, self.lobby.as_ref()) else {
            return vec![StructureEvent::LobbyMaterializeSkipped];
        };
        let placed = StructureEvent::LobbyPlaced {
            wall: lobby.wall(),
            half_width: lobby.layout().half_width,
        };
        self.teleport = Some(report.teleport.clone());
        vec![
            placed,
            StructureEvent::TeleportSet {
                teleport: report.teleport,
            },
        ]
    }

    fn refresh_team_sign(&self, team: &str, signs: &mut impl SignWriter) -> Vec<StructureEvent> {
        let Some(info) = self.team(team) else {
            return self.ignored(format!("team {team} is not registered"));
        };
        let Some(lobby) = self.lobby.as_ref() else {
            return self.ignored(format!("zone {} has no lobby", self.name));
        };
        if materialize::refresh_team_sign(lobby, info, signs) {
            vec![StructureEvent::TeamSignRefreshed {
                team: team.to_string(),
            }]
        } else {
            self.ignored(format!("lobby has no gate for team {team}"))
        }
    }

    fn ignored(&self, reason: String) -> Vec<StructureEvent> {
        log::warn!("zone {}: {}", self.name, reason);
        vec![StructureEvent::CommandIgnored { reason }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Wall;
    use crate::team::TeamKind;
    use crate::types::{BlockState, Material, VoxelCoord};
    use crate::world::VoxelWorld;

    fn arena(team_count: usize) -> (Warzone, VoxelWorld) {
        let mut world = VoxelWorld::new(64, 32, 64);
        world.fill_ground(12, BlockState::plain(Material::Dirt));
        let bounds = Region::new("world", VoxelCoord::new(20, 10, 20), VoxelCoord::new(40, 20, 40));
        let mut zone = Warzone::new("arena", bounds);
        for &kind in &TeamKind::ALL[..team_count] {
            zone.register_team(TeamInfo::new(kind));
        }
        (zone, world)
    }

    fn at(x: i32, y: i32, z: i32) -> Location {
        Location::new("world", VoxelCoord::new(x, y, z))
    }

    #[test]
    fn attach_emits_placed_and_teleport() {
        let (mut zone, mut world) = arena(2);
        let events = zone.apply(
            StructureCommand::AttachLobbyToWall { wall: Wall::North },
            &mut world,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            StructureEvent::LobbyPlaced {
                wall: Wall::North,
                half_width: 7
            }
        );
        let teleport = zone.teleport().unwrap();
        assert_eq!(teleport.yaw, 270.0);
        assert_eq!(teleport.location.coord, VoxelCoord::new(14, 15, 30));
    }

    #[test]
    fn refresh_without_lobby_is_skipped() {
        let (mut zone, mut world) = arena(2);
        let events = zone.apply(StructureCommand::RefreshLobby, &mut world);
        assert_eq!(events, vec![StructureEvent::LobbyMaterializeSkipped]);
        assert!(zone.teleport().is_none());
    }

    #[test]
    fn duplicate_team_rejected() {
        let (mut zone, _) = arena(1);
        assert!(!zone.register_team(TeamInfo::new(TeamKind::White)));
        assert_eq!(zone.teams().len(), 1);
    }

    #[test]
    fn capture_requires_registered_team() {
        let (mut zone, mut world) = arena(2);
        zone.apply(
            StructureCommand::PlaceMonument {
                name: "hill".into(),
                at: at(30, 13, 30),
            },
            &mut world,
        );
        let events = zone.apply(
            StructureCommand::CaptureMonument {
                name: "hill".into(),
                team: "black".into(),
            },
            &mut world,
        );
        assert!(matches!(events[0], StructureEvent::CommandIgnored { .. }));
        assert!(!zone.monument("hill").unwrap().has_owner());

        zone.apply(
            StructureCommand::CaptureMonument {
                name: "hill".into(),
                team: "white".into(),
            },
            &mut world,
        );
        assert!(zone.monument("hill").unwrap().is_owner("white"));
    }

    #[test]
    fn unregister_team_uncaptures_monuments() {
        let (mut zone, mut world) = arena(2);
        for name in ["a", "b"] {
            zone.apply(
                StructureCommand::PlaceMonument {
                    name: name.into(),
                    at: at(if name == "a" { 25 } else { 35 }, 13, 30),
                },
                &mut world,
            );
        }
        zone.apply(
            StructureCommand::CaptureMonument {
                name: "a".into(),
                team: "white".into(),
            },
            &mut world,
        );
        zone.apply(
            StructureCommand::CaptureMonument {
                name: "b".into(),
                team: "orange".into(),
            },
            &mut world,
        );
        let removed = zone.unregister_team("white").unwrap();
        assert_eq!(removed.kind, TeamKind::White);
        assert!(!zone.monument("a").unwrap().has_owner());
        assert!(zone.monument("b").unwrap().is_owner("orange"));
        assert!(zone.unregister_team("white").is_none());
    }

    #[test]
    fn uncapture_reports_previous_owner() {
        let (mut zone, mut world) = arena(1);
        zone.apply(
            StructureCommand::PlaceMonument {
                name: "m".into(),
                at: at(30, 13, 30),
            },
            &mut world,
        );
        zone.apply(
            StructureCommand::CaptureMonument {
                name: "m".into(),
                team: "white".into(),
            },
            &mut world,
        );
        let events = zone.apply(
            StructureCommand::UncaptureMonument { name: "m".into() },
            &mut world,
        );
        assert_eq!(
            events,
            vec![StructureEvent::MonumentUncaptured {
                name: "m".into(),
                previous: Some("white".into())
            }]
        );
    }

    #[test]
    fn placements_in_another_world_are_ignored() {
        let (mut zone, mut world) = arena(2);
        let before = world.clone();
        let nether = Location::new("nether", VoxelCoord::new(30, 13, 30));
        for command in [
            StructureCommand::PlaceLobbyAt {
                at: nether.clone(),
                yaw: 90.0,
            },
            StructureCommand::PlaceMonument {
                name: "m".into(),
                at: nether.clone(),
            },
        ] {
            let events = zone.apply(command, &mut world);
            assert!(matches!(events[..], [StructureEvent::CommandIgnored { .. }]));
        }
        assert!(zone.lobby().is_none());
        assert!(zone.monument("m").is_none());
        assert!(zone.teleport().is_none());
        assert_eq!(world, before);
    }

    #[test]
    fn unknown_monument_commands_are_ignored() {
        let (mut zone, mut world) = arena(1);
        for command in [
            StructureCommand::RemoveMonument { name: "x".into() },
            StructureCommand::UncaptureMonument { name: "x".into() },
            StructureCommand::CaptureMonument {
                name: "x".into(),
                team: "white".into(),
            },
        ] {
            let events = zone.apply(command, &mut world);
            assert!(matches!(events[..], [StructureEvent::CommandIgnored { .. }]));
        }
    }

    #[test]
    fn team_sign_refresh() {
        let (mut zone, mut world) = arena(2);
        let events = zone.apply(
            StructureCommand::RefreshTeamSign {
                team: "white".into(),
            },
            &mut world,
        );
        assert!(matches!(events[0], StructureEvent::CommandIgnored { .. }));

        zone.apply(StructureCommand::AttachLobbyToWall { wall: Wall::East }, &mut world);
        let mut white = zone.team("white").unwrap().clone();
        white.players = 4;
        assert!(zone.update_team(white));
        let events = zone.apply(
            StructureCommand::RefreshTeamSign {
                team: "white".into(),
            },
            &mut world,
        );
        assert_eq!(
            events,
            vec![StructureEvent::TeamSignRefreshed {
                team: "white".into()
            }]
        );
        let lobby = zone.lobby().unwrap();
        let sign = materialize::team_sign_for(lobby, zone.team("white").unwrap()).unwrap();
        assert_eq!(world.sign(sign.block).unwrap().lines[1], "4/20 players");
    }

    #[test]
    fn tear_down_restores_terrain() {
        let (mut zone, mut world) = arena(3);
        let before = world.clone();
        zone.apply(StructureCommand::AttachLobbyToWall { wall: Wall::South }, &mut world);
        zone.apply(
            StructureCommand::PlaceMonument {
                name: "m".into(),
                at: at(30, 13, 30),
            },
            &mut world,
        );
        zone.tear_down(&mut world);
        assert!(zone.lobby().is_none());
        assert_eq!(zone.monuments().count(), 0);
        for material in [Material::Glass, Material::Glowstone, Material::Obsidian, Material::Wool] {
            assert_eq!(world.count_material(material), 0, "{material:?}");
        }
        assert_eq!(
            world.count_material(Material::Dirt),
            before.count_material(Material::Dirt)
        );
    }

    #[test]
    fn zone_json_roundtrip_keeps_snapshots() {
        let (mut zone, mut world) = arena(2);
        zone.apply(StructureCommand::AttachLobbyToWall { wall: Wall::West }, &mut world);
        let json = zone.to_json().unwrap();
        let mut restored = Warzone::from_json(&json).unwrap();
        assert_eq!(restored, zone);
        restored.tear_down(&mut world);
        assert_eq!(world.count_material(Material::Glass), 0);
    }
}
