// Test harness for end-to-end structure scenarios.
//
// `TestArena` bundles a terrain-filled `VoxelWorld` with a `Warzone` whose
// bounds sit on that terrain, plus an untouched copy of the terrain so
// tests can check that relocation and teardown leave no trace. Commands go
// through the same `Warzone::apply` path a host would use.
//
// Logging: `TestArena::new` installs `env_logger` in test mode, so
// `RUST_LOG=debug cargo test -p structure_tests` shows the engine trace.
//
// See also: `tests/lobby_pipeline.rs` for the scenarios.

use war_structures::command::StructureCommand;
use war_structures::event::StructureEvent;
use war_structures::team::{TeamInfo, TeamKind};
use war_structures::types::{BlockState, Location, Material, VoxelCoord};
use war_structures::volume::Region;
use war_structures::world::{BlockWorld, VoxelWorld};
use war_structures::zone::Warzone;

pub const WORLD: &str = "world";
pub const WORLD_SIZE: (u32, u32, u32) = (96, 48, 96);
/// Top layer of the terrain (grass); dirt below.
pub const GROUND_Y: i32 = 20;
/// Zone bounds. Vertical centre is `GROUND_Y + 1`, so lobby floors land on
/// the grass layer.
pub const ZONE_MIN: VoxelCoord = VoxelCoord::new(32, 10, 32);
pub const ZONE_MAX: VoxelCoord = VoxelCoord::new(64, 32, 64);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct TestArena {
    pub world: VoxelWorld,
    pub zone: Warzone,
    pristine: VoxelWorld,
}

impl TestArena {
    /// An arena with the first `team_count` team kinds registered.
    pub fn new(team_count: usize) -> Self {
        Self::with_teams(&TeamKind::ALL[..team_count])
    }

    pub fn with_teams(kinds: &[TeamKind]) -> Self {
        init_logging();
        let (sx, sy, sz) = WORLD_SIZE;
        let mut world = VoxelWorld::new(sx, sy, sz);
        world.fill_ground(GROUND_Y - 1, BlockState::plain(Material::Dirt));
        let grass = Region::new(
            WORLD,
            VoxelCoord::new(0, GROUND_Y, 0),
            VoxelCoord::new(sx as i32 - 1, GROUND_Y, sz as i32 - 1),
        );
        grass.fill(&mut world, Material::Grass);

        let mut zone = Warzone::new("arena", Region::new(WORLD, ZONE_MIN, ZONE_MAX));
        for &kind in kinds {
            zone.register_team(TeamInfo::new(kind));
        }
        log::debug!("arena ready with {} teams", kinds.len());
        Self {
            pristine: world.clone(),
            world,
            zone,
        }
    }

    pub fn apply(&mut self, command: StructureCommand) -> Vec<StructureEvent> {
        self.zone.apply(command, &mut self.world)
    }

    /// Coordinates whose block differs from the untouched terrain.
    pub fn changed_blocks(&self) -> Vec<VoxelCoord> {
        let (sx, sy, sz) = WORLD_SIZE;
        Region::new(
            WORLD,
            VoxelCoord::new(0, 0, 0),
            VoxelCoord::new(sx as i32 - 1, sy as i32 - 1, sz as i32 - 1),
        )
        .coords()
        .filter(|&c| self.world.block(c) != self.pristine.block(c))
        .collect()
    }

    pub fn pristine(&self) -> &VoxelWorld {
        &self.pristine
    }

    /// Gate reference block of a team. Panics if the lobby has none.
    pub fn gate(&self, team: &str) -> VoxelCoord {
        self.zone
            .lobby()
            .and_then(|lobby| lobby.layout().gates.team_gate(team))
            .unwrap_or_else(|| panic!("no gate for team {team}"))
    }
}

pub fn at(x: i32, y: i32, z: i32) -> Location {
    Location::new(WORLD, VoxelCoord::new(x, y, z))
}

pub fn loc(coord: VoxelCoord) -> Location {
    Location::new(WORLD, coord)
}
