//! Tick driver: owns every live projectile and the shared camera slot.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use missileworks_core::config::FlightConfig;
use missileworks_core::enums::ProjectileKind;
use missileworks_core::events::FlightEvent;
use missileworks_core::state::ProjectileSnapshot;
use missileworks_core::types::{ActorRef, ProjectileId};
use missileworks_core::world::WorldServices;

use crate::camera::CameraManager;
use crate::guided::GuidedController;
use crate::lifecycle::{FlightController, FlightEnv, Projectile};
use crate::staged::StagedController;

/// Launch request for [`FlightDriver::launch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaunchOrder {
    /// Guided at `target`, optionally from an explicit pose.
    Guided {
        target: ActorRef,
        spawn: Option<(Vec3, Option<Vec3>)>,
    },
    /// Staged above the operator.
    Staged,
}

impl LaunchOrder {
    pub fn kind(&self) -> ProjectileKind {
        match self {
            Self::Guided { .. } => ProjectileKind::Guided,
            Self::Staged => ProjectileKind::Staged,
        }
    }
}

/// Runs `control()` on every active projectile once per tick, sequentially.
pub struct FlightDriver {
    config: FlightConfig,
    projectiles: Vec<Projectile>,
    cameras: CameraManager,
    rng: ChaCha8Rng,
    next_id: u32,
    events: Vec<FlightEvent>,
}

impl FlightDriver {
    pub fn new(config: FlightConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            projectiles: Vec::new(),
            cameras: CameraManager::new(),
            next_id: 0,
            events: Vec::new(),
        }
    }

    /// Build the controller for `order` from the configured profiles and
    /// launch it on behalf of the operator.
    pub fn launch(&mut self, order: LaunchOrder, world: &mut dyn WorldServices) -> ProjectileId {
        let operator = world.player();
        let controller: Box<dyn FlightController> = match order {
            LaunchOrder::Guided { target, spawn } => {
                let mut guided = GuidedController::new(self.config.guided.clone(), target);
                if let Some((position, rotation)) = spawn {
                    guided = guided.with_spawn_pose(position, rotation);
                }
                Box::new(guided)
            }
            LaunchOrder::Staged => Box::new(StagedController::new(self.config.staged.clone(), operator)),
        };
        self.launch_with(controller, operator, world)
    }

    /// Launch an arbitrary controller owned by `owner`.
    ///
    /// A spawn failure still returns an id; the instance is inactive and
    /// dropped on the next tick.
    pub fn launch_with(
        &mut self,
        controller: Box<dyn FlightController>,
        owner: ActorRef,
        world: &mut dyn WorldServices,
    ) -> ProjectileId {
        self.next_id += 1;
        let id = ProjectileId(self.next_id);

        let mut env = FlightEnv {
            world,
            cameras: &mut self.cameras,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        let projectile = Projectile::construct(id, owner, controller, &mut env);
        self.projectiles.push(projectile);
        id
    }

    /// Advance every active projectile by one tick and drop the ones that
    /// stopped. Returns the events raised since the previous tick.
    pub fn tick(&mut self, world: &mut dyn WorldServices) -> Vec<FlightEvent> {
        let mut env = FlightEnv {
            world,
            cameras: &mut self.cameras,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        for projectile in self.projectiles.iter_mut().filter(|p| p.is_active()) {
            projectile.control(&mut env);
        }

        let before = self.projectiles.len();
        self.projectiles.retain(Projectile::is_active);
        if self.projectiles.len() != before {
            debug!(removed = before - self.projectiles.len(), "dropped finished projectiles");
        }

        std::mem::take(&mut self.events)
    }

    /// Clean up everything still flying (e.g. on shutdown).
    pub fn shutdown(&mut self, world: &mut dyn WorldServices) -> Vec<FlightEvent> {
        let mut env = FlightEnv {
            world,
            cameras: &mut self.cameras,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        for projectile in &mut self.projectiles {
            projectile.cleanup(&mut env);
        }
        self.projectiles.clear();
        std::mem::take(&mut self.events)
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id() == id)
    }

    pub fn active_count(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_active()).count()
    }

    pub fn cameras(&self) -> &CameraManager {
        &self.cameras
    }

    pub fn snapshots(&self, now_ms: u64) -> Vec<ProjectileSnapshot> {
        self.projectiles
            .iter()
            .map(|p| p.snapshot(now_ms, &self.cameras))
            .collect()
    }
}
