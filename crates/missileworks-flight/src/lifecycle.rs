//! Projectile lifecycle skeleton.
//!
//! [`Projectile`] runs the same construction order and per-tick contract
//! for every kind; a boxed [`FlightController`] supplies the hooks.
//!
//! Per tick, in order: body gone → clean up; past timeout → detonate and
//! clean up; collided, damaged or stalled past the grace window → apply the
//! controller's collision policy; otherwise steer, read operator input when
//! allowed, and run targeting. Terminated instances never tick again.

use std::fmt;

use glam::Vec3;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use missileworks_core::config::FlightProfile;
use missileworks_core::enums::{ProjectileKind, Stage};
use missileworks_core::error::{FlightResult, WorldError};
use missileworks_core::events::FlightEvent;
use missileworks_core::math::orientation_toward;
use missileworks_core::state::ProjectileSnapshot;
use missileworks_core::types::{ActorRef, BodyHandle, EffectHandle, Kinematics, ProjectileId};
use missileworks_core::world::WorldServices;

use crate::camera::CameraManager;

/// Speed below which a body counts as stopped.
pub const STATIONARY_SPEED: f32 = 1e-3;

/// What to do once a collision (or stall) is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Primary explosion, then clean up.
    Detonate,
    /// Notify the operator, clean up without exploding.
    Dud,
    /// Keep flying.
    Ignore,
}

/// Mutable state shared between the skeleton and its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightState {
    pub stage: Stage,
    pub can_control: bool,
}

/// Everything a projectile touches outside itself during a call.
pub struct FlightEnv<'a> {
    pub world: &'a mut dyn WorldServices,
    pub cameras: &'a mut CameraManager,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut Vec<FlightEvent>,
}

/// Construction-time context handed to controller hooks.
pub struct SpawnContext<'a> {
    pub id: ProjectileId,
    pub owner: ActorRef,
    pub world: &'a mut dyn WorldServices,
    pub cameras: &'a mut CameraManager,
    pub rng: &'a mut ChaCha8Rng,
}

/// Per-tick context handed to controller hooks.
pub struct TickContext<'a> {
    pub id: ProjectileId,
    pub owner: ActorRef,
    pub body: BodyHandle,
    pub age_ms: u64,
    pub kinematics: Kinematics,
    pub state: &'a mut FlightState,
    pub world: &'a mut dyn WorldServices,
    pub cameras: &'a mut CameraManager,
    pub events: &'a mut Vec<FlightEvent>,
}

/// Where to materialize the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Hooks a projectile kind plugs into the lifecycle skeleton.
pub trait FlightController: fmt::Debug {
    fn kind(&self) -> ProjectileKind;

    fn profile(&self) -> &FlightProfile;

    fn initial_stage(&self) -> Stage {
        Stage::Cruise {
            payload_armed: false,
        }
    }

    /// How long a zero-speed body is tolerated after spawn.
    fn stationary_grace_ms(&self) -> u64;

    /// Validate tuning before anything is spawned.
    fn configure(&mut self, _ctx: &mut SpawnContext<'_>) -> FlightResult<()> {
        self.profile().validate()
    }

    fn spawn_pose(&mut self, ctx: &mut SpawnContext<'_>) -> FlightResult<SpawnPose>;

    /// Point the body's nose is turned toward after spawn, if any.
    fn aim_point(&self, _world: &dyn WorldServices) -> Option<Vec3> {
        None
    }

    /// Gravity off, speed cap, nose toward [`FlightController::aim_point`].
    fn tune_body(&mut self, ctx: &mut SpawnContext<'_>, body: BodyHandle) -> FlightResult<()> {
        let aim = self.aim_point(&*ctx.world);
        tune_body_defaults(ctx.world, body, self.profile(), aim)?;
        Ok(())
    }

    fn attach_effects(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        body: BodyHandle,
    ) -> Result<Option<EffectHandle>, WorldError> {
        attach_profile_effect(ctx.world, body, self.profile())
    }

    /// Called only when the profile asks for a camera.
    fn create_camera(&mut self, _ctx: &mut SpawnContext<'_>, _body: BodyHandle) -> Result<(), WorldError> {
        Ok(())
    }

    /// Thrust and steering, every tick.
    fn steer(&mut self, ctx: &mut TickContext<'_>) -> Result<(), WorldError>;

    /// Only called while the operator has authority.
    fn apply_operator_input(&mut self, _ctx: &mut TickContext<'_>) -> Result<(), WorldError> {
        Ok(())
    }

    fn run_targeting(&mut self, _ctx: &mut TickContext<'_>) -> Result<(), WorldError> {
        Ok(())
    }

    fn collision_policy(&self, _state: &FlightState) -> CollisionPolicy {
        CollisionPolicy::Detonate
    }
}

/// Default body tuning shared by every kind.
pub fn tune_body_defaults(
    world: &mut dyn WorldServices,
    body: BodyHandle,
    profile: &FlightProfile,
    aim: Option<Vec3>,
) -> Result<(), WorldError> {
    world.set_gravity_enabled(body, false)?;
    world.set_max_speed(body, profile.max_cruise_speed)?;

    let Some(aim) = aim else {
        return Ok(());
    };
    let position = world.read_kinematics(body)?.position;
    if let Some(rotation) = orientation_toward(position, aim, profile.forward_angle_offset) {
        world.set_rotation(body, rotation)?;
    }
    Ok(())
}

/// Request the profile's effect asset and attach it along the nose.
pub fn attach_profile_effect(
    world: &mut dyn WorldServices,
    body: BodyHandle,
    profile: &FlightProfile,
) -> Result<Option<EffectHandle>, WorldError> {
    let Some(spec) = &profile.effect else {
        return Ok(None);
    };
    let effect = world.request_effect_asset(&spec.asset)?;
    let offset = profile.forward_unit() * spec.forward_offset;
    if let Err(err) = world.attach_effect(effect, body, &spec.name, offset, spec.scale) {
        let _ = world.release_effect(effect);
        return Err(err);
    }
    Ok(Some(effect))
}

/// One projectile instance: the fixed lifecycle around a controller.
#[derive(Debug)]
pub struct Projectile {
    id: ProjectileId,
    controller: Box<dyn FlightController>,
    active: bool,
    state: FlightState,
    owner: ActorRef,
    created_ms: u64,
    body: Option<BodyHandle>,
    effect: Option<EffectHandle>,
    spawn_position: Vec3,
    last_kinematics: Kinematics,
}

impl Projectile {
    /// Run the construction hooks in order.
    ///
    /// Any failure up to and including body tuning leaves an inactive
    /// instance; effect and camera failures are cosmetic and only logged.
    pub fn construct(
        id: ProjectileId,
        owner: ActorRef,
        controller: Box<dyn FlightController>,
        env: &mut FlightEnv<'_>,
    ) -> Self {
        let mut projectile = Self {
            id,
            active: false,
            state: FlightState {
                stage: controller.initial_stage(),
                can_control: false,
            },
            controller,
            owner,
            created_ms: env.world.game_time_ms(),
            body: None,
            effect: None,
            spawn_position: Vec3::ZERO,
            last_kinematics: Kinematics::default(),
        };

        let kind = projectile.kind();
        match projectile.materialize(env) {
            Ok(()) => {
                projectile.active = true;
                info!(projectile = %id, ?kind, position = ?projectile.spawn_position, "launched");
                env.events.push(FlightEvent::Launched {
                    id,
                    kind,
                    position: projectile.spawn_position,
                });
            }
            Err(err) => {
                warn!(projectile = %id, ?kind, %err, "spawn failed");
                if let Some(body) = projectile.body.take() {
                    let _ = env.world.destroy_body(body);
                }
                env.events.push(FlightEvent::SpawnFailed { id, kind });
            }
        }
        projectile
    }

    fn materialize(&mut self, env: &mut FlightEnv<'_>) -> FlightResult<()> {
        let mut ctx = SpawnContext {
            id: self.id,
            owner: self.owner,
            world: &mut *env.world,
            cameras: &mut *env.cameras,
            rng: &mut *env.rng,
        };

        self.controller.configure(&mut ctx)?;
        let pose = self.controller.spawn_pose(&mut ctx)?;
        let body = ctx
            .world
            .spawn_body(self.controller.profile().model, pose.position, pose.rotation)?;
        self.body = Some(body);
        self.spawn_position = pose.position;

        self.controller.tune_body(&mut ctx, body)?;

        match self.controller.attach_effects(&mut ctx, body) {
            Ok(effect) => self.effect = effect,
            Err(err) => debug!(projectile = %self.id, %err, "effect not attached"),
        }
        if self.controller.profile().attach_camera {
            if let Err(err) = self.controller.create_camera(&mut ctx, body) {
                debug!(projectile = %self.id, %err, "camera not created");
            }
        }
        Ok(())
    }

    pub fn id(&self) -> ProjectileId {
        self.id
    }

    pub fn kind(&self) -> ProjectileKind {
        self.controller.kind()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn can_control(&self) -> bool {
        self.state.can_control
    }

    pub fn payload_ready(&self) -> bool {
        self.state.stage.payload_armed()
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn owner(&self) -> ActorRef {
        self.owner
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_ms)
    }

    /// One tick. Returns `false` once the instance has terminated.
    pub fn control(&mut self, env: &mut FlightEnv<'_>) -> bool {
        if !self.active {
            return false;
        }
        let Some(body) = self.body else {
            return self.cleanup(env);
        };

        if !env.world.body_exists(body) {
            info!(projectile = %self.id, "body lost");
            env.events.push(FlightEvent::BodyLost { id: self.id });
            return self.cleanup(env);
        }

        let age_ms = self.age_ms(env.world.game_time_ms());
        if age_ms > self.controller.profile().timeout_ms {
            info!(projectile = %self.id, age_ms, "timed out");
            env.events.push(FlightEvent::Expired { id: self.id });
            self.detonate(env);
            return self.cleanup(env);
        }

        if self.collision_detected(&*env.world, body, age_ms) && !self.handle_collision(env) {
            return false;
        }

        let kinematics = match env.world.read_kinematics(body) {
            Ok(k) => k,
            Err(err) => {
                debug!(projectile = %self.id, %err, "kinematics unavailable this tick");
                return true;
            }
        };
        self.last_kinematics = kinematics;

        let mut ctx = TickContext {
            id: self.id,
            owner: self.owner,
            body,
            age_ms,
            kinematics,
            state: &mut self.state,
            world: &mut *env.world,
            cameras: &mut *env.cameras,
            events: &mut *env.events,
        };

        if let Err(err) = self.controller.steer(&mut ctx) {
            debug!(projectile = %self.id, %err, "steering skipped");
        }
        if ctx.state.can_control {
            if let Err(err) = self.controller.apply_operator_input(&mut ctx) {
                debug!(projectile = %self.id, %err, "operator input skipped");
            }
        }
        if let Err(err) = self.controller.run_targeting(&mut ctx) {
            debug!(projectile = %self.id, %err, "targeting skipped");
        }
        true
    }

    fn collision_detected(&self, world: &dyn WorldServices, body: BodyHandle, age_ms: u64) -> bool {
        world.has_collided(body)
            || world.was_damaged_by_weapon(body)
            || (age_ms > self.controller.stationary_grace_ms()
                && world.current_speed(body) < STATIONARY_SPEED)
    }

    /// Returns whether the instance keeps flying.
    fn handle_collision(&mut self, env: &mut FlightEnv<'_>) -> bool {
        match self.controller.collision_policy(&self.state) {
            CollisionPolicy::Detonate => {
                info!(projectile = %self.id, "collided");
                self.detonate(env);
                self.cleanup(env)
            }
            CollisionPolicy::Dud => {
                let position = self.current_position(&*env.world);
                info!(projectile = %self.id, "collided without detonating");
                env.world.notify("Missile collided!");
                env.events.push(FlightEvent::Dud {
                    id: self.id,
                    position,
                });
                self.cleanup(env)
            }
            CollisionPolicy::Ignore => true,
        }
    }

    fn current_position(&self, world: &dyn WorldServices) -> Vec3 {
        self.body
            .and_then(|body| world.read_kinematics(body).ok())
            .map_or(self.last_kinematics.position, |k| k.position)
    }

    /// Primary explosion at the current position, attributed to the owner.
    pub fn detonate(&mut self, env: &mut FlightEnv<'_>) {
        let position = self.current_position(&*env.world);
        env.world
            .trigger_explosion(position, &self.controller.profile().explosion, self.owner);
        info!(projectile = %self.id, ?position, "detonated");
        env.events.push(FlightEvent::Detonated {
            id: self.id,
            position,
        });
    }

    /// Release every handle and go inactive. Idempotent; always returns `false`.
    pub fn cleanup(&mut self, env: &mut FlightEnv<'_>) -> bool {
        if let Some(body) = self.body.take() {
            if let Err(err) = env.world.destroy_body(body) {
                debug!(projectile = %self.id, %err, "body already released");
            }
        }
        if let Some(effect) = self.effect.take() {
            if let Err(err) = env.world.release_effect(effect) {
                debug!(projectile = %self.id, %err, "effect already released");
            }
        }
        env.cameras.release(self.id, &mut *env.world);

        if std::mem::replace(&mut self.active, false) {
            debug!(projectile = %self.id, "cleaned up");
            env.events.push(FlightEvent::CleanedUp { id: self.id });
        }
        false
    }

    /// Read-only view for overlays and logs.
    pub fn snapshot(&self, now_ms: u64, cameras: &CameraManager) -> ProjectileSnapshot {
        let k = &self.last_kinematics;
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind(),
            active: self.active,
            stage: self.state.stage,
            can_control: self.state.can_control,
            camera: cameras.mode_of(self.id),
            age_ms: self.age_ms(now_ms),
            displacement: k.position - self.spawn_position,
            ground_speed: k.speed(),
            rotation: k.rotation,
            angular_velocity: k.angular_velocity,
        }
    }
}
