//! Single-stage guided projectile.
//!
//! Locks on to one actor and steers by applying the drag-scaled forward
//! force at a small lateral lever arm whose side follows the sign of the
//! yaw error. There is no PID: the correction flips side every time the
//! error changes sign and settles as drag builds with speed.

use glam::Vec3;
use tracing::trace;

use missileworks_core::config::{FlightProfile, GuidedProfile};
use missileworks_core::enums::ProjectileKind;
use missileworks_core::error::{FlightResult, WorldError};
use missileworks_core::math::{angle_delta, euler_angles, orientation_toward};
use missileworks_core::state::readout;
use missileworks_core::types::ActorRef;
use missileworks_core::world::WorldServices;

use crate::aerodynamics::drag_force_multiplier;
use crate::lifecycle::{
    CollisionPolicy, FlightController, FlightState, SpawnContext, SpawnPose, TickContext,
};

#[derive(Debug, Clone)]
pub struct GuidedController {
    profile: GuidedProfile,
    target: ActorRef,
    spawn_position: Option<Vec3>,
    spawn_rotation: Option<Vec3>,
    origin: Vec3,
    on_collision: CollisionPolicy,
}

impl GuidedController {
    pub fn new(profile: GuidedProfile, target: ActorRef) -> Self {
        Self {
            profile,
            target,
            spawn_position: None,
            spawn_rotation: None,
            origin: Vec3::ZERO,
            on_collision: CollisionPolicy::Detonate,
        }
    }

    /// Override what happens on impact (default: detonate).
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.on_collision = policy;
        self
    }

    /// Spawn at an explicit point instead of in front of the operator.
    /// With a rotation the body keeps it; without one it turns to the target.
    pub fn with_spawn_pose(mut self, position: Vec3, rotation: Option<Vec3>) -> Self {
        self.spawn_position = Some(position);
        self.spawn_rotation = rotation;
        self
    }

    /// Current yaw minus bearing to the target, in (−180, 180].
    pub fn yaw_error(&self, world: &dyn WorldServices, position: Vec3, yaw: f32) -> Option<f32> {
        if !world.actor_exists(self.target) {
            return None;
        }
        let target = world.actor_position(self.target).ok()?;
        let direction = (target - position).try_normalize()?;
        let bearing = euler_angles(direction, false);
        Some(angle_delta(bearing.z, yaw))
    }
}

impl FlightController for GuidedController {
    fn kind(&self) -> ProjectileKind {
        ProjectileKind::Guided
    }

    fn profile(&self) -> &FlightProfile {
        &self.profile.flight
    }

    fn stationary_grace_ms(&self) -> u64 {
        self.profile.stationary_grace_ms
    }

    fn configure(&mut self, _ctx: &mut SpawnContext<'_>) -> FlightResult<()> {
        self.profile.validate()
    }

    fn spawn_pose(&mut self, ctx: &mut SpawnContext<'_>) -> FlightResult<SpawnPose> {
        let position = match self.spawn_position {
            Some(p) => p,
            None => ctx.world.actor_position(ctx.owner)? + self.profile.spawn_offset,
        };
        let rotation = match self.spawn_rotation {
            Some(r) => r,
            None => ctx
                .world
                .actor_position(self.target)
                .ok()
                .and_then(|t| orientation_toward(position, t, self.profile.flight.forward_angle_offset))
                .unwrap_or(Vec3::ZERO),
        };
        self.origin = position;
        Ok(SpawnPose { position, rotation })
    }

    fn aim_point(&self, world: &dyn WorldServices) -> Option<Vec3> {
        if self.spawn_rotation.is_some() {
            return None;
        }
        world.actor_position(self.target).ok()
    }

    fn steer(&mut self, ctx: &mut TickContext<'_>) -> Result<(), WorldError> {
        let flight = &self.profile.flight;
        let forward = flight.forward_unit();
        let k = ctx.kinematics;

        ctx.world
            .apply_force_relative(ctx.body, forward * flight.thrust, None)?;

        if let Some(error) = self.yaw_error(&*ctx.world, k.position, k.yaw()) {
            let side = if error.abs() < f32::EPSILON {
                0.0
            } else {
                error.signum()
            };
            let drag = drag_force_multiplier(k.position.z, k.speed(), flight.max_cruise_speed);
            let offset = Vec3::new(side * self.profile.drag_offset, 0.0, 0.0);
            ctx.world
                .apply_force_relative(ctx.body, forward * drag, Some(offset))?;
            trace!(projectile = %ctx.id, error, drag, "steering");
        }

        if flight.debug_readout {
            let text = readout(k.position - self.origin, k.speed(), k.rotation, k.angular_velocity);
            ctx.world.show_help_text(&text);
        }
        Ok(())
    }

    fn collision_policy(&self, _state: &FlightState) -> CollisionPolicy {
        self.on_collision
    }
}
