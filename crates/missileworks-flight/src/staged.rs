//! Operator-flown staged projectile.
//!
//! Spawns high above the operator inside a small halo and dives under
//! autopilot with a tracking camera. Once the launch stage has run its
//! course the screen fades, the camera moves onto the body and the operator
//! takes over with the cluster payload armed.

use glam::Vec3;
use tracing::{debug, info};

use missileworks_core::config::{FlightProfile, StagedProfile};
use missileworks_core::enums::{Button, CameraMode, InputAxis, ProjectileKind, Stage};
use missileworks_core::error::{FlightResult, WorldError};
use missileworks_core::events::FlightEvent;
use missileworks_core::math::{halo_offset, orientation_toward};
use missileworks_core::types::{ActorRef, BodyHandle, CameraHandle};
use missileworks_core::world::WorldServices;
use missileworks_targeting::palette::color_for;
use missileworks_targeting::{scan, TargetClassifier, TargetRecord};

use crate::lifecycle::{
    tune_body_defaults, CollisionPolicy, FlightController, FlightState, SpawnContext, SpawnPose,
    TickContext,
};

#[derive(Debug, Clone)]
pub struct StagedController {
    profile: StagedProfile,
    /// Actor the body dives toward at launch.
    anchor: ActorRef,
    classifier: TargetClassifier,
    tracking_camera: Option<CameraHandle>,
}

impl StagedController {
    /// `operator` both flies the projectile and anchors its spawn point.
    pub fn new(profile: StagedProfile, operator: ActorRef) -> Self {
        Self {
            profile,
            anchor: operator,
            classifier: TargetClassifier::new(operator),
            tracking_camera: None,
        }
    }

    fn enter_cruise(&mut self, ctx: &mut TickContext<'_>) {
        let fade = self.profile.fade_ms;
        ctx.world.fade_out(fade);
        ctx.world.wait(fade);

        if let Err(err) = self.mount_camera(ctx) {
            debug!(projectile = %ctx.id, %err, "body camera unavailable");
        }
        ctx.state.can_control = true;

        let from = ctx.state.stage;
        let to = Stage::Cruise {
            payload_armed: true,
        };
        if ctx.state.stage.advance(to) {
            info!(projectile = %ctx.id, ?from, ?to, "stage changed");
            ctx.events.push(FlightEvent::StageChanged {
                id: ctx.id,
                from,
                to,
            });
        }

        ctx.world.fade_in(fade);
    }

    fn mount_camera(&mut self, ctx: &mut TickContext<'_>) -> Result<(), WorldError> {
        let camera = ctx
            .world
            .create_camera(ctx.kinematics.position, self.profile.camera_fov)?;
        let mounted = ctx
            .world
            .attach_camera_to(camera, ctx.body, self.profile.mounted_offset);
        discard_unmounted(&mut *ctx.world, camera, mounted)?;
        ctx.cameras
            .hand_off(ctx.id, camera, CameraMode::BodyMounted, &mut *ctx.world);
        if let Some(tracking) = self.tracking_camera.take() {
            ctx.cameras.retire(ctx.id, tracking, &mut *ctx.world);
        }
        Ok(())
    }

    /// Fire at up to `max_payloads` hostiles. Does nothing (and keeps the
    /// payload armed) when there is nobody to hit.
    fn release_payload(&self, ctx: &mut TickContext<'_>, hostiles: &[TargetRecord]) -> usize {
        if hostiles.is_empty() {
            debug!(projectile = %ctx.id, "release with no hostiles in range");
            return 0;
        }
        ctx.state.stage.disarm_payload();

        let count = hostiles.len().min(self.profile.max_payloads);
        for target in &hostiles[..count] {
            ctx.world
                .trigger_explosion(target.position, &self.profile.payload_explosion, ctx.owner);
        }
        info!(projectile = %ctx.id, count, "payload released");
        ctx.events.push(FlightEvent::PayloadReleased { id: ctx.id, count });
        count
    }
}

/// A camera that could not be mounted is destroyed before anyone owns it.
fn discard_unmounted(
    world: &mut dyn WorldServices,
    camera: CameraHandle,
    mounted: Result<(), WorldError>,
) -> Result<(), WorldError> {
    if mounted.is_err() {
        if let Err(err) = world.destroy_camera(camera) {
            debug!(?camera, %err, "unmounted camera already gone");
        }
    }
    mounted
}

impl FlightController for StagedController {
    fn kind(&self) -> ProjectileKind {
        ProjectileKind::Staged
    }

    fn profile(&self) -> &FlightProfile {
        &self.profile.flight
    }

    fn initial_stage(&self) -> Stage {
        Stage::Launch
    }

    /// The body is slow while the launch stage settles; only count a stall
    /// once that is over.
    fn stationary_grace_ms(&self) -> u64 {
        self.profile.launch_stage_ms + self.profile.stationary_margin_ms
    }

    fn configure(&mut self, _ctx: &mut SpawnContext<'_>) -> FlightResult<()> {
        self.profile.validate()
    }

    fn spawn_pose(&mut self, ctx: &mut SpawnContext<'_>) -> FlightResult<SpawnPose> {
        let anchor = ctx.world.actor_position(self.anchor)?;
        let position = anchor
            + halo_offset(
                &mut *ctx.rng,
                self.profile.spawn_height,
                self.profile.halo_radius,
            );
        let rotation = orientation_toward(position, anchor, self.profile.flight.forward_angle_offset)
            .unwrap_or(Vec3::ZERO);
        Ok(SpawnPose { position, rotation })
    }

    fn aim_point(&self, world: &dyn WorldServices) -> Option<Vec3> {
        world.actor_position(self.anchor).ok()
    }

    fn tune_body(&mut self, ctx: &mut SpawnContext<'_>, body: BodyHandle) -> FlightResult<()> {
        let aim = self.aim_point(&*ctx.world);
        tune_body_defaults(ctx.world, body, &self.profile.flight, aim)?;

        let forward = self.profile.flight.forward_unit();
        ctx.world
            .apply_force_relative(body, forward * self.profile.launch_impulse, None)?;
        ctx.world.mark_no_longer_needed(body)?;
        Ok(())
    }

    fn create_camera(&mut self, ctx: &mut SpawnContext<'_>, body: BodyHandle) -> Result<(), WorldError> {
        let position = ctx.world.read_kinematics(body)?.position + self.profile.tracking_offset;
        let camera = ctx.world.create_camera(position, self.profile.camera_fov)?;
        let pointed = ctx.world.point_camera_at(camera, body);
        discard_unmounted(&mut *ctx.world, camera, pointed)?;
        ctx.cameras
            .hand_off(ctx.id, camera, CameraMode::Tracking, &mut *ctx.world);
        self.tracking_camera = Some(camera);
        Ok(())
    }

    fn steer(&mut self, ctx: &mut TickContext<'_>) -> Result<(), WorldError> {
        if ctx.state.stage == Stage::Launch && ctx.age_ms >= self.profile.launch_stage_ms {
            self.enter_cruise(ctx);
        }

        let forward = self.profile.flight.forward_unit();
        ctx.world
            .apply_force_relative(ctx.body, forward * self.profile.flight.thrust, None)
    }

    fn apply_operator_input(&mut self, ctx: &mut TickContext<'_>) -> Result<(), WorldError> {
        let up_down = ctx.world.read_axis(InputAxis::UpDown).clamp(-1.0, 1.0);
        let left_right = ctx.world.read_axis(InputAxis::LeftRight).clamp(-1.0, 1.0);
        if up_down == 0.0 && left_right == 0.0 {
            return Ok(());
        }

        let force = Vec3::new(left_right, 0.0, up_down) * self.profile.correction_force;
        ctx.world.apply_force_at_center_of_mass(ctx.body, force, true)
    }

    fn run_targeting(&mut self, ctx: &mut TickContext<'_>) -> Result<(), WorldError> {
        let result = scan(
            &*ctx.world,
            &self.classifier,
            ctx.kinematics.position,
            self.profile.scan_radius,
        );

        for record in &result.markers {
            if let Some(at) = ctx.world.world_to_screen(record.position) {
                ctx.world.draw_marker(at, color_for(record.target_type));
            }
        }

        if ctx.state.stage.payload_armed() && ctx.world.is_pressed(Button::ReleasePayload) {
            self.release_payload(ctx, &result.hostiles);
        }
        Ok(())
    }

    fn collision_policy(&self, _state: &FlightState) -> CollisionPolicy {
        CollisionPolicy::Detonate
    }
}
