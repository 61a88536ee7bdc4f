//! World Services boundary.
//!
//! Everything the flight logic needs from the host: bodies, actors, cameras,
//! effects, presentation, input and the game clock. Traits are object-safe;
//! flight code works against `&mut dyn WorldServices`.

use glam::Vec3;

use crate::config::ExplosionProfile;
use crate::enums::{Button, InputAxis, Standing};
use crate::error::WorldError;
use crate::types::*;

/// Game clock.
pub trait Clock {
    /// Monotonic game time in milliseconds.
    fn game_time_ms(&self) -> u64;

    /// Block the calling script for a fixed duration (game time keeps running).
    fn wait(&mut self, ms: u64);
}

/// Physical bodies and explosions.
pub trait BodyServices {
    fn spawn_body(
        &mut self,
        model: ModelId,
        position: Vec3,
        rotation: Vec3,
    ) -> Result<BodyHandle, WorldError>;
    fn destroy_body(&mut self, body: BodyHandle) -> Result<(), WorldError>;
    fn body_exists(&self, body: BodyHandle) -> bool;

    fn set_gravity_enabled(&mut self, body: BodyHandle, enabled: bool) -> Result<(), WorldError>;
    fn set_max_speed(&mut self, body: BodyHandle, speed: f32) -> Result<(), WorldError>;
    fn set_rotation(&mut self, body: BodyHandle, rotation: Vec3) -> Result<(), WorldError>;
    /// Let the host reclaim the body once it is out of range.
    fn mark_no_longer_needed(&mut self, body: BodyHandle) -> Result<(), WorldError>;

    /// Body-relative force, optionally applied at a body-relative offset.
    fn apply_force_relative(
        &mut self,
        body: BodyHandle,
        force: Vec3,
        offset: Option<Vec3>,
    ) -> Result<(), WorldError>;
    /// Force through the center of mass; no torque.
    fn apply_force_at_center_of_mass(
        &mut self,
        body: BodyHandle,
        force: Vec3,
        relative: bool,
    ) -> Result<(), WorldError>;

    fn read_kinematics(&self, body: BodyHandle) -> Result<Kinematics, WorldError>;
    fn has_collided(&self, body: BodyHandle) -> bool;
    fn was_damaged_by_weapon(&self, body: BodyHandle) -> bool;
    fn current_speed(&self, body: BodyHandle) -> f32;

    fn trigger_explosion(
        &mut self,
        position: Vec3,
        profile: &ExplosionProfile,
        attributed_to: ActorRef,
    );
}

/// Actors and their relationships.
pub trait ActorServices {
    /// The local operator.
    fn player(&self) -> ActorRef;
    fn actor_exists(&self, actor: ActorRef) -> bool;
    fn actor_position(&self, actor: ActorRef) -> Result<Vec3, WorldError>;
    /// Live humanoid actors within `radius` of `vantage`.
    fn scan_actors_near(&self, vantage: Vec3, radius: f32) -> Vec<ActorRef>;
    fn relationship_between(&self, a: ActorRef, b: ActorRef) -> Standing;
    fn is_dead(&self, actor: ActorRef) -> bool;
    fn is_in_combat(&self, actor: ActorRef) -> bool;
    fn relationship_group(&self, actor: ActorRef) -> RelationshipGroup;
    fn set_group_relationship(
        &mut self,
        group: RelationshipGroup,
        other: RelationshipGroup,
        standing: Standing,
    );
}

/// Script cameras and the rendering-camera slot.
pub trait CameraServices {
    fn create_camera(&mut self, position: Vec3, fov: f32) -> Result<CameraHandle, WorldError>;
    fn point_camera_at(&mut self, camera: CameraHandle, body: BodyHandle)
        -> Result<(), WorldError>;
    fn attach_camera_to(
        &mut self,
        camera: CameraHandle,
        body: BodyHandle,
        offset: Vec3,
    ) -> Result<(), WorldError>;
    /// `None` restores the default gameplay camera.
    fn set_rendering_camera(&mut self, camera: Option<CameraHandle>);
    fn destroy_camera(&mut self, camera: CameraHandle) -> Result<(), WorldError>;
    fn destroy_all_script_cameras(&mut self);
}

/// Particle effects.
pub trait EffectServices {
    /// Request (and load if needed) an effect asset.
    fn request_effect_asset(&mut self, asset: &str) -> Result<EffectHandle, WorldError>;
    fn attach_effect(
        &mut self,
        effect: EffectHandle,
        body: BodyHandle,
        name: &str,
        offset: Vec3,
        scale: f32,
    ) -> Result<(), WorldError>;
    fn release_effect(&mut self, effect: EffectHandle) -> Result<(), WorldError>;
}

/// Screen-space output.
pub trait PresentationServices {
    /// `None` when the point is off screen.
    fn world_to_screen(&self, position: Vec3) -> Option<ScreenPoint>;
    fn draw_marker(&mut self, at: ScreenPoint, color: Rgba);
    fn fade_out(&mut self, ms: u64);
    fn fade_in(&mut self, ms: u64);
    fn show_help_text(&mut self, text: &str);
    fn notify(&mut self, text: &str);
}

/// Operator input.
pub trait InputServices {
    /// Axis deflection in [-1, 1].
    fn read_axis(&self, axis: InputAxis) -> f32;
    fn is_pressed(&self, button: Button) -> bool;
}

/// Everything the flight logic consumes.
pub trait WorldServices:
    Clock
    + BodyServices
    + ActorServices
    + CameraServices
    + EffectServices
    + PresentationServices
    + InputServices
{
}

impl<T> WorldServices for T where
    T: Clock
        + BodyServices
        + ActorServices
        + CameraServices
        + EffectServices
        + PresentationServices
        + InputServices
        + ?Sized
{
}
