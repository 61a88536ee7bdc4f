//! Headless World Services host.
//!
//! Bodies, actors and cameras are hecs entities; handles are entity bits.
//! Physics is deliberately small: forces are per-tick impulses on a unit
//! mass, off-center forces add yaw/pitch rate through a fixed inertia, and
//! `step` integrates, damps rotation, caps speed and flags contacts with the
//! ground plane or any actor. Every presentation call is recorded so tests
//! can assert on it.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec3;
use hecs::{Entity, World};
use tracing::trace;

use missileworks_core::config::ExplosionProfile;
use missileworks_core::constants::{GRAVITY, TICK_MS};
use missileworks_core::enums::{Button, ExplosionKind, InputAxis, Standing};
use missileworks_core::error::WorldError;
use missileworks_core::math::{local_to_world, normalize_degrees};
use missileworks_core::types::*;
use missileworks_core::world::*;

const BODY_MASS: f32 = 1.0;
/// Degrees per second of rotation rate gained per unit of torque.
const BODY_INERTIA: f32 = 0.125;
/// Fraction of rotation rate kept per step.
const ANGULAR_DAMPING: f32 = 0.85;
const GROUND_Z: f32 = 0.0;
/// Bodies closer than this to an actor count as a hit.
const CONTACT_RADIUS: f32 = 1.0;
/// Meters covered by the full width of the top-down screen.
const SCREEN_SPAN: f32 = 500.0;

/// Physical body component.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxBody {
    pub model: ModelId,
    pub kinematics: Kinematics,
    pub max_speed: f32,
    pub gravity: bool,
    pub collided: bool,
    pub damaged: bool,
    pub no_longer_needed: bool,
}

/// Actor component.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxActor {
    pub position: Vec3,
    pub group: RelationshipGroup,
    pub dead: bool,
    pub in_combat: bool,
}

/// Script camera component.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxCamera {
    pub position: Vec3,
    pub fov: f32,
    pub pointed_at: Option<BodyHandle>,
    pub attached_to: Option<(BodyHandle, Vec3)>,
}

/// Explosion requested through [`BodyServices::trigger_explosion`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionRecord {
    pub position: Vec3,
    pub kind: ExplosionKind,
    pub attributed_to: ActorRef,
    pub at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    Out(u64),
    In(u64),
}

/// Group the sandbox operator belongs to.
pub const PLAYER_GROUP: RelationshipGroup = RelationshipGroup(1);

pub struct SandboxWorld {
    world: World,
    now_ms: u64,
    step_ms: u64,
    player: ActorRef,
    relationships: HashMap<(RelationshipGroup, RelationshipGroup), Standing>,
    rendering_camera: Option<CameraHandle>,
    effects: BTreeMap<EffectHandle, String>,
    attached_effects: Vec<(EffectHandle, BodyHandle)>,
    unavailable_assets: HashSet<String>,
    next_effect: u64,
    axes: HashMap<InputAxis, f32>,
    pressed: HashSet<Button>,
    reject_spawns: bool,
    reject_camera_mounts: bool,
    explosions: Vec<ExplosionRecord>,
    markers: Vec<(ScreenPoint, Rgba)>,
    fades: Vec<Fade>,
    help_text: Option<String>,
    notifications: Vec<String>,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxWorld {
    /// Empty world with the operator standing at the origin.
    pub fn new() -> Self {
        let mut world = World::new();
        let player = world.spawn((SandboxActor {
            position: Vec3::ZERO,
            group: PLAYER_GROUP,
            dead: false,
            in_combat: false,
        },));

        Self {
            world,
            now_ms: 0,
            step_ms: TICK_MS,
            player: ActorRef(player.to_bits().get()),
            relationships: HashMap::new(),
            rendering_camera: None,
            effects: BTreeMap::new(),
            attached_effects: Vec::new(),
            unavailable_assets: HashSet::new(),
            next_effect: 0,
            axes: HashMap::new(),
            pressed: HashSet::new(),
            reject_spawns: false,
            reject_camera_mounts: false,
            explosions: Vec::new(),
            markers: Vec::new(),
            fades: Vec::new(),
            help_text: None,
            notifications: Vec::new(),
        }
    }

    /// Milliseconds advanced by each [`SandboxWorld::step`].
    pub fn with_step_ms(mut self, step_ms: u64) -> Self {
        self.step_ms = step_ms;
        self
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    // ---- Scripting ----

    pub fn spawn_actor(&mut self, position: Vec3, group: RelationshipGroup) -> ActorRef {
        let entity = self.world.spawn((SandboxActor {
            position,
            group,
            dead: false,
            in_combat: false,
        },));
        ActorRef(entity.to_bits().get())
    }

    pub fn move_actor(&mut self, actor: ActorRef, position: Vec3) -> Result<(), WorldError> {
        self.actor_mut(actor)?.position = position;
        Ok(())
    }

    pub fn set_dead(&mut self, actor: ActorRef, dead: bool) -> Result<(), WorldError> {
        self.actor_mut(actor)?.dead = dead;
        Ok(())
    }

    pub fn set_in_combat(&mut self, actor: ActorRef, in_combat: bool) -> Result<(), WorldError> {
        self.actor_mut(actor)?.in_combat = in_combat;
        Ok(())
    }

    /// Remove an actor from the world, e.g. a target that despawned.
    pub fn despawn_actor(&mut self, actor: ActorRef) -> Result<(), WorldError> {
        let entity = Entity::from_bits(actor.0)
            .filter(|e| self.world.satisfies::<&SandboxActor>(*e).unwrap_or(false))
            .ok_or(WorldError::ActorNotFound(actor))?;
        self.world
            .despawn(entity)
            .map_err(|_| WorldError::ActorNotFound(actor))
    }

    pub fn set_axis(&mut self, axis: InputAxis, value: f32) {
        self.axes.insert(axis, value);
    }

    pub fn press(&mut self, button: Button) {
        self.pressed.insert(button);
    }

    pub fn release(&mut self, button: Button) {
        self.pressed.remove(&button);
    }

    /// Make every following `spawn_body` fail.
    pub fn set_reject_spawns(&mut self, reject: bool) {
        self.reject_spawns = reject;
    }

    /// Make every following `point_camera_at` / `attach_camera_to` fail.
    pub fn set_reject_camera_mounts(&mut self, reject: bool) {
        self.reject_camera_mounts = reject;
    }

    pub fn make_asset_unavailable(&mut self, asset: &str) {
        self.unavailable_assets.insert(asset.to_string());
    }

    pub fn mark_collided(&mut self, body: BodyHandle) -> Result<(), WorldError> {
        self.body_mut(body)?.collided = true;
        Ok(())
    }

    pub fn damage_body(&mut self, body: BodyHandle) -> Result<(), WorldError> {
        self.body_mut(body)?.damaged = true;
        Ok(())
    }

    /// Host-side unload: the body vanishes without the projectile asking.
    pub fn unload_body(&mut self, body: BodyHandle) -> Result<(), WorldError> {
        let entity = self.body_entity(body)?;
        self.world
            .despawn(entity)
            .map_err(|_| WorldError::BodyNotFound(body))
    }

    /// Overwrite a body's kinematic state.
    pub fn set_kinematics(&mut self, body: BodyHandle, kinematics: Kinematics) -> Result<(), WorldError> {
        self.body_mut(body)?.kinematics = kinematics;
        Ok(())
    }

    // ---- Inspection ----

    pub fn body(&self, body: BodyHandle) -> Option<SandboxBody> {
        let entity = self.body_entity(body).ok()?;
        self.world
            .get::<&SandboxBody>(entity)
            .ok()
            .map(|b| (*b).clone())
    }

    pub fn body_count(&self) -> usize {
        self.world.query::<&SandboxBody>().iter().count()
    }

    pub fn camera(&self, camera: CameraHandle) -> Option<SandboxCamera> {
        let entity = Entity::from_bits(camera.0)?;
        self.world
            .get::<&SandboxCamera>(entity)
            .ok()
            .map(|c| (*c).clone())
    }

    pub fn camera_count(&self) -> usize {
        self.world.query::<&SandboxCamera>().iter().count()
    }

    pub fn rendering_camera(&self) -> Option<CameraHandle> {
        self.rendering_camera
    }

    pub fn live_effects(&self) -> usize {
        self.effects.len()
    }

    pub fn explosions(&self) -> &[ExplosionRecord] {
        &self.explosions
    }

    /// Markers drawn since the last step.
    pub fn markers(&self) -> &[(ScreenPoint, Rgba)] {
        &self.markers
    }

    pub fn fades(&self) -> &[Fade] {
        &self.fades
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    // ---- Integration ----

    /// Advance physics by one step and close the frame.
    pub fn step(&mut self) {
        let dt = self.step_ms as f32 / 1000.0;

        let actors: Vec<Vec3> = self
            .world
            .query::<&SandboxActor>()
            .iter()
            .map(|(_, a)| a.position)
            .collect();

        for (entity, body) in self.world.query_mut::<&mut SandboxBody>() {
            let k = &mut body.kinematics;
            if body.gravity {
                k.velocity.z -= GRAVITY * dt;
            }
            k.velocity = k.velocity.clamp_length_max(body.max_speed);
            k.position += k.velocity * dt;

            k.angular_velocity *= ANGULAR_DAMPING;
            let r = k.rotation + k.angular_velocity * dt;
            k.rotation = Vec3::new(normalize_degrees(r.x), normalize_degrees(r.y), normalize_degrees(r.z));

            if k.position.z <= GROUND_Z {
                k.position.z = GROUND_Z;
                body.collided = true;
                trace!(?entity, "ground contact");
            }
            if actors
                .iter()
                .any(|a| a.distance(k.position) <= CONTACT_RADIUS)
            {
                body.collided = true;
                trace!(?entity, "actor contact");
            }
        }

        self.now_ms += self.step_ms;
        self.markers.clear();
        self.help_text = None;
    }

    // ---- Lookups ----

    fn body_entity(&self, body: BodyHandle) -> Result<Entity, WorldError> {
        Entity::from_bits(body.0)
            .filter(|e| self.world.satisfies::<&SandboxBody>(*e).unwrap_or(false))
            .ok_or(WorldError::BodyNotFound(body))
    }

    fn body_mut(&mut self, body: BodyHandle) -> Result<hecs::RefMut<'_, SandboxBody>, WorldError> {
        let entity = self.body_entity(body)?;
        self.world
            .get::<&mut SandboxBody>(entity)
            .map_err(|_| WorldError::BodyNotFound(body))
    }

    fn body_ref(&self, body: BodyHandle) -> Result<hecs::Ref<'_, SandboxBody>, WorldError> {
        let entity = self.body_entity(body)?;
        self.world
            .get::<&SandboxBody>(entity)
            .map_err(|_| WorldError::BodyNotFound(body))
    }

    fn actor_ref(&self, actor: ActorRef) -> Result<hecs::Ref<'_, SandboxActor>, WorldError> {
        let entity = Entity::from_bits(actor.0).ok_or(WorldError::ActorNotFound(actor))?;
        self.world
            .get::<&SandboxActor>(entity)
            .map_err(|_| WorldError::ActorNotFound(actor))
    }

    fn actor_mut(&mut self, actor: ActorRef) -> Result<hecs::RefMut<'_, SandboxActor>, WorldError> {
        let entity = Entity::from_bits(actor.0).ok_or(WorldError::ActorNotFound(actor))?;
        self.world
            .get::<&mut SandboxActor>(entity)
            .map_err(|_| WorldError::ActorNotFound(actor))
    }

    fn camera_mut(&mut self, camera: CameraHandle) -> Result<hecs::RefMut<'_, SandboxCamera>, WorldError> {
        let entity = Entity::from_bits(camera.0).ok_or(WorldError::CameraNotFound(camera))?;
        self.world
            .get::<&mut SandboxCamera>(entity)
            .map_err(|_| WorldError::CameraNotFound(camera))
    }

    fn camera_position(&self, camera: CameraHandle) -> Option<Vec3> {
        let cam = self.camera(camera)?;
        match cam.attached_to {
            Some((body, offset)) => self
                .body_ref(body)
                .ok()
                .map(|b| b.kinematics.position + local_to_world(b.kinematics.rotation, offset)),
            None => Some(cam.position),
        }
    }
}

impl Clock for SandboxWorld {
    fn game_time_ms(&self) -> u64 {
        self.now_ms
    }

    fn wait(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl BodyServices for SandboxWorld {
    fn spawn_body(&mut self, model: ModelId, position: Vec3, rotation: Vec3) -> Result<BodyHandle, WorldError> {
        if self.reject_spawns {
            return Err(WorldError::SpawnRejected(model));
        }
        let entity = self.world.spawn((SandboxBody {
            model,
            kinematics: Kinematics {
                position,
                rotation,
                ..Kinematics::default()
            },
            max_speed: f32::MAX,
            gravity: true,
            collided: false,
            damaged: false,
            no_longer_needed: false,
        },));
        Ok(BodyHandle(entity.to_bits().get()))
    }

    fn destroy_body(&mut self, body: BodyHandle) -> Result<(), WorldError> {
        self.unload_body(body)
    }

    fn body_exists(&self, body: BodyHandle) -> bool {
        self.body_entity(body).is_ok()
    }

    fn set_gravity_enabled(&mut self, body: BodyHandle, enabled: bool) -> Result<(), WorldError> {
        self.body_mut(body)?.gravity = enabled;
        Ok(())
    }

    fn set_max_speed(&mut self, body: BodyHandle, speed: f32) -> Result<(), WorldError> {
        self.body_mut(body)?.max_speed = speed;
        Ok(())
    }

    fn set_rotation(&mut self, body: BodyHandle, rotation: Vec3) -> Result<(), WorldError> {
        self.body_mut(body)?.kinematics.rotation = rotation;
        Ok(())
    }

    fn mark_no_longer_needed(&mut self, body: BodyHandle) -> Result<(), WorldError> {
        self.body_mut(body)?.no_longer_needed = true;
        Ok(())
    }

    fn apply_force_relative(
        &mut self,
        body: BodyHandle,
        force: Vec3,
        offset: Option<Vec3>,
    ) -> Result<(), WorldError> {
        let mut b = self.body_mut(body)?;
        let k = &mut b.kinematics;
        k.velocity += local_to_world(k.rotation, force) / BODY_MASS;
        if let Some(offset) = offset {
            k.angular_velocity += offset.cross(force) / BODY_INERTIA;
        }
        Ok(())
    }

    fn apply_force_at_center_of_mass(
        &mut self,
        body: BodyHandle,
        force: Vec3,
        relative: bool,
    ) -> Result<(), WorldError> {
        let mut b = self.body_mut(body)?;
        let k = &mut b.kinematics;
        let world_force = if relative {
            local_to_world(k.rotation, force)
        } else {
            force
        };
        k.velocity += world_force / BODY_MASS;
        Ok(())
    }

    fn read_kinematics(&self, body: BodyHandle) -> Result<Kinematics, WorldError> {
        Ok(self.body_ref(body)?.kinematics)
    }

    fn has_collided(&self, body: BodyHandle) -> bool {
        self.body_ref(body).is_ok_and(|b| b.collided)
    }

    fn was_damaged_by_weapon(&self, body: BodyHandle) -> bool {
        self.body_ref(body).is_ok_and(|b| b.damaged)
    }

    fn current_speed(&self, body: BodyHandle) -> f32 {
        self.body_ref(body).map_or(0.0, |b| b.kinematics.speed())
    }

    fn trigger_explosion(&mut self, position: Vec3, profile: &ExplosionProfile, attributed_to: ActorRef) {
        self.explosions.push(ExplosionRecord {
            position,
            kind: profile.kind,
            attributed_to,
            at_ms: self.now_ms,
        });
    }
}

impl ActorServices for SandboxWorld {
    fn player(&self) -> ActorRef {
        self.player
    }

    fn actor_exists(&self, actor: ActorRef) -> bool {
        self.actor_ref(actor).is_ok()
    }

    fn actor_position(&self, actor: ActorRef) -> Result<Vec3, WorldError> {
        Ok(self.actor_ref(actor)?.position)
    }

    fn scan_actors_near(&self, vantage: Vec3, radius: f32) -> Vec<ActorRef> {
        let mut found: Vec<ActorRef> = self
            .world
            .query::<&SandboxActor>()
            .iter()
            .filter(|(_, a)| a.position.distance(vantage) <= radius)
            .map(|(e, _)| ActorRef(e.to_bits().get()))
            .collect();
        found.sort_by_key(|a| a.0);
        found
    }

    fn relationship_between(&self, a: ActorRef, b: ActorRef) -> Standing {
        let key = (self.relationship_group(a), self.relationship_group(b));
        self.relationships.get(&key).copied().unwrap_or_default()
    }

    fn is_dead(&self, actor: ActorRef) -> bool {
        self.actor_ref(actor).is_ok_and(|a| a.dead)
    }

    fn is_in_combat(&self, actor: ActorRef) -> bool {
        self.actor_ref(actor).is_ok_and(|a| a.in_combat)
    }

    fn relationship_group(&self, actor: ActorRef) -> RelationshipGroup {
        self.actor_ref(actor)
            .map_or(RelationshipGroup(0), |a| a.group)
    }

    fn set_group_relationship(&mut self, group: RelationshipGroup, other: RelationshipGroup, standing: Standing) {
        self.relationships.insert((group, other), standing);
    }
}

impl CameraServices for SandboxWorld {
    fn create_camera(&mut self, position: Vec3, fov: f32) -> Result<CameraHandle, WorldError> {
        let entity = self.world.spawn((SandboxCamera {
            position,
            fov,
            pointed_at: None,
            attached_to: None,
        },));
        Ok(CameraHandle(entity.to_bits().get()))
    }

    fn point_camera_at(&mut self, camera: CameraHandle, body: BodyHandle) -> Result<(), WorldError> {
        self.body_entity(body)?;
        if self.reject_camera_mounts {
            return Err(WorldError::CameraNotFound(camera));
        }
        self.camera_mut(camera)?.pointed_at = Some(body);
        Ok(())
    }

    fn attach_camera_to(&mut self, camera: CameraHandle, body: BodyHandle, offset: Vec3) -> Result<(), WorldError> {
        self.body_entity(body)?;
        if self.reject_camera_mounts {
            return Err(WorldError::CameraNotFound(camera));
        }
        self.camera_mut(camera)?.attached_to = Some((body, offset));
        Ok(())
    }

    fn set_rendering_camera(&mut self, camera: Option<CameraHandle>) {
        self.rendering_camera = camera;
    }

    fn destroy_camera(&mut self, camera: CameraHandle) -> Result<(), WorldError> {
        let entity = Entity::from_bits(camera.0).ok_or(WorldError::CameraNotFound(camera))?;
        if !self.world.satisfies::<&SandboxCamera>(entity).unwrap_or(false) {
            return Err(WorldError::CameraNotFound(camera));
        }
        self.world
            .despawn(entity)
            .map_err(|_| WorldError::CameraNotFound(camera))?;
        if self.rendering_camera == Some(camera) {
            self.rendering_camera = None;
        }
        Ok(())
    }

    fn destroy_all_script_cameras(&mut self) {
        let cameras: Vec<Entity> = self
            .world
            .query::<&SandboxCamera>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        for entity in cameras {
            let _ = self.world.despawn(entity);
        }
        self.rendering_camera = None;
    }
}

impl EffectServices for SandboxWorld {
    fn request_effect_asset(&mut self, asset: &str) -> Result<EffectHandle, WorldError> {
        if self.unavailable_assets.contains(asset) {
            return Err(WorldError::AssetUnavailable(asset.to_string()));
        }
        self.next_effect += 1;
        let effect = EffectHandle(self.next_effect);
        self.effects.insert(effect, asset.to_string());
        Ok(effect)
    }

    fn attach_effect(
        &mut self,
        effect: EffectHandle,
        body: BodyHandle,
        _name: &str,
        _offset: Vec3,
        _scale: f32,
    ) -> Result<(), WorldError> {
        if !self.effects.contains_key(&effect) {
            return Err(WorldError::EffectNotFound(effect));
        }
        self.body_entity(body)?;
        self.attached_effects.push((effect, body));
        Ok(())
    }

    fn release_effect(&mut self, effect: EffectHandle) -> Result<(), WorldError> {
        self.effects
            .remove(&effect)
            .ok_or(WorldError::EffectNotFound(effect))?;
        self.attached_effects.retain(|(e, _)| *e != effect);
        Ok(())
    }
}

impl PresentationServices for SandboxWorld {
    /// Top-down projection centered on the rendering camera (or the origin).
    fn world_to_screen(&self, position: Vec3) -> Option<ScreenPoint> {
        let center = self
            .rendering_camera
            .and_then(|c| self.camera_position(c))
            .unwrap_or(Vec3::ZERO);
        let x = 0.5 + (position.x - center.x) / SCREEN_SPAN;
        let y = 0.5 - (position.y - center.y) / SCREEN_SPAN;
        ((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y)).then(|| ScreenPoint::new(x, y))
    }

    fn draw_marker(&mut self, at: ScreenPoint, color: Rgba) {
        self.markers.push((at, color));
    }

    fn fade_out(&mut self, ms: u64) {
        self.fades.push(Fade::Out(ms));
    }

    fn fade_in(&mut self, ms: u64) {
        self.fades.push(Fade::In(ms));
    }

    fn show_help_text(&mut self, text: &str) {
        self.help_text = Some(text.to_string());
    }

    fn notify(&mut self, text: &str) {
        self.notifications.push(text.to_string());
    }
}

impl InputServices for SandboxWorld {
    fn read_axis(&self, axis: InputAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}
