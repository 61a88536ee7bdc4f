//! Tests for the lifecycle skeleton, the camera slot and the driver.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use missileworks_core::config::{FlightConfig, GuidedProfile, StagedProfile};
use missileworks_core::enums::*;
use missileworks_core::events::FlightEvent;
use missileworks_core::types::{ActorRef, Kinematics, ProjectileId, RelationshipGroup};
use missileworks_core::world::*;

use crate::camera::CameraManager;
use crate::driver::{FlightDriver, LaunchOrder};
use crate::guided::GuidedController;
use crate::lifecycle::{CollisionPolicy, FlightController, FlightEnv, Projectile};
use crate::sandbox::{SandboxWorld, PLAYER_GROUP};
use crate::staged::StagedController;

const HOSTILE_GROUP: RelationshipGroup = RelationshipGroup(9);

struct Harness {
    world: SandboxWorld,
    cameras: CameraManager,
    rng: ChaCha8Rng,
    events: Vec<FlightEvent>,
    target: ActorRef,
}

impl Harness {
    fn new() -> Self {
        let mut world = SandboxWorld::new();
        let target = world.spawn_actor(Vec3::new(0.0, 2_000.0, 50.0), PLAYER_GROUP);
        Self {
            world,
            cameras: CameraManager::new(),
            rng: ChaCha8Rng::seed_from_u64(1),
            events: Vec::new(),
            target,
        }
    }

    fn env(&mut self) -> FlightEnv<'_> {
        FlightEnv {
            world: &mut self.world,
            cameras: &mut self.cameras,
            rng: &mut self.rng,
            events: &mut self.events,
        }
    }

    fn construct(&mut self, controller: Box<dyn FlightController>) -> Projectile {
        let owner = self.world.player();
        Projectile::construct(ProjectileId(1), owner, controller, &mut self.env())
    }

    fn guided(&mut self, profile: GuidedProfile) -> Projectile {
        let controller = GuidedController::new(profile, self.target)
            .with_spawn_pose(Vec3::new(0.0, 0.0, 50.0), Some(Vec3::ZERO));
        self.construct(Box::new(controller))
    }

    fn control(&mut self, projectile: &mut Projectile) -> bool {
        projectile.control(&mut self.env())
    }

    fn count(&self, pred: impl Fn(&FlightEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

// ---- Construction ----

#[test]
fn test_construct_tunes_body() {
    let mut h = Harness::new();
    let p = h.guided(GuidedProfile::default());

    assert!(p.is_active());
    assert_eq!(p.stage(), Stage::Cruise { payload_armed: false });
    let body = h.world.body(p.body().unwrap()).unwrap();
    assert!(!body.gravity);
    assert_eq!(body.max_speed, GuidedProfile::default().flight.max_cruise_speed);
    assert_eq!(h.world.live_effects(), 1);
    assert_eq!(h.count(|e| matches!(e, FlightEvent::Launched { .. })), 1);
}

#[test]
fn test_guided_default_spawn_in_front_of_operator() {
    let mut h = Harness::new();
    let controller = GuidedController::new(GuidedProfile::default(), h.target);
    let p = h.construct(Box::new(controller));

    assert_eq!(p.spawn_position(), Vec3::new(0.0, 1.0, 1.5));
    let k = h.world.read_kinematics(p.body().unwrap()).unwrap();
    assert!(k.yaw().abs() < 0.5, "target is dead ahead: yaw {}", k.yaw());
}

#[test]
fn test_spawn_failure_marks_inactive() {
    let mut h = Harness::new();
    h.world.set_reject_spawns(true);
    let mut p = h.guided(GuidedProfile::default());

    assert!(!p.is_active());
    assert!(p.body().is_none());
    assert_eq!(h.count(|e| matches!(e, FlightEvent::SpawnFailed { .. })), 1);
    assert!(!h.control(&mut p));
    assert_eq!(h.world.body_count(), 0);
}

#[test]
fn test_invalid_profile_never_spawns() {
    let mut h = Harness::new();
    let mut profile = StagedProfile::default();
    profile.launch_stage_ms = profile.flight.timeout_ms + 1;
    let operator = h.world.player();
    let p = h.construct(Box::new(StagedController::new(profile, operator)));

    assert!(!p.is_active());
    assert_eq!(h.world.body_count(), 0);
}

#[test]
fn test_guided_with_camera_never_spawns() {
    let mut h = Harness::new();
    let mut profile = GuidedProfile::default();
    profile.flight.attach_camera = true;
    let p = h.guided(profile);

    assert!(!p.is_active());
    assert_eq!(h.world.body_count(), 0);
    assert_eq!(h.world.camera_count(), 0);
    assert_eq!(h.count(|e| matches!(e, FlightEvent::SpawnFailed { .. })), 1);
}

#[test]
fn test_missing_effect_asset_is_not_fatal() {
    let mut h = Harness::new();
    h.world.make_asset_unavailable("core");
    let p = h.guided(GuidedProfile::default());

    assert!(p.is_active());
    assert_eq!(h.world.live_effects(), 0);
}

// ---- Cleanup ----

#[test]
fn test_cleanup_is_idempotent() {
    let mut h = Harness::new();
    let mut p = h.guided(GuidedProfile::default());

    assert!(!p.cleanup(&mut h.env()));
    assert!(!p.is_active());
    assert!(!p.cleanup(&mut h.env()));
    assert!(!p.is_active());

    assert_eq!(h.world.body_count(), 0);
    assert_eq!(h.world.live_effects(), 0);
    assert_eq!(h.count(|e| matches!(e, FlightEvent::CleanedUp { .. })), 1);
}

#[test]
fn test_cleanup_tolerates_body_already_gone() {
    let mut h = Harness::new();
    let mut p = h.guided(GuidedProfile::default());
    h.world.unload_body(p.body().unwrap()).unwrap();

    assert!(!p.cleanup(&mut h.env()));
    assert!(!p.is_active());
    assert_eq!(h.world.live_effects(), 0);
}

// ---- Per-tick contract ----

#[test]
fn test_timeout_detonates_then_stops() {
    let mut h = Harness::new();
    let mut profile = GuidedProfile::default();
    profile.flight.timeout_ms = 500;
    let mut p = h.guided(profile);

    h.world.wait(500);
    assert!(h.control(&mut p), "age == timeout keeps flying");

    h.world.wait(1);
    assert!(!h.control(&mut p));
    assert!(!p.is_active());
    assert_eq!(h.world.explosions().len(), 1);
    assert_eq!(h.world.explosions()[0].attributed_to, h.world.player());
    assert_eq!(h.count(|e| matches!(e, FlightEvent::Expired { .. })), 1);
    assert_eq!(h.count(|e| matches!(e, FlightEvent::Detonated { .. })), 1);
}

#[test]
fn test_body_loss_cleans_up_without_explosion() {
    let mut h = Harness::new();
    let mut p = h.guided(GuidedProfile::default());
    h.world.unload_body(p.body().unwrap()).unwrap();

    assert!(!h.control(&mut p));
    assert!(h.world.explosions().is_empty());
    assert_eq!(h.count(|e| matches!(e, FlightEvent::BodyLost { .. })), 1);
}

#[test]
fn test_collision_detonates() {
    let mut h = Harness::new();
    let mut p = h.guided(GuidedProfile::default());
    h.world.mark_collided(p.body().unwrap()).unwrap();

    assert!(!h.control(&mut p));
    assert_eq!(h.world.explosions().len(), 1);
    assert_eq!(h.world.explosions()[0].kind, ExplosionKind::PlaneRocket);
}

#[test]
fn test_weapon_damage_detonates() {
    let mut h = Harness::new();
    let mut p = h.guided(GuidedProfile::default());
    h.world.damage_body(p.body().unwrap()).unwrap();

    assert!(!h.control(&mut p));
    assert_eq!(h.world.explosions().len(), 1);
}

#[test]
fn test_dud_policy_notifies_without_explosion() {
    let mut h = Harness::new();
    let controller = GuidedController::new(GuidedProfile::default(), h.target)
        .with_spawn_pose(Vec3::new(0.0, 0.0, 50.0), None)
        .with_collision_policy(CollisionPolicy::Dud);
    let mut p = h.construct(Box::new(controller));
    h.world.mark_collided(p.body().unwrap()).unwrap();

    assert!(!h.control(&mut p));
    assert!(h.world.explosions().is_empty());
    assert_eq!(h.world.notifications(), ["Missile collided!".to_string()]);
    assert_eq!(h.count(|e| matches!(e, FlightEvent::Dud { .. })), 1);
}

#[test]
fn test_ignore_policy_keeps_flying() {
    let mut h = Harness::new();
    let controller = GuidedController::new(GuidedProfile::default(), h.target)
        .with_spawn_pose(Vec3::new(0.0, 0.0, 50.0), None)
        .with_collision_policy(CollisionPolicy::Ignore);
    let mut p = h.construct(Box::new(controller));
    h.world.mark_collided(p.body().unwrap()).unwrap();

    assert!(h.control(&mut p));
    assert!(p.is_active());
}

#[test]
fn test_stall_only_counts_after_grace() {
    let mut h = Harness::new();
    let mut p = h.guided(GuidedProfile::default());

    assert!(h.control(&mut p), "at rest right after spawn is fine");

    let body = p.body().unwrap();
    h.world.set_kinematics(body, Kinematics::default()).unwrap();
    h.world.wait(GuidedProfile::default().stationary_grace_ms + 1);
    assert!(!h.control(&mut p));
    assert_eq!(h.world.explosions().len(), 1);
}

#[test]
fn test_staged_grace_covers_launch_stage() {
    let mut h = Harness::new();
    let operator = h.world.player();
    let mut p = h.construct(Box::new(StagedController::new(StagedProfile::default(), operator)));
    let body = p.body().unwrap();
    let position = h.world.read_kinematics(body).unwrap().position;

    h.world
        .set_kinematics(
            body,
            Kinematics {
                position,
                ..Kinematics::default()
            },
        )
        .unwrap();
    h.world.wait(1_200);
    assert!(h.control(&mut p), "guided would stall here; staged must not");
}

#[test]
fn test_debug_readout_shows_help_text() {
    let mut h = Harness::new();
    let mut profile = GuidedProfile::default();
    profile.flight.debug_readout = true;
    let mut p = h.guided(profile);

    assert!(h.control(&mut p));
    let text = h.world.help_text().unwrap();
    assert!(text.starts_with("Position: X:0 Y:0 Z:0"), "{text}");
}

// ---- Camera slot ----

#[test]
fn test_hand_off_overrides_previous_owner() {
    let mut world = SandboxWorld::new();
    let mut cameras = CameraManager::new();
    let a = world.create_camera(Vec3::ZERO, 60.0).unwrap();
    let b = world.create_camera(Vec3::ONE, 60.0).unwrap();

    cameras.hand_off(ProjectileId(1), a, CameraMode::Tracking, &mut world);
    cameras.hand_off(ProjectileId(2), b, CameraMode::BodyMounted, &mut world);

    assert_eq!(world.rendering_camera(), Some(b));
    assert_eq!(cameras.mode_of(ProjectileId(1)), None);
    assert_eq!(cameras.mode_of(ProjectileId(2)), Some(CameraMode::BodyMounted));
}

#[test]
fn test_release_by_last_holder_destroys_all_script_cameras() {
    let mut world = SandboxWorld::new();
    let mut cameras = CameraManager::new();
    let a = world.create_camera(Vec3::ZERO, 60.0).unwrap();
    cameras.hand_off(ProjectileId(1), a, CameraMode::Tracking, &mut world);

    cameras.release(ProjectileId(1), &mut world);
    assert_eq!(world.rendering_camera(), None);
    assert_eq!(world.camera_count(), 0);
    assert!(cameras.active().is_none());

    cameras.release(ProjectileId(1), &mut world);
    assert_eq!(world.rendering_camera(), None);
}

#[test]
fn test_release_by_non_holder_keeps_active_camera() {
    let mut world = SandboxWorld::new();
    let mut cameras = CameraManager::new();
    let a = world.create_camera(Vec3::ZERO, 60.0).unwrap();
    let b = world.create_camera(Vec3::ONE, 60.0).unwrap();
    cameras.hand_off(ProjectileId(1), a, CameraMode::Tracking, &mut world);
    cameras.hand_off(ProjectileId(2), b, CameraMode::Tracking, &mut world);

    cameras.release(ProjectileId(1), &mut world);

    assert_eq!(world.rendering_camera(), Some(b));
    assert!(world.camera(a).is_none());
    assert!(world.camera(b).is_some());
    assert!(cameras.cameras_of(ProjectileId(1)).is_empty());
}

#[test]
fn test_unpointable_tracking_camera_is_destroyed() {
    let mut h = Harness::new();
    h.world.set_reject_camera_mounts(true);
    let operator = h.world.player();
    let mut p = h.construct(Box::new(StagedController::new(StagedProfile::default(), operator)));

    assert!(p.is_active(), "camera failures are cosmetic");
    assert_eq!(h.world.camera_count(), 0);
    assert_eq!(h.world.rendering_camera(), None);
    assert_eq!(h.cameras.mode_of(ProjectileId(1)), None);
    assert!(h.control(&mut p));
}

#[test]
fn test_unmountable_body_camera_is_destroyed() {
    let mut h = Harness::new();
    let operator = h.world.player();
    let mut p = h.construct(Box::new(StagedController::new(StagedProfile::default(), operator)));
    assert_eq!(h.world.camera_count(), 1);

    h.world.set_reject_camera_mounts(true);
    h.world.wait(StagedProfile::default().launch_stage_ms);
    assert!(h.control(&mut p));

    assert!(p.can_control(), "hand-over still happens without the body camera");
    assert_eq!(h.world.camera_count(), 1, "only the tracking camera is left");
    assert_eq!(h.cameras.mode_of(ProjectileId(1)), Some(CameraMode::Tracking));

    p.cleanup(&mut h.env());
    assert_eq!(h.world.camera_count(), 0);
}

// ---- Driver ----

fn staged_launch_position(seed: u64) -> Vec3 {
    let mut world = SandboxWorld::new();
    let mut driver = FlightDriver::new(FlightConfig {
        seed,
        ..Default::default()
    });
    driver.launch(LaunchOrder::Staged, &mut world);
    driver
        .tick(&mut world)
        .into_iter()
        .find_map(|e| match e {
            FlightEvent::Launched { position, .. } => Some(position),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_determinism_same_seed() {
    assert_eq!(staged_launch_position(12345), staged_launch_position(12345));
}

#[test]
fn test_determinism_different_seeds() {
    let positions: Vec<Vec3> = (0..8).map(staged_launch_position).collect();
    assert!(positions.windows(2).any(|w| w[0] != w[1]));
    for p in positions {
        assert_eq!(p.z, StagedProfile::default().spawn_height);
    }
}

#[test]
fn test_snapshots_identical_for_same_seed() {
    let run = || {
        let mut world = SandboxWorld::new();
        let mut driver = FlightDriver::new(FlightConfig::default());
        driver.launch(LaunchOrder::Staged, &mut world);
        let mut frames = Vec::new();
        for _ in 0..60 {
            driver.tick(&mut world);
            frames.push(serde_json::to_string(&driver.snapshots(world.game_time_ms())).unwrap());
            world.step();
        }
        frames
    };
    assert_eq!(run(), run());
}

#[test]
fn test_launches_are_owned_by_operator() {
    let mut world = SandboxWorld::new();
    let target = world.spawn_actor(Vec3::new(0.0, 500.0, 1.5), HOSTILE_GROUP);
    let mut driver = FlightDriver::new(FlightConfig::default());

    let guided = driver.launch(LaunchOrder::Guided { target, spawn: None }, &mut world);
    let staged = driver.launch(LaunchOrder::Staged, &mut world);

    let operator = world.player();
    assert_eq!(driver.get(guided).unwrap().owner(), operator);
    assert_eq!(driver.get(staged).unwrap().owner(), operator);
}

#[test]
fn test_spawn_failure_does_not_affect_siblings() {
    let mut world = SandboxWorld::new();
    let target = world.spawn_actor(Vec3::new(0.0, 500.0, 1.5), HOSTILE_GROUP);
    let mut driver = FlightDriver::new(FlightConfig::default());

    let first = driver.launch(LaunchOrder::Guided { target, spawn: None }, &mut world);
    world.set_reject_spawns(true);
    let second = driver.launch(LaunchOrder::Staged, &mut world);
    world.set_reject_spawns(false);

    assert_ne!(first, second);
    assert!(!driver.get(second).unwrap().is_active());

    let events = driver.tick(&mut world);
    assert!(events
        .iter()
        .any(|e| matches!(e, FlightEvent::SpawnFailed { id, .. } if *id == second)));
    assert_eq!(driver.active_count(), 1);
    assert!(driver.get(first).is_some());
    assert!(driver.get(second).is_none());
}

#[test]
fn test_shutdown_releases_everything() {
    let mut world = SandboxWorld::new();
    let mut driver = FlightDriver::new(FlightConfig::default());
    driver.launch(LaunchOrder::Staged, &mut world);
    driver.tick(&mut world);
    assert_eq!(world.camera_count(), 1);

    let events = driver.shutdown(&mut world);
    assert!(events.iter().any(|e| matches!(e, FlightEvent::CleanedUp { .. })));
    assert_eq!(driver.active_count(), 0);
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.camera_count(), 0);
    assert_eq!(world.rendering_camera(), None);
}
