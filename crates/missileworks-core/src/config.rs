//! Runtime configuration profiles.
//!
//! Profiles are fixed at construction time. Every field has a default, so a
//! JSON document only needs to name what it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ExplosionKind;
use crate::error::{FlightError, FlightResult};
use crate::types::ModelId;

/// Explosion requested from the host on detonation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionProfile {
    pub kind: ExplosionKind,
    pub damage_scale: f32,
    pub camera_shake: f32,
    pub audible: bool,
}

impl Default for ExplosionProfile {
    fn default() -> Self {
        Self {
            kind: ExplosionKind::PlaneRocket,
            damage_scale: DEFAULT_EXPLOSION_DAMAGE_SCALE,
            camera_shake: DEFAULT_EXPLOSION_CAMERA_SHAKE,
            audible: true,
        }
    }
}

/// Particle effect attached to the body after spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    /// Asset dictionary to request.
    pub asset: String,
    /// Effect name inside the asset.
    pub name: String,
    /// Attachment point along the forward vector.
    pub forward_offset: f32,
    pub scale: f32,
}

/// Per-projectile flight configuration shared by every kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightProfile {
    pub model: ModelId,
    pub max_cruise_speed: f32,
    pub max_boost_speed: f32,
    /// Body-local direction of the nose. Some models are mounted backwards.
    pub forward: Vec3,
    /// Euler offset (pitch, roll, yaw degrees) added when orienting the body.
    pub forward_angle_offset: Vec3,
    /// Forward force applied every tick.
    pub thrust: f32,
    pub explosion: ExplosionProfile,
    pub timeout_ms: u64,
    pub attach_camera: bool,
    pub effect: Option<EffectSpec>,
    /// Show the kinematic help-text readout every tick.
    pub debug_readout: bool,
}

impl Default for FlightProfile {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL,
            max_cruise_speed: DEFAULT_MAX_CRUISE_SPEED,
            max_boost_speed: DEFAULT_MAX_BOOST_SPEED,
            forward: Vec3::Y,
            forward_angle_offset: Vec3::ZERO,
            thrust: 0.0,
            explosion: ExplosionProfile::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            attach_camera: false,
            effect: None,
            debug_readout: false,
        }
    }
}

impl FlightProfile {
    /// Base defaults with the guided deltas applied.
    pub fn guided() -> Self {
        Self {
            model: SMALL_ROCKET_MODEL,
            thrust: GUIDED_THRUST,
            timeout_ms: GUIDED_TIMEOUT_MS,
            effect: Some(EffectSpec {
                asset: "core".into(),
                name: "exp_grd_rpg_trail".into(),
                forward_offset: GUIDED_EFFECT_FORWARD_OFFSET,
                scale: DEFAULT_EFFECT_SCALE,
            }),
            ..Self::default()
        }
    }

    /// Base defaults with the staged deltas applied.
    pub fn staged() -> Self {
        Self {
            model: DEFAULT_MODEL,
            thrust: STAGED_THRUST,
            timeout_ms: STAGED_TIMEOUT_MS,
            attach_camera: true,
            ..Self::default()
        }
    }

    /// Unit forward vector in body space.
    pub fn forward_unit(&self) -> Vec3 {
        self.forward.normalize_or_zero()
    }

    pub fn validate(&self) -> FlightResult<()> {
        if !(self.max_cruise_speed > 0.0) || !self.max_cruise_speed.is_finite() {
            return Err(invalid("max_cruise_speed", "must be positive and finite"));
        }
        if !(self.max_boost_speed >= self.max_cruise_speed) || !self.max_boost_speed.is_finite() {
            return Err(invalid(
                "max_boost_speed",
                "must be at least max_cruise_speed",
            ));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be positive"));
        }
        if !self.forward.is_finite() || self.forward.length_squared() < 1e-6 {
            return Err(invalid("forward", "must be a finite non-zero vector"));
        }
        if !self.thrust.is_finite() {
            return Err(invalid("thrust", "must be finite"));
        }
        Ok(())
    }
}

/// Guided (single-stage) tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedProfile {
    pub flight: FlightProfile,
    /// Spawn point relative to the operator when none is given.
    pub spawn_offset: Vec3,
    /// Lateral lever arm of the steering force.
    pub drag_offset: f32,
    pub stationary_grace_ms: u64,
}

impl GuidedProfile {
    pub fn validate(&self) -> FlightResult<()> {
        self.flight.validate()?;
        if self.flight.attach_camera {
            return Err(invalid("attach_camera", "guided projectiles have no camera"));
        }
        if !self.drag_offset.is_finite() {
            return Err(invalid("drag_offset", "must be finite"));
        }
        if !self.spawn_offset.is_finite() {
            return Err(invalid("spawn_offset", "must be finite"));
        }
        Ok(())
    }
}

impl Default for GuidedProfile {
    fn default() -> Self {
        Self {
            flight: FlightProfile::guided(),
            spawn_offset: Vec3::from_array(GUIDED_SPAWN_OFFSET),
            drag_offset: DRAG_OFFSET,
            stationary_grace_ms: GUIDED_STATIONARY_GRACE_MS,
        }
    }
}

/// Staged (launch/cruise/boost) tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagedProfile {
    pub flight: FlightProfile,
    pub spawn_height: f32,
    pub halo_radius: f32,
    pub launch_stage_ms: u64,
    /// Forward impulse applied once right after orienting the body.
    pub launch_impulse: f32,
    pub stationary_margin_ms: u64,
    pub fade_ms: u64,
    pub correction_force: f32,
    pub scan_radius: f32,
    pub max_payloads: usize,
    pub payload_explosion: ExplosionProfile,
    pub camera_fov: f32,
    pub tracking_offset: Vec3,
    pub mounted_offset: Vec3,
}

impl Default for StagedProfile {
    fn default() -> Self {
        Self {
            flight: FlightProfile::staged(),
            spawn_height: STAGED_SPAWN_HEIGHT,
            halo_radius: STAGED_HALO_RADIUS,
            launch_stage_ms: STAGED_LAUNCH_STAGE_MS,
            launch_impulse: STAGED_THRUST,
            stationary_margin_ms: STAGED_STATIONARY_MARGIN_MS,
            fade_ms: STAGED_FADE_MS,
            correction_force: STAGED_CORRECTION_FORCE,
            scan_radius: STAGED_SCAN_RADIUS,
            max_payloads: STAGED_MAX_PAYLOADS,
            payload_explosion: ExplosionProfile {
                kind: ExplosionKind::Rocket,
                ..ExplosionProfile::default()
            },
            camera_fov: CAMERA_FOV,
            tracking_offset: Vec3::from_array(TRACKING_CAMERA_OFFSET),
            mounted_offset: Vec3::from_array(MOUNTED_CAMERA_OFFSET),
        }
    }
}

impl StagedProfile {
    pub fn validate(&self) -> FlightResult<()> {
        self.flight.validate()?;
        if !(self.spawn_height >= 0.0) {
            return Err(invalid("spawn_height", "must not be negative"));
        }
        if !(self.halo_radius >= 0.0) {
            return Err(invalid("halo_radius", "must not be negative"));
        }
        if self.launch_stage_ms >= self.flight.timeout_ms {
            return Err(invalid(
                "launch_stage_ms",
                "must end before the projectile times out",
            ));
        }
        if !(self.scan_radius > 0.0) {
            return Err(invalid("scan_radius", "must be positive"));
        }
        if self.max_payloads == 0 {
            return Err(invalid("max_payloads", "must be at least one"));
        }
        if !self.launch_impulse.is_finite() || !self.correction_force.is_finite() {
            return Err(invalid("launch_impulse", "impulse and correction force must be finite"));
        }
        Ok(())
    }
}

/// Top-level configuration: one profile per kind plus the RNG seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Seed for spawn geometry. Same seed = same halo offsets.
    pub seed: u64,
    pub guided: GuidedProfile,
    pub staged: StagedProfile,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            guided: GuidedProfile::default(),
            staged: StagedProfile::default(),
        }
    }
}

impl FlightConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> FlightResult<Self> {
        let config: FlightConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FlightResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> FlightResult<()> {
        self.guided.validate()?;
        self.staged.validate()
    }
}

fn invalid(field: &'static str, reason: &str) -> FlightError {
    FlightError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}
