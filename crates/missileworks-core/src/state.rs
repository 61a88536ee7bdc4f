//! Read-only projectile snapshot for overlays and logs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{CameraMode, ProjectileKind, Stage};
use crate::types::ProjectileId;

/// Per-projectile state at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: ProjectileId,
    pub kind: ProjectileKind,
    pub active: bool,
    pub stage: Stage,
    pub can_control: bool,
    pub camera: Option<CameraMode>,
    pub age_ms: u64,
    /// Position relative to the spawn point.
    pub displacement: Vec3,
    pub ground_speed: f32,
    pub rotation: Vec3,
    pub angular_velocity: Vec3,
}

impl ProjectileSnapshot {
    /// Help-text readout of this snapshot.
    pub fn help_text(&self) -> String {
        readout(
            self.displacement,
            self.ground_speed,
            self.rotation,
            self.angular_velocity,
        )
    }
}

/// Multi-line kinematic readout in the host's help-text markup (`~n~` = newline).
pub fn readout(displacement: Vec3, ground_speed: f32, rotation: Vec3, angular_velocity: Vec3) -> String {
    let d = displacement.round();
    let r = rotation.round();
    let w = (angular_velocity * 10_000.0).round() / 10_000.0;
    format!(
        "Position: X:{} Y:{} Z:{}~n~GndSpeed: {:.2}~n~Rotation: X:{} Y:{} Z:{}~n~RotSpeed: X:{} Y:{} Z:{}",
        d.x, d.y, d.z, ground_speed, r.x, r.y, r.z, w.x, w.y, w.z
    )
}
