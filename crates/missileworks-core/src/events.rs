//! Events emitted by projectiles for the driver and the log.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::ProjectileId;

/// Lifecycle edge observed during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FlightEvent {
    /// Body materialized and handed to the driver.
    Launched {
        id: ProjectileId,
        kind: ProjectileKind,
        position: Vec3,
    },
    /// Construction could not produce a body; instance is inert.
    SpawnFailed { id: ProjectileId, kind: ProjectileKind },
    /// Stage tag moved forward.
    StageChanged {
        id: ProjectileId,
        from: Stage,
        to: Stage,
    },
    /// Primary explosion triggered.
    Detonated { id: ProjectileId, position: Vec3 },
    /// Collision handled without an explosion.
    Dud { id: ProjectileId, position: Vec3 },
    /// Secondary payload fired at `count` hostiles.
    PayloadReleased { id: ProjectileId, count: usize },
    /// Age bound exceeded.
    Expired { id: ProjectileId },
    /// Host destroyed or unloaded the body.
    BodyLost { id: ProjectileId },
    /// Handles released; the instance is inactive from here on.
    CleanedUp { id: ProjectileId },
}

impl FlightEvent {
    pub fn projectile(&self) -> ProjectileId {
        match self {
            Self::Launched { id, .. }
            | Self::SpawnFailed { id, .. }
            | Self::StageChanged { id, .. }
            | Self::Detonated { id, .. }
            | Self::Dud { id, .. }
            | Self::PayloadReleased { id, .. }
            | Self::Expired { id }
            | Self::BodyLost { id }
            | Self::CleanedUp { id } => *id,
        }
    }
}
