//! Enumeration types used throughout the flight model.

use serde::{Deserialize, Serialize};

/// Target category assigned to an observed actor.
///
/// Discriminants match the host's marker table; they carry no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TargetType {
    Player = 0,
    Friendly = 1,
    Hostile = 2,
    Neutral = 3,
    Untargetable = 4,
    Dead = 7,
}

/// Relationship between two actors, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standing {
    Companion,
    Respect,
    Like,
    #[default]
    Neutral,
    Dislike,
    Hate,
    /// Ambient pedestrians with no explicit relationship.
    Pedestrians,
}

impl Standing {
    /// Standing that makes an actor count as friendly.
    pub fn is_friendly(self) -> bool {
        matches!(self, Self::Companion | Self::Like | Self::Respect)
    }

    /// Standing that makes an actor count as hostile.
    pub fn is_hostile(self) -> bool {
        matches!(self, Self::Hate | Self::Dislike)
    }
}

/// Projectile family. Selects the flight controller at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Single-stage, locks on to one actor and steers toward it.
    Guided,
    /// Launch → Cruise (→ Boost), operator-steerable with cluster payload.
    Staged,
}

/// Lifecycle stage of a projectile.
///
/// Single-stage projectiles live in `Cruise` for their whole life.
/// Stages only move forward; see [`Stage::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Autopilot launch; operator has no authority yet.
    Launch,
    /// Sustained flight. `payload_armed` gates secondary release.
    Cruise { payload_armed: bool },
    /// Reserved high-speed stage.
    Boost { payload_armed: bool },
}

impl Stage {
    /// Position in the stage order. Launch < Cruise < Boost.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Launch => 0,
            Self::Cruise { .. } => 1,
            Self::Boost { .. } => 2,
        }
    }

    pub fn payload_armed(self) -> bool {
        match self {
            Self::Launch => false,
            Self::Cruise { payload_armed } | Self::Boost { payload_armed } => payload_armed,
        }
    }

    /// Move to `next` if it is not earlier in the order. Returns whether
    /// the stage changed tag (payload flag edits on the same tag count as
    /// no change).
    pub fn advance(&mut self, next: Stage) -> bool {
        if next.ordinal() < self.ordinal() {
            return false;
        }
        let changed = next.ordinal() != self.ordinal();
        *self = next;
        changed
    }

    /// Disarm the payload in place, keeping the stage tag.
    pub fn disarm_payload(&mut self) {
        match self {
            Self::Launch => {}
            Self::Cruise { payload_armed } | Self::Boost { payload_armed } => {
                *payload_armed = false;
            }
        }
    }
}

/// Explosion type requested from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionKind {
    Grenade,
    Rocket,
    #[default]
    PlaneRocket,
    Tanker,
}

/// What the rendering camera of a projectile is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Fixed camera pointed at the body.
    Tracking,
    /// Camera attached to the body looking along its nose.
    BodyMounted,
}

/// Operator analog axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAxis {
    UpDown,
    LeftRight,
}

/// Operator buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    ReleasePayload,
}
