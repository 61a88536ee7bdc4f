//! Error types for world calls and flight configuration.

use thiserror::Error;

use crate::types::{ActorRef, BodyHandle, CameraHandle, EffectHandle, ModelId};

/// Failures reported by World Services.
///
/// Inside a tick these are transient: the caller logs and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// Body handle no longer refers to a live body.
    #[error("body not found: {0:?}")]
    BodyNotFound(BodyHandle),
    /// Host refused to materialize a body.
    #[error("spawn rejected for model {0:?}")]
    SpawnRejected(ModelId),
    /// Camera handle is stale.
    #[error("camera not found: {0:?}")]
    CameraNotFound(CameraHandle),
    /// Effect asset could not be loaded or is stale.
    #[error("effect asset unavailable: {0}")]
    AssetUnavailable(String),
    /// Effect handle is stale.
    #[error("effect not found: {0:?}")]
    EffectNotFound(EffectHandle),
    /// Actor handle is stale.
    #[error("actor not found: {0:?}")]
    ActorNotFound(ActorRef),
}

/// Errors raised while configuring or constructing a projectile.
#[derive(Debug, Error)]
pub enum FlightError {
    #[error("world: {0}")]
    World(#[from] WorldError),
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
    #[error("config parse: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("config read: {0}")]
    ConfigIo(#[from] std::io::Error),
}

/// Result type for flight operations.
pub type FlightResult<T> = Result<T, FlightError>;
