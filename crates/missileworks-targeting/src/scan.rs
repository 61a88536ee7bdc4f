//! Vantage scans: every live actor in range, classified.

use glam::Vec3;
use tracing::trace;

use missileworks_core::enums::TargetType;
use missileworks_core::types::ActorRef;
use missileworks_core::world::ActorServices;

use crate::classifier::TargetClassifier;

/// One classified actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRecord {
    pub actor: ActorRef,
    pub target_type: TargetType,
    pub position: Vec3,
}

/// Result of a scan. `markers` holds every observed actor; `hostiles` only
/// the ones classified Hostile, in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetScan {
    pub markers: Vec<TargetRecord>,
    pub hostiles: Vec<TargetRecord>,
}

/// Scan `radius` around `vantage` from scratch.
///
/// Actors whose position cannot be read this tick are skipped.
pub fn scan<A: ActorServices + ?Sized>(
    actors: &A,
    classifier: &TargetClassifier,
    vantage: Vec3,
    radius: f32,
) -> TargetScan {
    let mut result = TargetScan::default();

    for actor in actors.scan_actors_near(vantage, radius) {
        let position = match actors.actor_position(actor) {
            Ok(p) => p,
            Err(err) => {
                trace!(?actor, %err, "skipping unreadable actor");
                continue;
            }
        };

        let record = TargetRecord {
            actor,
            target_type: classifier.classify(actors, actor),
            position,
        };
        if record.target_type == TargetType::Hostile {
            result.hostiles.push(record);
        }
        result.markers.push(record);
    }

    result
}
