//! Observer-relative target classification.

use missileworks_core::enums::TargetType;
use missileworks_core::types::ActorRef;
use missileworks_core::world::ActorServices;

/// Classifies candidates from the point of view of one observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetClassifier {
    observer: ActorRef,
}

impl TargetClassifier {
    pub fn new(observer: ActorRef) -> Self {
        Self { observer }
    }

    /// Classify `candidate`. First matching rule wins:
    /// self → Player, dead → Dead, friendly standing → Friendly,
    /// hostile standing → Hostile, in combat → Hostile, else Neutral.
    pub fn classify<A: ActorServices + ?Sized>(&self, actors: &A, candidate: ActorRef) -> TargetType {
        if candidate == self.observer {
            return TargetType::Player;
        }

        if actors.is_dead(candidate) {
            return TargetType::Dead;
        }

        let standing = actors.relationship_between(self.observer, candidate);
        if standing.is_friendly() {
            return TargetType::Friendly;
        }
        if standing.is_hostile() {
            return TargetType::Hostile;
        }

        if actors.is_in_combat(candidate) {
            return TargetType::Hostile;
        }

        TargetType::Neutral
    }
}
