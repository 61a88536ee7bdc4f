//! Scripted sandbox engagement for the headless runner.

use glam::Vec3;

use missileworks_core::constants::DEFAULT_HATE_GROUPS;
use missileworks_core::enums::{Button, InputAxis, ProjectileKind};
use missileworks_core::types::{ActorRef, RelationshipGroup};
use missileworks_core::world::ActorServices;
use missileworks_flight::sandbox::PLAYER_GROUP;
use missileworks_flight::SandboxWorld;
use missileworks_targeting::relationship::{default_hate_groups, make_group_hate};

use crate::state::{Command, ScriptedCommand};

/// Gang group the hostiles are spawned into.
const HOSTILE_GROUP: RelationshipGroup = RelationshipGroup(DEFAULT_HATE_GROUPS[4]);

/// Group nobody has an opinion about.
const BYSTANDER_GROUP: RelationshipGroup = RelationshipGroup(0x0000_AAAA);

/// Hostile positions. The first one is the guided shot's target.
const HOSTILE_POSITIONS: [[f32; 3]; 4] = [
    [40.0, 250.0, 1.5],
    [-40.0, 60.0, 0.0],
    [30.0, -50.0, 0.0],
    [10.0, 90.0, 0.0],
];

const BYSTANDER_POSITION: [f32; 3] = [-70.0, -20.0, 0.0];

/// A populated world plus the actors the script refers to.
pub struct Scenario {
    pub world: SandboxWorld,
    pub hostiles: Vec<ActorRef>,
    pub bystander: ActorRef,
}

impl Scenario {
    /// First hostile still standing.
    pub fn guided_target(&self) -> Option<ActorRef> {
        self.hostiles
            .iter()
            .copied()
            .find(|h| self.world.actor_exists(*h) && !self.world.is_dead(*h))
    }
}

/// Operator at the origin, a gang spread around them and one bystander.
pub fn build(step_ms: u64) -> Scenario {
    let mut world = SandboxWorld::new().with_step_ms(step_ms);
    make_group_hate(&mut world, PLAYER_GROUP, default_hate_groups());

    let hostiles = HOSTILE_POSITIONS
        .iter()
        .map(|p| world.spawn_actor(Vec3::from_array(*p), HOSTILE_GROUP))
        .collect();
    let bystander = world.spawn_actor(Vec3::from_array(BYSTANDER_POSITION), BYSTANDER_GROUP);

    Scenario {
        world,
        hostiles,
        bystander,
    }
}

/// Guided shot first, then a staged launch the operator nudges sideways
/// before dropping the payload.
pub fn default_script() -> Vec<ScriptedCommand> {
    let at = |tick, command| ScriptedCommand { tick, command };
    vec![
        at(0, Command::Launch(ProjectileKind::Guided)),
        at(5, Command::Launch(ProjectileKind::Staged)),
        at(60, Command::SetAxis(InputAxis::LeftRight, 0.25)),
        at(75, Command::Press(Button::ReleasePayload)),
        at(77, Command::Release(Button::ReleasePayload)),
        at(80, Command::SetAxis(InputAxis::LeftRight, 0.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use missileworks_core::enums::Standing;

    #[test]
    fn test_operator_hates_hostile_group() {
        let scenario = build(33);
        let world = &scenario.world;
        let player = world.player();
        for hostile in &scenario.hostiles {
            assert_eq!(world.relationship_between(player, *hostile), Standing::Hate);
        }
        assert_eq!(
            world.relationship_between(player, scenario.bystander),
            Standing::Neutral
        );
    }

    #[test]
    fn test_guided_target_skips_dead_hostiles() {
        let mut scenario = build(33);
        let first = scenario.hostiles[0];
        assert_eq!(scenario.guided_target(), Some(first));

        scenario.world.set_dead(first, true).unwrap();
        assert_eq!(scenario.guided_target(), Some(scenario.hostiles[1]));
    }

    #[test]
    fn test_default_script_is_sorted_by_tick() {
        let script = default_script();
        assert!(script.windows(2).all(|w| w[0].tick <= w[1].tick));
    }
}
