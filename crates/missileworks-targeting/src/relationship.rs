//! Relationship-group helpers.

use missileworks_core::constants::DEFAULT_HATE_GROUPS;
use missileworks_core::enums::Standing;
use missileworks_core::types::RelationshipGroup;
use missileworks_core::world::ActorServices;

/// Groups hostile to the operator unless configured otherwise.
pub fn default_hate_groups() -> impl Iterator<Item = RelationshipGroup> {
    DEFAULT_HATE_GROUPS.into_iter().map(RelationshipGroup)
}

/// Make `group` hate every group in `hate_groups` (one direction only).
pub fn make_group_hate<A, I>(actors: &mut A, group: RelationshipGroup, hate_groups: I)
where
    A: ActorServices + ?Sized,
    I: IntoIterator<Item = RelationshipGroup>,
{
    for other in hate_groups {
        actors.set_group_relationship(group, other, Standing::Hate);
    }
}
