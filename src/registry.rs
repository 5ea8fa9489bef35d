//! The entity registry: semantic tags for picked scene objects.
//!
//! The picking resolver only ever sees opaque entity handles from the scene.
//! This registry is the side table that says what a handle *means* (a
//! property marker or a catchment polygon) without the resolver having to
//! know anything about geometry. The association is keyed by the `Entity`
//! handle the rendering layer owns; it never holds anything that would keep
//! a despawned entity alive.

use bevy::prelude::*;
use std::collections::HashMap;

/// What a renderable scene object represents. Every pickable object carries
/// at most one tag; untagged objects are picked but ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTag {
    PropertyMarker { property_id: String },
    CatchmentArea { name: String },
}

#[derive(Resource, Debug, Default)]
pub struct EntityTags {
    tags: HashMap<Entity, EntityTag>,
}

impl EntityTags {
    /// Attaches a tag to an entity. Tagging is a once-only operation: a
    /// second call for the same entity is a no-op, so re-running a dataset
    /// load cannot re-label live objects.
    pub fn tag(&mut self, entity: Entity, tag: EntityTag) {
        self.tags.entry(entity).or_insert(tag);
    }

    pub fn lookup(&self, entity: Entity) -> Option<&EntityTag> {
        self.tags.get(&entity)
    }

    /// Drops the association for a despawned entity.
    pub fn forget(&mut self, entity: Entity) {
        self.tags.remove(&entity);
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn lookup_returns_the_attached_tag() {
        let mut tags = EntityTags::default();
        tags.tag(
            entity(1),
            EntityTag::PropertyMarker {
                property_id: "p-1".into(),
            },
        );
        assert_eq!(
            tags.lookup(entity(1)),
            Some(&EntityTag::PropertyMarker {
                property_id: "p-1".into()
            })
        );
        assert_eq!(tags.lookup(entity(2)), None);
    }

    #[test]
    fn tagging_twice_keeps_the_first_tag() {
        let mut tags = EntityTags::default();
        tags.tag(
            entity(7),
            EntityTag::CatchmentArea {
                name: "Greenfield".into(),
            },
        );
        tags.tag(
            entity(7),
            EntityTag::CatchmentArea {
                name: "Riverbank".into(),
            },
        );
        assert_eq!(
            tags.lookup(entity(7)),
            Some(&EntityTag::CatchmentArea {
                name: "Greenfield".into()
            }),
            "second tag call must not overwrite the first"
        );
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn forget_drops_the_association() {
        let mut tags = EntityTags::default();
        tags.tag(
            entity(3),
            EntityTag::CatchmentArea {
                name: "Greenfield".into(),
            },
        );
        tags.forget(entity(3));
        assert!(tags.is_empty());
    }
}
