//! The picking resolver: screen coordinates to semantic hits.
//!
//! The scene exposes two pick primitives behind the [`PickSurface`] trait:
//! a nearest-object pick and an exhaustive drill pick. The resolver
//! layers the entity registry on top of them and produces a [`Hit`], the
//! discriminated result the hover and selection systems consume. Keeping the
//! surface behind a trait lets every branch here run against a scripted fake
//! in tests.

use bevy::prelude::*;

use crate::registry::{EntityTag, EntityTags};

/// What the user is pointing at.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    /// The nearest pick is a property marker. Markers win over anything
    /// rendered beneath them; the surface's own z-order decides "nearest"
    /// and the resolver does not re-rank.
    Property { id: String },
    /// The nearest pick is a catchment polygon. `names` holds every
    /// catchment under the cursor in pick order. Duplicates are kept: a
    /// catchment split into several polygons under the cursor appears once
    /// per polygon.
    Catchments { names: Vec<String> },
    /// Nothing relevant under the cursor (including an untagged nearest
    /// object, which masks anything behind it).
    Empty,
}

/// Pointer event coordinates arrive either as a bare point or as a
/// drag-style start/end pair; picking only ever uses the end position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample {
    At(Vec2),
    Drag { start: Vec2, end: Vec2 },
}

impl PointerSample {
    pub fn end_position(self) -> Vec2 {
        match self {
            PointerSample::At(position) => position,
            PointerSample::Drag { end, .. } => end,
        }
    }
}

/// The scene-side pick primitives. `is_ready` is false until the scene has
/// a camera to pick through; every resolver call is then a no-op.
pub trait PickSurface {
    fn is_ready(&self) -> bool;
    /// Nearest object under the screen position, in the surface's z-order.
    fn pick(&self, position: Vec2) -> Option<Entity>;
    /// Every object under the screen position, front to back.
    fn drill_pick(&self, position: Vec2) -> Vec<Entity>;
}

/// Classifies whatever is under `sample` into a [`Hit`].
pub fn resolve(surface: &dyn PickSurface, tags: &EntityTags, sample: PointerSample) -> Hit {
    if !surface.is_ready() {
        return Hit::Empty;
    }
    let position = sample.end_position();
    let Some(nearest) = surface.pick(position) else {
        return Hit::Empty;
    };
    match tags.lookup(nearest) {
        Some(EntityTag::PropertyMarker { property_id }) => Hit::Property {
            id: property_id.clone(),
        },
        Some(EntityTag::CatchmentArea { .. }) => {
            // Catchment polygons overlap; collect every one under the
            // cursor, not just the nearest.
            let names = surface
                .drill_pick(position)
                .into_iter()
                .filter_map(|entity| match tags.lookup(entity) {
                    Some(EntityTag::CatchmentArea { name }) => Some(name.clone()),
                    _ => None,
                })
                .collect();
            Hit::Catchments { names }
        }
        None => Hit::Empty,
    }
}

/// Joins drill-picked catchment names for display.
pub fn catchment_label(names: &[String]) -> String {
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A scripted surface: a fixed nearest object and drill list.
    struct FakeSurface {
        ready: bool,
        nearest: Option<Entity>,
        drill: Vec<Entity>,
    }

    impl PickSurface for FakeSurface {
        fn is_ready(&self) -> bool {
            self.ready
        }
        fn pick(&self, _position: Vec2) -> Option<Entity> {
            self.nearest
        }
        fn drill_pick(&self, _position: Vec2) -> Vec<Entity> {
            self.drill.clone()
        }
    }

    fn tagged(entries: &[(u32, EntityTag)]) -> (EntityTags, HashMap<u32, Entity>) {
        let mut tags = EntityTags::default();
        let mut handles = HashMap::new();
        for (index, tag) in entries {
            let entity = Entity::from_raw(*index);
            handles.insert(*index, entity);
            tags.tag(entity, tag.clone());
        }
        (tags, handles)
    }

    fn marker(id: &str) -> EntityTag {
        EntityTag::PropertyMarker {
            property_id: id.into(),
        }
    }

    fn catchment(name: &str) -> EntityTag {
        EntityTag::CatchmentArea { name: name.into() }
    }

    #[test]
    fn marker_pick_wins_even_with_catchments_below() {
        let (tags, handles) = tagged(&[(1, marker("p-1")), (2, catchment("Greenfield"))]);
        let surface = FakeSurface {
            ready: true,
            nearest: Some(handles[&1]),
            drill: vec![handles[&1], handles[&2]],
        };
        let hit = resolve(&surface, &tags, PointerSample::At(Vec2::ZERO));
        assert_eq!(hit, Hit::Property { id: "p-1".into() });
    }

    #[test]
    fn catchment_pick_drills_and_keeps_duplicates() {
        let (tags, handles) = tagged(&[
            (1, catchment("Greenfield")),
            (2, catchment("Greenfield")),
            (3, catchment("Riverbank")),
        ]);
        let surface = FakeSurface {
            ready: true,
            nearest: Some(handles[&1]),
            drill: vec![handles[&1], handles[&2], handles[&3]],
        };
        let hit = resolve(&surface, &tags, PointerSample::At(Vec2::ZERO));
        let Hit::Catchments { names } = hit else {
            panic!("expected a catchment hit");
        };
        assert_eq!(names, vec!["Greenfield", "Greenfield", "Riverbank"]);
        assert_eq!(
            catchment_label(&names),
            "Greenfield, Greenfield, Riverbank",
            "split polygons sharing a name are not deduplicated"
        );
    }

    #[test]
    fn drill_skips_untagged_and_marker_entries() {
        let (tags, handles) = tagged(&[(1, catchment("Greenfield")), (2, marker("p-1"))]);
        let untagged = Entity::from_raw(99);
        let surface = FakeSurface {
            ready: true,
            nearest: Some(handles[&1]),
            drill: vec![handles[&1], untagged, handles[&2]],
        };
        let hit = resolve(&surface, &tags, PointerSample::At(Vec2::ZERO));
        assert_eq!(
            hit,
            Hit::Catchments {
                names: vec!["Greenfield".into()]
            }
        );
    }

    #[test]
    fn untagged_nearest_masks_everything_behind_it() {
        let (tags, handles) = tagged(&[(1, catchment("Greenfield"))]);
        let untagged = Entity::from_raw(50);
        let surface = FakeSurface {
            ready: true,
            nearest: Some(untagged),
            drill: vec![untagged, handles[&1]],
        };
        assert_eq!(
            resolve(&surface, &tags, PointerSample::At(Vec2::ZERO)),
            Hit::Empty
        );
    }

    #[test]
    fn not_ready_surface_resolves_to_empty() {
        let (tags, handles) = tagged(&[(1, marker("p-1"))]);
        let surface = FakeSurface {
            ready: false,
            nearest: Some(handles[&1]),
            drill: vec![handles[&1]],
        };
        assert_eq!(
            resolve(&surface, &tags, PointerSample::At(Vec2::ZERO)),
            Hit::Empty
        );
    }

    #[test]
    fn drag_samples_pick_at_the_end_position() {
        let sample = PointerSample::Drag {
            start: Vec2::new(5.0, 5.0),
            end: Vec2::new(20.0, 30.0),
        };
        assert_eq!(sample.end_position(), Vec2::new(20.0, 30.0));
        assert_eq!(
            PointerSample::At(Vec2::new(1.0, 2.0)).end_position(),
            Vec2::new(1.0, 2.0)
        );
    }
}
