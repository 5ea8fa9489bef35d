//! Cross-module scenario tests: picking through to hover state, and the
//! filter/selection invariant driven through a real schedule.

mod hover_scenarios {
    use crate::filter::FilteredSet;
    use crate::interaction::hover_for_hit;
    use crate::picking::{resolve, Hit, PickSurface, PointerSample};
    use crate::registry::{EntityTag, EntityTags};
    use bevy::prelude::*;

    struct FakeSurface {
        nearest: Option<Entity>,
        drill: Vec<Entity>,
    }

    impl PickSurface for FakeSurface {
        fn is_ready(&self) -> bool {
            true
        }
        fn pick(&self, _position: Vec2) -> Option<Entity> {
            self.nearest
        }
        fn drill_pick(&self, _position: Vec2) -> Vec<Entity> {
            self.drill.clone()
        }
    }

    #[test]
    fn split_catchment_under_the_cursor_labels_twice() {
        // A catchment split into two polygons, both under the pointer: the
        // hover label repeats the name rather than deduplicating it.
        let mut tags = EntityTags::default();
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);
        for entity in [first, second] {
            tags.tag(
                entity,
                EntityTag::CatchmentArea {
                    name: "Greenfield".into(),
                },
            );
        }
        let surface = FakeSurface {
            nearest: Some(first),
            drill: vec![first, second],
        };

        let hit = resolve(&surface, &tags, PointerSample::At(Vec2::new(100.0, 80.0)));
        let (hover, _) = hover_for_hit(&hit, &FilteredSet::default());
        assert_eq!(
            hover.catchment_label.as_deref(),
            Some("Greenfield, Greenfield")
        );
        assert_eq!(hover.property, None);
    }

    #[test]
    fn marker_over_catchment_hovers_the_property() {
        let mut tags = EntityTags::default();
        let marker = Entity::from_raw(1);
        let polygon = Entity::from_raw(2);
        tags.tag(
            marker,
            EntityTag::PropertyMarker {
                property_id: "p-1".into(),
            },
        );
        tags.tag(
            polygon,
            EntityTag::CatchmentArea {
                name: "Greenfield".into(),
            },
        );
        let surface = FakeSurface {
            nearest: Some(marker),
            drill: vec![marker, polygon],
        };

        let hit = resolve(&surface, &tags, PointerSample::At(Vec2::ZERO));
        assert_eq!(hit, Hit::Property { id: "p-1".into() });
    }
}

mod selection_invariant {
    use crate::data::property::{Property, PropertyCatalog};
    use crate::filter::{recompute_filtered, FilterCriteria, FilteredSet};
    use crate::geo::GeoPoint;
    use crate::interaction::{invalidate_selection, Selection};
    use crate::storage::Classifications;
    use bevy::prelude::*;

    fn property(id: &str, price: i64) -> Property {
        Property {
            id: id.into(),
            coordinates: GeoPoint::new(57.12, -2.17),
            title: format!("{id} title"),
            location: "Aberdeen".into(),
            price,
            bedrooms: 3,
            img_url: String::new(),
            link_url: String::new(),
            provider: "test".into(),
            published: None,
        }
    }

    /// A headless app running only the filter/selection chain.
    fn filter_app() -> App {
        let mut app = App::new();
        app.insert_resource(PropertyCatalog::new(vec![
            property("1", 100_000),
            property("2", 400_000),
        ]))
        .init_resource::<Classifications>()
        .init_resource::<FilterCriteria>()
        .init_resource::<FilteredSet>()
        .init_resource::<Selection>()
        .add_systems(Update, (recompute_filtered, invalidate_selection).chain());
        app.update();
        app
    }

    #[test]
    fn selection_survives_while_it_stays_in_the_filtered_set() {
        let mut app = filter_app();
        app.world_mut().resource_mut::<Selection>().property = Some("1".into());
        app.world_mut().resource_mut::<FilterCriteria>().max_price = Some(500_000);
        app.update();
        assert_eq!(
            app.world().resource::<Selection>().property.as_deref(),
            Some("1")
        );
    }

    #[test]
    fn selection_clears_when_the_filter_excludes_it() {
        let mut app = filter_app();
        app.world_mut().resource_mut::<Selection>().property = Some("1".into());
        // 100k property falls below a 200k minimum.
        app.world_mut().resource_mut::<FilterCriteria>().min_price = Some(200_000);
        app.update();
        let filtered = app.world().resource::<FilteredSet>();
        assert!(!filtered.contains("1"));
        assert_eq!(app.world().resource::<Selection>().property, None);
    }

    #[test]
    fn classification_change_flows_through_to_the_filtered_set() {
        let mut app = filter_app();
        app.world_mut().resource_mut::<FilterCriteria>().classification =
            crate::filter::ClassificationFilter::Only(
                crate::data::property::Classification::Shortlist,
            );
        app.update();
        assert!(app.world().resource::<FilteredSet>().properties.is_empty());

        app.world_mut()
            .resource_mut::<Classifications>()
            .map
            .insert("2".into(), crate::data::property::Classification::Shortlist);
        app.update();
        let filtered = app.world().resource::<FilteredSet>();
        assert_eq!(filtered.properties.len(), 1);
        assert!(filtered.contains("2"));
    }
}
