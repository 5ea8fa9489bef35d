//! Hover and selection state.
//!
//! Two independent state slots (what the pointer is over, and what the
//! user has selected) updated by separate event streams and rendered
//! jointly by the sidebar. The hover slot is mutually exclusive between a
//! property and a catchment label: a pointer position resolves to exactly
//! one semantic category.

pub mod systems;

use bevy::prelude::*;

use crate::filter::FilteredSet;
use crate::picking::{catchment_label, Hit};

/// What the pointer is currently over. At most one of the two fields is
/// set at any instant.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct HoverState {
    pub property: Option<String>,
    pub catchment_label: Option<String>,
}

impl HoverState {
    /// The invariant the pointer systems maintain.
    pub fn is_exclusive(&self) -> bool {
        !(self.property.is_some() && self.catchment_label.is_some())
    }
}

/// The selected property, if any. Always a member of the filtered set;
/// the filter systems clear it the moment that stops being true.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct Selection {
    pub property: Option<String>,
}

/// Pointer style over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Interactive,
}

/// Computes the hover state and cursor style for a resolved hit.
///
/// A property hit is looked up in the *filtered* set: a property hidden by
/// the current filter is not hoverable even if a stale marker were picked.
/// The cursor goes interactive for any marker hit, matching the original
/// surface's behavior.
pub fn hover_for_hit(hit: &Hit, filtered: &FilteredSet) -> (HoverState, CursorStyle) {
    match hit {
        Hit::Property { id } => (
            HoverState {
                property: filtered.get(id).map(|property| property.id.clone()),
                catchment_label: None,
            },
            CursorStyle::Interactive,
        ),
        Hit::Catchments { names } => (
            HoverState {
                property: None,
                catchment_label: Some(catchment_label(names)),
            },
            CursorStyle::Default,
        ),
        Hit::Empty => (HoverState::default(), CursorStyle::Default),
    }
}

/// Clears a selection that fell out of the filtered set.
pub fn invalidate_selection(filtered: Res<FilteredSet>, mut selection: ResMut<Selection>) {
    if !filtered.is_changed() {
        return;
    }
    let stale = selection
        .property
        .as_deref()
        .is_some_and(|id| !filtered.contains(id));
    if stale {
        info!("selection cleared: property left the filtered set");
        selection.property = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::property::Property;
    use crate::geo::GeoPoint;

    fn filtered(ids: &[&str]) -> FilteredSet {
        FilteredSet {
            properties: ids
                .iter()
                .map(|id| Property {
                    id: id.to_string(),
                    coordinates: GeoPoint::new(57.1, -2.1),
                    title: String::new(),
                    location: String::new(),
                    price: 100_000,
                    bedrooms: 2,
                    img_url: String::new(),
                    link_url: String::new(),
                    provider: "test".into(),
                    published: None,
                })
                .collect(),
        }
    }

    #[test]
    fn property_hit_hovers_the_filtered_entry() {
        let (hover, cursor) = hover_for_hit(
            &Hit::Property { id: "p-1".into() },
            &filtered(&["p-1", "p-2"]),
        );
        assert_eq!(hover.property.as_deref(), Some("p-1"));
        assert_eq!(hover.catchment_label, None);
        assert_eq!(cursor, CursorStyle::Interactive);
        assert!(hover.is_exclusive());
    }

    #[test]
    fn filtered_out_property_is_not_hoverable() {
        let (hover, _) =
            hover_for_hit(&Hit::Property { id: "p-9".into() }, &filtered(&["p-1"]));
        assert_eq!(hover.property, None);
    }

    #[test]
    fn catchment_hit_sets_the_joined_label_and_clears_property() {
        let (hover, cursor) = hover_for_hit(
            &Hit::Catchments {
                names: vec!["Greenfield".into(), "Greenfield".into()],
            },
            &filtered(&["p-1"]),
        );
        assert_eq!(hover.catchment_label.as_deref(), Some("Greenfield, Greenfield"));
        assert_eq!(hover.property, None);
        assert_eq!(cursor, CursorStyle::Default);
        assert!(hover.is_exclusive());
    }

    #[test]
    fn empty_hit_clears_everything() {
        let (hover, cursor) = hover_for_hit(&Hit::Empty, &filtered(&["p-1"]));
        assert_eq!(hover, HoverState::default());
        assert_eq!(cursor, CursorStyle::Default);
    }

    #[test]
    fn hover_stays_exclusive_across_any_hit_sequence() {
        let set = filtered(&["p-1"]);
        let hits = [
            Hit::Property { id: "p-1".into() },
            Hit::Catchments {
                names: vec!["Greenfield".into()],
            },
            Hit::Property { id: "p-404".into() },
            Hit::Empty,
        ];
        for hit in &hits {
            let (hover, _) = hover_for_hit(hit, &set);
            assert!(
                hover.is_exclusive(),
                "hover must never carry both a property and a label: {hover:?}"
            );
        }
    }
}
