//! The filter engine.
//!
//! Filtering is a pure function of the full property set, the user's
//! classification assignments, and the criteria; it is recomputed with a
//! linear scan whenever any input changes. The output preserves feed order
//! and feeds both the rendered marker set and selection invalidation.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::data::property::{Classification, Property, PropertyCatalog};
use crate::settings::PRICE_STEPS;

/// The classification facet of the criteria. `All` is the wildcard the
/// filter bar renders alongside the three classification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationFilter {
    #[default]
    All,
    Only(Classification),
}

impl ClassificationFilter {
    /// The stored string form ("all" or a classification key).
    pub fn key(self) -> &'static str {
        match self {
            ClassificationFilter::All => "all",
            ClassificationFilter::Only(tag) => tag.key(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if key == "all" {
            return Some(ClassificationFilter::All);
        }
        Classification::from_key(key).map(ClassificationFilter::Only)
    }

    pub fn display(self) -> &'static str {
        match self {
            ClassificationFilter::All => "All",
            ClassificationFilter::Only(tag) => tag.display(),
        }
    }

    /// The next entry in the filter bar's cycle order.
    pub fn cycled(self) -> Self {
        match self {
            ClassificationFilter::All => {
                ClassificationFilter::Only(Classification::Shortlist)
            }
            ClassificationFilter::Only(Classification::Shortlist) => {
                ClassificationFilter::Only(Classification::Unclassified)
            }
            ClassificationFilter::Only(Classification::Unclassified) => {
                ClassificationFilter::Only(Classification::Reject)
            }
            ClassificationFilter::Only(Classification::Reject) => ClassificationFilter::All,
        }
    }
}

/// The active filter criteria. Price bounds are inclusive; an absent bound
/// imposes no constraint on that side.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub classification: ClassificationFilter,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

/// The filtered property set, in feed order. Selection and hover only ever
/// reference members of this set.
#[derive(Resource, Debug, Default, Clone)]
pub struct FilteredSet {
    pub properties: Vec<Property>,
}

impl FilteredSet {
    pub fn contains(&self, id: &str) -> bool {
        self.properties.iter().any(|property| property.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.id == id)
    }
}

/// Applies the criteria to the full set. Returns a subsequence of
/// `properties` in the original order; a property with no recorded
/// classification counts as unclassified.
pub fn filter_properties(
    properties: &[Property],
    classifications: &HashMap<String, Classification>,
    criteria: &FilterCriteria,
) -> Vec<Property> {
    properties
        .iter()
        .filter(|property| {
            passes_classification(property, classifications, criteria.classification)
                && passes_price(property, criteria.min_price, criteria.max_price)
        })
        .cloned()
        .collect()
}

fn passes_classification(
    property: &Property,
    classifications: &HashMap<String, Classification>,
    filter: ClassificationFilter,
) -> bool {
    match filter {
        ClassificationFilter::All => true,
        ClassificationFilter::Only(wanted) => {
            let assigned = classifications
                .get(&property.id)
                .copied()
                .unwrap_or_default();
            assigned == wanted
        }
    }
}

fn passes_price(property: &Property, min_price: Option<i64>, max_price: Option<i64>) -> bool {
    if min_price.is_some_and(|min| property.price < min) {
        return false;
    }
    if max_price.is_some_and(|max| property.price > max) {
        return false;
    }
    true
}

/// Steps a price bound through the ladder. `None` sits below the first step
/// and means "Any".
pub fn step_price_bound(bound: Option<i64>, up: bool) -> Option<i64> {
    match bound {
        None => {
            if up {
                Some(PRICE_STEPS[0])
            } else {
                None
            }
        }
        Some(value) => {
            let index = PRICE_STEPS.iter().position(|step| *step >= value);
            match (index, up) {
                (Some(i), true) if i + 1 < PRICE_STEPS.len() => Some(PRICE_STEPS[i + 1]),
                (Some(i), true) => Some(PRICE_STEPS[i]),
                (Some(0), false) | (None, false) => None,
                (Some(i), false) => Some(PRICE_STEPS[i - 1]),
                (None, true) => Some(PRICE_STEPS[PRICE_STEPS.len() - 1]),
            }
        }
    }
}

/// Recomputes [`FilteredSet`] when any filter input changes.
pub fn recompute_filtered(
    catalog: Res<PropertyCatalog>,
    classifications: Res<crate::storage::Classifications>,
    criteria: Res<FilterCriteria>,
    mut filtered: ResMut<FilteredSet>,
) {
    if !catalog.is_changed() && !classifications.is_changed() && !criteria.is_changed() {
        return;
    }
    filtered.properties =
        filter_properties(&catalog.properties, &classifications.map, &criteria);
    debug!(
        "filter: {} of {} properties match {} / {:?}..{:?}",
        filtered.properties.len(),
        catalog.properties.len(),
        criteria.classification.display(),
        criteria.min_price,
        criteria.max_price,
    );
}
