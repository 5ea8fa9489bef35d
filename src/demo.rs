//! The `--demo` dataset: a synthetic feed for running without data files.
//!
//! Scatters properties around the initial look-at and builds two primary
//! catchments that overlap (so the drill-pick label path is exercised) plus
//! one secondary catchment covering most of the area.

use rand::Rng;

use crate::data::catchment::{CatchmentDoc, CatchmentFeature};
use crate::data::property::{Property, PropertyCatalog};
use crate::geo::GeoPoint;
use crate::settings::INITIAL_LOOK_AT;

const DEMO_PROPERTY_COUNT: usize = 40;

const STREETS: [&str; 8] = [
    "Harbour Street",
    "Granite Place",
    "Ferryhill Road",
    "Queens Terrace",
    "Union Grove",
    "Beach Esplanade",
    "Rosemount Viaduct",
    "Crown Lane",
];

pub fn demo_dataset() -> (PropertyCatalog, CatchmentDoc, CatchmentDoc) {
    let mut rng = rand::thread_rng();
    let base = INITIAL_LOOK_AT;

    let properties = (0..DEMO_PROPERTY_COUNT)
        .map(|index| {
            let coordinates = GeoPoint::new(
                base.latitude + rng.gen_range(-0.016..0.016),
                base.longitude + rng.gen_range(-0.028..0.028),
            );
            let street = STREETS[index % STREETS.len()];
            let number = rng.gen_range(1..140);
            Property {
                id: format!("demo-{index:03}"),
                coordinates,
                title: format!("{number} {street}"),
                location: "Aberdeen".to_string(),
                price: rng.gen_range(12..=190) * 5_000,
                bedrooms: rng.gen_range(1..=5),
                img_url: String::new(),
                link_url: format!("https://listings.example/demo-{index:03}"),
                provider: "demo-listings".to_string(),
                published: None,
            }
        })
        .collect();

    // Two overlapping primary catchments: a point in the overlap hovers as
    // "Greenfield Primary, Riverbank Primary".
    let primary = CatchmentDoc {
        features: vec![
            square_feature("Greenfield Primary", base, -0.010, 0.014),
            square_feature(
                "Riverbank Primary",
                GeoPoint::new(base.latitude + 0.006, base.longitude + 0.008),
                -0.010,
                0.014,
            ),
        ],
    };
    let secondary = CatchmentDoc {
        features: vec![square_feature("Harbour Academy", base, -0.015, 0.026)],
    };

    (PropertyCatalog::new(properties), primary, secondary)
}

fn square_feature(name: &str, centre: GeoPoint, south: f64, half_width: f64) -> CatchmentFeature {
    let north = south + 0.020;
    CatchmentFeature {
        name: name.to_string(),
        rings: vec![vec![
            GeoPoint::new(centre.latitude + south, centre.longitude - half_width),
            GeoPoint::new(centre.latitude + south, centre.longitude + half_width),
            GeoPoint::new(centre.latitude + north, centre.longitude + half_width),
            GeoPoint::new(centre.latitude + north, centre.longitude - half_width),
        ]],
    }
}
