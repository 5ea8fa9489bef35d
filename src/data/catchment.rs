//! School-catchment overlay documents.
//!
//! Each schooling tier ships as a standard polygon-feature document; every
//! feature carries a human-readable `name`. Only the outer ring of each
//! polygon is kept; the overlays are advisory and the source documents do
//! not carry meaningful holes.

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::geo::GeoPoint;

/// Which schooling tier a catchment document describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatchmentTier {
    Primary,
    Secondary,
}

impl CatchmentTier {
    pub fn display(self) -> &'static str {
        match self {
            CatchmentTier::Primary => "primary",
            CatchmentTier::Secondary => "secondary",
        }
    }
}

/// One named catchment feature. A single catchment split across several
/// polygons yields several rings under the same name.
#[derive(Debug, Clone)]
pub struct CatchmentFeature {
    pub name: String,
    pub rings: Vec<Vec<GeoPoint>>,
}

/// A parsed catchment document for one tier.
#[derive(Debug, Clone, Default)]
pub struct CatchmentDoc {
    pub features: Vec<CatchmentFeature>,
}

// Raw document shapes ////////////////////////////////////////////////////////

#[derive(Deserialize)]
struct RawDoc {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    properties: RawProperties,
    geometry: RawGeometry,
}

#[derive(Deserialize)]
struct RawProperties {
    name: String,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
}

pub fn parse_catchment_doc(json: &str) -> anyhow::Result<CatchmentDoc> {
    let raw: RawDoc =
        serde_json::from_str(json).context("catchment document is not a feature collection")?;
    let mut features = Vec::with_capacity(raw.features.len());
    for feature in raw.features {
        let rings = match feature.geometry {
            RawGeometry::Polygon { coordinates } => vec![outer_ring(&coordinates)?],
            RawGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .map(|polygon| outer_ring(polygon))
                .collect::<anyhow::Result<Vec<_>>>()?,
        };
        features.push(CatchmentFeature {
            name: feature.properties.name,
            rings,
        });
    }
    Ok(CatchmentDoc { features })
}

/// Extracts the outer ring of one polygon; inner rings (holes) are dropped.
fn outer_ring(polygon: &[Vec<Vec<f64>>]) -> anyhow::Result<Vec<GeoPoint>> {
    let Some(ring) = polygon.first() else {
        bail!("polygon has no rings");
    };
    ring.iter()
        .map(|position| {
            // Positions are [longitude, latitude, ...optional height].
            if position.len() < 2 {
                bail!("position has fewer than two ordinates");
            }
            Ok(GeoPoint::new(position[1], position[0]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Greenfield"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-2.1, 57.1], [-2.0, 57.1], [-2.0, 57.2], [-2.1, 57.1]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "Riverbank"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-2.3, 57.1], [-2.2, 57.1], [-2.2, 57.2], [-2.3, 57.1]]],
                        [[[-2.5, 57.3], [-2.4, 57.3], [-2.4, 57.4], [-2.5, 57.3]],
                         [[-2.46, 57.32], [-2.44, 57.32], [-2.44, 57.34], [-2.46, 57.32]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygon_and_multipolygon_features() {
        let doc = parse_catchment_doc(DOC).expect("document should parse");
        assert_eq!(doc.features.len(), 2);
        assert_eq!(doc.features[0].name, "Greenfield");
        assert_eq!(doc.features[0].rings.len(), 1);
        assert_eq!(doc.features[1].rings.len(), 2, "one ring per polygon");
    }

    #[test]
    fn positions_are_lon_lat_ordered() {
        let doc = parse_catchment_doc(DOC).expect("document should parse");
        let first = doc.features[0].rings[0][0];
        assert_eq!(first.latitude, 57.1);
        assert_eq!(first.longitude, -2.1);
    }

    #[test]
    fn inner_rings_are_dropped() {
        let doc = parse_catchment_doc(DOC).expect("document should parse");
        // The second polygon of Riverbank has a hole; only its outer ring
        // survives, so both rings have four positions.
        assert!(doc.features[1].rings.iter().all(|ring| ring.len() == 4));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(parse_catchment_doc("{\"features\": 3}").is_err());
    }
}
