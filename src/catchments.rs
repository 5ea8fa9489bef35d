//! School-catchment overlays in the scene.
//!
//! Each loaded feature ring becomes one entity carrying its name, tier,
//! draw order, and both a drawable outline and a containment path. Colors
//! are cached *by name* per document, so a catchment split into several
//! polygons keeps one color, while picking deliberately reports each
//! polygon separately.

use bevy::prelude::*;
use kurbo::Shape as _;
use std::collections::HashMap;

use crate::data::catchment::{CatchmentDoc, CatchmentTier};
use crate::data::loader::CatchmentDocReady;
use crate::geo::{GeoPoint, MapFrame};
use crate::registry::{EntityTag, EntityTags};
use crate::theme::{CATCHMENT_LIGHTNESS, CATCHMENT_OUTLINE_ALPHA, CATCHMENT_SATURATION};

/// Golden ratio conjugate; walking the hue wheel by this per new name
/// spreads colors evenly no matter how many catchments a document has.
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618033988749895;

/// Outlines float just above the ground so they never z-fight with it.
const OUTLINE_LIFT_M: f32 = 0.5;

/// Which overlay tiers are visible. Both default off; the toggles are
/// persisted in the preference store.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct CatchmentVisibility {
    pub primary: bool,
    pub secondary: bool,
}

impl CatchmentVisibility {
    pub fn shows(&self, tier: CatchmentTier) -> bool {
        match tier {
            CatchmentTier::Primary => self.primary,
            CatchmentTier::Secondary => self.secondary,
        }
    }
}

/// One catchment polygon in the scene.
#[derive(Component)]
pub struct CatchmentShape {
    pub name: String,
    pub tier: CatchmentTier,
    pub color: Color,
    /// Later-spawned polygons draw (and pick) on top.
    pub order: u32,
    /// Closed outline for gizmo drawing.
    pub outline: Vec<Vec3>,
    /// Ground-plane containment path in world x/z.
    path: kurbo::BezPath,
}

impl CatchmentShape {
    /// Whether a ground-plane point (world x/z) falls inside this polygon.
    pub fn contains(&self, point: Vec2) -> bool {
        self.path
            .contains(kurbo::Point::new(point.x as f64, point.y as f64))
    }
}

/// The hue walk: color for the `index`-th distinct name in a document.
pub fn catchment_color(index: usize) -> Color {
    let hue = ((index as f64 * GOLDEN_RATIO_CONJUGATE) % 1.0) as f32 * 360.0;
    Color::hsla(
        hue,
        CATCHMENT_SATURATION,
        CATCHMENT_LIGHTNESS,
        CATCHMENT_OUTLINE_ALPHA,
    )
}

/// Assigns per-name colors for one document's features, first-seen order.
pub fn assign_colors<'a>(names: impl Iterator<Item = &'a str>) -> HashMap<String, Color> {
    let mut colors = HashMap::new();
    for name in names {
        if !colors.contains_key(name) {
            let color = catchment_color(colors.len());
            colors.insert(name.to_string(), color);
        }
    }
    colors
}

fn ring_outline(frame: &MapFrame, ring: &[GeoPoint]) -> Vec<Vec3> {
    let mut outline: Vec<Vec3> = ring
        .iter()
        .map(|point| frame.to_world(*point, OUTLINE_LIFT_M as f64))
        .collect();
    if !outline.is_empty() && outline.first() != outline.last() {
        let first = outline[0];
        outline.push(first);
    }
    outline
}

fn ring_path(outline: &[Vec3]) -> kurbo::BezPath {
    let mut path = kurbo::BezPath::new();
    let mut points = outline
        .iter()
        .map(|p| kurbo::Point::new(p.x as f64, p.z as f64));
    if let Some(first) = points.next() {
        path.move_to(first);
        for point in points {
            path.line_to(point);
        }
        path.close_path();
    }
    path
}

/// Turns a loaded catchment document into scene entities, tagging each one
/// in the registry so the picking resolver can classify it.
pub fn spawn_catchments(
    mut commands: Commands,
    mut events: EventReader<CatchmentDocReady>,
    frame: Res<MapFrame>,
    mut tags: ResMut<EntityTags>,
    mut next_order: Local<u32>,
) {
    for CatchmentDocReady { tier, doc } in events.read() {
        let colors = assign_colors(doc.features.iter().map(|f| f.name.as_str()));
        let mut spawned = 0;
        for feature in &doc.features {
            let color = colors[&feature.name];
            for ring in &feature.rings {
                let outline = ring_outline(&frame, ring);
                if outline.len() < 4 {
                    warn!("skipping degenerate ring in {}", feature.name);
                    continue;
                }
                let path = ring_path(&outline);
                let entity = commands
                    .spawn(CatchmentShape {
                        name: feature.name.clone(),
                        tier: *tier,
                        color,
                        order: *next_order,
                        outline,
                        path,
                    })
                    .id();
                tags.tag(
                    entity,
                    EntityTag::CatchmentArea {
                        name: feature.name.clone(),
                    },
                );
                *next_order += 1;
                spawned += 1;
            }
        }
        info!("spawned {spawned} {} catchment polygons", tier.display());
    }
}

/// Draws the visible outlines every frame.
pub fn draw_catchments(
    mut gizmos: Gizmos,
    visibility: Res<CatchmentVisibility>,
    shapes: Query<&CatchmentShape>,
) {
    for shape in &shapes {
        if visibility.shows(shape.tier) {
            gizmos.linestrip(shape.outline.iter().copied(), shape.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_polygons_share_their_name_color() {
        let colors = assign_colors(
            ["Greenfield", "Riverbank", "Greenfield", "Hillside"]
                .iter()
                .copied(),
        );
        assert_eq!(colors.len(), 3);
        // Distinct names get distinct hues from the golden-ratio walk.
        assert_ne!(colors["Greenfield"], colors["Riverbank"]);
        assert_ne!(colors["Riverbank"], colors["Hillside"]);
    }

    #[test]
    fn hue_walk_is_deterministic() {
        assert_eq!(catchment_color(0), catchment_color(0));
        assert_ne!(catchment_color(0), catchment_color(1));
    }

    #[test]
    fn containment_uses_the_ground_plane_ring() {
        let frame = MapFrame::new(GeoPoint::new(57.118, -2.170));
        let ring = vec![
            GeoPoint::new(57.110, -2.180),
            GeoPoint::new(57.110, -2.160),
            GeoPoint::new(57.126, -2.160),
            GeoPoint::new(57.126, -2.180),
        ];
        let outline = ring_outline(&frame, &ring);
        let shape = CatchmentShape {
            name: "Greenfield".into(),
            tier: CatchmentTier::Primary,
            color: catchment_color(0),
            order: 0,
            path: ring_path(&outline),
            outline,
        };
        let inside = frame.to_world(GeoPoint::new(57.118, -2.170), 0.0);
        let outside = frame.to_world(GeoPoint::new(57.2, -2.170), 0.0);
        assert!(shape.contains(Vec2::new(inside.x, inside.z)));
        assert!(!shape.contains(Vec2::new(outside.x, outside.z)));
    }
}
