//! Pointer systems and the production pick surface.
//!
//! The surface realizes the scene's pick primitives: markers are hit-tested
//! by screen-space distance (they render in front of everything on the
//! ground, so they always win the z-order), catchment polygons by
//! ground-plane containment in draw order, topmost first. A pick runs on
//! every pointer-move event in arrival order; there is no debouncing.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;

use crate::cameras::MapCamera;
use crate::catchments::{CatchmentShape, CatchmentVisibility};
use crate::filter::FilteredSet;
use crate::flight::FlyToProperty;
use crate::geo::MapFrame;
use crate::interaction::{hover_for_hit, CursorStyle, HoverState, Selection};
use crate::markers::PropertyMarker;
use crate::picking::{resolve, Hit, PickSurface, PointerSample};
use crate::registry::EntityTags;
use crate::settings::MARKER_PICK_RADIUS_PX;
use crate::storage::CentreOnSelect;

/// A snapshot of everything pickable this frame.
pub struct ScenePick<'a> {
    camera: Option<(&'a Camera, &'a GlobalTransform)>,
    /// Marker entities with their projected screen positions.
    markers: Vec<(Entity, Vec2)>,
    /// Visible catchment polygons, topmost (highest draw order) first.
    catchments: Vec<(Entity, &'a CatchmentShape)>,
}

impl<'a> ScenePick<'a> {
    pub fn build(
        camera_query: &'a Query<(&Camera, &GlobalTransform), With<MapCamera>>,
        marker_query: &'a Query<(Entity, &GlobalTransform), With<PropertyMarker>>,
        catchment_query: &'a Query<(Entity, &CatchmentShape)>,
        visibility: &CatchmentVisibility,
    ) -> Self {
        let camera = camera_query.single().ok();
        let mut markers = Vec::new();
        if let Some((camera, camera_transform)) = camera {
            for (entity, transform) in marker_query {
                if let Ok(screen) =
                    camera.world_to_viewport(camera_transform, transform.translation())
                {
                    markers.push((entity, screen));
                }
            }
        }
        let mut catchments: Vec<_> = catchment_query
            .iter()
            .filter(|(_, shape)| visibility.shows(shape.tier))
            .collect();
        catchments.sort_by(|(_, a), (_, b)| b.order.cmp(&a.order));
        Self {
            camera,
            markers,
            catchments,
        }
    }

    /// Where the pick ray meets the ground plane, as world x/z.
    pub fn ground_point(&self, position: Vec2) -> Option<Vec2> {
        let (camera, camera_transform) = self.camera?;
        let ray = camera.viewport_to_world(camera_transform, position).ok()?;
        let direction = ray.direction.as_vec3();
        if direction.y.abs() < 1e-6 {
            return None;
        }
        let t = -ray.origin.y / direction.y;
        if t < 0.0 {
            return None;
        }
        let hit = ray.origin + direction * t;
        Some(Vec2::new(hit.x, hit.z))
    }

    fn nearest_marker(&self, position: Vec2) -> Option<Entity> {
        let mut best: Option<(Entity, f32)> = None;
        for (entity, screen) in &self.markers {
            let distance = screen.distance(position);
            if distance <= MARKER_PICK_RADIUS_PX
                && best.is_none_or(|(_, best_distance)| distance < best_distance)
            {
                best = Some((*entity, distance));
            }
        }
        best.map(|(entity, _)| entity)
    }

    fn catchments_under(&self, position: Vec2) -> Vec<Entity> {
        let Some(ground) = self.ground_point(position) else {
            return Vec::new();
        };
        self.catchments
            .iter()
            .filter(|(_, shape)| shape.contains(ground))
            .map(|(entity, _)| *entity)
            .collect()
    }
}

impl PickSurface for ScenePick<'_> {
    fn is_ready(&self) -> bool {
        self.camera.is_some()
    }

    fn pick(&self, position: Vec2) -> Option<Entity> {
        // Markers render above the ground overlays and win the z-order.
        self.nearest_marker(position)
            .or_else(|| self.catchments_under(position).into_iter().next())
    }

    fn drill_pick(&self, position: Vec2) -> Vec<Entity> {
        self.catchments_under(position)
    }
}

/// Resolves a hit for every pointer-move event and updates hover state and
/// the window cursor.
#[allow(clippy::too_many_arguments)]
pub fn hover_on_pointer_move(
    mut commands: Commands,
    mut moves: EventReader<CursorMoved>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    marker_query: Query<(Entity, &GlobalTransform), With<PropertyMarker>>,
    catchment_query: Query<(Entity, &CatchmentShape)>,
    visibility: Res<CatchmentVisibility>,
    tags: Res<EntityTags>,
    filtered: Res<FilteredSet>,
    mut hover: ResMut<HoverState>,
    windows: Query<Entity, With<PrimaryWindow>>,
) {
    for event in moves.read() {
        let surface = ScenePick::build(
            &camera_query,
            &marker_query,
            &catchment_query,
            &visibility,
        );
        let hit = resolve(&surface, &tags, PointerSample::At(event.position));
        let (next, cursor) = hover_for_hit(&hit, &filtered);
        hover.set_if_neq(next);
        if let Ok(window) = windows.single() {
            commands.entity(window).insert(match cursor {
                CursorStyle::Interactive => CursorIcon::System(SystemCursorIcon::Pointer),
                CursorStyle::Default => CursorIcon::System(SystemCursorIcon::Default),
            });
        }
    }
}

/// Left click: select the clicked marker (and optionally centre on it). A
/// click on anything else logs the ground coordinate and leaves the
/// selection alone; only the sidebar close clears it.
#[allow(clippy::too_many_arguments)]
pub fn select_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    marker_query: Query<(Entity, &GlobalTransform), With<PropertyMarker>>,
    catchment_query: Query<(Entity, &CatchmentShape)>,
    visibility: Res<CatchmentVisibility>,
    tags: Res<EntityTags>,
    filtered: Res<FilteredSet>,
    frame: Res<MapFrame>,
    centre: Res<CentreOnSelect>,
    mut selection: ResMut<Selection>,
    mut fly: EventWriter<FlyToProperty>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(position) = window.cursor_position() else {
        return;
    };
    let surface = ScenePick::build(
        &camera_query,
        &marker_query,
        &catchment_query,
        &visibility,
    );
    let hit = resolve(&surface, &tags, PointerSample::At(position));
    match hit {
        Hit::Property { id } => {
            let Some(property) = filtered.get(&id) else {
                return;
            };
            info!("selected property {id}");
            let target = property.coordinates;
            selection.property = Some(id);
            if centre.0 {
                fly.write(FlyToProperty { target });
            }
        }
        _ => {
            if let Some(ground) = surface.ground_point(position) {
                let geo = frame.to_geo(Vec3::new(ground.x, 0.0, ground.y));
                info!(
                    "left click at lat/lon: {:.6}, {:.6}; selected property is {}",
                    geo.latitude,
                    geo.longitude,
                    selection.property.as_deref().unwrap_or("none")
                );
            }
        }
    }
}
