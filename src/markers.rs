//! Property markers in the scene.
//!
//! Each property in the *filtered* set gets one marker: a head floating
//! above the ground with a thin post down to the property's position, the
//! native rendition of the original pin-above-a-line artwork. The marker set
//! is rebuilt wholesale whenever the filtered set changes; hover and
//! selection only swap materials.

use bevy::prelude::*;

use crate::cameras::ViewMode;
use crate::filter::FilteredSet;
use crate::geo::MapFrame;
use crate::interaction::{HoverState, Selection};
use crate::registry::{EntityTag, EntityTags};
use crate::settings::MARKER_POST_HEIGHT_M;
use crate::theme::{
    MARKER_2D_HEAD_SCALE, MARKER_DEFAULT_COLOR, MARKER_HEAD_RADIUS_M, MARKER_HOVERED_COLOR,
    MARKER_POST_WIDTH_M, MARKER_SELECTED_COLOR,
};

/// Component on a marker's root entity (the head). This is the entity the
/// registry tags and the pick surface reports.
#[derive(Component)]
pub struct PropertyMarker {
    pub property_id: String,
}

/// Component on the post child; carries the property id so state coloring
/// does not need to walk the hierarchy.
#[derive(Component)]
pub struct MarkerPost {
    pub property_id: String,
}

/// Shared meshes and the three state materials.
#[derive(Resource)]
pub struct MarkerAssets {
    head_mesh: Handle<Mesh>,
    post_mesh: Handle<Mesh>,
    default_material: Handle<StandardMaterial>,
    hovered_material: Handle<StandardMaterial>,
    selected_material: Handle<StandardMaterial>,
}

impl MarkerAssets {
    fn material_for(&self, hovered: bool, selected: bool) -> Handle<StandardMaterial> {
        if selected {
            self.selected_material.clone()
        } else if hovered {
            self.hovered_material.clone()
        } else {
            self.default_material.clone()
        }
    }
}

pub fn init_marker_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut state_material = |color: Color| {
        materials.add(StandardMaterial {
            base_color: color,
            unlit: true,
            ..default()
        })
    };
    let assets = MarkerAssets {
        default_material: state_material(MARKER_DEFAULT_COLOR),
        hovered_material: state_material(MARKER_HOVERED_COLOR),
        selected_material: state_material(MARKER_SELECTED_COLOR),
        head_mesh: meshes.add(Sphere::new(MARKER_HEAD_RADIUS_M)),
        post_mesh: meshes.add(Cuboid::new(
            MARKER_POST_WIDTH_M,
            MARKER_POST_HEIGHT_M,
            MARKER_POST_WIDTH_M,
        )),
    };
    commands.insert_resource(assets);
}

/// Rebuilds the marker set whenever the filtered set changes. Old markers
/// are despawned and forgotten by the registry first, so a hidden property
/// can be neither picked nor kept alive.
pub fn sync_markers(
    mut commands: Commands,
    filtered: Res<FilteredSet>,
    frame: Res<MapFrame>,
    mode: Res<ViewMode>,
    assets: Res<MarkerAssets>,
    mut tags: ResMut<EntityTags>,
    existing: Query<Entity, With<PropertyMarker>>,
) {
    if !filtered.is_changed() {
        return;
    }
    for entity in &existing {
        tags.forget(entity);
        commands.entity(entity).despawn();
    }
    let (head_scale, post_visibility) = view_mode_iconography(*mode);
    for property in &filtered.properties {
        let head_position =
            frame.to_world(property.coordinates, MARKER_POST_HEIGHT_M as f64);
        let entity = commands
            .spawn((
                Mesh3d(assets.head_mesh.clone()),
                MeshMaterial3d(assets.default_material.clone()),
                Transform::from_translation(head_position)
                    .with_scale(Vec3::splat(head_scale)),
                PropertyMarker {
                    property_id: property.id.clone(),
                },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(assets.post_mesh.clone()),
                    MeshMaterial3d(assets.default_material.clone()),
                    Transform::from_xyz(0.0, -MARKER_POST_HEIGHT_M / 2.0, 0.0),
                    post_visibility,
                    MarkerPost {
                        property_id: property.id.clone(),
                    },
                ));
            })
            .id();
        tags.tag(
            entity,
            EntityTag::PropertyMarker {
                property_id: property.id.clone(),
            },
        );
    }
    debug!("marker set rebuilt: {} markers", filtered.properties.len());
}

/// Applies the state colors: selected beats hovered beats default, on both
/// the head and its post.
pub fn color_markers(
    hover: Res<HoverState>,
    selection: Res<Selection>,
    assets: Res<MarkerAssets>,
    mut heads: Query<
        (&PropertyMarker, &mut MeshMaterial3d<StandardMaterial>),
        Without<MarkerPost>,
    >,
    mut posts: Query<
        (&MarkerPost, &mut MeshMaterial3d<StandardMaterial>),
        Without<PropertyMarker>,
    >,
) {
    if !hover.is_changed() && !selection.is_changed() {
        return;
    }
    let material_for = |id: &str| {
        assets.material_for(
            hover.property.as_deref() == Some(id),
            selection.property.as_deref() == Some(id),
        )
    };
    for (marker, mut material) in &mut heads {
        material.0 = material_for(&marker.property_id);
    }
    for (post, mut material) in &mut posts {
        material.0 = material_for(&post.property_id);
    }
}

fn view_mode_iconography(mode: ViewMode) -> (f32, Visibility) {
    match mode {
        // Posts are invisible from straight above; bigger heads instead.
        ViewMode::TwoD => (MARKER_2D_HEAD_SCALE, Visibility::Hidden),
        ViewMode::ThreeD => (1.0, Visibility::Inherited),
    }
}

/// Re-applies the iconography to live markers when the view mode flips.
pub fn apply_view_mode_iconography(
    mode: Res<ViewMode>,
    mut heads: Query<&mut Transform, With<PropertyMarker>>,
    mut posts: Query<&mut Visibility, With<MarkerPost>>,
) {
    if !mode.is_changed() {
        return;
    }
    let (scale, post_visibility) = view_mode_iconography(*mode);
    for mut transform in &mut heads {
        transform.scale = Vec3::splat(scale);
    }
    for mut visibility in &mut posts {
        *visibility = post_visibility;
    }
}
