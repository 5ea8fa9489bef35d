//! Scene setup: map camera, lighting, ground plane, reference grid.

use bevy::prelude::*;

use crate::cameras::{spawn_map_camera, CameraRig};
use crate::theme::{GRID_COLOR, GROUND_COLOR};

const GROUND_SIZE_M: f32 = 12_000.0;
const GRID_EXTENT_M: f32 = 2_000.0;
const GRID_SPACING_M: f32 = 250.0;

pub fn setup(
    mut commands: Commands,
    rig: Res<CameraRig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_map_camera(&mut commands, &rig);

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 4_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -1.1, 0.4, 0.0)),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE_M, GROUND_SIZE_M))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: GROUND_COLOR,
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
    ));
}

/// A faint reference grid around the initial look-at.
pub fn draw_grid(mut gizmos: Gizmos) {
    let mut offset = -GRID_EXTENT_M;
    while offset <= GRID_EXTENT_M {
        gizmos.line(
            Vec3::new(offset, 0.1, -GRID_EXTENT_M),
            Vec3::new(offset, 0.1, GRID_EXTENT_M),
            GRID_COLOR,
        );
        gizmos.line(
            Vec3::new(-GRID_EXTENT_M, 0.1, offset),
            Vec3::new(GRID_EXTENT_M, 0.1, offset),
            GRID_COLOR,
        );
        offset += GRID_SPACING_M;
    }
}
