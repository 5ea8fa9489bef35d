//! Camera system for the map view.
//!
//! The camera is an orbit rig: a look-at point on the map plus heading,
//! pitch, and range. Everything that moves the camera (flights, zoom,
//! the 2D/3D mode switch) works on the rig; a sync system derives the
//! actual camera transform from it each frame.
//!
//! Two viewing modes are supported:
//! - 3D orbit: free heading, shallow default pitch
//! - constrained 2D: heading locked north-up, pitch locked straight down

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use crate::geo::MapFrame;
use crate::settings::{
    CAMERA_ZOOM_STEP_M, DEFAULT_3D_PITCH_DEG, FIXED_2D_PITCH_DEG, FLY_TO_PITCH_DEG,
    INITIAL_CAMERA_HEADING_DEG, INITIAL_CAMERA_RANGE_M, INITIAL_LOOK_AT,
    INITIAL_LOOK_AT_HEIGHT_M, MAX_CAMERA_RANGE_M, MIN_CAMERA_RANGE_M, NORTH_HEADING_DEG,
    WHEEL_ZOOM_FACTOR,
};

/// Component that marks the map camera.
#[derive(Component)]
pub struct MapCamera;

/// Global viewing mode. Not persisted; every session starts in 3D.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    TwoD,
    #[default]
    ThreeD,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::TwoD => ViewMode::ThreeD,
            ViewMode::ThreeD => ViewMode::TwoD,
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            ViewMode::TwoD => "2D",
            ViewMode::ThreeD => "3D",
        }
    }

    /// 2D mode disallows rotation: any requested heading collapses to
    /// north-up.
    pub fn heading_for(self, preserved: f32) -> f32 {
        match self {
            ViewMode::TwoD => NORTH_HEADING_DEG.to_radians(),
            ViewMode::ThreeD => preserved,
        }
    }

    /// Pitch used when framing a specific property.
    pub fn fly_pitch(self) -> f32 {
        match self {
            ViewMode::TwoD => FIXED_2D_PITCH_DEG.to_radians(),
            ViewMode::ThreeD => FLY_TO_PITCH_DEG.to_radians(),
        }
    }

    /// Pitch used for the initial framing and generic recentring.
    pub fn default_pitch(self) -> f32 {
        match self {
            ViewMode::TwoD => FIXED_2D_PITCH_DEG.to_radians(),
            ViewMode::ThreeD => DEFAULT_3D_PITCH_DEG.to_radians(),
        }
    }
}

/// The orbit rig the camera transform is derived from. Heading and pitch
/// are radians; heading 0 faces north, pitch is negative looking down.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub look_at: Vec3,
    pub heading: f32,
    pub pitch: f32,
    pub range: f32,
}

impl CameraRig {
    /// The framing the app starts with and the reset action returns to.
    pub fn initial(frame: &MapFrame, mode: ViewMode) -> Self {
        Self {
            look_at: frame.to_world(INITIAL_LOOK_AT, INITIAL_LOOK_AT_HEIGHT_M),
            heading: mode.heading_for(INITIAL_CAMERA_HEADING_DEG.to_radians()),
            pitch: mode.default_pitch(),
            range: INITIAL_CAMERA_RANGE_M,
        }
    }

    /// Derives the camera transform. The eye sits `range` metres from the
    /// look-at point, behind the facing direction and raised by the pitch.
    pub fn transform(&self) -> Transform {
        // Facing direction on the ground plane; north is -Z.
        let facing = Vec3::new(self.heading.sin(), 0.0, -self.heading.cos());
        let horizontal = self.range * self.pitch.cos();
        let vertical = self.range * (-self.pitch).sin();
        let eye = self.look_at - facing * horizontal + Vec3::Y * vertical;
        // Straight down the usual up vector degenerates; use the facing
        // direction so "up" on screen stays north in 2D mode.
        let up = if self.pitch < (-89.0f32).to_radians() {
            facing
        } else {
            Vec3::Y
        };
        Transform::from_translation(eye).looking_at(self.look_at, up)
    }

    pub fn with_range(self, range: f32) -> Self {
        Self {
            range: range.clamp(MIN_CAMERA_RANGE_M, MAX_CAMERA_RANGE_M),
            ..self
        }
    }
}

/// Spawns the map camera at the initial framing.
pub fn spawn_map_camera(commands: &mut Commands, rig: &CameraRig) {
    commands.spawn((Camera3d::default(), rig.transform(), MapCamera));
}

/// Writes the rig-derived transform to the camera whenever the rig moves.
pub fn sync_camera_to_rig(
    rig: Res<CameraRig>,
    mut cameras: Query<&mut Transform, With<MapCamera>>,
) {
    if !rig.is_changed() {
        return;
    }
    for mut transform in &mut cameras {
        *transform = rig.transform();
    }
}

/// Keyboard zoom: plus/minus step the orbit range, matching the on-screen
/// zoom buttons of the original layout.
pub fn camera_zoom_keys(
    keys: Res<ButtonInput<KeyCode>>,
    note_editor: Res<crate::ui::NoteEditor>,
    cameras: Query<(), With<MapCamera>>,
    mut rig: ResMut<CameraRig>,
) {
    if note_editor.active || cameras.is_empty() {
        return;
    }
    let mut step = 0.0;
    if keys.just_pressed(KeyCode::Equal) || keys.just_pressed(KeyCode::NumpadAdd) {
        step -= CAMERA_ZOOM_STEP_M;
    }
    if keys.just_pressed(KeyCode::Minus) || keys.just_pressed(KeyCode::NumpadSubtract) {
        step += CAMERA_ZOOM_STEP_M;
    }
    if step != 0.0 {
        *rig = rig.with_range(rig.range + step);
    }
}

/// Scroll-wheel zoom scales the range multiplicatively.
pub fn camera_wheel_zoom(
    mut wheel: EventReader<MouseWheel>,
    cameras: Query<(), With<MapCamera>>,
    mut rig: ResMut<CameraRig>,
) {
    if cameras.is_empty() {
        return;
    }
    for event in wheel.read() {
        if event.y > 0.0 {
            *rig = rig.with_range(rig.range * WHEEL_ZOOM_FACTOR);
        } else if event.y < 0.0 {
            *rig = rig.with_range(rig.range / WHEEL_ZOOM_FACTOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, MapFrame};

    fn frame() -> MapFrame {
        MapFrame::new(GeoPoint::new(57.118, -2.170))
    }

    #[test]
    fn eye_sits_range_metres_from_the_look_at() {
        let rig = CameraRig::initial(&frame(), ViewMode::ThreeD);
        let transform = rig.transform();
        let distance = transform.translation.distance(rig.look_at);
        assert!(
            (distance - rig.range).abs() < 0.01,
            "expected {} got {distance}",
            rig.range
        );
    }

    #[test]
    fn two_d_mode_puts_the_eye_straight_above() {
        let rig = CameraRig::initial(&frame(), ViewMode::TwoD);
        let transform = rig.transform();
        let offset = transform.translation - rig.look_at;
        assert!(offset.x.abs() < 0.1 && offset.z.abs() < 0.1);
        assert!((offset.y - rig.range).abs() < 0.1);
    }

    #[test]
    fn north_heading_places_the_eye_south_of_the_target() {
        let rig = CameraRig {
            look_at: Vec3::ZERO,
            heading: 0.0,
            pitch: (-20.0f32).to_radians(),
            range: 100.0,
        };
        // South is +Z in this frame.
        assert!(rig.transform().translation.z > 0.0);
    }

    #[test]
    fn two_d_mode_forces_north_up() {
        assert_eq!(ViewMode::TwoD.heading_for(1.23), 0.0);
        assert_eq!(ViewMode::ThreeD.heading_for(1.23), 1.23);
    }

    #[test]
    fn range_is_clamped() {
        let rig = CameraRig::initial(&frame(), ViewMode::ThreeD);
        assert_eq!(rig.with_range(1.0).range, MIN_CAMERA_RANGE_M);
        assert_eq!(rig.with_range(1e9).range, MAX_CAMERA_RANGE_M);
    }
}
