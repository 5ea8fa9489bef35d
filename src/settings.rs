// Settings ///////////////////////////////////////////////////////////////////
// This module contains the non-visual tunables for the app.

use crate::geo::GeoPoint;

// Initial Camera Framing /////////////////////////////////////////////////////

/// Where the camera looks when the app starts (Aberdeen harbour area).
pub const INITIAL_LOOK_AT: GeoPoint = GeoPoint::new(57.118, -2.170);
/// Height of the initial look-at point above the ground plane, in metres.
pub const INITIAL_LOOK_AT_HEIGHT_M: f64 = 25.0;
pub const INITIAL_CAMERA_HEADING_DEG: f32 = 275.0;
pub const INITIAL_CAMERA_RANGE_M: f32 = 750.0;

// Camera Orientation /////////////////////////////////////////////////////////

pub const DEFAULT_3D_PITCH_DEG: f32 = -20.0;
/// 2D mode looks straight down and is never allowed to rotate.
pub const FIXED_2D_PITCH_DEG: f32 = -90.0;
pub const NORTH_HEADING_DEG: f32 = 0.0;

// Camera Flights /////////////////////////////////////////////////////////////

pub const FLY_TO_PITCH_DEG: f32 = -25.0;
pub const FLY_TO_RANGE_M: f32 = 100.0; // metres
pub const FLY_TO_DURATION_SECS: f32 = 1.0;
pub const RESET_DURATION_SECS: f32 = 0.8;
pub const VIEW_MODE_DURATION_SECS: f32 = 1.0;

// Camera Zoom ////////////////////////////////////////////////////////////////

/// Range change per zoom key press, in metres.
pub const CAMERA_ZOOM_STEP_M: f32 = 200.0;
/// Range multiplier per scroll-wheel notch (inverted for zooming out).
pub const WHEEL_ZOOM_FACTOR: f32 = 0.88;
pub const MIN_CAMERA_RANGE_M: f32 = 30.0;
pub const MAX_CAMERA_RANGE_M: f32 = 6_000.0;

// Picking ////////////////////////////////////////////////////////////////////

/// Screen-space radius for marker hit testing, in logical pixels.
pub const MARKER_PICK_RADIUS_PX: f32 = 12.0;

// Markers ////////////////////////////////////////////////////////////////////

/// Markers float this far above the ground, connected by a post.
pub const MARKER_POST_HEIGHT_M: f32 = 30.0;

// Filters ////////////////////////////////////////////////////////////////////

/// The price ladder the min/max bound keys step through.
pub const PRICE_STEPS: [i64; 12] = [
    50_000, 100_000, 200_000, 300_000, 400_000, 500_000, 600_000, 700_000,
    800_000, 900_000, 1_000_000, 2_000_000,
];

// File Defaults //////////////////////////////////////////////////////////////

pub const DEFAULT_PROPERTIES_FILE: &str = "data/properties.json";
pub const DEFAULT_PRIMARY_CATCHMENTS_FILE: &str =
    "data/primary-school-catchments.geojson";
pub const DEFAULT_SECONDARY_CATCHMENTS_FILE: &str =
    "data/secondary-school-catchments.geojson";
pub const DEFAULT_PREFS_FILE: &str = "perch-prefs.json";
