//! Geographic coordinate frame for the map scene.
//!
//! Properties and catchment features arrive as latitude/longitude pairs in
//! degrees. The scene itself works in a local metric frame: a simple
//! equirectangular projection centred on a fixed origin, with +X pointing
//! east, +Y up, and -Z pointing north (Bevy's forward convention). At the
//! neighbourhood scale this app operates on, the projection error is well
//! below one marker radius.

use bevy::prelude::*;

/// Metres per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The local projection frame shared by markers, picking, and the camera.
///
/// The origin is fixed at app start; every geographic coordinate is expressed
/// as metres east/north of it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MapFrame {
    pub origin: GeoPoint,
}

impl MapFrame {
    pub fn new(origin: GeoPoint) -> Self {
        Self { origin }
    }

    /// Projects a geographic position into the scene at the given height
    /// (metres above the ground plane).
    pub fn to_world(&self, point: GeoPoint, height: f64) -> Vec3 {
        let east = (point.longitude - self.origin.longitude)
            * METERS_PER_DEGREE
            * self.origin.latitude.to_radians().cos();
        let north = (point.latitude - self.origin.latitude) * METERS_PER_DEGREE;
        Vec3::new(east as f32, height as f32, -north as f32)
    }

    /// Inverse of [`to_world`](Self::to_world); height is discarded.
    pub fn to_geo(&self, world: Vec3) -> GeoPoint {
        let east = world.x as f64;
        let north = -world.z as f64;
        let latitude = self.origin.latitude + north / METERS_PER_DEGREE;
        let longitude = self.origin.longitude
            + east / (METERS_PER_DEGREE * self.origin.latitude.to_radians().cos());
        GeoPoint::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: GeoPoint = GeoPoint::new(57.118, -2.170);

    #[test]
    fn origin_projects_to_scene_centre() {
        let frame = MapFrame::new(ORIGIN);
        let world = frame.to_world(ORIGIN, 25.0);
        assert!(world.x.abs() < 1e-6 && world.z.abs() < 1e-6);
        assert_eq!(world.y, 25.0);
    }

    #[test]
    fn north_is_negative_z() {
        let frame = MapFrame::new(ORIGIN);
        let north_of_origin = GeoPoint::new(ORIGIN.latitude + 0.01, ORIGIN.longitude);
        let world = frame.to_world(north_of_origin, 0.0);
        assert!(world.z < 0.0, "a point north of the origin should sit at -Z");
        assert!((world.z.abs() - 1113.2).abs() < 1.0);
    }

    #[test]
    fn round_trips_within_a_centimetre() {
        let frame = MapFrame::new(ORIGIN);
        let point = GeoPoint::new(57.1312, -2.1038);
        let back = frame.to_geo(frame.to_world(point, 12.0));
        assert!((back.latitude - point.latitude).abs() < 1e-7);
        assert!((back.longitude - point.longitude).abs() < 1e-7);
    }
}
