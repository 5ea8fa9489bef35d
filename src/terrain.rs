//! Surface height resolution for camera targets.
//!
//! Flying to a property frames it at its true elevation when the scene
//! knows one. The lookup is asynchronous from the camera controller's point
//! of view (it runs on the compute pool and may finish after the user has
//! moved on) and may yield nothing for positions outside loaded coverage,
//! in which case the caller falls back to the unclamped position.

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::geo::GeoPoint;

/// Resolves a geographic position against the most detailed surface data
/// available. `None` means the position is outside coverage.
pub trait HeightSampler: Send + Sync + 'static {
    fn sample(&self, point: GeoPoint) -> Option<f64>;
}

/// The default sampler: no surface data loaded, every query misses and the
/// camera flies to ground level.
pub struct NoTerrain;

impl HeightSampler for NoTerrain {
    fn sample(&self, _point: GeoPoint) -> Option<f64> {
        None
    }
}

/// A sampler backed by a fixed table, quantized to ~0.1 m of position.
/// Used by tests and demo scenes.
#[derive(Default)]
pub struct StaticHeights {
    heights: HashMap<(i64, i64), f64>,
}

impl StaticHeights {
    pub fn insert(&mut self, point: GeoPoint, height: f64) {
        self.heights.insert(quantize(point), height);
    }
}

impl HeightSampler for StaticHeights {
    fn sample(&self, point: GeoPoint) -> Option<f64> {
        self.heights.get(&quantize(point)).copied()
    }
}

fn quantize(point: GeoPoint) -> (i64, i64) {
    (
        (point.latitude * 1e6).round() as i64,
        (point.longitude * 1e6).round() as i64,
    )
}

/// The scene's active sampler, shared with clamp tasks on the compute pool.
#[derive(Resource, Clone)]
pub struct Terrain(pub Arc<dyn HeightSampler>);

impl Default for Terrain {
    fn default() -> Self {
        Self(Arc::new(NoTerrain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_terrain_always_misses() {
        assert_eq!(NoTerrain.sample(GeoPoint::new(57.1, -2.1)), None);
    }

    #[test]
    fn static_heights_hit_at_the_sampled_position() {
        let mut sampler = StaticHeights::default();
        let point = GeoPoint::new(57.118, -2.170);
        sampler.insert(point, 42.5);
        assert_eq!(sampler.sample(point), Some(42.5));
        assert_eq!(sampler.sample(GeoPoint::new(57.2, -2.170)), None);
    }
}
