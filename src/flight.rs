//! Camera flights: the fly-to sequencing and animation.
//!
//! Flying to a property is the one genuinely asynchronous flow in the app:
//! the target's surface height is resolved on the compute pool, and only
//! when that completes (or misses) does the flight itself start. Reset and
//! view-mode changes fly directly with no height lookup.
//!
//! Overlapping flights are not cancelled: whichever flight *starts* last
//! replaces the active one, exactly like the underlying engine's
//! camera-animation replacement. A stale height lookup resolving after a
//! newer flight began will therefore still win. Flights are rare and
//! user-triggered; this is a documented non-guarantee, not a bug to fix
//! here.

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task};

use crate::cameras::{CameraRig, MapCamera, ViewMode};
use crate::geo::{GeoPoint, MapFrame};
use crate::settings::{
    FLY_TO_DURATION_SECS, FLY_TO_RANGE_M, RESET_DURATION_SECS, VIEW_MODE_DURATION_SECS,
};
use crate::terrain::Terrain;

// Events /////////////////////////////////////////////////////////////////////

/// Centre the camera on a property's position.
#[derive(Event, Debug, Clone, Copy)]
pub struct FlyToProperty {
    pub target: GeoPoint,
}

/// Return to the initial framing.
#[derive(Event, Debug, Default)]
pub struct ResetCamera;

/// Switch between 3D orbit and constrained 2D, recentring on the current
/// look-at at the current range.
#[derive(Event, Debug, Default)]
pub struct ToggleViewMode;

// Flight state ///////////////////////////////////////////////////////////////

/// An in-progress smooth transition between two rigs.
#[derive(Debug, Clone, Copy)]
pub struct CameraFlight {
    pub from: CameraRig,
    pub to: CameraRig,
    pub duration: f32,
    pub elapsed: f32,
}

/// At most one flight is active; starting a new one replaces it.
#[derive(Resource, Debug, Default)]
pub struct ActiveFlight(pub Option<CameraFlight>);

impl ActiveFlight {
    pub fn start(&mut self, from: CameraRig, to: CameraRig, duration: f32) {
        self.0 = Some(CameraFlight {
            from,
            to,
            duration,
            elapsed: 0.0,
        });
    }
}

/// A height lookup racing toward a flight start.
#[derive(Component)]
pub struct PendingClamp {
    task: Task<Option<f64>>,
    target: GeoPoint,
}

// Pure flight math ///////////////////////////////////////////////////////////

/// The classic smooth-step ease, matching the engine's default flight
/// easing closely enough that nobody has asked for better.
pub fn smooth_step(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Interpolates headings along the shorter arc so a 350°→10° flight does
/// not spin the long way round.
pub fn lerp_heading(from: f32, to: f32, t: f32) -> f32 {
    use std::f32::consts::TAU;
    let mut delta = (to - from) % TAU;
    if delta > TAU / 2.0 {
        delta -= TAU;
    } else if delta < -TAU / 2.0 {
        delta += TAU;
    }
    from + delta * t
}

/// Blends two rigs at progress `t` (already eased).
pub fn blend(from: &CameraRig, to: &CameraRig, t: f32) -> CameraRig {
    CameraRig {
        look_at: from.look_at.lerp(to.look_at, t),
        heading: lerp_heading(from.heading, to.heading, t),
        pitch: from.pitch + (to.pitch - from.pitch) * t,
        range: from.range + (to.range - from.range) * t,
    }
}

/// Resolves the world-space flight target from a geographic position and
/// the height lookup's result: the clamped height when one came back, else
/// the bare position at ground level.
pub fn flight_target(frame: &MapFrame, target: GeoPoint, clamped: Option<f64>) -> Vec3 {
    frame.to_world(target, clamped.unwrap_or(0.0))
}

/// The rig that frames a property: heading preserved in 3D (forced north
/// in 2D), the fly-to pitch, and the fixed close-in range.
pub fn property_framing(current: &CameraRig, mode: ViewMode, look_at: Vec3) -> CameraRig {
    CameraRig {
        look_at,
        heading: mode.heading_for(current.heading),
        pitch: mode.fly_pitch(),
        range: FLY_TO_RANGE_M,
    }
}

/// The rig for a generic recentre (view-mode switch): stays on the current
/// look-at and keeps the current range rather than the fixed fly-to range.
pub fn recenter_framing(current: &CameraRig, mode: ViewMode) -> CameraRig {
    CameraRig {
        look_at: current.look_at,
        heading: mode.heading_for(current.heading),
        pitch: mode.default_pitch(),
        range: current.range,
    }
}

// Systems ////////////////////////////////////////////////////////////////////

/// Starts the height lookup for each fly-to request. With no camera in the
/// scene yet the whole operation is silently dropped.
pub fn begin_fly_to(
    mut commands: Commands,
    mut requests: EventReader<FlyToProperty>,
    terrain: Res<Terrain>,
    cameras: Query<(), With<MapCamera>>,
) {
    for request in requests.read() {
        if cameras.is_empty() {
            debug!("fly-to dropped: map camera not ready");
            continue;
        }
        let sampler = terrain.0.clone();
        let target = request.target;
        let task = AsyncComputeTaskPool::get().spawn(async move { sampler.sample(target) });
        commands.spawn(PendingClamp { task, target });
    }
}

/// Polls height lookups and starts the flight for each one that finishes.
pub fn resolve_clamp_tasks(
    mut commands: Commands,
    mut pending: Query<(Entity, &mut PendingClamp)>,
    frame: Res<MapFrame>,
    mode: Res<ViewMode>,
    rig: Res<CameraRig>,
    mut active: ResMut<ActiveFlight>,
) {
    for (entity, mut clamp) in &mut pending {
        let Some(clamped) = block_on(future::poll_once(&mut clamp.task)) else {
            continue;
        };
        let look_at = flight_target(&frame, clamp.target, clamped);
        let to = property_framing(&rig, *mode, look_at);
        active.start(*rig, to, FLY_TO_DURATION_SECS);
        commands.entity(entity).despawn();
    }
}

/// Flies back to the initial framing; no height lookup involved.
pub fn handle_reset(
    mut requests: EventReader<ResetCamera>,
    frame: Res<MapFrame>,
    mode: Res<ViewMode>,
    rig: Res<CameraRig>,
    cameras: Query<(), With<MapCamera>>,
    mut active: ResMut<ActiveFlight>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    if cameras.is_empty() {
        return;
    }
    active.start(
        *rig,
        CameraRig::initial(&frame, *mode),
        RESET_DURATION_SECS,
    );
}

/// Switches 2D/3D and recentres with the current range preserved.
pub fn handle_view_mode_toggle(
    mut requests: EventReader<ToggleViewMode>,
    mut mode: ResMut<ViewMode>,
    rig: Res<CameraRig>,
    cameras: Query<(), With<MapCamera>>,
    mut active: ResMut<ActiveFlight>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    if cameras.is_empty() {
        return;
    }
    *mode = mode.toggled();
    info!("view mode: {}", mode.display());
    active.start(
        *rig,
        recenter_framing(&rig, *mode),
        VIEW_MODE_DURATION_SECS,
    );
}

/// Advances the active flight and writes the blended rig.
pub fn advance_flight(
    time: Res<Time>,
    mut active: ResMut<ActiveFlight>,
    mut rig: ResMut<CameraRig>,
) {
    let Some(flight) = active.0.as_mut() else {
        return;
    };
    flight.elapsed += time.delta_secs();
    if flight.duration <= 0.0 || flight.elapsed >= flight.duration {
        *rig = flight.to;
        active.0 = None;
        return;
    }
    let t = smooth_step(flight.elapsed / flight.duration);
    *rig = blend(&flight.from, &flight.to, t);
}
