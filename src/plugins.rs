use bevy::prelude::*;

use crate::data::loader::CatchmentDocReady;
use crate::flight::{FlyToProperty, ResetCamera, ToggleViewMode};
use crate::storage::PrefsReloaded;
use crate::{cameras, catchments, data, filter, flight, interaction, markers, setup, storage, ui};

/// Plugin for data loading and catchment overlay entities
pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CatchmentDocReady>()
            .add_systems(Startup, data::loader::begin_data_loads)
            .add_systems(
                Update,
                (
                    data::loader::poll_property_load,
                    data::loader::poll_catchment_loads,
                    catchments::spawn_catchments,
                )
                    .chain(),
            );
    }
}

/// Plugin for scene setup and the rendered marker/overlay state
pub struct MapScenePlugin;

impl Plugin for MapScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (markers::init_marker_assets, setup::setup))
            .add_systems(
                Update,
                (
                    markers::color_markers,
                    markers::apply_view_mode_iconography,
                    catchments::draw_catchments,
                    setup::draw_grid,
                ),
            );
    }
}

/// Plugin for picking, hover, selection, and filtering.
///
/// The recompute → invalidate → marker-rebuild chain keeps the selection
/// invariant: whenever the filtered set changes, a selection outside it is
/// cleared before anything renders against the new set.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (
                    filter::recompute_filtered,
                    interaction::invalidate_selection,
                    markers::sync_markers,
                )
                    .chain(),
                interaction::systems::hover_on_pointer_move,
                interaction::systems::select_on_click,
            ),
        );
    }
}

/// Plugin for camera zoom and flights
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FlyToProperty>()
            .add_event::<ResetCamera>()
            .add_event::<ToggleViewMode>()
            .add_systems(
                Update,
                (
                    cameras::camera_zoom_keys,
                    cameras::camera_wheel_zoom,
                    (
                        flight::begin_fly_to,
                        flight::resolve_clamp_tasks,
                        flight::handle_reset,
                        flight::handle_view_mode_toggle,
                        flight::advance_flight,
                        cameras::sync_camera_to_rig,
                    )
                        .chain(),
                ),
            );
    }
}

/// Plugin for the HUD, sidebar, and keyboard surface
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (ui::hud::spawn_hud, ui::panel::spawn_sidebar))
            .add_systems(
                Update,
                (
                    // Escape must close the sidebar only when it did not
                    // just cancel a note edit, and starting an edit must
                    // not swallow that same keypress into the buffer.
                    (
                        ui::input::close_sidebar_on_escape,
                        ui::input::capture_note_keys,
                        ui::input::start_note_edit,
                    )
                        .chain(),
                    ui::input::classification_keys,
                    ui::input::filter_keys,
                    ui::input::toggle_keys,
                    ui::input::camera_keys,
                    ui::input::settings_keys,
                    ui::hud::update_status_line,
                    ui::hud::update_catchment_tooltip,
                    ui::hud::update_settings_message,
                    ui::panel::update_sidebar,
                ),
            );
    }
}

/// Plugin for preference persistence
pub struct StoragePlugin;

impl Plugin for StoragePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PrefsReloaded>().add_systems(
            Update,
            (
                storage::persist_classifications,
                storage::persist_notes,
                storage::persist_filter_criteria,
                storage::persist_view_toggles,
                storage::reload_after_import,
            ),
        );
    }
}

/// Main application plugin that bundles all internal plugins
pub struct PerchSystems;

impl Plugin for PerchSystems {
    fn build(&self, app: &mut App) {
        app.add_plugins(DataPlugin)
            .add_plugins(MapScenePlugin)
            .add_plugins(InteractionPlugin)
            .add_plugins(CameraPlugin)
            .add_plugins(UiPlugin)
            .add_plugins(StoragePlugin);
    }
}
