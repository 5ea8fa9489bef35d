// Creates the app and adds the plugins, resources, and systems
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::winit::WinitSettings;

use crate::cameras::{CameraRig, ViewMode};
use crate::cli::CliArgs;
use crate::data::property::PropertyCatalog;
use crate::filter::FilteredSet;
use crate::flight::ActiveFlight;
use crate::geo::MapFrame;
use crate::interaction::{HoverState, Selection};
use crate::plugins::PerchSystems;
use crate::registry::EntityTags;
use crate::settings::INITIAL_LOOK_AT;
use crate::storage::{load_stored_state, FilePrefs, MemoryPrefs, Prefs};
use crate::terrain::Terrain;
use crate::theme::BACKGROUND_COLOR;
use crate::ui::{NoteEditor, SettingsStatus};

// Create the app and add the plugins and systems
pub fn create_app(args: CliArgs) -> App {
    let mut app = App::new();

    let window_config = Window {
        title: "Perch".into(),
        resolution: (1280., 800.).into(),
        ..default()
    };

    let window_plugin = WindowPlugin {
        primary_window: Some(window_config),
        ..default()
    };

    // The preference store opens before the app runs; a broken store file
    // degrades to an in-memory session rather than refusing to start.
    let mut prefs = match FilePrefs::open(args.prefs_path()) {
        Ok(store) => Prefs::new(store),
        Err(err) => {
            warn!("preference store unavailable, running in-memory: {err:#}");
            Prefs::new(MemoryPrefs::default())
        }
    };

    // --import applies before any state is read, so the whole app starts
    // from the imported preferences (the import-forces-reload contract).
    if let Some(path) = &args.import {
        let applied = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| prefs.import_document(&text));
        match applied {
            Ok(keys) => info!("imported {} preference keys from {}", keys.len(), path.display()),
            Err(err) => error!("startup import failed, keeping stored preferences: {err:#}"),
        }
    }

    let (classifications, notes, criteria, visibility, centre) = load_stored_state(&prefs);
    let frame = MapFrame::new(INITIAL_LOOK_AT);
    let view_mode = ViewMode::default();
    let rig = CameraRig::initial(&frame, view_mode);

    app.insert_resource(WinitSettings::desktop_app())
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .add_plugins(
            DefaultPlugins
                .set(window_plugin)
                // The custom tracing subscriber from logger.rs is already
                // installed by main.
                .disable::<LogPlugin>(),
        )
        .insert_resource(args)
        .insert_resource(prefs)
        .insert_resource(classifications)
        .insert_resource(notes)
        .insert_resource(criteria)
        .insert_resource(visibility)
        .insert_resource(centre)
        .insert_resource(frame)
        .insert_resource(view_mode)
        .insert_resource(rig)
        .init_resource::<PropertyCatalog>()
        .init_resource::<FilteredSet>()
        .init_resource::<EntityTags>()
        .init_resource::<HoverState>()
        .init_resource::<Selection>()
        .init_resource::<ActiveFlight>()
        .init_resource::<Terrain>()
        .init_resource::<NoteEditor>()
        .init_resource::<SettingsStatus>()
        .add_plugins(PerchSystems);

    app
}
