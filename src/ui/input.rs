//! Keyboard surface: classification, notes, filters, toggles, camera, and
//! the settings actions.
//!
//! Single-letter shortcuts are suspended while a note is being edited; the
//! note editor consumes the raw key stream instead.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use chrono::Utc;

use crate::catchments::CatchmentVisibility;
use crate::cli::CliArgs;
use crate::data::property::Classification;
use crate::filter::{step_price_bound, FilterCriteria};
use crate::flight::{ResetCamera, ToggleViewMode};
use crate::interaction::Selection;
use crate::storage::{CentreOnSelect, Classifications, Notes, Prefs, PrefsReloaded};
use crate::ui::{NoteEditor, SettingsStatus};

/// Consumes the key stream while a note is being edited.
pub fn capture_note_keys(
    mut events: EventReader<KeyboardInput>,
    selection: Res<Selection>,
    mut editor: ResMut<NoteEditor>,
    mut notes: ResMut<Notes>,
) {
    if !editor.active {
        events.clear();
        return;
    }
    // Selection can vanish mid-edit (filter change); abandon the edit.
    let Some(id) = selection.property.clone() else {
        editor.active = false;
        editor.buffer.clear();
        return;
    };
    for event in events.read() {
        if !event.state.is_pressed() {
            continue;
        }
        match &event.logical_key {
            Key::Enter => {
                notes.map.insert(id.clone(), editor.buffer.clone());
                editor.active = false;
                editor.buffer.clear();
            }
            Key::Escape => {
                editor.active = false;
                editor.buffer.clear();
            }
            Key::Backspace => {
                editor.buffer.pop();
            }
            Key::Space => editor.buffer.push(' '),
            Key::Character(text) => editor.buffer.push_str(text.as_str()),
            _ => {}
        }
    }
}

/// N starts editing the selected property's note, seeded with the stored
/// text.
pub fn start_note_edit(
    keys: Res<ButtonInput<KeyCode>>,
    selection: Res<Selection>,
    notes: Res<Notes>,
    mut editor: ResMut<NoteEditor>,
) {
    if editor.active || !keys.just_pressed(KeyCode::KeyN) {
        return;
    }
    let Some(id) = selection.property.as_deref() else {
        return;
    };
    editor.buffer = notes.map.get(id).cloned().unwrap_or_default();
    editor.active = true;
}

/// Escape closes the sidebar (clears the selection only; hover is
/// independent). Runs before the note editor so an Escape that cancels an
/// edit does not also close the sidebar.
pub fn close_sidebar_on_escape(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<NoteEditor>,
    mut selection: ResMut<Selection>,
) {
    if editor.active || !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    if selection.property.is_some() {
        selection.property = None;
    }
}

/// S / U / X classify the selected property.
pub fn classification_keys(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<NoteEditor>,
    selection: Res<Selection>,
    mut classifications: ResMut<Classifications>,
) {
    if editor.active {
        return;
    }
    let Some(id) = selection.property.as_deref() else {
        return;
    };
    let tag = if keys.just_pressed(KeyCode::KeyS) {
        Classification::Shortlist
    } else if keys.just_pressed(KeyCode::KeyU) {
        Classification::Unclassified
    } else if keys.just_pressed(KeyCode::KeyX) {
        Classification::Reject
    } else {
        return;
    };
    info!("classified {id} as {}", tag.display());
    classifications.map.insert(id.to_string(), tag);
}

/// F cycles the classification filter; the bracket keys step the price
/// bounds (shift moves the max bound instead of the min).
pub fn filter_keys(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<NoteEditor>,
    mut criteria: ResMut<FilterCriteria>,
) {
    if editor.active {
        return;
    }
    if keys.just_pressed(KeyCode::KeyF) {
        criteria.classification = criteria.classification.cycled();
    }
    let shift =
        keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);
    for (key, up) in [
        (KeyCode::BracketLeft, false),
        (KeyCode::BracketRight, true),
    ] {
        if !keys.just_pressed(key) {
            continue;
        }
        if shift {
            criteria.max_price = step_price_bound(criteria.max_price, up);
        } else {
            criteria.min_price = step_price_bound(criteria.min_price, up);
        }
    }
}

/// 1 / 2 toggle the catchment tiers; C toggles centre-on-select.
pub fn toggle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<NoteEditor>,
    mut visibility: ResMut<CatchmentVisibility>,
    mut centre: ResMut<CentreOnSelect>,
) {
    if editor.active {
        return;
    }
    if keys.just_pressed(KeyCode::Digit1) {
        visibility.primary = !visibility.primary;
    }
    if keys.just_pressed(KeyCode::Digit2) {
        visibility.secondary = !visibility.secondary;
    }
    if keys.just_pressed(KeyCode::KeyC) {
        centre.0 = !centre.0;
        info!(
            "centre map on selected property: {}",
            if centre.0 { "on" } else { "off" }
        );
    }
}

/// M toggles 2D/3D; H flies home.
pub fn camera_keys(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<NoteEditor>,
    mut toggle_mode: EventWriter<ToggleViewMode>,
    mut reset: EventWriter<ResetCamera>,
) {
    if editor.active {
        return;
    }
    if keys.just_pressed(KeyCode::KeyM) {
        toggle_mode.write(ToggleViewMode);
    }
    if keys.just_pressed(KeyCode::KeyH) {
        reset.write(ResetCamera);
    }
}

/// E exports the preference store; I re-imports the `--import` file. An
/// import failure surfaces as a settings message and writes nothing.
pub fn settings_keys(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<NoteEditor>,
    args: Res<CliArgs>,
    mut prefs: ResMut<Prefs>,
    mut status: ResMut<SettingsStatus>,
    mut reloaded: EventWriter<PrefsReloaded>,
) {
    if editor.active {
        return;
    }
    if keys.just_pressed(KeyCode::KeyE) {
        match prefs.export_to_file(Utc::now()) {
            Ok(name) => {
                info!("exported preferences to {name}");
                status.info(format!("exported {name}"));
            }
            Err(err) => {
                error!("export failed: {err:#}");
                status.error(format!("export failed: {err}"));
            }
        }
    }
    if keys.just_pressed(KeyCode::KeyI) {
        let Some(path) = args.import.as_ref() else {
            status.info("no import file configured (start with --import)");
            return;
        };
        let applied = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| prefs.import_document(&text));
        match applied {
            Ok(applied_keys) => {
                info!(
                    "imported {} preference keys from {}",
                    applied_keys.len(),
                    path.display()
                );
                status.info(format!("imported {} keys", applied_keys.len()));
                reloaded.write(PrefsReloaded);
            }
            Err(err) => {
                error!("import failed: {err:#}");
                status.error(format!("import failed: {err}"));
            }
        }
    }
}
