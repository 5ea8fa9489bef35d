//! The detail sidebar.
//!
//! Shows the hovered property's transient details while the pointer is
//! over a marker; otherwise the selected property's persistent view, which
//! also carries the classification and note controls. When hover and
//! selection coincide, the selected view wins.

use bevy::prelude::*;

use crate::data::property::Property;
use crate::filter::FilteredSet;
use crate::interaction::{HoverState, Selection};
use crate::storage::{Classifications, Notes};
use crate::theme::{
    hud_text_font, HUD_DIM_TEXT_COLOR, HUD_FONT_SIZE, HUD_TEXT_COLOR,
    PANEL_BACKGROUND_COLOR, PANEL_TITLE_FONT_SIZE,
};
use crate::ui::{format_price, NoteEditor};

#[derive(Component)]
pub struct Sidebar;

#[derive(Component)]
pub struct SidebarTitle;

#[derive(Component)]
pub struct SidebarBody;

#[derive(Component)]
pub struct SidebarNote;

/// Spawns the (initially hidden) sidebar on the right edge.
pub fn spawn_sidebar(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                right: Val::Px(0.0),
                width: Val::Px(320.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND_COLOR),
            Visibility::Hidden,
            Sidebar,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                hud_text_font(PANEL_TITLE_FONT_SIZE),
                TextColor(HUD_TEXT_COLOR),
                SidebarTitle,
            ));
            parent.spawn((
                Text::new(""),
                hud_text_font(HUD_FONT_SIZE),
                TextColor(HUD_TEXT_COLOR),
                SidebarBody,
            ));
            parent.spawn((
                Text::new(""),
                hud_text_font(HUD_FONT_SIZE),
                TextColor(HUD_DIM_TEXT_COLOR),
                SidebarNote,
            ));
        });
}

fn detail_body(property: &Property) -> String {
    let mut body = format!(
        "{}\n{} | {} bedrooms\n{}",
        property.location,
        format_price(property.price),
        property.bedrooms,
        property.provider,
    );
    if let Some(published) = property.published {
        body.push_str(&format!("\nlisted {}", published.format("%Y-%m-%d")));
    }
    if !property.link_url.is_empty() {
        body.push_str(&format!("\n{}", property.link_url));
    }
    body
}

/// Composes the sidebar from the current hover/selection state.
#[allow(clippy::too_many_arguments)]
pub fn update_sidebar(
    hover: Res<HoverState>,
    selection: Res<Selection>,
    filtered: Res<FilteredSet>,
    classifications: Res<Classifications>,
    notes: Res<Notes>,
    editor: Res<NoteEditor>,
    mut panels: Query<&mut Visibility, With<Sidebar>>,
    mut titles: Query<&mut Text, (With<SidebarTitle>, Without<SidebarBody>, Without<SidebarNote>)>,
    mut bodies: Query<&mut Text, (With<SidebarBody>, Without<SidebarTitle>, Without<SidebarNote>)>,
    mut note_lines: Query<&mut Text, (With<SidebarNote>, Without<SidebarTitle>, Without<SidebarBody>)>,
) {
    if !hover.is_changed()
        && !selection.is_changed()
        && !filtered.is_changed()
        && !classifications.is_changed()
        && !notes.is_changed()
        && !editor.is_changed()
    {
        return;
    }

    // A hovered property that differs from the selection takes precedence
    // as a transient preview; otherwise the selected property shows with
    // its controls.
    let selected = selection.property.as_deref().and_then(|id| filtered.get(id));
    let hovered = hover.property.as_deref().and_then(|id| filtered.get(id));
    let (shown, is_selected_view) = match (hovered, selected) {
        (Some(hovered), Some(selected)) if hovered.id != selected.id => (Some(hovered), false),
        (_, Some(selected)) => (Some(selected), true),
        (Some(hovered), None) => (Some(hovered), false),
        (None, None) => (None, false),
    };

    let Some(property) = shown else {
        for mut visibility in &mut panels {
            *visibility = Visibility::Hidden;
        }
        return;
    };

    for mut visibility in &mut panels {
        *visibility = Visibility::Visible;
    }
    for mut text in &mut titles {
        text.0 = property.title.clone();
    }
    for mut text in &mut bodies {
        let mut body = detail_body(property);
        if is_selected_view {
            body.push_str(&format!(
                "\n\nclassification: {}",
                classifications.get(&property.id).display()
            ));
        }
        text.0 = body;
    }
    for mut text in &mut note_lines {
        text.0 = if !is_selected_view {
            String::new()
        } else if editor.active {
            format!("note> {}_", editor.buffer)
        } else {
            let note = notes.map.get(&property.id).map(String::as_str).unwrap_or("");
            if note.is_empty() {
                "no note (N to add)".to_string()
            } else {
                format!("note: {note}")
            }
        };
    }
}
