//! The HUD: status line, catchment tooltip, settings message, help line.

use bevy::prelude::*;

use crate::cameras::ViewMode;
use crate::catchments::CatchmentVisibility;
use crate::data::property::PropertyCatalog;
use crate::filter::{FilterCriteria, FilteredSet};
use crate::interaction::HoverState;
use crate::theme::{
    hud_text_font, HUD_DIM_TEXT_COLOR, HUD_ERROR_TEXT_COLOR, HUD_FONT_SIZE, HUD_TEXT_COLOR,
};
use crate::ui::{format_price, SettingsStatus};

/// Offset of the tooltip from the pointer, in logical pixels.
const TOOLTIP_OFFSET: Vec2 = Vec2::new(14.0, 18.0);

#[derive(Component)]
pub struct StatusLine;

#[derive(Component)]
pub struct SettingsMessageLine;

#[derive(Component)]
pub struct CatchmentTooltip;

#[derive(Component)]
pub struct HelpLine;

/// Spawns every HUD element.
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        hud_text_font(HUD_FONT_SIZE),
        TextColor(HUD_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        StatusLine,
    ));
    commands.spawn((
        Text::new(""),
        hud_text_font(HUD_FONT_SIZE),
        TextColor(HUD_ERROR_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(28.0),
            left: Val::Px(8.0),
            ..default()
        },
        SettingsMessageLine,
    ));
    commands.spawn((
        Text::new(""),
        hud_text_font(HUD_FONT_SIZE),
        TextColor(HUD_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(0.0),
            left: Val::Px(0.0),
            ..default()
        },
        Visibility::Hidden,
        CatchmentTooltip,
    ));
    commands.spawn((
        Text::new(
            "click: select   S/U/X: classify   N: note   F: filter   [ ] { }: price   \
             1/2: catchments   C: centre   M: 2D/3D   +/-: zoom   H: reset   E: export",
        ),
        hud_text_font(HUD_FONT_SIZE - 2.0),
        TextColor(HUD_DIM_TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        HelpLine,
    ));
}

/// Keeps the status line current: filter summary, counts, view state.
pub fn update_status_line(
    catalog: Res<PropertyCatalog>,
    filtered: Res<FilteredSet>,
    criteria: Res<FilterCriteria>,
    visibility: Res<CatchmentVisibility>,
    mode: Res<ViewMode>,
    mut lines: Query<&mut Text, With<StatusLine>>,
) {
    if !catalog.is_changed()
        && !filtered.is_changed()
        && !criteria.is_changed()
        && !visibility.is_changed()
        && !mode.is_changed()
    {
        return;
    }
    let min = criteria
        .min_price
        .map(format_price)
        .unwrap_or_else(|| "any".to_string());
    let max = criteria
        .max_price
        .map(format_price)
        .unwrap_or_else(|| "any".to_string());
    let overlays = match (visibility.primary, visibility.secondary) {
        (true, true) => "primary+secondary",
        (true, false) => "primary",
        (false, true) => "secondary",
        (false, false) => "off",
    };
    let summary = format!(
        "{} of {} properties | filter: {} | price: {min}..{max} | catchments: {overlays} | {}",
        filtered.properties.len(),
        catalog.properties.len(),
        criteria.classification.display(),
        mode.display(),
    );
    for mut text in &mut lines {
        text.0 = summary.clone();
    }
}

/// Shows the joined catchment names next to the pointer while hovering an
/// overlay.
pub fn update_catchment_tooltip(
    hover: Res<HoverState>,
    mut moves: EventReader<CursorMoved>,
    mut tooltips: Query<(&mut Node, &mut Text, &mut Visibility), With<CatchmentTooltip>>,
) {
    let position = moves.read().last().map(|event| event.position);
    for (mut node, mut text, mut visibility) in &mut tooltips {
        match hover.catchment_label.as_deref() {
            Some(label) => {
                if hover.is_changed() {
                    text.0 = label.to_string();
                }
                *visibility = Visibility::Visible;
                if let Some(position) = position {
                    node.left = Val::Px(position.x + TOOLTIP_OFFSET.x);
                    node.top = Val::Px(position.y + TOOLTIP_OFFSET.y);
                }
            }
            None => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

/// Mirrors the settings outcome message into the HUD.
pub fn update_settings_message(
    status: Res<SettingsStatus>,
    mut lines: Query<(&mut Text, &mut TextColor), With<SettingsMessageLine>>,
) {
    if !status.is_changed() {
        return;
    }
    for (mut text, mut color) in &mut lines {
        text.0 = status.message.clone().unwrap_or_default();
        color.0 = if status.is_error {
            HUD_ERROR_TEXT_COLOR
        } else {
            HUD_DIM_TEXT_COLOR
        };
    }
}
