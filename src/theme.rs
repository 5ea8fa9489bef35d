use bevy::prelude::*;

// Background and Ground
pub const BACKGROUND_COLOR: Color = Color::srgb(0.07, 0.08, 0.10);
pub const GROUND_COLOR: Color = Color::srgb(0.12, 0.13, 0.15);
pub const GRID_COLOR: Color = Color::srgba(0.25, 0.27, 0.30, 0.35);

// Marker Colors
// The default/hovered/selected triple matches the marker artwork: a white
// pin that turns teal on hover and cyan when selected.
pub const MARKER_DEFAULT_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const MARKER_HOVERED_COLOR: Color = Color::srgb(0.420, 0.710, 0.761); // #6bb5c2
pub const MARKER_SELECTED_COLOR: Color = Color::srgb(0.024, 0.714, 0.831); // #06B6D4

// Marker Geometry
pub const MARKER_HEAD_RADIUS_M: f32 = 5.0;
pub const MARKER_POST_WIDTH_M: f32 = 0.8;
/// Head scale multiplier in top-down 2D mode, where the post is hidden.
pub const MARKER_2D_HEAD_SCALE: f32 = 1.6;

// Catchment Overlays
pub const CATCHMENT_SATURATION: f32 = 0.7;
pub const CATCHMENT_LIGHTNESS: f32 = 0.5;
pub const CATCHMENT_OUTLINE_ALPHA: f32 = 0.9;

// HUD Text
pub const HUD_TEXT_COLOR: Color = Color::srgb(0.92, 0.92, 0.92);
pub const HUD_DIM_TEXT_COLOR: Color = Color::srgb(0.62, 0.62, 0.62);
pub const HUD_ERROR_TEXT_COLOR: Color = Color::srgb(0.95, 0.45, 0.40);
pub const HUD_FONT_SIZE: f32 = 14.0;
pub const PANEL_TITLE_FONT_SIZE: f32 = 18.0;
pub const PANEL_BACKGROUND_COLOR: Color = Color::srgba(0.10, 0.11, 0.13, 0.92);

/// Text style for HUD lines; the default font keeps the binary asset-free.
pub fn hud_text_font(font_size: f32) -> TextFont {
    TextFont {
        font_size,
        ..default()
    }
}
