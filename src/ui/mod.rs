//! HUD, sidebar, and keyboard surface.

pub mod hud;
pub mod input;
pub mod panel;

use bevy::prelude::*;

/// In-progress note editing on the selected property. While active, the
/// single-letter shortcuts are suspended so typing works.
#[derive(Resource, Debug, Default)]
pub struct NoteEditor {
    pub active: bool,
    pub buffer: String,
}

/// The settings surface's last outcome (export path, import failure, ...).
#[derive(Resource, Debug, Default)]
pub struct SettingsStatus {
    pub message: Option<String>,
    pub is_error: bool,
}

impl SettingsStatus {
    pub fn info(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.is_error = false;
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.is_error = true;
    }
}

/// Formats a price as pounds with thousands separators.
pub fn format_price(price: i64) -> String {
    let negative = price < 0;
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_group_thousands() {
        assert_eq!(format_price(0), "£0");
        assert_eq!(format_price(950), "£950");
        assert_eq!(format_price(185_000), "£185,000");
        assert_eq!(format_price(1_250_000), "£1,250,000");
    }
}
