//! Color parsing and palette constants.

use image::Rgba;

/// Selection outline and handles.
pub const SELECTION: Rgba<u8> = Rgba([239, 68, 68, 255]);
/// Auto-selection highlight.
pub const AUTO_SELECTION: Rgba<u8> = Rgba([16, 185, 129, 255]);
/// Lock badge on locked features.
pub const LOCK_BADGE: Rgba<u8> = Rgba([245, 158, 11, 255]);
/// Grid lines.
pub const GRID: Rgba<u8> = Rgba([226, 232, 240, 255]);
/// Safe-area guide.
pub const SAFE_AREA: Rgba<u8> = Rgba([148, 163, 184, 255]);

/// Parse a CSS color string (e.g., "#6366f1") to an RGBA pixel.
///
/// Handles `transparent` and `#rgb`, `#rrggbb`, `#rrggbbaa` hex forms.
/// Anything unparseable falls back to opaque white, the paper background.
pub fn parse_css_color(color: &str) -> Rgba<u8> {
    if color == "transparent" {
        return Rgba([0, 0, 0, 0]);
    }

    if let Some(hex) = color.strip_prefix('#') {
        let hex = hex.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(15) * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(15) * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(15) * 17;
                return Rgba([r, g, b, 255]);
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
                return Rgba([r, g, b, 255]);
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
                let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                return Rgba([r, g, b, a]);
            }
            _ => {}
        }
    }

    Rgba([255, 255, 255, 255])
}
