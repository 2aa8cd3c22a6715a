//! Color palettes for the browser and their resolution from config.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// Runtime colors used by the widgets.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub dir_fg: Color,
    pub file_fg: Color,
    pub exec_fg: Color,
    pub output_fg: Color,
    pub prompt_fg: Color,
    pub error_fg: Color,
    pub dim_fg: Color,
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
}

/// Dark palette (Catppuccin Mocha).
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        dir_fg: Color::Rgb(137, 180, 250),           // #89b4fa (blue)
        file_fg: Color::Rgb(148, 226, 213),          // #94e2d5 (teal)
        exec_fg: Color::Rgb(166, 227, 161),          // #a6e3a1 (green)
        output_fg: Color::Rgb(205, 214, 244),        // #cdd6f4 (text)
        prompt_fg: Color::Rgb(203, 166, 247),        // #cba6f7 (mauve)
        error_fg: Color::Rgb(243, 139, 168),         // #f38ba8 (red)
        dim_fg: Color::Rgb(108, 112, 134),           // #6c7086 (overlay0)
        border_fg: Color::Rgb(88, 91, 112),          // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250),
        status_bg: Color::Rgb(30, 30, 46),           // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),
    }
}

/// Light palette (Catppuccin Latte).
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        dir_fg: Color::Rgb(30, 102, 245),            // #1e66f5 (blue)
        file_fg: Color::Rgb(23, 146, 153),           // #179299 (teal)
        exec_fg: Color::Rgb(64, 160, 43),            // #40a02b (green)
        output_fg: Color::Rgb(76, 79, 105),          // #4c4f69 (text)
        prompt_fg: Color::Rgb(136, 57, 239),         // #8839ef (mauve)
        error_fg: Color::Rgb(210, 15, 57),           // #d20f39 (red)
        dim_fg: Color::Rgb(156, 160, 176),           // #9ca0b0 (overlay0)
        border_fg: Color::Rgb(172, 176, 190),        // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),
        status_bg: Color::Rgb(230, 233, 239),        // #e6e9ef (mantle)
        status_fg: Color::Rgb(76, 79, 105),
    }
}

/// Parse a hex color string like `"#aabbcc"`. Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Resolve the runtime palette: `"light"`, `"custom"` (dark plus overrides),
/// anything else is dark.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let overrides = [
        (&custom.dir_fg, &mut theme.dir_fg),
        (&custom.file_fg, &mut theme.file_fg),
        (&custom.exec_fg, &mut theme.exec_fg),
        (&custom.output_fg, &mut theme.output_fg),
        (&custom.prompt_fg, &mut theme.prompt_fg),
        (&custom.border_fg, &mut theme.border_fg),
        (&custom.border_focused_fg, &mut theme.border_focused_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
    ];
    for (hex, slot) in overrides {
        if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}
