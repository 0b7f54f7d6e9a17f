//! Light and dark palettes for the terminal user interface.

use ratatui::style::Color;

/// Accent used for the active filter, checked tasks and the add prompt.
pub const ACCENT_BLUE: Color = Color::Rgb(0, 122, 255);
/// Used for delete prompts.
pub const DELETE_RED: Color = Color::Rgb(255, 59, 48);

/// Colours for one appearance mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub danger: Color,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        background: Color::Rgb(245, 245, 245),
        surface: Color::White,
        text: Color::Rgb(51, 51, 51),
        muted: Color::Rgb(136, 136, 136),
        border: Color::Rgb(204, 204, 204),
        accent: ACCENT_BLUE,
        danger: DELETE_RED,
    };

    pub const DARK: Theme = Theme {
        background: Color::Rgb(26, 26, 26),
        surface: Color::Rgb(51, 51, 51),
        text: Color::White,
        muted: Color::Rgb(136, 136, 136),
        border: Color::Rgb(68, 68, 68),
        accent: ACCENT_BLUE,
        danger: DELETE_RED,
    };

    pub fn for_mode(dark_mode: bool) -> Theme {
        if dark_mode {
            Theme::DARK
        } else {
            Theme::LIGHT
        }
    }
}
