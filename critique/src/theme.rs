//! Color theme system for critique.
//!
//! Two built-in themes:
//!
//! - `dark` uses ANSI 16 colors, so it works on any terminal.
//! - `catppuccin-mocha` uses the Catppuccin Mocha palette in RGB and needs truecolor.

use ratatui::style::Color;

/// Every color used across the UI.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Source pane
    pub line_number: Color,
    pub source_text: Color,
    pub placeholder: Color,

    // Review pane
    /// Selected tab label.
    pub tab_active: Color,
    pub tab_inactive: Color,
    pub suggestion: Color,
    /// Background behind highlighted code snippets.
    pub snippet_bg: Color,
    pub error_fg: Color,
    pub spinner: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors. Default when no config is present.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            line_number: Color::DarkGray,
            source_text: Color::Reset,
            placeholder: Color::DarkGray,

            tab_active: Color::Cyan,
            tab_inactive: Color::Gray,
            suggestion: Color::White,
            snippet_bg: Color::Black,
            error_fg: Color::Red,
            spinner: Color::Cyan,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
        }
    }

    /// Catppuccin Mocha palette in RGB truecolor.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let crust = Color::Rgb(17, 17, 27); // #11111b
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            line_number: overlay1,
            source_text: text,
            placeholder: overlay1,

            tab_active: teal,
            tab_inactive: subtext0,
            suggestion: text,
            snippet_bg: crust,
            error_fg: red,
            spinner: teal,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
        }
    }

    /// Resolves a theme name from config. Unknown names fall back to `dark()`
    /// with a logged warning rather than failing startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_falls_back_to_dark() {
        assert_eq!(Theme::from_name("nope").border_active, Theme::dark().border_active);
        assert_eq!(
            Theme::from_name("catppuccin_mocha").border_active,
            Theme::catppuccin_mocha().border_active
        );
    }
}
