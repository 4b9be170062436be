//! Theme system for consistent UI colors across dark, light and high-contrast modes.
//!
//! This module provides a centralized theme that automatically detects the
//! OS theme (dark/light mode), maps card colour tags to terminal colours and
//! can be switched to a high-contrast variant.

use ratatui::style::Color;

use crate::config::ThemeMode;

/// Colours used by the board, its overlays and the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Title bar, card borders and links
    pub primary: Color,
    /// Selected card, quick-choice chips and key hints
    pub accent: Color,
    /// "Sent" notices and the reward banner
    pub success: Color,
    /// Error notices and the error overlay
    pub error: Color,
    /// "Slow down" and other warning notices
    pub warning: Color,

    /// Card labels and body text
    pub text: Color,
    /// Card details ("4 signs", image source)
    pub text_secondary: Color,
    /// Hints, placeholders and "loading…"
    pub text_muted: Color,

    /// Screen background
    pub background: Color,
    /// Background of the selected card
    pub highlight_bg: Color,
    /// Background of unselected cards and the status bar
    pub surface: Color,

    /// Cards drop their tinted backgrounds and use heavy borders
    pub high_contrast: bool,
}

/// Theme variant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    /// Dark theme optimized for dark terminal backgrounds
    Dark,
    /// Light theme optimized for light terminal backgrounds
    Light,
}

impl Theme {
    /// Dark or light, following the desktop setting.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// Theme for a configured mode and contrast preference.
    #[must_use]
    pub fn from_preferences(mode: ThemeMode, high_contrast: bool) -> Self {
        let theme = match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        };
        theme.with_high_contrast(high_contrast)
    }

    /// Board colours for dark terminals.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,

            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::DarkGray,
            surface: Color::Rgb(30, 30, 30),

            high_contrast: false,
        }
    }

    /// Board colours for light terminals. Foreground colours keep at least
    /// 4.5:1 contrast against white.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0),
            success: Color::Rgb(0, 128, 0),
            error: Color::Red,
            warning: Color::Rgb(200, 100, 0),

            text: Color::Black,
            text_secondary: Color::Rgb(60, 60, 60),
            text_muted: Color::Gray,

            background: Color::White,
            highlight_bg: Color::Rgb(230, 230, 230),
            surface: Color::Rgb(245, 245, 245),

            high_contrast: false,
        }
    }

    /// Returns this theme with high contrast switched on or off.
    ///
    /// High contrast pins text and borders to pure black/white and removes
    /// every tinted surface.
    #[must_use]
    pub fn with_high_contrast(mut self, enabled: bool) -> Self {
        if !enabled {
            return self;
        }
        let (fg, bg) = match self.variant() {
            ThemeVariant::Dark => (Color::White, Color::Black),
            ThemeVariant::Light => (Color::Black, Color::White),
        };
        self.primary = fg;
        self.text = fg;
        self.text_secondary = fg;
        self.text_muted = fg;
        self.background = bg;
        self.surface = bg;
        self.highlight_bg = fg;
        self.high_contrast = true;
        self
    }

    /// Returns the theme variant for the current theme.
    ///
    /// This is determined by checking the background color.
    #[must_use]
    pub const fn variant(&self) -> ThemeVariant {
        match self.background {
            Color::White | Color::Rgb(255, 255, 255) | Color::Rgb(245, 245, 245) => {
                ThemeVariant::Light
            }
            _ => ThemeVariant::Dark,
        }
    }

    /// Card tint for a colour tag. High contrast never tints.
    #[must_use]
    pub fn tag_color(&self, tag: &str) -> Color {
        if self.high_contrast {
            return self.background;
        }
        let dark = self.variant() == ThemeVariant::Dark;
        match (tag, dark) {
            ("food", true) => Color::Rgb(90, 50, 20),
            ("food", false) => Color::Rgb(255, 224, 189),
            ("play", true) => Color::Rgb(20, 60, 100),
            ("play", false) => Color::Rgb(198, 226, 255),
            ("feelings", true) => Color::Rgb(90, 30, 70),
            ("feelings", false) => Color::Rgb(255, 209, 236),
            ("toilet", true) => Color::Rgb(20, 80, 60),
            ("toilet", false) => Color::Rgb(200, 240, 220),
            ("quick", true) => Color::Rgb(70, 60, 10),
            ("quick", false) => Color::Rgb(255, 245, 190),
            _ => self.surface,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}
