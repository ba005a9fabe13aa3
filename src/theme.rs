//! Light/dark theme and the star-field palette
//!
//! The theme is an explicit value handed to the renderer; nothing here reads
//! ambient page state.

use serde::{Deserialize, Serialize};

use crate::core::surface::Rgba;

/// Opaque RGB triple
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Attach an opacity to this colour
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba::new(self.0, self.1, self.2, alpha)
    }
}

/// Site palette
pub mod colors {
    use super::Rgb;

    // === Stars ===
    pub const STAR_LIGHT: Rgb = Rgb(37, 99, 235);        // blue-600
    pub const STAR_DARK: Rgb = Rgb(255, 255, 255);       // white
    pub const STAR_ACCENT: Rgb = Rgb(147, 197, 253);     // blue-300, dark only
    pub const STAR_RARE: Rgb = Rgb(192, 132, 252);       // purple-400, dark only

    // === Pointer links ===
    pub const LINK_LIGHT: Rgb = Rgb(37, 99, 235);        // blue-600
    pub const LINK_DARK: Rgb = Rgb(148, 163, 184);       // slate-400

    // === Backgrounds ===
    pub const BG_LIGHT: Rgb = Rgb(248, 250, 252);        // slate-50
    pub const BG_DARK: Rgb = Rgb(2, 6, 23);              // #020617

    // === Nebula glows ===
    pub const NEBULA_BLUE: Rgb = Rgb(37, 99, 235);       // blue-600
    pub const NEBULA_PURPLE: Rgb = Rgb(147, 51, 234);    // purple-600
    pub const NEBULA_ALPHA_LIGHT: f32 = 0.05;
    pub const NEBULA_ALPHA_DARK: f32 = 0.10;

    // === Depth overlay (fades in toward the bottom edge) ===
    pub const OVERLAY_LIGHT: Rgb = Rgb(248, 250, 252);   // slate-50
    pub const OVERLAY_DARK: Rgb = Rgb(2, 6, 23);         // slate-950
    pub const OVERLAY_ALPHA_LIGHT: f32 = 0.20;
    pub const OVERLAY_ALPHA_DARK: f32 = 0.40;
}

/// Page colour theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    /// The site opens in dark mode
    #[default]
    Dark,
}

impl Theme {
    pub const ALL: &'static [Theme] = &[Theme::Light, Theme::Dark];

    #[inline]
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Parse "light"/"dark" (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn background(self) -> Rgb {
        match self {
            Theme::Light => colors::BG_LIGHT,
            Theme::Dark => colors::BG_DARK,
        }
    }

    pub fn link_color(self) -> Rgb {
        match self {
            Theme::Light => colors::LINK_LIGHT,
            Theme::Dark => colors::LINK_DARK,
        }
    }

    pub fn nebula_alpha(self) -> f32 {
        match self {
            Theme::Light => colors::NEBULA_ALPHA_LIGHT,
            Theme::Dark => colors::NEBULA_ALPHA_DARK,
        }
    }

    /// Colour the depth overlay reaches at the bottom edge
    pub fn overlay_color(self) -> Rgba {
        match self {
            Theme::Light => colors::OVERLAY_LIGHT.with_alpha(colors::OVERLAY_ALPHA_LIGHT),
            Theme::Dark => colors::OVERLAY_DARK.with_alpha(colors::OVERLAY_ALPHA_DARK),
        }
    }

    /// Star colour for a particle's colour band.
    ///
    /// Accent tones only appear under the dark theme; the rare tone wins over
    /// the accent tone when both thresholds are passed.
    pub fn star_color(self, color_band: f32, accent_threshold: f32, rare_threshold: f32) -> Rgb {
        match self {
            Theme::Light => colors::STAR_LIGHT,
            Theme::Dark if color_band > rare_threshold => colors::STAR_RARE,
            Theme::Dark if color_band > accent_threshold => colors::STAR_ACCENT,
            Theme::Dark => colors::STAR_DARK,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// egui Visuals for the preview window in the given theme
#[cfg(feature = "native")]
pub fn preview_visuals(theme: Theme) -> egui::Visuals {
    let bg = theme.background();
    let bg = egui::Color32::from_rgb(bg.0, bg.1, bg.2);

    let mut visuals = match theme {
        Theme::Light => egui::Visuals::light(),
        Theme::Dark => egui::Visuals::dark(),
    };

    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.extreme_bg_color = bg;

    // No shadows - flat design
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_theme_ignores_color_band() {
        for band in [0.0, 0.5, 0.85, 0.99] {
            assert_eq!(Theme::Light.star_color(band, 0.8, 0.95), colors::STAR_LIGHT);
        }
    }

    #[test]
    fn dark_theme_bands() {
        assert_eq!(Theme::Dark.star_color(0.3, 0.8, 0.95), colors::STAR_DARK);
        assert_eq!(Theme::Dark.star_color(0.8, 0.8, 0.95), colors::STAR_DARK);
        assert_eq!(Theme::Dark.star_color(0.81, 0.8, 0.95), colors::STAR_ACCENT);
        assert_eq!(Theme::Dark.star_color(0.96, 0.8, 0.95), colors::STAR_RARE);
    }

    #[test]
    fn parse_and_toggle() {
        assert_eq!(Theme::parse(" DARK "), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&Theme::Light).unwrap();
        assert_eq!(json, "\"light\"");
        let theme: Theme = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(theme, Theme::Dark);
    }
}
