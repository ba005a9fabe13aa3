//! Star-field configuration
//!
//! Every field has a default matching the live site, so an empty JSON object
//! is a valid config. Loaded values are validated before use.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Longest frame the pointer spring integrates in one go (ms)
pub const MAX_FRAME_STEP_LIMIT_MS: f32 = 1000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }
}

/// Uniform range `[min, min + span)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub span: f32,
}

impl Span {
    pub const fn new(min: f32, span: f32) -> Self {
        Self { min, span }
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.min + self.span
    }

    /// Map a unit sample in `[0, 1)` into the range
    #[inline]
    pub fn sample(&self, unit: f32) -> f32 {
        self.min + unit * self.span
    }
}

/// How many stars to create and which attribute ranges to draw them from.
/// Changing any of these forces a regeneration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub desktop_count: usize,
    pub mobile_count: usize,
    /// Viewports narrower than this (px) use `mobile_count`
    pub mobile_breakpoint: f32,
    pub radius: Span,
    pub opacity: Span,
    pub twinkle_max: f32,
    /// Bands above this use the accent tone (dark theme)
    pub accent_threshold: f32,
    /// Bands above this use the rare tone (dark theme)
    pub rare_threshold: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            desktop_count: 700,
            mobile_count: 250,
            mobile_breakpoint: 768.0,
            radius: Span::new(0.2, 1.5),
            opacity: Span::new(0.1, 0.3),
            twinkle_max: 0.03,
            accent_threshold: 0.8,
            rare_threshold: 0.95,
        }
    }
}

impl PopulationConfig {
    /// Star count for a viewport of the given width
    pub fn count_for_width(&self, width: f32) -> usize {
        if width < self.mobile_breakpoint {
            self.mobile_count
        } else {
            self.desktop_count
        }
    }

    /// Largest count any viewport can ask for
    pub fn max_count(&self) -> usize {
        self.desktop_count.max(self.mobile_count)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Parallax offset (px) at full pointer deflection for depth 0
    pub parallax_strength: f32,
    /// Upward drift per frame (px)
    pub drift_per_frame: f32,
    /// Twinkle phase advance per millisecond
    pub twinkle_rate: f32,
    /// Longest frame step fed to the pointer spring (ms)
    pub max_frame_step_ms: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            parallax_strength: 180.0,
            drift_per_frame: 0.05,
            twinkle_rate: 0.002,
            max_frame_step_ms: 100.0,
        }
    }
}

/// Point that pointer links are drawn towards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkAnchor {
    /// Last reported pointer position
    #[default]
    Raw,
    /// Pointer position reconstructed from the smoothed signal
    Smoothed,
}

impl LinkAnchor {
    pub const ALL: &'static [LinkAnchor] = &[LinkAnchor::Raw, LinkAnchor::Smoothed];

    pub fn label(self) -> &'static str {
        match self {
            LinkAnchor::Raw => "Raw pointer",
            LinkAnchor::Smoothed => "Smoothed pointer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Stars closer than this (px) to the anchor get a link
    pub radius: f32,
    /// Link alpha at zero distance
    pub max_opacity: f32,
    pub width: f32,
    pub anchor: LinkAnchor,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            max_opacity: 0.08,
            width: 0.5,
            anchor: LinkAnchor::Raw,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    /// 1.0 is critically damped, above 1.0 eases in more slowly
    pub damping_ratio: f32,
    pub mass: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping_ratio: 1.0,
            mass: 1.0,
        }
    }
}

impl SpringConfig {
    /// Absolute damping coefficient `c = ζ · 2·sqrt(k·m)`
    pub fn damping(&self) -> f32 {
        self.damping_ratio * 2.0 * (self.stiffness * self.mass).sqrt()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub population: PopulationConfig,
    pub motion: MotionConfig,
    pub links: LinkConfig,
    pub spring: SpringConfig,
    /// Paint the two soft nebula glows behind the stars
    pub nebula: bool,
    /// Darken (dark theme) or wash out (light theme) the lower half
    pub depth_overlay: bool,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            motion: MotionConfig::default(),
            links: LinkConfig::default(),
            spring: SpringConfig::default(),
            nebula: true,
            depth_overlay: true,
        }
    }
}

impl StarfieldConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: StarfieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.population;
        if !(p.mobile_breakpoint > 0.0) {
            return Err(ConfigError::invalid("population.mobile_breakpoint", "must be positive"));
        }
        if !(p.radius.min > 0.0) || p.radius.span < 0.0 {
            return Err(ConfigError::invalid(
                "population.radius",
                "min must be positive and span non-negative",
            ));
        }
        if p.opacity.min < 0.0 || p.opacity.span < 0.0 || p.opacity.max() > 1.0 {
            return Err(ConfigError::invalid("population.opacity", "must lie within [0, 1]"));
        }
        if p.twinkle_max < 0.0 || p.twinkle_max > p.opacity.min {
            return Err(ConfigError::invalid(
                "population.twinkle_max",
                format!("must lie within [0, {}]", p.opacity.min),
            ));
        }
        for (field, value) in [
            ("population.accent_threshold", p.accent_threshold),
            ("population.rare_threshold", p.rare_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, "must lie within [0, 1]"));
            }
        }
        if p.accent_threshold > p.rare_threshold {
            return Err(ConfigError::invalid(
                "population.accent_threshold",
                "must not exceed rare_threshold",
            ));
        }

        let m = &self.motion;
        if !(0.0..=MAX_FRAME_STEP_LIMIT_MS).contains(&m.max_frame_step_ms) {
            return Err(ConfigError::invalid(
                "motion.max_frame_step_ms",
                format!("must lie within [0, {}]", MAX_FRAME_STEP_LIMIT_MS),
            ));
        }

        let l = &self.links;
        if !(l.radius > 0.0) {
            return Err(ConfigError::invalid("links.radius", "must be positive"));
        }
        if !(0.0..=1.0).contains(&l.max_opacity) {
            return Err(ConfigError::invalid("links.max_opacity", "must lie within [0, 1]"));
        }

        let s = &self.spring;
        if !(s.stiffness > 0.0) || !s.stiffness.is_finite() {
            return Err(ConfigError::invalid("spring.stiffness", "must be positive and finite"));
        }
        if !(s.mass > 0.0) || !s.mass.is_finite() {
            return Err(ConfigError::invalid("spring.mass", "must be positive and finite"));
        }
        if !(s.damping_ratio >= 0.0) || !s.damping().is_finite() {
            return Err(ConfigError::invalid(
                "spring.damping_ratio",
                "must be non-negative with a finite damping coefficient",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(json: &str) -> &'static str {
        match StarfieldConfig::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn empty_object_uses_defaults() {
        let config = StarfieldConfig::from_json_str("{}").unwrap();
        assert_eq!(config.population.desktop_count, 700);
        assert_eq!(config.population.mobile_count, 250);
        assert_eq!(config.motion.parallax_strength, 180.0);
        assert_eq!(config.links.anchor, LinkAnchor::Raw);
        assert!(config.nebula);
        assert!(config.depth_overlay);
        assert_eq!(config, StarfieldConfig::default());
    }

    #[test]
    fn partial_override() {
        let json = r#"{"population":{"mobile_count":100},"links":{"anchor":"smoothed"},"nebula":false}"#;
        let config = StarfieldConfig::from_json_str(json).unwrap();
        assert_eq!(config.population.mobile_count, 100);
        assert_eq!(config.population.desktop_count, 700);
        assert_eq!(config.links.anchor, LinkAnchor::Smoothed);
        assert!(!config.nebula);
    }

    #[test]
    fn count_switches_at_breakpoint() {
        let p = PopulationConfig::default();
        assert_eq!(p.count_for_width(767.9), 250);
        assert_eq!(p.count_for_width(768.0), 700);
        assert_eq!(p.count_for_width(1920.0), 700);
        assert_eq!(p.max_count(), 700);
    }

    #[test]
    fn rejects_invalid_fields() {
        assert_eq!(
            invalid_field(r#"{"population":{"mobile_breakpoint":0}}"#),
            "population.mobile_breakpoint"
        );
        assert_eq!(
            invalid_field(r#"{"population":{"radius":{"min":0,"span":1}}}"#),
            "population.radius"
        );
        assert_eq!(
            invalid_field(r#"{"population":{"opacity":{"min":0.9,"span":0.3}}}"#),
            "population.opacity"
        );
        assert_eq!(
            invalid_field(r#"{"population":{"twinkle_max":0.2}}"#),
            "population.twinkle_max"
        );
        assert_eq!(
            invalid_field(r#"{"population":{"rare_threshold":1.5}}"#),
            "population.rare_threshold"
        );
        assert_eq!(
            invalid_field(r#"{"population":{"accent_threshold":0.97}}"#),
            "population.accent_threshold"
        );
        assert_eq!(invalid_field(r#"{"links":{"radius":-1}}"#), "links.radius");
        assert_eq!(invalid_field(r#"{"spring":{"stiffness":0}}"#), "spring.stiffness");
        assert_eq!(invalid_field(r#"{"spring":{"mass":0}}"#), "spring.mass");
        assert_eq!(
            invalid_field(r#"{"spring":{"damping_ratio":-0.5}}"#),
            "spring.damping_ratio"
        );
        assert_eq!(
            invalid_field(r#"{"motion":{"max_frame_step_ms":5000}}"#),
            "motion.max_frame_step_ms"
        );
        assert_eq!(
            invalid_field(r#"{"motion":{"max_frame_step_ms":-1}}"#),
            "motion.max_frame_step_ms"
        );
    }

    #[test]
    fn rejects_non_finite_spring() {
        let field = |spring: SpringConfig| match (StarfieldConfig { spring, ..StarfieldConfig::default() }).validate() {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected invalid spring, got {:?}", other),
        };
        assert_eq!(
            field(SpringConfig { stiffness: f32::INFINITY, ..SpringConfig::default() }),
            "spring.stiffness"
        );
        assert_eq!(
            field(SpringConfig { mass: f32::NAN, ..SpringConfig::default() }),
            "spring.mass"
        );
        assert_eq!(
            field(SpringConfig { damping_ratio: 3.0e38, stiffness: 1.0e30, mass: 1.0 }),
            "spring.damping_ratio"
        );
    }

    #[test]
    fn accepts_extreme_but_finite_spring() {
        let json = r#"{"spring":{"damping_ratio":10000},"motion":{"max_frame_step_ms":1000}}"#;
        let config = StarfieldConfig::from_json_str(json).unwrap();
        assert!(config.spring.damping().is_finite());
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            StarfieldConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            StarfieldConfig::from_path("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn critical_damping_coefficient() {
        let spring = SpringConfig::default();
        assert!((spring.damping() - 20.0).abs() < 1e-4);
    }
}
