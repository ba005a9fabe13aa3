//! Star-field renderer: per-frame parallax, twinkle, pointer links and drift
//!
//! The renderer owns its particles, the smoothed pointer and the theme. Hosts
//! feed it resize/pointer/theme notifications and call [`StarfieldRenderer::frame`]
//! once per display refresh with a [`DrawSurface`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{LinkAnchor, StarfieldConfig};
use crate::theme::{colors, Rgb, Theme};

use super::particle::{wrap, Particle, ParticleField, Viewport};
use super::spring::SmoothedPointer;
use super::surface::DrawSurface;

/// Nebula discs hang 10% of the viewport past their corner
const NEBULA_OUTSET: f32 = 0.1;
/// Disc diameters as fractions of the viewport width
const NEBULA_TOP_RIGHT_SIZE: f32 = 0.6;
const NEBULA_BOTTOM_LEFT_SIZE: f32 = 0.5;
/// Blur radius (px) added around each disc
const NEBULA_BLUR: f32 = 120.0;
/// The depth overlay starts halfway down and is strongest at the bottom
const OVERLAY_START: f32 = 0.5;

/// Centre and radius of both nebula glows in a `width`x`height` viewport
pub fn nebula_glows(viewport: Viewport) -> [(f32, f32, f32, Rgb); 2] {
    let Viewport { width: w, height: h } = viewport;
    let top_right = w * NEBULA_TOP_RIGHT_SIZE * 0.5;
    let bottom_left = w * NEBULA_BOTTOM_LEFT_SIZE * 0.5;
    [
        (
            w * (1.0 + NEBULA_OUTSET) - top_right,
            -h * NEBULA_OUTSET + top_right,
            top_right + NEBULA_BLUR,
            colors::NEBULA_BLUE,
        ),
        (
            -w * NEBULA_OUTSET + bottom_left,
            h * (1.0 + NEBULA_OUTSET) - bottom_left,
            bottom_left + NEBULA_BLUR,
            colors::NEBULA_PURPLE,
        ),
    ]
}

/// What one frame painted
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub stars: usize,
    pub links: usize,
    /// Parallax offset (px) applied to a depth-0 star
    pub parallax: [f32; 2],
}

pub struct StarfieldRenderer {
    config: StarfieldConfig,
    theme: Theme,
    viewport: Viewport,
    particles: ParticleField,
    pointer: SmoothedPointer,
    /// Last raw pointer position (px); `None` until the pointer first moves
    raw_pointer: Option<[f32; 2]>,
    /// Timestamp of the previous frame (ms)
    last_frame_ms: Option<f64>,
    rng: StdRng,
}

impl StarfieldRenderer {
    /// Mount a renderer seeded from OS entropy
    pub fn new(config: StarfieldConfig, viewport: Viewport, theme: Theme) -> Self {
        Self::with_rng(config, viewport, theme, StdRng::from_entropy())
    }

    /// Mount a renderer with a reproducible star layout
    pub fn with_seed(config: StarfieldConfig, viewport: Viewport, theme: Theme, seed: u64) -> Self {
        Self::with_rng(config, viewport, theme, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: StarfieldConfig, viewport: Viewport, theme: Theme, rng: StdRng) -> Self {
        let particles = ParticleField::with_capacity(config.population.max_count());
        let pointer = SmoothedPointer::new(config.spring.clone());
        let mut renderer = Self {
            config,
            theme,
            viewport,
            particles,
            pointer,
            raw_pointer: None,
            last_frame_ms: None,
            rng,
        };
        renderer.resize(viewport);
        renderer
    }

    /// Regenerate the whole population for a new viewport.
    /// Returns the new star count.
    pub fn resize(&mut self, viewport: Viewport) -> usize {
        self.viewport = viewport;
        let count = self
            .particles
            .regenerate(&mut self.rng, viewport, &self.config.population);
        debug!(
            width = viewport.width,
            height = viewport.height,
            count,
            generation = self.particles.generation(),
            "star field regenerated"
        );
        count
    }

    /// Record the raw pointer and retarget the smoothed signal
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.raw_pointer = Some([x, y]);
        let [nx, ny] = self.viewport.normalize(x, y);
        self.pointer.set_target(nx, ny);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            info!(%theme, "star field theme changed");
            self.theme = theme;
        }
    }

    /// Apply a new configuration; the stars are only redrawn from scratch
    /// when the population parameters changed
    pub fn set_config(&mut self, config: StarfieldConfig) {
        let regenerate = config.population != self.config.population;
        self.pointer.set_config(config.spring.clone());
        self.config = config;
        debug!(regenerate, "star field config updated");
        if regenerate {
            self.resize(self.viewport);
        }
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleField {
        &mut self.particles
    }

    pub fn pointer(&self) -> &SmoothedPointer {
        &self.pointer
    }

    pub fn raw_pointer(&self) -> Option<[f32; 2]> {
        self.raw_pointer
    }

    /// Parallax offset (px) for a star under the current smoothed pointer
    pub fn parallax_offset(&self, particle: &Particle) -> [f32; 2] {
        let [sx, sy] = self.pointer.value();
        let strength = self.config.motion.parallax_strength;
        let z = particle.depth_factor(self.viewport.width);
        [sx * strength * z, sy * strength * z]
    }

    /// On-screen position of a star: stored position plus parallax, wrapped
    pub fn screen_position(&self, particle: &Particle) -> [f32; 2] {
        let [px, py] = self.parallax_offset(particle);
        [
            wrap(particle.x + px, self.viewport.width),
            wrap(particle.y + py, self.viewport.height),
        ]
    }

    /// Twinkle phase of star `index` at `time_ms`
    #[inline]
    pub fn twinkle_phase(&self, time_ms: f64, index: usize) -> f32 {
        (time_ms * self.config.motion.twinkle_rate as f64 + index as f64) as f32
    }

    fn link_anchor(&self) -> Option<[f32; 2]> {
        match self.config.links.anchor {
            LinkAnchor::Raw => self.raw_pointer,
            LinkAnchor::Smoothed => self.raw_pointer.map(|_| {
                let [sx, sy] = self.pointer.value();
                self.viewport.denormalize(sx, sy)
            }),
        }
    }

    /// Advance the pointer spring to `time_ms` without drawing
    pub fn advance_clock(&mut self, time_ms: f64) {
        let dt_ms = match self.last_frame_ms {
            Some(last) => (time_ms - last).clamp(0.0, self.config.motion.max_frame_step_ms as f64),
            None => 0.0,
        };
        self.last_frame_ms = Some(time_ms);
        self.pointer.step((dt_ms / 1000.0) as f32);
    }

    /// Paint one frame at `time_ms` and advance the drift
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, time_ms: f64, surface: &mut S) -> FrameStats {
        self.advance_clock(time_ms);

        let Viewport { width, height } = self.viewport;
        let theme = self.theme;
        surface.clear(width, height, theme.background().with_alpha(1.0));

        if self.viewport.is_empty() {
            return FrameStats::default();
        }

        if self.config.nebula {
            let alpha = theme.nebula_alpha();
            for (x, y, radius, color) in nebula_glows(self.viewport) {
                surface.fill_glow(x, y, radius, color.with_alpha(alpha));
            }
        }

        let population = &self.config.population;
        let links = &self.config.links;
        let anchor = self.link_anchor();
        let link_color = theme.link_color();

        let mut stats = FrameStats {
            parallax: {
                let [sx, sy] = self.pointer.value();
                let strength = self.config.motion.parallax_strength;
                [sx * strength, sy * strength]
            },
            ..FrameStats::default()
        };

        for (i, particle) in self.particles.iter().enumerate() {
            let [x, y] = self.screen_position(particle);
            let opacity = particle.opacity_at(self.twinkle_phase(time_ms, i));
            let color = theme.star_color(
                particle.color_band,
                population.accent_threshold,
                population.rare_threshold,
            );
            surface.fill_circle(x, y, particle.radius, color.with_alpha(opacity));
            stats.stars += 1;

            if let Some([ax, ay]) = anchor {
                let dist = (ax - x).hypot(ay - y);
                if dist < links.radius {
                    let alpha = (1.0 - dist / links.radius) * links.max_opacity;
                    surface.stroke_line([x, y], [ax, ay], links.width, link_color.with_alpha(alpha));
                    stats.links += 1;
                }
            }
        }

        if self.config.depth_overlay {
            surface.fill_vertical_fade(width, height * OVERLAY_START, height, theme.overlay_color());
        }

        self.particles.drift(self.config.motion.drift_per_frame);
        stats
    }
}
