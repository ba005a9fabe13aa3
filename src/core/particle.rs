//! Star particles and the fixed-capacity field that owns them
//!
//! - Viewport: current drawing area in CSS pixels
//! - Particle: one star, fully independent of the others
//! - ParticleField: slot buffer sized once for the largest population and
//!   refilled in place on every regeneration

use rand::Rng;

use crate::config::PopulationConfig;

// ============================================================================
// Viewport
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport with no area draws nothing
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Map a pixel position to the normalized `[-1, 1]²` pointer signal
    pub fn normalize(&self, x: f32, y: f32) -> [f32; 2] {
        if self.is_empty() {
            return [0.0, 0.0];
        }
        [x / self.width * 2.0 - 1.0, y / self.height * 2.0 - 1.0]
    }

    /// Inverse of [`Viewport::normalize`]
    pub fn denormalize(&self, nx: f32, ny: f32) -> [f32; 2] {
        [(nx + 1.0) * 0.5 * self.width, (ny + 1.0) * 0.5 * self.height]
    }
}

/// Wrap `value` into `[0, extent)`.
///
/// `rem_euclid` can round up to exactly `extent` for tiny negative inputs,
/// which is folded back to 0.
#[inline]
pub fn wrap(value: f32, extent: f32) -> f32 {
    if !(extent > 0.0) || !extent.is_finite() || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

// ============================================================================
// Particle
// ============================================================================

/// One star
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// Stored position (px), parallax is applied at draw time
    pub x: f32,
    pub y: f32,
    /// Parallax divisor in `[0, viewport width)`
    pub depth: f32,
    pub radius: f32,
    pub base_opacity: f32,
    /// Twinkle amplitude around `base_opacity`
    pub twinkle: f32,
    /// Colour selector in `[0, 1)`
    pub color_band: f32,
}

impl Particle {
    /// Draw every attribute from an independent uniform distribution
    pub fn random<R: Rng>(rng: &mut R, viewport: Viewport, population: &PopulationConfig) -> Self {
        Self {
            x: rng.gen::<f32>() * viewport.width,
            y: rng.gen::<f32>() * viewport.height,
            depth: rng.gen::<f32>() * viewport.width,
            radius: population.radius.sample(rng.gen()),
            base_opacity: population.opacity.sample(rng.gen()),
            twinkle: rng.gen::<f32>() * population.twinkle_max,
            color_band: rng.gen(),
        }
    }

    /// Depth factor `1 - depth / width`: 1 for the nearest stars, 0 for the farthest
    #[inline]
    pub fn depth_factor(&self, width: f32) -> f32 {
        if !(width > 0.0) {
            return 0.0;
        }
        1.0 - self.depth / width
    }

    /// Opacity at `phase`; always within `base_opacity ± twinkle`
    #[inline]
    pub fn opacity_at(&self, phase: f32) -> f32 {
        self.base_opacity + phase.sin() * self.twinkle
    }
}

// ============================================================================
// ParticleField
// ============================================================================

/// All stars of the current viewport generation.
///
/// The backing buffer is reserved for the largest population once and only
/// grows if a config change raises that ceiling, so regenerating on every
/// resize does not reallocate.
#[derive(Debug)]
pub struct ParticleField {
    slots: Vec<Particle>,
    viewport: Viewport,
    /// Regenerations since creation
    generation: u64,
}

impl ParticleField {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            viewport: Viewport::new(0.0, 0.0),
            generation: 0,
        }
    }

    /// Replace every star with a freshly drawn population for `viewport`.
    /// Returns the new star count.
    pub fn regenerate<R: Rng>(
        &mut self,
        rng: &mut R,
        viewport: Viewport,
        population: &PopulationConfig,
    ) -> usize {
        let count = if viewport.is_empty() {
            0
        } else {
            population.count_for_width(viewport.width)
        };

        self.slots.clear();
        self.slots.reserve(population.max_count());
        self.slots
            .extend((0..count).map(|_| Particle::random(rng, viewport, population)));
        self.viewport = viewport;
        self.generation += 1;
        count
    }

    /// Move every star up by `dy`, re-entering from the bottom edge
    pub fn drift(&mut self, dy: f32) {
        let height = self.viewport.height;
        for p in &mut self.slots {
            p.y = wrap(p.y - dy, height);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index)
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.slots.iter()
    }

    /// Mutable access for callers that seed specific stars (tests, demos)
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field_for(viewport: Viewport, seed: u64) -> ParticleField {
        let population = PopulationConfig::default();
        let mut field = ParticleField::with_capacity(population.max_count());
        let mut rng = StdRng::seed_from_u64(seed);
        field.regenerate(&mut rng, viewport, &population);
        field
    }

    #[test]
    fn count_follows_viewport_width() {
        assert_eq!(field_for(Viewport::new(1920.0, 1080.0), 1).len(), 700);
        assert_eq!(field_for(Viewport::new(768.0, 1024.0), 1).len(), 700);
        assert_eq!(field_for(Viewport::new(400.0, 800.0), 1).len(), 250);
        assert_eq!(field_for(Viewport::new(0.0, 800.0), 1).len(), 0);
    }

    #[test]
    fn attributes_within_ranges() {
        let viewport = Viewport::new(1280.0, 720.0);
        let field = field_for(viewport, 7);
        for p in field.iter() {
            assert!((0.0..viewport.width).contains(&p.x));
            assert!((0.0..viewport.height).contains(&p.y));
            assert!((0.0..viewport.width).contains(&p.depth));
            assert!(p.radius >= 0.2 && p.radius < 1.7 + 1e-6);
            assert!(p.base_opacity >= 0.1 && p.base_opacity <= 0.4 + 1e-6);
            assert!(p.twinkle >= 0.0 && p.twinkle < 0.03 + 1e-6);
            assert!((0.0..1.0).contains(&p.color_band));
        }
    }

    #[test]
    fn regeneration_reuses_buffer() {
        let population = PopulationConfig::default();
        let mut field = ParticleField::with_capacity(population.max_count());
        let mut rng = StdRng::seed_from_u64(3);
        field.regenerate(&mut rng, Viewport::new(1920.0, 1080.0), &population);
        let capacity = field.capacity();
        let ptr = field.as_slice().as_ptr();

        field.regenerate(&mut rng, Viewport::new(400.0, 800.0), &population);
        field.regenerate(&mut rng, Viewport::new(1920.0, 1080.0), &population);
        assert_eq!(field.capacity(), capacity);
        assert_eq!(field.as_slice().as_ptr(), ptr);
        assert_eq!(field.generation(), 3);
    }

    #[test]
    fn drift_wraps_to_bottom() {
        let mut field = field_for(Viewport::new(1000.0, 500.0), 9);
        field.as_mut_slice()[0].y = 0.02;
        field.drift(0.05);
        let y = field.get(0).unwrap().y;
        assert!((y - 499.97).abs() < 1e-3, "y = {}", y);
        for _ in 0..20_000 {
            field.drift(0.05);
        }
        for p in field.iter() {
            assert!((0.0..500.0).contains(&p.y));
        }
    }

    #[test]
    fn wrap_edges() {
        assert_eq!(wrap(-1.0, 100.0), 99.0);
        assert_eq!(wrap(100.0, 100.0), 0.0);
        assert_eq!(wrap(250.0, 100.0), 50.0);
        assert_eq!(wrap(-1e-9, 100.0), 0.0);
        assert_eq!(wrap(5.0, 0.0), 0.0);
    }

    #[test]
    fn wrap_non_finite_is_origin() {
        assert_eq!(wrap(f32::NAN, 100.0), 0.0);
        assert_eq!(wrap(f32::INFINITY, 100.0), 0.0);
        assert_eq!(wrap(f32::NEG_INFINITY, 100.0), 0.0);
        assert_eq!(wrap(5.0, f32::NAN), 0.0);
    }

    #[test]
    fn depth_factor_bounds() {
        let near = Particle { depth: 0.0, ..Default::default() };
        let far = Particle { depth: 1919.999, ..Default::default() };
        assert_eq!(near.depth_factor(1920.0), 1.0);
        assert!(far.depth_factor(1920.0) < 1e-5);
    }

    #[test]
    fn normalize_round_trip_center() {
        let viewport = Viewport::new(1920.0, 1080.0);
        assert_eq!(viewport.normalize(960.0, 540.0), [0.0, 0.0]);
        assert_eq!(viewport.normalize(0.0, 1080.0), [-1.0, 1.0]);
        assert_eq!(viewport.denormalize(0.0, 0.0), [960.0, 540.0]);
    }
}
