//! Damped-spring smoothing of the normalized pointer signal
//!
//! Each axis is a unit-mass-scaled spring pulled toward its target. The
//! spring is integrated with implicit (backward) Euler in sub-steps of at
//! most [`MAX_SUBSTEP`]. Backward Euler is unconditionally stable for a
//! damped spring, so the signal stays finite and bounded for any positive
//! stiffness, mass and damping however large the step.

use crate::config::SpringConfig;

/// Displacement below which the spring may come to rest (signal units)
const REST_DELTA: f32 = 1e-3;
/// Speed below which the spring may come to rest (signal units / s)
const REST_SPEED: f32 = 1e-2;
/// Upper bound for a single integration sub-step (s)
const MAX_SUBSTEP: f32 = 1.0 / 240.0;
const MAX_SUBSTEPS: usize = 1024;

/// One spring axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringAxis {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
}

impl SpringAxis {
    /// One backward-Euler step: solves `v' = v + h·a(x', v')`, `x' = x + h·v'`
    #[inline]
    fn integrate(&mut self, stiffness: f32, damping: f32, mass: f32, h: f32) {
        let k = stiffness / mass;
        let c = damping / mass;
        let denom = 1.0 + h * c + h * h * k;
        self.velocity = (self.velocity - h * k * (self.value - self.target)) / denom;
        self.value += self.velocity * h;
    }

    #[inline]
    fn at_rest(&self) -> bool {
        (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED
    }

    fn settle(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }
}

/// Two-axis smoothed pointer signal in `[-1, 1]²`
#[derive(Clone, Debug)]
pub struct SmoothedPointer {
    x: SpringAxis,
    y: SpringAxis,
    config: SpringConfig,
}

impl SmoothedPointer {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            x: SpringAxis::default(),
            y: SpringAxis::default(),
            config,
        }
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }

    pub fn set_target(&mut self, x: f32, y: f32) {
        self.x.target = x;
        self.y.target = y;
    }

    #[inline]
    pub fn target(&self) -> [f32; 2] {
        [self.x.target, self.y.target]
    }

    #[inline]
    pub fn value(&self) -> [f32; 2] {
        [self.x.value, self.y.value]
    }

    #[inline]
    pub fn velocity(&self) -> [f32; 2] {
        [self.x.velocity, self.y.velocity]
    }

    pub fn is_at_rest(&self) -> bool {
        self.x.value == self.x.target
            && self.y.value == self.y.target
            && self.x.velocity == 0.0
            && self.y.velocity == 0.0
    }

    /// Advance both axes by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) || self.is_at_rest() {
            return;
        }

        let k = self.config.stiffness;
        let m = self.config.mass;
        let c = self.config.damping();

        // Sub-steps only buy accuracy; a capped count stays stable
        let steps = ((dt / MAX_SUBSTEP).ceil() as usize).clamp(1, MAX_SUBSTEPS);
        let h = dt / steps as f32;

        for _ in 0..steps {
            self.x.integrate(k, c, m, h);
            self.y.integrate(k, c, m, h);
        }

        if self.x.at_rest() && self.y.at_rest() {
            self.x.settle();
            self.y.settle();
        }
    }
}
