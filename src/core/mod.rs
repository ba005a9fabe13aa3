//! Platform-agnostic core - shared between the web host, native preview and CLI

pub mod particle;
pub mod renderer;
pub mod spring;
pub mod surface;

pub use particle::{wrap, Particle, ParticleField, Viewport};
pub use renderer::{FrameStats, StarfieldRenderer};
pub use spring::SmoothedPointer;
pub use surface::{DrawCommand, DrawSurface, FrameRecorder, Rgba};
