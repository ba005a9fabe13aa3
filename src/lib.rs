//! Starfield backdrop - animated parallax star field for a portfolio site
//!
//! - core: particles, pointer spring and the per-frame renderer
//! - web: `<canvas>` host exported to JavaScript (wasm32 + `wasm` feature)
//! - app: egui preview window (`native` feature)

pub mod config;
pub mod core;
pub mod theme;
pub mod time;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod web;

#[cfg(feature = "native")]
pub mod app;

pub use crate::config::{ConfigError, StarfieldConfig};
pub use crate::core::{DrawSurface, FrameStats, StarfieldRenderer, Viewport};
pub use crate::theme::Theme;
