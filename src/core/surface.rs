//! Drawing surface abstraction
//!
//! The renderer only needs five raster primitives addressed in viewport
//! pixels. Hosts implement [`DrawSurface`] over a 2D canvas or an egui
//! painter; [`FrameRecorder`] captures primitives for the CLI and tests.

/// Colour with straight (non-premultiplied) alpha in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha clamped to the displayable range
    #[inline]
    pub fn clamped_alpha(&self) -> f32 {
        self.a.clamp(0.0, 1.0)
    }

    /// CSS `rgba()` string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.clamped_alpha())
    }
}

/// 2D raster surface the star field is painted onto
pub trait DrawSurface {
    /// Wipe the whole surface and fill it with `background`
    fn clear(&mut self, width: f32, height: f32, background: Rgba);

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba);

    /// Soft glow centred at `(x, y)` fading out towards `radius`.
    ///
    /// Surfaces without gradient support fall back to a flat circle.
    fn fill_glow(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.fill_circle(x, y, radius, color);
    }

    /// Full-width band from `top` to `bottom`, transparent at `top` and
    /// reaching `color` at `bottom`
    fn fill_vertical_fade(&mut self, width: f32, top: f32, bottom: f32, color: Rgba);
}

/// A single recorded drawing primitive
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32, background: Rgba },
    Circle { x: f32, y: f32, radius: f32, color: Rgba },
    Line { from: [f32; 2], to: [f32; 2], width: f32, color: Rgba },
    Glow { x: f32, y: f32, radius: f32, color: Rgba },
    Fade { width: f32, top: f32, bottom: f32, color: Rgba },
}

/// Surface that records every primitive of the current frame.
///
/// `clear` starts a new frame, so `commands` always holds the last frame only.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub commands: Vec<DrawCommand>,
    /// Number of frames started since creation
    pub frames: u64,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn glows(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glow { .. }))
    }

    pub fn fades(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fade { .. }))
    }
}

impl DrawSurface for FrameRecorder {
    fn clear(&mut self, width: f32, height: f32, background: Rgba) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear { width, height, background });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { x, y, radius, color });
    }

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn fill_glow(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Glow { x, y, radius, color });
    }

    fn fill_vertical_fade(&mut self, width: f32, top: f32, bottom: f32, color: Rgba) {
        self.commands.push(DrawCommand::Fade { width, top, bottom, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_string_clamps_alpha() {
        assert_eq!(Rgba::new(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(Rgba::new(1, 2, 3, 1.7).to_css(), "rgba(1, 2, 3, 1)");
        assert_eq!(Rgba::new(1, 2, 3, -0.2).to_css(), "rgba(1, 2, 3, 0)");
    }

    #[test]
    fn recorder_keeps_last_frame_only() {
        let mut rec = FrameRecorder::new();
        let white = Rgba::new(255, 255, 255, 1.0);
        rec.clear(10.0, 10.0, white);
        rec.fill_circle(1.0, 1.0, 1.0, white);
        rec.stroke_line([0.0, 0.0], [1.0, 1.0], 0.5, white);
        assert_eq!(rec.circles().count(), 1);
        assert_eq!(rec.lines().count(), 1);

        rec.clear(10.0, 10.0, white);
        assert_eq!(rec.frames, 2);
        assert_eq!(rec.commands.len(), 1);
        assert_eq!(rec.circles().count(), 0);
    }

    #[test]
    fn default_glow_is_a_circle() {
        struct Flat(Vec<DrawCommand>);
        impl DrawSurface for Flat {
            fn clear(&mut self, _: f32, _: f32, _: Rgba) {}
            fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
                self.0.push(DrawCommand::Circle { x, y, radius, color });
            }
            fn stroke_line(&mut self, _: [f32; 2], _: [f32; 2], _: f32, _: Rgba) {}
            fn fill_vertical_fade(&mut self, _: f32, _: f32, _: f32, _: Rgba) {}
        }

        let mut flat = Flat(Vec::new());
        flat.fill_glow(5.0, 6.0, 7.0, Rgba::new(0, 0, 0, 0.1));
        assert!(matches!(flat.0[0], DrawCommand::Circle { radius, .. } if radius == 7.0));
    }
}
