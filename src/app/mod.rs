//! Native star-field preview
//!
//! Paints the same renderer the browser uses through an `egui::Painter`, with
//! a header bar and a settings sidebar for tuning the effect live.

mod header;
mod settings;

use eframe::egui;
use tracing::info;

use crate::config::StarfieldConfig;
use crate::core::{DrawSurface, FrameStats, Rgba, StarfieldRenderer, Viewport};
use crate::theme::{preview_visuals, Theme};
use crate::time::now_millis;

/// Concentric rings used to approximate a radial glow
const GLOW_RINGS: usize = 12;

#[inline]
fn to_color32(color: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        color.r,
        color.g,
        color.b,
        (color.clamped_alpha() * 255.0).round() as u8,
    )
}

/// DrawSurface over an egui painter; star coordinates are relative to `origin`
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl PainterSurface<'_> {
    #[inline]
    fn pos(&self, x: f32, y: f32) -> egui::Pos2 {
        self.origin + egui::vec2(x, y)
    }
}

impl DrawSurface for PainterSurface<'_> {
    fn clear(&mut self, width: f32, height: f32, background: Rgba) {
        let rect = egui::Rect::from_min_size(self.origin, egui::vec2(width, height));
        self.painter.rect_filled(rect, 0.0, to_color32(background));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.painter.circle_filled(self.pos(x, y), radius, to_color32(color));
    }

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        self.painter.line_segment(
            [self.pos(from[0], from[1]), self.pos(to[0], to[1])],
            egui::Stroke::new(width, to_color32(color)),
        );
    }

    fn fill_glow(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        // Stacked translucent discs: alpha accumulates toward the centre
        let ring_alpha = color.a / GLOW_RINGS as f32;
        for i in 0..GLOW_RINGS {
            let r = radius * (1.0 - i as f32 / GLOW_RINGS as f32);
            self.fill_circle(x, y, r, Rgba { a: ring_alpha, ..color });
        }
    }

    fn fill_vertical_fade(&mut self, width: f32, top: f32, bottom: f32, color: Rgba) {
        let clear = to_color32(Rgba { a: 0.0, ..color });
        let solid = to_color32(color);
        let mut mesh = egui::Mesh::default();
        mesh.colored_vertex(self.pos(0.0, top), clear);
        mesh.colored_vertex(self.pos(width, top), clear);
        mesh.colored_vertex(self.pos(width, bottom), solid);
        mesh.colored_vertex(self.pos(0.0, bottom), solid);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        self.painter.add(egui::Shape::mesh(mesh));
    }
}

/// Star-field preview window
pub struct PreviewApp {
    pub(crate) renderer: StarfieldRenderer,
    /// Working copy edited by the settings sidebar
    pub(crate) config: StarfieldConfig,
    pub(crate) theme: Theme,
    pub(crate) fps_counter: header::FpsCounter,
    pub(crate) show_settings: bool,
    pub(crate) last_stats: FrameStats,
    last_pointer: Option<egui::Pos2>,
}

impl PreviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: StarfieldConfig, theme: Theme) -> Self {
        cc.egui_ctx.set_visuals(preview_visuals(theme));

        let rect = cc.egui_ctx.screen_rect();
        let viewport = Viewport::new(rect.width(), rect.height());
        info!(width = viewport.width, height = viewport.height, %theme, "preview started");

        Self {
            renderer: StarfieldRenderer::new(config.clone(), viewport, theme),
            config,
            theme,
            fps_counter: header::FpsCounter::new(),
            show_settings: false,
            last_stats: FrameStats::default(),
            last_pointer: None,
        }
    }

    pub(crate) fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = self.theme.toggled();
        ctx.set_visuals(preview_visuals(self.theme));
        self.renderer.set_theme(self.theme);
    }

    fn render_starfield(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
        let rect = response.rect;

        let viewport = Viewport::new(rect.width(), rect.height());
        if viewport != self.renderer.viewport() {
            self.renderer.resize(viewport);
        }

        if let Some(pos) = response.hover_pos() {
            if self.last_pointer != Some(pos) {
                let local = pos - rect.min;
                self.renderer.pointer_move(local.x, local.y);
                self.last_pointer = Some(pos);
            }
        }

        let mut surface = PainterSurface {
            painter: &painter,
            origin: rect.min,
        };
        self.last_stats = self.renderer.frame(now_millis(), &mut surface);
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Continuous animation
        ctx.request_repaint();

        if ctx.input(|i| i.key_pressed(egui::Key::T)) {
            self.toggle_theme(ctx);
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().inner_margin(4.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        // Settings sidebar (must be shown before CentralPanel)
        if self.show_settings {
            self.render_settings(ctx);
        }

        if self.config != *self.renderer.config() {
            match self.config.validate() {
                Ok(()) => self.renderer.set_config(self.config.clone()),
                Err(e) => {
                    tracing::warn!(error = %e, "keeping previous star field config");
                    self.config = self.renderer.config().clone();
                }
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                self.render_starfield(ui);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_conversion_rounds_alpha() {
        let c = to_color32(Rgba::new(10, 20, 30, 0.5));
        let expected = egui::Color32::from_rgba_unmultiplied(10, 20, 30, 128);
        assert_eq!(c, expected);
        assert_eq!(to_color32(Rgba::new(0, 0, 0, 2.0)).a(), 255);
    }
}
