//! Header bar with theme/settings toggles and frame stats

use eframe::egui;
use crate::time::now_seconds;
use super::PreviewApp;

impl PreviewApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        self.fps_counter.tick();

        let muted = ui.visuals().weak_text_color();
        let stats = self.last_stats;
        let generation = self.renderer.particles().generation();

        ui.horizontal(|ui| {
            // LEFT: Control buttons
            let settings_text = if self.show_settings { "Settings <<<" } else { "Settings >>>" };
            if ui.button(egui::RichText::new(settings_text)).clicked() {
                self.show_settings = !self.show_settings;
            }

            ui.add_space(10.0);

            let theme_text = format!("Theme: {} (T)", self.theme);
            if ui.button(egui::RichText::new(theme_text)).clicked() {
                let ctx = ui.ctx().clone();
                self.toggle_theme(&ctx);
            }

            // RIGHT: Stats (right-to-left order)
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(format!("gen {}", generation)).color(muted));
                ui.label(egui::RichText::new("/").color(muted));
                ui.label(egui::RichText::new(format!("{} links", stats.links)).color(muted));
                ui.label(egui::RichText::new("/").color(muted));
                ui.label(egui::RichText::new(format!("{} stars", stats.stars)).color(muted));
                ui.label(egui::RichText::new("/").color(muted));
                ui.label(egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps())));
            });
        });
    }
}

/// FPS counter over the last 60 frames
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(61),
        }
    }

    pub fn tick(&mut self) {
        self.push(now_seconds());
    }

    fn push(&mut self, now: f64) {
        self.frames.push(now);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / elapsed
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_from_uniform_ticks() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.fps(), 0.0);
        for i in 0..100 {
            counter.push(i as f64 / 50.0);
        }
        assert!((counter.fps() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn single_tick_reports_zero() {
        let mut counter = FpsCounter::new();
        counter.push(1.0);
        assert_eq!(counter.fps(), 0.0);
    }
}
