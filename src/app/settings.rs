//! Settings sidebar: parallax, drift, links, spring and population

use eframe::egui;
use crate::config::{LinkAnchor, StarfieldConfig};
use super::PreviewApp;

/// Full-width slider; double-click resets to `default`
fn reset_slider(
    ui: &mut egui::Ui,
    label: String,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    default: f32,
    logarithmic: bool,
) {
    let muted = ui.visuals().weak_text_color();
    ui.label(egui::RichText::new(label).color(muted));
    let full_width = ui.available_width();
    ui.spacing_mut().slider_width = full_width;
    let response = ui.add(
        egui::Slider::new(value, range)
            .logarithmic(logarithmic)
            .clamping(egui::SliderClamping::Always)
            .show_value(false),
    );
    if response.double_clicked() {
        *value = default;
    }
}

impl PreviewApp {
    pub(crate) fn render_settings(&mut self, ctx: &egui::Context) {
        let defaults = StarfieldConfig::default();
        let half_width = ctx.screen_rect().width() * 0.18;
        egui::SidePanel::left("settings")
            .default_width(half_width)
            .min_width(240.0)
            .resizable(true)
            .frame(egui::Frame::new().inner_margin(8.0))
            .show(ctx, |ui| {
                let muted = ui.visuals().weak_text_color();
                let group_frame = egui::Frame::new()
                    .stroke(egui::Stroke::new(1.0, muted.gamma_multiply(0.6)))
                    .corner_radius(4.0)
                    .inner_margin(6.0);

                let config = &mut self.config;

                group_frame.show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new("Motion:").color(muted));

                    reset_slider(
                        ui,
                        format!("Parallax: {:.0}px", config.motion.parallax_strength),
                        &mut config.motion.parallax_strength,
                        0.0..=400.0,
                        defaults.motion.parallax_strength,
                        false,
                    );
                    reset_slider(
                        ui,
                        format!("Drift: {:.2}px/frame", config.motion.drift_per_frame),
                        &mut config.motion.drift_per_frame,
                        0.0..=1.0,
                        defaults.motion.drift_per_frame,
                        false,
                    );
                    reset_slider(
                        ui,
                        format!("Damping ratio: {:.2}", config.spring.damping_ratio),
                        &mut config.spring.damping_ratio,
                        0.2..=5.0,
                        defaults.spring.damping_ratio,
                        true,
                    );
                    ui.checkbox(&mut config.nebula, "Nebula glow");
                    ui.checkbox(&mut config.depth_overlay, "Depth overlay");
                });

                ui.add_space(8.0);

                group_frame.show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new("Pointer links:").color(muted));

                    reset_slider(
                        ui,
                        format!("Radius: {:.0}px", config.links.radius),
                        &mut config.links.radius,
                        20.0..=400.0,
                        defaults.links.radius,
                        false,
                    );
                    for &anchor in LinkAnchor::ALL {
                        ui.radio_value(&mut config.links.anchor, anchor, anchor.label());
                    }
                });

                ui.add_space(8.0);

                group_frame.show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new("Population:").color(muted));
                    ui.horizontal(|ui| {
                        ui.label("Desktop");
                        ui.add(egui::DragValue::new(&mut config.population.desktop_count).range(0..=5000));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Mobile");
                        ui.add(egui::DragValue::new(&mut config.population.mobile_count).range(0..=5000));
                    });
                    ui.label(
                        egui::RichText::new(format!(
                            "  Mobile below {:.0}px wide",
                            config.population.mobile_breakpoint
                        ))
                        .color(muted)
                        .small(),
                    );
                });
            });
    }
}
