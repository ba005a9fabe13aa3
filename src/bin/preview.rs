//! Native preview window for the star-field backdrop
//!
//! Run with: cargo run --features native --bin starfield-preview
//! Press T to toggle the theme.

use std::error::Error;

use eframe::egui;
use starfield_backdrop::app::PreviewApp;
use starfield_backdrop::{StarfieldConfig, Theme};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,starfield_backdrop=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = match std::env::var("STARFIELD_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading config");
            StarfieldConfig::from_path(&path)?
        }
        Err(_) => StarfieldConfig::default(),
    };
    let theme = std::env::var("STARFIELD_THEME")
        .ok()
        .and_then(|t| Theme::parse(&t))
        .unwrap_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Starfield")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Starfield",
        options,
        Box::new(move |cc| Ok(Box::new(PreviewApp::new(cc, config, theme)))),
    )?;
    Ok(())
}
