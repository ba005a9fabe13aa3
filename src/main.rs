//! Standalone CLI for exercising the star-field frame pipeline headlessly
//!
//! Run with: cargo run --features cli --bin starfield-cli
//!
//! Environment:
//! - STARFIELD_CONFIG: path to a JSON config (defaults otherwise)
//! - STARFIELD_FRAMES: number of frames to simulate (default 600)
//! - STARFIELD_VIEWPORT: `WIDTHxHEIGHT` (default 1920x1080)
//! - STARFIELD_THEME: `dark` or `light` (default dark)

use std::error::Error;

use starfield_backdrop::core::FrameRecorder;
use starfield_backdrop::{StarfieldConfig, StarfieldRenderer, Theme, Viewport};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

const FRAME_MS: f64 = 1000.0 / 60.0;
const STATS_EVERY: usize = 60;
/// Viewport switched to halfway through the run
const NARROW_VIEWPORT: Viewport = Viewport::new(400.0, 800.0);

fn parse_viewport(s: &str) -> Result<Viewport, Box<dyn Error>> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("viewport `{}` is not WIDTHxHEIGHT", s))?;
    Ok(Viewport::new(w.trim().parse()?, h.trim().parse()?))
}

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
    let frames: usize = match std::env::var("STARFIELD_FRAMES") {
        Ok(n) => n.parse()?,
        Err(_) => 600,
    };
    let viewport = match std::env::var("STARFIELD_VIEWPORT") {
        Ok(v) => parse_viewport(&v)?,
        Err(_) => Viewport::new(1920.0, 1080.0),
    };
    let theme = match std::env::var("STARFIELD_THEME") {
        Ok(t) => Theme::parse(&t).ok_or_else(|| format!("unknown theme `{}`", t))?,
        Err(_) => Theme::Dark,
    };

    info!(frames, width = viewport.width, height = viewport.height, %theme, "Starting simulation");

    let mut renderer = StarfieldRenderer::new(config, viewport, theme);
    let mut surface = FrameRecorder::new();
    let mut total_links = 0usize;
    let mut links_last_interval = 0usize;

    for frame in 0..frames {
        let time_ms = frame as f64 * FRAME_MS;

        if frame == frames / 2 {
            let count = renderer.resize(NARROW_VIEWPORT);
            info!(width = NARROW_VIEWPORT.width, count, "Resized");
        }

        // Pointer sweeps a slow ellipse around the viewport centre
        let vp = renderer.viewport();
        let angle = (time_ms / 2000.0) as f32;
        renderer.pointer_move(
            vp.width * (0.5 + 0.4 * angle.cos()),
            vp.height * (0.5 + 0.4 * angle.sin()),
        );

        let stats = renderer.frame(time_ms, &mut surface);
        total_links += stats.links;
        links_last_interval += stats.links;
        debug!(frame, stars = stats.stars, links = stats.links, "frame");

        if (frame + 1) % STATS_EVERY == 0 {
            let [sx, sy] = renderer.pointer().value();
            info!(
                frame = frame + 1,
                stars = stats.stars,
                "links/frame" = format!("{:.1}", links_last_interval as f64 / STATS_EVERY as f64),
                parallax_x = format!("{:.1}", stats.parallax[0]),
                parallax_y = format!("{:.1}", stats.parallax[1]),
                pointer = format!("({:.2}, {:.2})", sx, sy),
                "stats"
            );
            links_last_interval = 0;
        }
    }

    info!(frames = surface.frames, total_links, "Simulation finished");
    Ok(())
}
