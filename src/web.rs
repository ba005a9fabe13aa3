//! Browser host: mounts the star field onto a 2D `<canvas>`
//!
//! The renderer lives in an `Rc<RefCell<_>>` shared by the animation-frame
//! closure and the window listeners. Dropping [`Mounted`] cancels the pending
//! frame, removes the listeners and breaks the frame closure's self-reference.

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use crate::config::StarfieldConfig;
use crate::core::{DrawSurface, Rgba, StarfieldRenderer, Viewport};
use crate::theme::Theme;

/// Global holding an optional JSON config string
const CONFIG_GLOBAL: &str = "__starfield_config";

#[derive(Debug, Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("canvas element `{0}` not found")]
    CanvasNotFound(String),
    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("2d drawing context unavailable")]
    ContextUnavailable,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        MountError::Js(format!("{:?}", value))
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();
}

// ============================================================================
// CanvasSurface - DrawSurface over CanvasRenderingContext2d
// ============================================================================

struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32, background: Rgba) {
        let (w, h) = (width as f64, height as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if background.a > 0.0 {
            self.ctx.set_fill_style_str(&background.to_css());
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(x as f64, y as f64, radius as f64, 0.0, TAU)
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from[0] as f64, from[1] as f64);
        self.ctx.line_to(to[0] as f64, to[1] as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_glow(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        let (x, y, r) = (x as f64, y as f64, radius as f64);
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) else {
            self.fill_circle(x as f32, y as f32, radius, color);
            return;
        };
        let transparent = Rgba { a: 0.0, ..color };
        let _ = gradient.add_color_stop(0.0, &color.to_css());
        let _ = gradient.add_color_stop(1.0, &transparent.to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
    }

    fn fill_vertical_fade(&mut self, width: f32, top: f32, bottom: f32, color: Rgba) {
        let (top, bottom) = (top as f64, bottom as f64);
        let gradient = self.ctx.create_linear_gradient(0.0, top, 0.0, bottom);
        let transparent = Rgba { a: 0.0, ..color };
        let _ = gradient.add_color_stop(0.0, &transparent.to_css());
        let _ = gradient.add_color_stop(1.0, &color.to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, top, width as f64, bottom - top);
    }
}

// ============================================================================
// Host state and lifecycle
// ============================================================================

struct Host {
    renderer: StarfieldRenderer,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
}

impl Host {
    /// Match the canvas backing store to the viewport and regenerate
    fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
        self.renderer.resize(viewport);
    }

    fn draw(&mut self, time_ms: f64) {
        let Host { renderer, surface, .. } = self;
        renderer.frame(time_ms, surface);
    }
}

fn window_viewport(window: &Window) -> Viewport {
    let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Viewport::new(size(window.inner_width()), size(window.inner_height()))
}

/// Read `window.__starfield_config`, falling back to defaults
fn config_from_window(window: &Window) -> StarfieldConfig {
    let json = js_sys::Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))
        .ok()
        .and_then(|v| v.as_string());
    match json {
        Some(json) => StarfieldConfig::from_json_str(&json).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring invalid star field config");
            StarfieldConfig::default()
        }),
        None => StarfieldConfig::default(),
    }
}

type FrameClosure = Closure<dyn FnMut(f64)>;

/// A star field attached to a canvas; dropping it tears everything down
pub struct Mounted {
    window: Window,
    host: Rc<RefCell<Host>>,
    frame_loop: Rc<RefCell<Option<FrameClosure>>>,
    frame_handle: Rc<Cell<Option<i32>>>,
    on_resize: Closure<dyn FnMut()>,
    on_pointer: Closure<dyn FnMut(MouseEvent)>,
}

/// Attach a star field to the canvas with id `canvas_id`
pub fn mount(canvas_id: &str, config: StarfieldConfig, theme: Theme) -> Result<Mounted, MountError> {
    let window = web_sys::window().ok_or(MountError::NoWindow)?;
    let document = window.document().ok_or(MountError::NoDocument)?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| MountError::CanvasNotFound(canvas_id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| MountError::NotACanvas(canvas_id.to_string()))?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or(MountError::ContextUnavailable)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| MountError::ContextUnavailable)?;

    let viewport = window_viewport(&window);
    canvas.set_width(viewport.width as u32);
    canvas.set_height(viewport.height as u32);

    let host = Rc::new(RefCell::new(Host {
        renderer: StarfieldRenderer::new(config, viewport, theme),
        canvas,
        surface: CanvasSurface { ctx },
    }));

    // Resize - regenerate for the new window size
    let on_resize = {
        let host = host.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move || {
            host.borrow_mut().resize(window_viewport(&window));
        }) as Box<dyn FnMut()>)
    };

    // Pointer - raw position plus smoothing target
    let on_pointer = {
        let host = host.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            host.borrow_mut()
                .renderer
                .pointer_move(e.client_x() as f32, e.client_y() as f32);
        }) as Box<dyn FnMut(MouseEvent)>)
    };

    // Frame loop - the closure re-requests itself through `frame_loop`;
    // every handle is stored so teardown can cancel the pending one
    let frame_loop: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));
    let frame_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    {
        let next = frame_loop.clone();
        let handle = frame_handle.clone();
        let host = host.clone();
        let window = window.clone();
        *frame_loop.borrow_mut() = Some(Closure::wrap(Box::new(move |time: f64| {
            handle.set(None);
            host.borrow_mut().draw(time);
            if let Some(callback) = next.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => handle.set(Some(id)),
                    Err(e) => warn!(?e, "failed to schedule star field frame"),
                }
            }
        }) as Box<dyn FnMut(f64)>));
    }

    // Own every closure before anything is registered: an early return
    // below drops `mounted`, which unregisters whatever got attached
    let mounted = Mounted {
        window,
        host,
        frame_loop,
        frame_handle,
        on_resize,
        on_pointer,
    };
    mounted.start()?;

    info!(
        canvas_id,
        width = viewport.width,
        height = viewport.height,
        %theme,
        "star field mounted"
    );
    Ok(mounted)
}

impl Mounted {
    /// Attach the window listeners and request the first frame
    fn start(&self) -> Result<(), MountError> {
        self.window
            .add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())?;
        self.window.add_event_listener_with_callback(
            "pointermove",
            self.on_pointer.as_ref().unchecked_ref(),
        )?;
        if let Some(callback) = self.frame_loop.borrow().as_ref() {
            let id = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.frame_handle.set(Some(id));
        }
        Ok(())
    }

    pub fn set_theme(&self, theme: Theme) {
        self.host.borrow_mut().renderer.set_theme(theme);
    }

    pub fn set_config(&self, config: StarfieldConfig) {
        self.host.borrow_mut().renderer.set_config(config);
    }

    /// Re-read the window size and regenerate
    pub fn resize(&self) {
        self.host.borrow_mut().resize(window_viewport(&self.window));
    }

    pub fn star_count(&self) -> usize {
        self.host.borrow().renderer.particles().len()
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        if let Some(id) = self.frame_handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                warn!(?e, "failed to cancel star field frame");
            }
        }
        for (event, callback) in [
            ("resize", self.on_resize.as_ref()),
            ("pointermove", self.on_pointer.as_ref()),
        ] {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(event, callback.unchecked_ref())
            {
                warn!(?e, event, "failed to remove star field listener");
            }
        }
        // Breaks the closure -> frame_loop -> closure cycle
        self.frame_loop.borrow_mut().take();
        debug!("star field unmounted");
    }
}

// ============================================================================
// JavaScript API
// ============================================================================

/// Handle returned to JavaScript by [`attach`]
#[wasm_bindgen]
pub struct StarfieldBackdrop {
    mounted: Mounted,
}

#[wasm_bindgen]
impl StarfieldBackdrop {
    #[wasm_bindgen(js_name = setDarkMode)]
    pub fn set_dark_mode(&self, dark: bool) {
        let theme = if dark { Theme::Dark } else { Theme::Light };
        self.mounted.set_theme(theme);
    }

    /// Replace the configuration from a JSON string; returns false when the
    /// JSON is rejected and the current config is kept
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, json: &str) -> bool {
        match StarfieldConfig::from_json_str(json) {
            Ok(config) => {
                self.mounted.set_config(config);
                true
            }
            Err(e) => {
                warn!(error = %e, "rejected star field config");
                false
            }
        }
    }

    pub fn resize(&self) {
        self.mounted.resize();
    }

    #[wasm_bindgen(js_name = starCount)]
    pub fn star_count(&self) -> usize {
        self.mounted.star_count()
    }

    /// Stop the animation and release every listener
    pub fn destroy(self) {
        drop(self.mounted);
    }
}

/// Mount the star field on `canvas_id`. Returns `undefined` when the canvas
/// or its 2D context is unavailable; the page simply has no backdrop then.
#[wasm_bindgen]
pub fn attach(canvas_id: &str, dark: bool) -> Option<StarfieldBackdrop> {
    let window = web_sys::window()?;
    let config = config_from_window(&window);
    let theme = if dark { Theme::Dark } else { Theme::Light };
    match mount(canvas_id, config, theme) {
        Ok(mounted) => Some(StarfieldBackdrop { mounted }),
        Err(e) => {
            warn!(error = %e, canvas_id, "star field not mounted");
            None
        }
    }
}
