use std::fmt;

use drift_engine::{
    Backdrop, ConfigError, FieldConfig, FrameId, FrameLane, FrameSource, HostEvent, Theme,
    Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, Document, Event, EventTarget, MouseEvent, Window};

use crate::with_runner;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
const THEME_ATTRIBUTE: &str = "data-theme";
const THEME_EVENT: &str = "themeChanged";

/// Why the backdrop could not be installed.
#[derive(Debug)]
pub enum InitError {
    /// The config string is not valid JSON for [`FieldConfig`].
    Json(String),
    Config(ConfigError),
    NoWindow,
    NoDocument,
    Js(JsValue),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Json(msg) => write!(f, "bad config JSON: {}", msg),
            InitError::Config(err) => write!(f, "invalid config: {}", err),
            InitError::NoWindow => write!(f, "no window"),
            InitError::NoDocument => write!(f, "no document"),
            InitError::Js(value) => write!(f, "DOM call failed: {:?}", value),
        }
    }
}

impl From<JsValue> for InitError {
    fn from(value: JsValue) -> Self {
        InitError::Js(value)
    }
}

/// Parse and validate a config string. Blank means defaults.
pub fn parse_config(json: &str) -> Result<FieldConfig, InitError> {
    let config = if json.trim().is_empty() {
        FieldConfig::default()
    } else {
        FieldConfig::from_json(json).map_err(|e| InitError::Json(e.to_string()))?
    };
    config.validate().map_err(InitError::Config)?;
    Ok(config)
}

/// [`FrameSource`] backed by `requestAnimationFrame`.
///
/// One callback per lane; each forwards the display timestamp to the
/// installed runner.
pub struct AnimationFrames {
    window: Window,
    callbacks: [Closure<dyn FnMut(f64)>; 2],
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        let callbacks = FrameLane::ALL.map(|lane| {
            Closure::<dyn FnMut(f64)>::new(move |now_ms: f64| {
                with_runner(|r| r.on_frame(lane, now_ms));
            })
        });
        Self { window, callbacks }
    }

    fn callback(&self, lane: FrameLane) -> &Closure<dyn FnMut(f64)> {
        match lane {
            FrameLane::Swarm => &self.callbacks[0],
            FrameLane::Burst => &self.callbacks[1],
        }
    }
}

impl FrameSource for AnimationFrames {
    fn request_frame(&mut self, lane: FrameLane) -> Option<FrameId> {
        match self
            .window
            .request_animation_frame(self.callback(lane).as_ref().unchecked_ref())
        {
            Ok(handle) => Some(FrameId(handle as u64)),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {:?}", err);
                None
            }
        }
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Err(err) = self.window.cancel_animation_frame(id.0 as i32) {
            log::warn!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}

/// A registered DOM listener, kept so it can be removed again.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, InitError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn detach(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener({}) failed: {:?}", self.kind, err);
        }
    }
}

/// Browser host for the backdrop.
///
/// Lives in a `thread_local!` (see `lib.rs`) because wasm-bindgen cannot
/// export generic structs; DOM and frame callbacks reach it via `with_runner`.
pub struct WebRunner {
    backdrop: Backdrop<AnimationFrames>,
    listeners: Vec<Listener>,
}

impl WebRunner {
    /// Read the page state and build the backdrop. Listeners are attached
    /// separately with [`attach_listeners`](Self::attach_listeners) once the
    /// runner is reachable from callbacks.
    pub fn new(window: &Window, config: FieldConfig) -> Result<Self, InitError> {
        let document = window.document().ok_or(InitError::NoDocument)?;
        let reduced_motion = window
            .match_media(REDUCED_MOTION_QUERY)?
            .map(|query| query.matches())
            .unwrap_or(false);
        let viewport = viewport_of(window)?;
        let theme = body_theme(&document).unwrap_or(Theme::Light);
        let seed = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;

        let backdrop = Backdrop::new(
            viewport,
            reduced_motion,
            theme,
            config,
            AnimationFrames::new(window.clone()),
            seed,
        );
        Ok(Self {
            backdrop,
            listeners: Vec::new(),
        })
    }

    /// Register the page listeners. Skipped when the backdrop is disabled.
    pub fn attach_listeners(&mut self, window: &Window) -> Result<(), InitError> {
        if !self.backdrop.is_active() {
            return Ok(());
        }
        let document = window.document().ok_or(InitError::NoDocument)?;
        let doc_target: &EventTarget = document.as_ref();
        let win_target: &EventTarget = window.as_ref();

        self.listeners.push(Listener::attach(doc_target, "mousemove", |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let (x, y) = (mouse.client_x() as f32, mouse.client_y() as f32);
                with_runner(|r| r.handle(HostEvent::PointerMove { x, y }));
            }
        })?);

        self.listeners.push(Listener::attach(doc_target, "click", |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let (x, y) = (mouse.client_x() as f32, mouse.client_y() as f32);
                with_runner(|r| r.handle(HostEvent::Click { x, y }));
            }
        })?);

        self.listeners.push(Listener::attach(win_target, "resize", |_| {
            let Some(window) = web_sys::window() else { return };
            match viewport_of(&window) {
                Ok(vp) => {
                    with_runner(|r| r.handle(HostEvent::Resize { width: vp.width, height: vp.height }));
                }
                Err(err) => log::warn!("resize: {}", err),
            }
        })?);

        self.listeners.push(Listener::attach(doc_target, "visibilitychange", |_| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else { return };
            let hidden = document.hidden();
            with_runner(|r| r.handle(HostEvent::VisibilityChange { hidden }));
        })?);

        self.listeners.push(Listener::attach(win_target, THEME_EVENT, |event| {
            let theme = event
                .dyn_ref::<CustomEvent>()
                .and_then(|custom| js_sys::Reflect::get(&custom.detail(), &JsValue::from_str("theme")).ok())
                .and_then(|value| value.as_string())
                .or_else(|| {
                    web_sys::window()
                        .and_then(|w| w.document())
                        .and_then(|d| d.body())
                        .and_then(|body| body.get_attribute(THEME_ATTRIBUTE))
                });
            match theme {
                Some(theme) => {
                    with_runner(|r| r.handle(HostEvent::ThemeChanged { theme }));
                }
                None => log::warn!("{} without a theme name", THEME_EVENT),
            }
        })?);

        // Stays attached after teardown; a listener cannot drop itself mid-call.
        self.listeners.push(Listener::attach(win_target, "beforeunload", |_| {
            with_runner(|r| r.handle(HostEvent::Teardown));
        })?);

        log::debug!("drift: {} listeners attached", self.listeners.len());
        Ok(())
    }

    pub fn handle(&mut self, event: HostEvent) {
        self.backdrop.handle(event);
    }

    pub fn on_frame(&mut self, lane: FrameLane, now_ms: f64) {
        self.backdrop.on_frame(lane, now_ms);
    }

    /// Stop the backdrop and remove every listener.
    /// Must not be called from inside one of the listeners.
    pub fn shutdown(&mut self) {
        self.backdrop.teardown();
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
    }

    pub fn is_active(&self) -> bool {
        self.backdrop.is_active()
    }

    // ---- Pointer accessors for direct wasm memory reads ----

    pub fn particles_ptr(&self) -> *const f32 {
        self.backdrop.field().map_or(std::ptr::null(), |f| f.instances().as_ptr())
    }

    pub fn particle_count(&self) -> u32 {
        self.backdrop.field().map_or(0, |f| f.instances().len() as u32)
    }

    pub fn bursts_ptr(&self) -> *const f32 {
        self.backdrop.field().map_or(std::ptr::null(), |f| f.bursts().instances().as_ptr())
    }

    pub fn burst_count(&self) -> u32 {
        self.backdrop.field().map_or(0, |f| f.bursts().instances().len() as u32)
    }

    pub fn links_ptr(&self) -> *const f32 {
        self.backdrop
            .field()
            .map_or(std::ptr::null(), |f| f.connections().vertices().as_ptr())
    }

    pub fn link_vertex_count(&self) -> u32 {
        self.backdrop.field().map_or(0, |f| f.connections().vertices().len() as u32)
    }

    pub fn stars_ptr(&self) -> *const f32 {
        self.backdrop
            .constellation()
            .map_or(std::ptr::null(), |c| c.star_instances().as_ptr())
    }

    pub fn star_count(&self) -> u32 {
        self.backdrop.constellation().map_or(0, |c| c.star_instances().len() as u32)
    }

    pub fn constellation_lines_ptr(&self) -> *const f32 {
        self.backdrop
            .constellation()
            .map_or(std::ptr::null(), |c| c.line_vertices().as_ptr())
    }

    pub fn constellation_vertex_count(&self) -> u32 {
        self.backdrop.constellation().map_or(0, |c| c.line_vertices().len() as u32)
    }
}

fn viewport_of(window: &Window) -> Result<Viewport, InitError> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0) as f32;
    let height = window.inner_height()?.as_f64().unwrap_or(0.0) as f32;
    Ok(Viewport::new(width, height))
}

fn body_theme(document: &Document) -> Option<Theme> {
    let name = document.body()?.get_attribute(THEME_ATTRIBUTE)?;
    Theme::from_name(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_config_is_default() {
        let config = parse_config("  ").unwrap();
        assert_eq!(config.click_burst_count, 8);
    }

    #[test]
    fn bad_json_is_reported() {
        let err = parse_config("{ not json").unwrap_err();
        assert!(matches!(err, InitError::Json(_)));
        assert!(err.to_string().starts_with("bad config JSON"));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = parse_config(r#"{ "click_burst_chance": 3.0 }"#).unwrap_err();
        assert!(matches!(err, InitError::Config(ConfigError::ProbabilityOutOfRange { .. })));
    }
}
