use crate::api::config::FieldConfig;
use crate::api::field::ParticleField;
use crate::api::types::{Theme, Viewport};
use crate::core::rng::Rng;
use crate::core::schedule::{FrameLane, FrameSource};
use crate::core::time::FpsMonitor;
use crate::input::event::HostEvent;
use crate::systems::constellation::Constellation;

/// Page-side owner of the particle field.
///
/// Applies the policies that belong to the page rather than the field: the
/// reduced-motion gate, the click-burst chance, theme names → palettes, the
/// delayed constellation and the frame-rate guard. With reduced motion the
/// field is never built and every event is a no-op.
pub struct Backdrop<F: FrameSource> {
    config: FieldConfig,
    field: Option<ParticleField<F>>,
    viewport: Viewport,
    rng: Rng,
    fps: FpsMonitor,
    /// Display timestamp of the first swarm frame.
    started_at: Option<f64>,
    constellation: Option<Constellation>,
    /// Set once the constellation decision has been made (built or skipped).
    constellation_settled: bool,
}

impl<F: FrameSource> Backdrop<F> {
    /// `seed` is used unless the config pins one.
    pub fn new(
        viewport: Viewport,
        prefers_reduced_motion: bool,
        theme: Theme,
        config: FieldConfig,
        frames: F,
        seed: u64,
    ) -> Self {
        let seed = config.seed.unwrap_or(seed);
        let field = if prefers_reduced_motion {
            log::info!("backdrop: reduced motion requested, particles disabled");
            None
        } else {
            let mut field = ParticleField::new(viewport, config.clone(), frames, seed);
            let palette = config.palette_for(theme);
            if field.palette() != palette {
                field.set_palette(palette);
            }
            Some(field)
        };
        Backdrop {
            fps: FpsMonitor::default(),
            rng: Rng::new(seed.wrapping_add(7919)),
            viewport,
            field,
            started_at: None,
            constellation: None,
            constellation_settled: false,
            config,
        }
    }

    /// Whether the particle field exists (not disabled, not torn down).
    pub fn is_active(&self) -> bool {
        self.field.is_some()
    }

    pub fn field(&self) -> Option<&ParticleField<F>> {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> Option<&mut ParticleField<F>> {
        self.field.as_mut()
    }

    pub fn constellation(&self) -> Option<&Constellation> {
        self.constellation.as_ref()
    }

    /// Dispatch a page event.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            HostEvent::Click { x, y } => {
                self.on_click(x, y);
            }
            HostEvent::Resize { width, height } => self.on_resize(Viewport::new(width, height)),
            HostEvent::VisibilityChange { hidden } => self.on_visibility_change(hidden),
            HostEvent::ThemeChanged { theme } => self.on_theme_changed(&theme),
            HostEvent::Teardown => self.teardown(),
        }
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if let Some(field) = self.field.as_mut() {
            field.on_pointer_move(x, y);
        }
    }

    /// Maybe burst at the click. Returns true if a burst was emitted.
    pub fn on_click(&mut self, x: f32, y: f32) -> bool {
        let Some(field) = self.field.as_mut() else {
            return false;
        };
        if !self.rng.chance(self.config.click_burst_chance) {
            return false;
        }
        field.burst(x, y, self.config.click_burst_count);
        true
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(field) = self.field.as_mut() {
            field.on_resize(viewport);
        }
    }

    /// Pause or resume the swarm. The frame-rate window restarts either way so
    /// time spent hidden is not measured.
    pub fn on_visibility_change(&mut self, hidden: bool) {
        self.fps.reset();
        if let Some(field) = self.field.as_mut() {
            if hidden {
                field.pause();
            } else {
                field.resume();
            }
        }
    }

    /// Re-hue the swarm for a theme name. Unknown names get the light palette.
    pub fn on_theme_changed(&mut self, name: &str) {
        let theme = Theme::from_name(name).unwrap_or_else(|| {
            log::warn!("backdrop: unknown theme {:?}, using light palette", name);
            Theme::Light
        });
        let palette = self.config.palette_for(theme);
        if let Some(field) = self.field.as_mut() {
            field.set_palette(palette);
        }
    }

    /// Frame callback from the display. `now_ms` is the display timestamp.
    pub fn on_frame(&mut self, lane: FrameLane, now_ms: f64) {
        if self.field.is_none() {
            return;
        }
        if lane == FrameLane::Swarm {
            self.advance_clock(now_ms);
        }
        if let Some(field) = self.field.as_mut() {
            field.on_frame(lane);
        }
    }

    /// Track elapsed time and frame rate; builds the constellation once its delay has passed.
    pub fn advance_clock(&mut self, now_ms: f64) {
        let start = *self.started_at.get_or_insert(now_ms);

        if let Some(fps) = self.fps.frame(now_ms) {
            if fps < self.config.performance.min_fps {
                if let Some(field) = self.field.as_mut() {
                    if field.degrade() {
                        log::info!("backdrop: {} fps, reducing particle count", fps);
                    }
                }
            }
        }

        if self.constellation_settled || now_ms - start < self.config.constellation.delay_ms {
            return;
        }
        self.constellation_settled = true;
        if Constellation::fits(self.viewport, &self.config.constellation) {
            let constellation = Constellation::generate(self.viewport, &self.config.constellation, &mut self.rng);
            log::info!(
                "backdrop: constellation with {} stars, {} lines",
                constellation.stars().len(),
                constellation.lines().len()
            );
            self.constellation = Some(constellation);
        }
    }

    /// Destroy the field. The backdrop stays inert afterwards.
    pub fn teardown(&mut self) {
        if let Some(mut field) = self.field.take() {
            field.destroy();
        }
        self.constellation = None;
        self.constellation_settled = true;
    }
}
