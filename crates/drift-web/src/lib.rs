pub mod runner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub use runner::{parse_config, AnimationFrames, InitError, WebRunner};

thread_local! {
    static RUNNER: RefCell<Option<WebRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the installed runner. `None` before `drift_init`, after
/// `drift_destroy`, or when called re-entrantly.
pub(crate) fn with_runner<R>(f: impl FnOnce(&mut WebRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.try_borrow_mut().ok()?;
        borrow.as_mut().map(f)
    })
}

fn install(config_json: &str) -> Result<bool, InitError> {
    let config = parse_config(config_json)?;
    let window = web_sys::window().ok_or(InitError::NoWindow)?;
    let runner = WebRunner::new(&window, config)?;
    let active = runner.is_active();

    RUNNER.with(|cell| {
        if let Some(mut previous) = cell.borrow_mut().replace(runner) {
            log::warn!("drift: re-initialized, replacing the previous backdrop");
            previous.shutdown();
        }
    });

    if let Some(Err(err)) = with_runner(|r| r.attach_listeners(&window)) {
        // Tear down the runner installed above.
        drift_destroy();
        return Err(err);
    }
    Ok(active)
}

/// Install the particle backdrop on the current page.
///
/// `config_json` is a (possibly partial or empty) JSON `FieldConfig`.
/// Returns true if particles are running; false when reduced motion is
/// requested or setup failed (logged to the console).
#[wasm_bindgen]
pub fn drift_init(config_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match install(config_json) {
        Ok(active) => {
            log::info!("drift: initialized (active: {})", active);
            active
        }
        Err(err) => {
            log::error!("drift: {}", err);
            false
        }
    }
}

/// Stop the backdrop, remove its listeners and free everything.
#[wasm_bindgen]
pub fn drift_destroy() {
    let runner = RUNNER.with(|cell| cell.borrow_mut().take());
    if let Some(mut runner) = runner {
        runner.shutdown();
        log::info!("drift: destroyed");
    }
}

#[wasm_bindgen]
pub fn drift_is_active() -> bool {
    with_runner(|r| r.is_active()).unwrap_or(false)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_particles_ptr() -> *const f32 {
    with_runner(|r| r.particles_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_particle_count() -> u32 {
    with_runner(|r| r.particle_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_bursts_ptr() -> *const f32 {
    with_runner(|r| r.bursts_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_burst_count() -> u32 {
    with_runner(|r| r.burst_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_links_ptr() -> *const f32 {
    with_runner(|r| r.links_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_link_vertex_count() -> u32 {
    with_runner(|r| r.link_vertex_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_stars_ptr() -> *const f32 {
    with_runner(|r| r.stars_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_star_count() -> u32 {
    with_runner(|r| r.star_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_constellation_lines_ptr() -> *const f32 {
    with_runner(|r| r.constellation_lines_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_constellation_vertex_count() -> u32 {
    with_runner(|r| r.constellation_vertex_count()).unwrap_or(0)
}

// ---- Layout constants (floats per record) ----

#[wasm_bindgen]
pub fn get_particle_stride() -> u32 {
    drift_engine::ParticleInstance::FLOATS as u32
}

#[wasm_bindgen]
pub fn get_star_stride() -> u32 {
    drift_engine::StarInstance::FLOATS as u32
}

#[wasm_bindgen]
pub fn get_line_vertex_stride() -> u32 {
    drift_engine::LineVertex::FLOATS as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_config_fails_before_touching_the_runner() {
        assert!(matches!(install("{ not json"), Err(InitError::Json(_))));
        assert!(matches!(
            install(r#"{ "click_burst_chance": 2.0 }"#),
            Err(InitError::Config(_))
        ));
        assert!(with_runner(|_| ()).is_none());
    }
}
