// JS-facing handle for the animated page background. Owns the field, the
// canvas it draws on, the frame loop and the window resize listener.

use crate::canvas::{self, CanvasSurface};
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::field::ParticleField;
use crate::frame_loop::FrameLoop;
use crate::surface::DrawSurface;
use crate::utils::{self, Timer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct Scene {
    field: ParticleField,
    surface: CanvasSurface,
}

impl Scene {
    fn fit_to_viewport(&mut self, window: &Window) -> Result<(), FieldError> {
        self.surface.fit_to(canvas::viewport_bounds(window)?);
        self.field.resize(self.surface.bounds());
        Ok(())
    }

    fn frame(&mut self) {
        let _timer = if self.field.config().profile {
            Some(Timer::new("ParticleField::frame"))
        } else {
            None
        };
        self.field.frame(&mut self.surface);
    }
}

// Arguments the current field was built from
#[derive(Clone, Debug, PartialEq)]
struct Binding {
    canvas_id: String,
    particle_count: u32,
    seed: Option<u32>,
}

impl Binding {
    fn mismatch(&self, canvas_id: &str, particle_count: u32, seed: Option<u32>) -> Option<String> {
        let mut ignored = Vec::new();
        if self.canvas_id != canvas_id {
            ignored.push(format!("canvas '{}' (bound to '{}')", canvas_id, self.canvas_id));
        }
        if self.particle_count != particle_count {
            ignored.push(format!(
                "{} particles (field has {})",
                particle_count, self.particle_count
            ));
        }
        if seed.is_some() && self.seed != seed {
            ignored.push(format!("seed {:?} (field seeded with {:?})", seed, self.seed));
        }
        if ignored.is_empty() {
            None
        } else {
            Some(format!(
                "resuming existing particle field, ignoring {}",
                ignored.join(", ")
            ))
        }
    }
}

#[wasm_bindgen]
pub struct ParticleBackground {
    config: FieldConfig,
    binding: Option<Binding>,
    scene: Option<Rc<RefCell<Scene>>>,
    frame_loop: Option<FrameLoop>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl ParticleBackground {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ParticleBackground {
        ParticleBackground::with_config(FieldConfig::default())
    }

    /// Binds to the canvas with id `canvas_id`, sizes it to the viewport,
    /// spawns `particle_count` particles and starts animating. Passing a
    /// `seed` makes the initial layout reproducible.
    ///
    /// Once bound, later calls never rebuild the field: a stopped background
    /// resumes the existing one and a running one is left alone. Arguments
    /// that differ from the first call are ignored with a console warning.
    pub fn start(
        &mut self,
        canvas_id: &str,
        particle_count: u32,
        seed: Option<u32>,
    ) -> Result<(), JsValue> {
        if let Some(frame_loop) = &self.frame_loop {
            if let Some(warning) = self
                .binding
                .as_ref()
                .and_then(|binding| binding.mismatch(canvas_id, particle_count, seed))
            {
                utils::warn(&warning);
            }
            return Ok(frame_loop.start()?);
        }
        match self.bind(canvas_id, particle_count, seed) {
            Ok(()) => Ok(()),
            Err(err) => {
                utils::error(&format!("particle background not started: {}", err));
                Err(err.into())
            }
        }
    }

    /// Re-reads the viewport and resizes the canvas to it. No-op before `start`.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        if let Some(scene) = &self.scene {
            let window = web_sys::window().ok_or(FieldError::NoWindow)?;
            scene.borrow_mut().fit_to_viewport(&window)?;
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(frame_loop) = &self.frame_loop {
            frame_loop.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop
            .as_ref()
            .map(FrameLoop::is_running)
            .unwrap_or(false)
    }

    pub fn particle_count(&self) -> u32 {
        self.scene
            .as_ref()
            .map(|scene| scene.borrow().field.particles().len() as u32)
            .unwrap_or(0)
    }

    pub fn width(&self) -> u32 {
        self.scene
            .as_ref()
            .map(|scene| scene.borrow().field.bounds().width)
            .unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.scene
            .as_ref()
            .map(|scene| scene.borrow().field.bounds().height)
            .unwrap_or(0)
    }
}

impl ParticleBackground {
    pub fn with_config(config: FieldConfig) -> ParticleBackground {
        ParticleBackground {
            config,
            binding: None,
            scene: None,
            frame_loop: None,
            on_resize: None,
        }
    }

    fn bind(
        &mut self,
        canvas_id: &str,
        particle_count: u32,
        seed: Option<u32>,
    ) -> Result<(), FieldError> {
        let window = web_sys::window().ok_or(FieldError::NoWindow)?;
        let document = window.document().ok_or(FieldError::NoWindow)?;
        let surface = CanvasSurface::find(&document, canvas_id)?;
        surface.fit_to(canvas::viewport_bounds(&window)?);

        let config = self.config.clone().with_particle_count(particle_count);
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed as u64),
            None => StdRng::from_entropy(),
        };
        let field = ParticleField::generate(config, surface.bounds(), &mut rng)?;
        let scene = Rc::new(RefCell::new(Scene { field, surface }));

        let resize_scene = Rc::clone(&scene);
        let on_resize = Closure::wrap(Box::new(move || {
            let result = web_sys::window()
                .ok_or(FieldError::NoWindow)
                .and_then(|window| resize_scene.borrow_mut().fit_to_viewport(&window));
            if let Err(err) = result {
                utils::error(&format!("resize failed: {}", err));
            }
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(FieldError::from_js)?;

        let frame_scene = Rc::clone(&scene);
        let frame_loop = FrameLoop::new(move || frame_scene.borrow_mut().frame());

        self.binding = Some(Binding {
            canvas_id: canvas_id.to_owned(),
            particle_count,
            seed,
        });
        self.scene = Some(scene);
        self.on_resize = Some(on_resize);
        self.frame_loop = Some(frame_loop);

        if let Some(frame_loop) = &self.frame_loop {
            frame_loop.start()?;
        }
        utils::log(&format!(
            "particle background running: {} particles on {}x{}",
            self.particle_count(),
            self.width(),
            self.height()
        ));
        Ok(())
    }
}

impl Default for ParticleBackground {
    fn default() -> Self {
        ParticleBackground::new()
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.stop();
        if let Some(on_resize) = self.on_resize.take() {
            if let Some(window) = web_sys::window() {
                let callback: &js_sys::Function = on_resize.as_ref().unchecked_ref();
                window.remove_event_listener_with_callback("resize", callback).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound() -> Binding {
        Binding {
            canvas_id: "particleCanvas".to_owned(),
            particle_count: 100,
            seed: Some(7),
        }
    }

    #[test]
    fn same_arguments_resume_quietly() {
        assert_eq!(bound().mismatch("particleCanvas", 100, Some(7)), None);
        // No seed means "don't care", not "reseed"
        assert_eq!(bound().mismatch("particleCanvas", 100, None), None);
    }

    #[test]
    fn different_arguments_are_reported() {
        let warning = bound().mismatch("otherCanvas", 50, Some(3)).unwrap();
        assert!(warning.contains("canvas 'otherCanvas' (bound to 'particleCanvas')"));
        assert!(warning.contains("50 particles (field has 100)"));
        assert!(warning.contains("seed Some(3)"));
    }

    #[test]
    fn unbound_background_reports_nothing() {
        let background = ParticleBackground::new();
        assert!(!background.is_running());
        assert_eq!(background.particle_count(), 0);
        assert_eq!((background.width(), background.height()), (0, 0));
    }
}
