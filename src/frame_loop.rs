// Start/stop controller around requestAnimationFrame. Each frame re-arms a
// single one-shot registration; stopping cancels the pending one.

use crate::error::FieldError;
use crate::utils;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

struct LoopState {
    running: Cell<bool>,
    pending: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl LoopState {
    fn schedule(&self) -> Result<(), FieldError> {
        let window = web_sys::window().ok_or(FieldError::NoWindow)?;
        let callback = self.callback.borrow();
        if let Some(callback) = callback.as_ref() {
            let handle = window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .map_err(FieldError::from_js)?;
            self.pending.set(Some(handle));
        }
        Ok(())
    }

    fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                window.cancel_animation_frame(handle).ok();
            }
        }
    }
}

pub struct FrameLoop {
    state: Rc<LoopState>,
}

impl FrameLoop {
    pub fn new<F>(mut on_frame: F) -> FrameLoop
    where
        F: FnMut() + 'static,
    {
        let state = Rc::new(LoopState {
            running: Cell::new(false),
            pending: Cell::new(None),
            callback: RefCell::new(None),
        });

        // Weak so the closure stored inside the state doesn't keep it alive
        let weak = Rc::downgrade(&state);
        let callback = Closure::wrap(Box::new(move || {
            let state = match weak.upgrade() {
                Some(state) => state,
                None => return,
            };
            state.pending.set(None);
            if !state.running.get() {
                return;
            }
            on_frame();
            if state.running.get() {
                if let Err(err) = state.schedule() {
                    utils::error(&format!("frame loop halted: {}", err));
                    state.running.set(false);
                }
            }
        }) as Box<dyn FnMut()>);
        *state.callback.borrow_mut() = Some(callback);

        FrameLoop { state }
    }

    pub fn start(&self) -> Result<(), FieldError> {
        if self.state.running.get() {
            return Ok(());
        }
        self.state.running.set(true);
        if let Err(err) = self.state.schedule() {
            self.state.running.set(false);
            return Err(err);
        }
        Ok(())
    }

    /// Safe to call any number of times, including before `start`.
    pub fn stop(&self) {
        self.state.running.set(false);
        self.state.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
