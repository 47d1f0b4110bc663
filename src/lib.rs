mod background;
mod canvas;
pub mod color;
pub mod config;
mod error;
pub mod field;
mod frame_loop;
pub mod particle;
pub mod surface;
mod utils;

use wasm_bindgen::prelude::*;

pub use background::ParticleBackground;
pub use canvas::CanvasSurface;
pub use error::FieldError;
pub use frame_loop::FrameLoop;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}
