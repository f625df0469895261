#![cfg(target_arch = "wasm32")]
//! Browser front-end for the effects engine.
//!
//! Every effect is a `#[wasm_bindgen]` class constructed by its host view.
//! Construction starts a `requestAnimationFrame` loop; `dispose()` (also run
//! when JS calls `free()`) stops it, detaches listeners and releases the
//! canvas or GPU resources it created.

use wasm_bindgen::prelude::*;

mod canvas2d;
mod constants;
mod core;
mod dom;
mod effects;
mod frame;
mod input;
mod render;
mod zones;

pub use effects::count_up::CountUp;
pub use effects::cursor_trail::CursorTrail;
pub use effects::fluid_overlay::FluidOverlay;
pub use effects::gallery::CircularGallery;
pub use effects::hero::HeroSpotlight;
pub use effects::invert_cursor::InvertCursor;
pub use effects::magnetic::MagneticButton;
pub use effects::scroll::SmoothScroll;
pub use effects::wave_grid::WaveGrid;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("fx-web starting");
    Ok(())
}
