//! # Trophy Scene
//!
//! Hosts the camera tour for the trophy showcase: scene configuration,
//! the browser canvas binding and a headless tour preview.

pub mod config;
pub mod scene;
pub mod tour;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::SceneConfig;
pub use scene::TrophyScene;
pub use tour::{run_tour, TourEntry, TourOptions, Trigger};

// WASM entry point
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    // Panics show up in the browser console
    console_error_panic_hook::set_once();

    // A second module instance on the page already owns the logger
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Trophy scene WASM module initialized");
}
