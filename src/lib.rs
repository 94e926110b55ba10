//! TapIn - landing page interactivity
//!
//! Scroll effects, reveal animations, the waitlist form, micro-interactions and
//! the mobile menu of the TapIn marketing page, compiled to WebAssembly.

pub mod core;
#[cfg(feature = "csr")]
pub mod ui;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    ui::mount();
}
