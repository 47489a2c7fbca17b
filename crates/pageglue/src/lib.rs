//! Browser runtime for a statically generated site.
//!
//! # Architecture
//!
//! - `engine/`: Pure logic behind capability traits. NO zoon, NO web_sys.
//! - `io/`: web_sys/zoon implementations of those traits, custom elements,
//!   host-application ports.
//!
//! # JS surface
//!
//! ```js
//! import init, { configure, flags, load } from "./pkg/pageglue.js";
//! await init();                 // registers <audio-player> and <custom-dropdown>
//! configure({ navigation: "url" });
//! export default { flags, load };
//! ```

// Verbose console output, compiled in with the `debug-logging` feature.
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if cfg!(feature = "debug-logging") {
            zoon::println!($($arg)*);
        }
    };
}

pub mod engine;
pub mod error;
pub mod io;

pub use error::GlueError;
pub use pageglue_protocol as protocol;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    io::elements::register_all();
}

/// Overrides deployment settings. Returns `false` (and keeps the previous
/// settings) when `options` does not deserialize.
#[wasm_bindgen]
pub fn configure(options: JsValue) -> bool {
    io::runtime::configure(options)
}

/// Computes the startup flags. Applies the theme before returning.
#[wasm_bindgen]
pub fn flags() -> JsValue {
    io::runtime::flags()
}

/// Connects to the host application once `app_loaded` resolves.
#[wasm_bindgen]
pub async fn load(app_loaded: js_sys::Promise) -> Result<(), JsValue> {
    io::runtime::load(app_loaded).await
}
