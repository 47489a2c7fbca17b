//! Bridges `engine` ↔ browser.

pub mod elements;
pub mod media;
pub mod overlay;
pub mod ports;
pub mod runtime;
pub mod storage;
pub mod theme;

use wasm_bindgen::JsValue;

use crate::error::GlueError;

/// Readable text for a thrown JS value.
pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn js_error(value: JsValue) -> GlueError {
    GlueError::Js(describe_js(&value))
}
