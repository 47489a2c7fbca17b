//! Custom element registration.
//!
//! `customElements.define` needs a JS class; the shim below defines one whose
//! lifecycle callbacks delegate to a Rust-exported widget object created per
//! element instance.

use js_sys::Array;
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::HtmlElement;

use super::media::MediaElement;
use super::overlay::OverlayElement;
use super::runtime;
use crate::engine::media::OBSERVED_ATTRIBUTES;

pub const MEDIA_TAG: &str = "audio-player";
pub const OVERLAY_TAG: &str = "custom-dropdown";

#[wasm_bindgen(inline_js = r#"
export function define_widget(name, observed, create) {
    if (typeof customElements === "undefined" || customElements.get(name)) {
        return false;
    }
    customElements.define(name, class extends HTMLElement {
        static get observedAttributes() {
            return observed;
        }
        constructor() {
            super();
            this._widget = create(this);
        }
        connectedCallback() {
            this._widget.connected();
        }
        attributeChangedCallback(attribute, oldValue, newValue) {
            this._widget.attributeChanged(attribute, oldValue, newValue);
        }
        disconnectedCallback() {
            this._widget.disconnected();
        }
    });
    return true;
}
"#)]
extern "C" {
    fn define_widget(name: &str, observed: Array, create: &js_sys::Function) -> bool;
}

pub fn register_all() {
    register(MEDIA_TAG, &OBSERVED_ATTRIBUTES, |host| {
        MediaElement::new(host, runtime::settings().media).into()
    });
    register(OVERLAY_TAG, &[], |host| {
        OverlayElement::new(host, runtime::settings().overlay).into()
    });
}

/// Settings are read when each element is constructed, so `configure()`
/// calls made after module start still apply to elements parsed later.
fn register(name: &str, observed: &[&str], create: fn(HtmlElement) -> JsValue) {
    let observed = observed.iter().map(|name| JsValue::from_str(name)).collect::<Array>();
    let factory = Closure::<dyn FnMut(HtmlElement) -> JsValue>::new(create);

    if define_widget(name, observed, factory.as_ref().unchecked_ref()) {
        zoon::println!("[elements] registered <{name}>");
        // Constructs every future instance.
        factory.forget();
    } else {
        zoon::eprintln!("[elements] <{name}> is already defined, skipping");
    }
}
