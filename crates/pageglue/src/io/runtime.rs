//! Page-wide runtime state: deployment settings and the host bridge.
//!
//! `flags()` runs synchronously before the host application renders;
//! `load()` awaits the application and wires the ports. The bridge created by
//! `flags()` is reused by `load()`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::JsFuture;
use zoon::{Closure, window};

use super::ports::AppPorts;
use super::storage::LocalStore;
use super::theme::{BodyClasses, MediaQuerySignals};
use crate::engine::bridge::{self, BridgeEffect, HostBridge};
use crate::engine::settings::DeploymentSettings;
use crate::error::GlueError;

pub type BrowserBridge = HostBridge<LocalStore, BodyClasses>;

thread_local! {
    static SETTINGS: RefCell<DeploymentSettings> = RefCell::new(DeploymentSettings::default());
    static BRIDGE: RefCell<Option<Rc<RefCell<BrowserBridge>>>> = const { RefCell::new(None) };
}

pub fn settings() -> DeploymentSettings {
    SETTINGS.with(|settings| settings.borrow().clone())
}

pub fn configure(options: JsValue) -> bool {
    match serde_wasm_bindgen::from_value::<DeploymentSettings>(options) {
        Ok(new_settings) => {
            if BRIDGE.with(|bridge| bridge.borrow().is_some()) {
                zoon::eprintln!("[bridge] configure() called after startup; only new elements see it");
            }
            debug_log!("[bridge] settings: {new_settings:?}");
            SETTINGS.with(|settings| *settings.borrow_mut() = new_settings);
            true
        }
        Err(error) => {
            zoon::eprintln!("[bridge] invalid settings, keeping previous ones: {error}");
            false
        }
    }
}

fn bridge() -> Rc<RefCell<BrowserBridge>> {
    BRIDGE.with(|slot| {
        Rc::clone(slot.borrow_mut().get_or_insert_with(|| {
            Rc::new(RefCell::new(HostBridge::new(
                settings(),
                LocalStore::new(),
                BodyClasses,
            )))
        }))
    })
}

pub fn flags() -> JsValue {
    let startup = bridge().borrow_mut().startup(&MediaQuerySignals::new());
    if let Some(error) = &startup.rejected_config {
        zoon::eprintln!("[bridge] ignoring stored configuration: {error}");
    }
    debug_log!("[bridge] flags: {}", startup.flags);

    match startup
        .flags
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
    {
        Ok(flags) => flags,
        Err(error) => {
            zoon::eprintln!("[bridge] could not convert flags: {error}");
            JsValue::NULL
        }
    }
}

pub async fn load(app_loaded: Promise) -> Result<(), JsValue> {
    let app = JsFuture::from(app_loaded).await?;
    zoon::println!("[bridge] App loaded");

    let ports = AppPorts::from_app(&app).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let ports = Rc::new(ports);
    let bridge = bridge();

    if let Err(error) = bridge::subscribe_outbound(&bridge, ports.as_ref(), report) {
        zoon::eprintln!("[bridge] could not subscribe to the host application: {error}");
    }
    listen_to_navigation(bridge, ports);
    Ok(())
}

fn report(port: &str, outcome: Result<BridgeEffect, GlueError>) {
    match outcome {
        Ok(effect) => debug_log!("[bridge] `{port}`: {effect:?}"),
        Err(error) => zoon::eprintln!("[bridge] dropped message on `{port}`: {error}"),
    }
}

fn listen_to_navigation(bridge: Rc<RefCell<BrowserBridge>>, ports: Rc<AppPorts>) {
    let on_popstate: Closure<dyn Fn()> = Closure::new(move || {
        let href = match window().location().href() {
            Ok(href) => href,
            Err(_) => return,
        };
        match bridge::forward_navigation(&*bridge, ports.as_ref(), &href) {
            Ok(message) => debug_log!("[bridge] navigation: {message:?}"),
            Err(error) => zoon::eprintln!("[bridge] could not forward navigation: {error}"),
        }
    });
    if let Err(error) =
        window().add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
    {
        zoon::eprintln!("[bridge] could not listen to popstate: {error:?}");
    }
    // Listens for the lifetime of the page.
    on_popstate.forget();
}
