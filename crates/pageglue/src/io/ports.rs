//! Ports of a loaded host application (`app.ports.<name>.subscribe/send`).

use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, prelude::*};

use super::js_error;
use crate::engine::bridge::HostPorts;
use crate::error::GlueError;

pub struct AppPorts {
    ports: JsValue,
}

impl AppPorts {
    pub fn from_app(app: &JsValue) -> Result<Self, GlueError> {
        let ports = Reflect::get(app, &JsValue::from_str("ports")).map_err(js_error)?;
        if ports.is_undefined() || ports.is_null() {
            return Err(GlueError::NoPorts);
        }
        Ok(Self { ports })
    }

    fn port(&self, name: &str) -> Result<JsValue, GlueError> {
        let port = Reflect::get(&self.ports, &JsValue::from_str(name)).map_err(js_error)?;
        if port.is_undefined() || port.is_null() {
            return Err(GlueError::MissingPort(name.to_owned()));
        }
        Ok(port)
    }

    fn method(port: &JsValue, port_name: &str, method: &'static str) -> Result<Function, GlueError> {
        Reflect::get(port, &JsValue::from_str(method))
            .ok()
            .and_then(|function| function.dyn_into::<Function>().ok())
            .ok_or_else(|| GlueError::PortMethod {
                port: port_name.to_owned(),
                method,
            })
    }
}

impl HostPorts for AppPorts {
    fn subscribe(&self, port: &str, mut handler: Box<dyn FnMut(Value)>) -> Result<(), GlueError> {
        let port_value = self.port(port)?;
        let subscribe = Self::method(&port_value, port, "subscribe")?;

        let port_name = port.to_owned();
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            match serde_wasm_bindgen::from_value::<Value>(value) {
                Ok(value) => handler(value),
                Err(error) => {
                    zoon::eprintln!("[bridge] unreadable value on port `{port_name}`: {error}")
                }
            }
        });
        subscribe
            .call1(&port_value, callback.as_ref())
            .map_err(js_error)?;
        // Subscriptions live as long as the page.
        callback.forget();
        Ok(())
    }

    fn send(&self, port: &str, value: Value) -> Result<(), GlueError> {
        let port_value = self.port(port)?;
        let send = Self::method(&port_value, port, "send")?;
        let value = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|error| GlueError::Js(error.to_string()))?;
        send.call1(&port_value, &value).map_err(js_error)?;
        Ok(())
    }
}
