//! `<custom-dropdown>` element.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{DomRect, HtmlElement, IntersectionObserver};

use super::js_error;
use crate::engine::overlay::{OverlayHost, OverlayPolicy, OverlayState, OverlayWidget, Rect};
use crate::error::GlueError;

/// Live geometry of one overlay element.
pub struct ElementGeometry<'a> {
    element: &'a HtmlElement,
}

impl<'a> ElementGeometry<'a> {
    pub fn new(element: &'a HtmlElement) -> Self {
        Self { element }
    }
}

fn to_rect(rect: DomRect) -> Rect {
    Rect {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

impl OverlayHost for ElementGeometry<'_> {
    fn parent_rect(&self) -> Option<Rect> {
        let parent = self.element.parent_element()?;
        Some(to_rect(parent.get_bounding_client_rect()))
    }

    fn own_rect(&self) -> Rect {
        to_rect(self.element.get_bounding_client_rect())
    }

    // `checkVisibility` is recent; treat browsers without it as visible.
    fn is_visible(&self) -> bool {
        let check = Reflect::get(self.element, &JsValue::from_str("checkVisibility"))
            .ok()
            .and_then(|check| check.dyn_into::<Function>().ok());
        match check {
            Some(check) => check
                .call0(self.element)
                .ok()
                .and_then(|visible| visible.as_bool())
                .unwrap_or(true),
            None => true,
        }
    }

    fn write_style(&mut self, style: &str) {
        let _ = self.element.set_attribute("style", style);
    }
}

struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut()>,
}

impl VisibilityObserver {
    fn watch(host: &HtmlElement, widget: OverlayWidget) -> Result<Self, GlueError> {
        let callback = Closure::<dyn FnMut()>::new({
            let host = host.clone();
            move || {
                let position = widget.visibility_changed(&mut ElementGeometry::new(&host));
                debug_log!("[overlay] visibility changed: {position:?}");
            }
        });
        let observer =
            IntersectionObserver::new(callback.as_ref().unchecked_ref()).map_err(js_error)?;
        observer.observe(host);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

/// JS-side state of one `<custom-dropdown>` instance.
#[wasm_bindgen]
pub struct OverlayElement {
    host: HtmlElement,
    widget: OverlayWidget,
    observer: Option<VisibilityObserver>,
}

impl OverlayElement {
    pub fn new(host: HtmlElement, policy: OverlayPolicy) -> Self {
        Self {
            host,
            widget: OverlayWidget::new(policy),
            observer: None,
        }
    }
}

#[wasm_bindgen]
impl OverlayElement {
    pub fn connected(&mut self) {
        let position = self.widget.attach(&mut ElementGeometry::new(&self.host));
        debug_log!("[overlay] attached: {position:?}");

        if let OverlayState::Attached { observing: true } = self.widget.state() {
            match VisibilityObserver::watch(&self.host, self.widget) {
                Ok(observer) => self.observer = Some(observer),
                Err(error) => zoon::eprintln!("[overlay] could not observe visibility: {error}"),
            }
        }
    }

    // Observed attributes are empty; present so every widget answers the
    // same callbacks.
    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(&mut self, _name: String, _old_value: Option<String>, _new_value: Option<String>) {}

    pub fn disconnected(&mut self) {
        if self.widget.detach() {
            if let Some(observer) = self.observer.take() {
                observer.observer.disconnect();
            }
        }
    }

    /// Recomputes the position now. Exposed for pages that move the anchor
    /// without changing visibility.
    pub fn reposition(&self) {
        self.widget.reposition(&mut ElementGeometry::new(&self.host));
    }
}
