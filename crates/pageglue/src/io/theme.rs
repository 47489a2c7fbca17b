//! Color-scheme media queries and the `document.body` theme classes.

use web_sys::{HtmlElement, Window};

use crate::engine::theme::{ColorSchemeSignals, ThemeTarget};

const PREFERS_DARK: &str = "(prefers-color-scheme: dark)";
const PREFERS_LIGHT: &str = "(prefers-color-scheme: light)";

/// `matchMedia` color-scheme queries. Without `matchMedia` nothing matches.
pub struct MediaQuerySignals {
    window: Option<Window>,
}

impl MediaQuerySignals {
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.window
            .as_ref()
            .and_then(|window| window.match_media(query).ok().flatten())
            .is_some_and(|list| list.matches())
    }
}

impl Default for MediaQuerySignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSignals for MediaQuerySignals {
    fn prefers_dark(&self) -> bool {
        self.matches(PREFERS_DARK)
    }

    fn prefers_light(&self) -> bool {
        self.matches(PREFERS_LIGHT)
    }
}

/// Class list of `document.body`, looked up on every write so a body
/// replaced by the host application is still found.
#[derive(Default)]
pub struct BodyClasses;

impl BodyClasses {
    fn body() -> Option<HtmlElement> {
        web_sys::window()?.document()?.body()
    }
}

impl ThemeTarget for BodyClasses {
    fn add_class(&mut self, class: &str) {
        if let Some(body) = Self::body() {
            let _ = body.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, class: &str) {
        if let Some(body) = Self::body() {
            let _ = body.class_list().remove_1(class);
        }
    }
}
