//! `<audio-player>` element.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, HtmlAudioElement, HtmlElement};
use zoon::Task;

use super::{describe_js, js_error};
use crate::engine::media::{MediaPolicy, MediaProgress, MediaWidget, OBSERVED_ATTRIBUTES, Playback};
use crate::error::GlueError;

const TIME_UPDATE: &str = "timeupdate";

/// An `<audio>` element owned by one widget attachment.
pub struct AudioPlayback {
    audio: HtmlAudioElement,
}

impl AudioPlayback {
    pub fn new() -> Result<Self, GlueError> {
        let audio = HtmlAudioElement::new().map_err(js_error)?;
        Ok(Self { audio })
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }
}

impl Playback for AudioPlayback {
    // Compared against the attribute, not `currentSrc`, which is resolved
    // to an absolute URL.
    fn source(&self) -> Option<String> {
        self.audio.get_attribute("src")
    }

    fn set_source(&mut self, source: Option<&str>) {
        let _ = match source {
            Some(source) => self.audio.set_attribute("src", source),
            None => self.audio.remove_attribute("src"),
        };
    }

    fn position(&self) -> f64 {
        self.audio.current_time()
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }

    fn seek(&mut self, position: f64) {
        self.audio.set_current_time(position);
    }

    fn is_paused(&self) -> bool {
        self.audio.paused()
    }

    fn play(&mut self) {
        match self.audio.play() {
            // Autoplay policy rejects the promise; nothing to do about it.
            Ok(promise) => {
                Task::start(async move {
                    if let Err(error) = JsFuture::from(promise).await {
                        debug_log!("[media] play request rejected: {}", describe_js(&error));
                    }
                });
            }
            Err(error) => debug_log!("[media] play failed: {}", describe_js(&error)),
        }
    }

    fn pause(&mut self) {
        let _ = self.audio.pause();
    }

    fn stop(&mut self) {
        let stop = Reflect::get(&self.audio, &JsValue::from_str("stop"))
            .ok()
            .and_then(|stop| stop.dyn_into::<Function>().ok());
        match stop {
            Some(stop) => {
                let _ = stop.call0(&self.audio);
            }
            None => self.pause(),
        }
    }
}

/// JS-side state of one `<audio-player>` instance. Created in the element
/// constructor, so attribute changes that arrive before `connected` are
/// mirrored and applied on attach.
#[wasm_bindgen]
pub struct MediaElement {
    host: HtmlElement,
    widget: MediaWidget<AudioPlayback>,
    on_time_update: Option<Closure<dyn FnMut()>>,
}

impl MediaElement {
    pub fn new(host: HtmlElement, policy: MediaPolicy) -> Self {
        Self {
            host,
            widget: MediaWidget::new(policy),
            on_time_update: None,
        }
    }

    fn sync_attributes(&mut self) {
        for name in OBSERVED_ATTRIBUTES {
            let value = self.host.get_attribute(name);
            self.widget.attribute_changed(name, value);
        }
    }

    fn attach(&mut self) -> Result<(), GlueError> {
        let playback = AudioPlayback::new()?;

        let on_time_update = Closure::<dyn FnMut()>::new({
            let host = self.host.clone();
            let native = AudioPlayback {
                audio: playback.element().clone(),
            };
            move || {
                let progress = MediaProgress::of(&native);
                if let Err(error) = dispatch_progress(&host, &progress) {
                    debug_log!("[media] could not dispatch {TIME_UPDATE}: {error}");
                }
            }
        });
        playback
            .element()
            .add_event_listener_with_callback(TIME_UPDATE, on_time_update.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.host.append_child(playback.element()).map_err(js_error)?;
        self.on_time_update = Some(on_time_update);

        let outcome = self.widget.attach(playback);
        debug_log!("[media] attached: {outcome:?}");
        Ok(())
    }
}

#[wasm_bindgen]
impl MediaElement {
    pub fn connected(&mut self) {
        self.sync_attributes();
        if let Err(error) = self.attach() {
            zoon::eprintln!("[media] could not attach <audio>: {error}");
        }
    }

    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(&mut self, name: String, _old_value: Option<String>, new_value: Option<String>) {
        if let Some(outcome) = self.widget.attribute_changed(&name, new_value) {
            debug_log!("[media] `{name}` changed: {outcome:?}");
        }
    }

    pub fn disconnected(&mut self) {
        let listener = self.on_time_update.take();
        let Some(playback) = self.widget.detach() else {
            return;
        };
        if let Some(listener) = listener {
            let _ = playback
                .element()
                .remove_event_listener_with_callback(TIME_UPDATE, listener.as_ref().unchecked_ref());
        }
        playback.element().remove();
        debug_log!("[media] detached");
    }
}

fn dispatch_progress(host: &HtmlElement, progress: &MediaProgress) -> Result<(), GlueError> {
    let detail = serde_wasm_bindgen::to_value(progress).map_err(|error| GlueError::Js(error.to_string()))?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(TIME_UPDATE, &init).map_err(js_error)?;
    host.dispatch_event(&event).map_err(js_error)?;
    Ok(())
}
