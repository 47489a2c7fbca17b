//! `<audio-player>` state machine.
//!
//! The element's attributes are the declared state; the native playback
//! object owns the live state. Reconciliation compares the two and issues
//! only the commands needed to bring the native side in line.

use serde::{Deserialize, Serialize};

pub const SRC: &str = "src";
pub const PLAYING: &str = "playing";
pub const CURRENT_TIME: &str = "current-time";
pub const OBSERVED_ATTRIBUTES: [&str; 3] = [SRC, PLAYING, CURRENT_TIME];

pub const DEFAULT_SEEK_TOLERANCE: f64 = 2.0;

/// A native playback object. Commands are requests: the platform may ignore
/// or reject them (autoplay policy) and implementations swallow that.
pub trait Playback {
    fn source(&self) -> Option<String>;
    /// Changing the source resets the native position.
    fn set_source(&mut self, source: Option<&str>);
    fn position(&self) -> f64;
    fn duration(&self) -> f64;
    fn seek(&mut self, position: f64);
    fn is_paused(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// Stops playback if the native object supports it.
    fn stop(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaPolicy {
    /// Only seek when declared and native positions differ by more than
    /// this. `None` never seeks.
    pub seek_tolerance: Option<f64>,
}

impl Default for MediaPolicy {
    fn default() -> Self {
        Self {
            seek_tolerance: (!cfg!(feature = "simple-media")).then_some(DEFAULT_SEEK_TOLERANCE),
        }
    }
}

/// Mirror of the observed attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaAttributes {
    pub src: Option<String>,
    pub playing: Option<String>,
    pub current_time: Option<String>,
}

impl MediaAttributes {
    /// Returns `false` for attributes that are not observed.
    pub fn set(&mut self, name: &str, value: Option<String>) -> bool {
        let slot = match name {
            SRC => &mut self.src,
            PLAYING => &mut self.playing,
            CURRENT_TIME => &mut self.current_time,
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn wants_playing(&self) -> bool {
        self.playing.as_deref() == Some("true")
    }

    pub fn target_time(&self) -> Option<f64> {
        self.current_time
            .as_deref()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|time| time.is_finite())
    }
}

/// Detail of the `timeupdate` event the element republishes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProgress {
    pub current_time: f64,
    pub duration: f64,
}

impl MediaProgress {
    pub fn of(playback: &impl Playback) -> Self {
        Self {
            current_time: playback.position(),
            duration: playback.duration(),
        }
    }
}

/// Native commands issued by one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reconciliation {
    pub source_changed: bool,
    pub seeked_to: Option<f64>,
    pub play_requested: bool,
    pub pause_requested: bool,
}

pub struct MediaWidget<P> {
    policy: MediaPolicy,
    attributes: MediaAttributes,
    playback: Option<P>,
}

impl<P: Playback> MediaWidget<P> {
    pub fn new(policy: MediaPolicy) -> Self {
        Self {
            policy,
            attributes: MediaAttributes::default(),
            playback: None,
        }
    }

    /// Takes ownership of a freshly allocated playback object and reconciles
    /// once. A still-attached previous object is stopped and dropped.
    pub fn attach(&mut self, playback: P) -> Reconciliation {
        if let Some(mut previous) = self.playback.replace(playback) {
            previous.stop();
        }
        self.reconcile()
    }

    /// Records an attribute change. Reconciles when attached and the
    /// attribute is observed; detached widgets only update their mirror.
    pub fn attribute_changed(&mut self, name: &str, value: Option<String>) -> Option<Reconciliation> {
        if !self.attributes.set(name, value) {
            return None;
        }
        self.playback.is_some().then(|| self.reconcile())
    }

    pub fn reconcile(&mut self) -> Reconciliation {
        let mut outcome = Reconciliation::default();
        let Some(playback) = self.playback.as_mut() else {
            return outcome;
        };

        let declared_source = self.attributes.src.as_deref();
        if playback.source().as_deref() != declared_source {
            playback.set_source(declared_source);
            outcome.source_changed = true;
        }

        if let (Some(tolerance), Some(target)) =
            (self.policy.seek_tolerance, self.attributes.target_time())
        {
            if (target - playback.position()).abs() > tolerance {
                playback.seek(target);
                outcome.seeked_to = Some(target);
            }
        }

        if self.attributes.wants_playing() {
            if playback.is_paused() {
                playback.play();
                outcome.play_requested = true;
            }
        } else if !playback.is_paused() {
            playback.pause();
            outcome.pause_requested = true;
        }

        outcome
    }

    /// Stops and releases the playback object. Safe to call when nothing was
    /// ever attached.
    pub fn detach(&mut self) -> Option<P> {
        let mut playback = self.playback.take()?;
        playback.stop();
        Some(playback)
    }
}
