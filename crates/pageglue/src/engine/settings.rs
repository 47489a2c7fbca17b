//! Deployment settings.
//!
//! Fixed per page: Cargo features pick the defaults, and the page may
//! override any subset once through `configure()` before startup.

use pageglue_protocol::FlagsProfile;
use serde::{Deserialize, Serialize};

use super::media::MediaPolicy;
use super::navigation::NavigationMode;
use super::overlay::OverlayPolicy;

/// Key of the persisted configuration in the key-value store.
pub const STORAGE_KEY: &str = "config";

/// Envelope-profile port names.
pub const SEND_TO_JS: &str = "sendToJs";
pub const RECEIVE_FROM_JS: &str = "receiveFromJs";

/// How messages travel over the host application's ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortProfile {
    /// One port each way carrying `{msg, value}`.
    Envelope,
    /// One port per message tag carrying the bare value.
    Split,
}

impl Default for PortProfile {
    fn default() -> Self {
        if cfg!(feature = "split-ports") {
            Self::Split
        } else {
            Self::Envelope
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeploymentSettings {
    pub flags: FlagsProfile,
    pub ports: PortProfile,
    pub navigation: NavigationMode,
    pub media: MediaPolicy,
    pub overlay: OverlayPolicy,
}
