//! Platform-free runtime logic.
//!
//! NO zoon, NO web_sys. Every browser object is reached through a capability
//! trait implemented in `io/`, so all rules here run in native tests.

pub mod bridge;
pub mod media;
pub mod navigation;
pub mod overlay;
pub mod settings;
pub mod store;
pub mod theme;

pub use bridge::{BridgeEffect, HostBridge, HostPorts, Startup};
pub use media::{MediaPolicy, MediaWidget, Playback};
pub use navigation::NavigationMode;
pub use overlay::{OverlayHost, OverlayPolicy, OverlayWidget};
pub use settings::{DeploymentSettings, PortProfile};
pub use store::KeyValueStore;
pub use theme::{ColorSchemeSignals, ThemeResolver, ThemeTarget};
