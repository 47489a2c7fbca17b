//! Host bridge: startup flags and the steady-state message channel.
//!
//! # Startup
//!
//! Reads the stored configuration, resolves the theme, applies it, and only
//! then builds the flags. The host application never renders before the
//! theme class is in place.
//!
//! # Steady state
//!
//! Once the host application has loaded, every outbound port value is decoded
//! into an [`OutboundMessage`] and handled; history changes are turned into an
//! [`InboundMessage`] and sent to the inbound port.

use std::cell::RefCell;
use std::rc::Rc;

use pageglue_protocol::{
    CodecError, ConfigCodec, Configuration, InboundMessage, OutboundMessage, ResolvedTheme, Theme,
};
use serde_json::Value;

use super::settings::{DeploymentSettings, PortProfile, RECEIVE_FROM_JS, SEND_TO_JS, STORAGE_KEY};
use super::store::KeyValueStore;
use super::theme::{ColorSchemeSignals, ThemeResolver, ThemeTarget};
use crate::error::GlueError;

/// The host application's message ports.
pub trait HostPorts {
    fn subscribe(&self, port: &str, handler: Box<dyn FnMut(Value)>) -> Result<(), GlueError>;
    fn send(&self, port: &str, value: Value) -> Result<(), GlueError>;
}

/// Result of [`HostBridge::startup`].
#[derive(Debug)]
pub struct Startup {
    pub flags: Value,
    pub theme: ResolvedTheme,
    /// Why the stored configuration was ignored, if it was.
    pub rejected_config: Option<CodecError>,
}

/// What handling one outbound message did.
#[derive(Clone, Debug, PartialEq)]
pub enum BridgeEffect {
    ConfigSaved(Configuration),
    ThemeApplied(Option<Theme>),
}

pub struct HostBridge<S, T> {
    settings: DeploymentSettings,
    store: S,
    target: T,
}

impl<S: KeyValueStore, T: ThemeTarget> HostBridge<S, T> {
    pub fn new(settings: DeploymentSettings, store: S, target: T) -> Self {
        Self {
            settings,
            store,
            target,
        }
    }

    pub fn startup(&mut self, signals: &impl ColorSchemeSignals) -> Startup {
        let raw = self.store.get(STORAGE_KEY);
        let (config, rejected_config) = match ConfigCodec::decode_checked(raw.as_deref()) {
            Ok(config) => (Some(config), None),
            Err(error) => (None, Some(error)),
        };
        let stored_theme = config.as_ref().and_then(|config| config.theme);
        let theme = ThemeResolver::resolve(stored_theme, signals);

        ThemeResolver::apply(&mut self.target, theme.set);

        Startup {
            flags: self.settings.flags.build(config.as_ref(), theme),
            theme,
            rejected_config,
        }
    }

    pub fn handle(&mut self, message: OutboundMessage) -> Result<BridgeEffect, GlueError> {
        match message {
            OutboundMessage::SaveConfig(config) => {
                let encoded = ConfigCodec::encode(&config)?;
                self.store.set(STORAGE_KEY, &encoded)?;
                Ok(BridgeEffect::ConfigSaved(config))
            }
            OutboundMessage::SetTheme(theme) => {
                ThemeResolver::apply(&mut self.target, theme);
                Ok(BridgeEffect::ThemeApplied(theme))
            }
        }
    }

    /// Decodes a value received on `port` according to the port profile and
    /// handles it.
    pub fn handle_port_value(&mut self, port: &str, value: Value) -> Result<BridgeEffect, GlueError> {
        let message = match self.settings.ports {
            PortProfile::Envelope => OutboundMessage::from_envelope(value)?,
            PortProfile::Split => OutboundMessage::from_port(port, value)?,
        };
        self.handle(message)
    }

    pub fn outbound_ports(&self) -> Vec<&'static str> {
        match self.settings.ports {
            PortProfile::Envelope => vec![SEND_TO_JS],
            PortProfile::Split => OutboundMessage::TAGS.to_vec(),
        }
    }

    /// Port name and value carrying `message` to the host application.
    pub fn route_inbound(&self, message: &InboundMessage) -> (&'static str, Value) {
        match self.settings.ports {
            PortProfile::Envelope => (RECEIVE_FROM_JS, message.to_envelope()),
            PortProfile::Split => (message.tag(), message.to_payload()),
        }
    }

    /// The inbound message for a history change at `href`, with its route.
    pub fn route_navigation(
        &self,
        href: &str,
    ) -> Result<(InboundMessage, &'static str, Value), GlueError> {
        let message = self.settings.navigation.message_for(href)?;
        let (port, value) = self.route_inbound(&message);
        Ok((message, port, value))
    }
}

/// Sends the navigation message for `href` to the host application.
///
/// The bridge is released before sending: the host may answer on an outbound
/// port from inside `send`, which needs the bridge mutably.
pub fn forward_navigation<S, T>(
    bridge: &RefCell<HostBridge<S, T>>,
    ports: &impl HostPorts,
    href: &str,
) -> Result<InboundMessage, GlueError>
where
    S: KeyValueStore,
    T: ThemeTarget,
{
    let (message, port, value) = bridge.borrow().route_navigation(href)?;
    ports.send(port, value)?;
    Ok(message)
}

/// Subscribes `bridge` to every outbound port of a loaded host application.
/// `report` sees the outcome of every delivered message.
pub fn subscribe_outbound<S, T, P>(
    bridge: &Rc<RefCell<HostBridge<S, T>>>,
    ports: &P,
    report: impl Fn(&str, Result<BridgeEffect, GlueError>) + Clone + 'static,
) -> Result<(), GlueError>
where
    S: KeyValueStore + 'static,
    T: ThemeTarget + 'static,
    P: HostPorts,
{
    let port_names = bridge.borrow().outbound_ports();
    for port in port_names {
        let bridge = Rc::clone(bridge);
        let report = report.clone();
        ports.subscribe(
            port,
            Box::new(move |value| {
                let outcome = bridge.borrow_mut().handle_port_value(port, value);
                report(port, outcome);
            }),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::engine::navigation::NavigationMode;
    use crate::engine::store::tests::MemoryStore;
    use crate::engine::theme::tests::{ClassList, Signals};

    #[derive(Default)]
    struct FakePorts {
        handlers: RefCell<BTreeMap<String, Box<dyn FnMut(Value)>>>,
        sent: RefCell<Vec<(String, Value)>>,
    }

    impl FakePorts {
        fn deliver(&self, port: &str, value: Value) {
            let mut handlers = self.handlers.borrow_mut();
            let handler = handlers.get_mut(port).expect("port is subscribed");
            handler(value);
        }
    }

    impl HostPorts for FakePorts {
        fn subscribe(&self, port: &str, handler: Box<dyn FnMut(Value)>) -> Result<(), GlueError> {
            self.handlers.borrow_mut().insert(port.to_owned(), handler);
            Ok(())
        }

        fn send(&self, port: &str, value: Value) -> Result<(), GlueError> {
            self.sent.borrow_mut().push((port.to_owned(), value));
            Ok(())
        }
    }

    fn no_preference() -> Signals {
        Signals {
            dark: false,
            light: false,
        }
    }

    fn bridge(store: MemoryStore) -> HostBridge<MemoryStore, ClassList> {
        HostBridge::new(DeploymentSettings::default(), store, ClassList::default())
    }

    fn body_classes(bridge: &HostBridge<MemoryStore, ClassList>) -> Vec<&str> {
        bridge.target.classes.iter().map(String::as_str).collect()
    }

    #[test]
    fn startup_applies_stored_theme_and_builds_flags() {
        let mut bridge = bridge(MemoryStore::with_entry("config", r#"{"theme":"light"}"#));
        let signals = Signals {
            dark: true,
            light: false,
        };

        let startup = bridge.startup(&signals);

        assert_eq!(body_classes(&bridge), ["light-theme"]);
        assert_eq!(
            startup.flags,
            json!({ "theme": { "set": "light", "default": "dark" } })
        );
        assert!(startup.rejected_config.is_none());
    }

    #[test]
    fn startup_with_corrupt_store_has_no_preference() {
        let mut bridge = bridge(MemoryStore::with_entry("config", "{oops"));

        let startup = bridge.startup(&no_preference());

        assert!(bridge.target.classes.is_empty());
        assert_eq!(startup.theme, ResolvedTheme::default());
        assert!(matches!(startup.rejected_config, Some(CodecError::Json(_))));
    }

    #[test]
    fn platform_default_alone_does_not_add_a_class() {
        let mut bridge = bridge(MemoryStore::new());
        let signals = Signals {
            dark: true,
            light: false,
        };

        let startup = bridge.startup(&signals);

        assert_eq!(startup.theme.default, Some(Theme::Dark));
        assert!(bridge.target.classes.is_empty());
    }

    #[test]
    fn save_config_overwrites_store() {
        let mut bridge = bridge(MemoryStore::with_entry("config", r#"{"theme":"light","old":1}"#));

        let effect = bridge
            .handle_port_value(SEND_TO_JS, json!({ "msg": "saveConfig", "value": { "theme": "dark" } }))
            .unwrap();

        assert_eq!(
            effect,
            BridgeEffect::ConfigSaved(Configuration {
                theme: Some(Theme::Dark),
                ..Configuration::default()
            })
        );
        assert_eq!(bridge.store.get("config").as_deref(), Some(r#"{"theme":"dark"}"#));
    }

    #[test]
    fn set_theme_applies_the_literal_value() {
        let mut bridge = bridge(MemoryStore::with_entry("config", r#"{"theme":"dark"}"#));
        bridge.startup(&no_preference());

        bridge
            .handle_port_value(SEND_TO_JS, json!({ "msg": "setTheme", "value": "light" }))
            .unwrap();
        assert_eq!(body_classes(&bridge), ["light-theme"]);

        let effect = bridge
            .handle_port_value(SEND_TO_JS, json!({ "msg": "setTheme", "value": null }))
            .unwrap();
        assert_eq!(effect, BridgeEffect::ThemeApplied(None));
        assert!(bridge.target.classes.is_empty());
        assert_eq!(bridge.store.get("config").as_deref(), Some(r#"{"theme":"dark"}"#));
    }

    #[test]
    fn unknown_messages_change_nothing() {
        let mut bridge = bridge(MemoryStore::new());

        let outcome =
            bridge.handle_port_value(SEND_TO_JS, json!({ "msg": "deleteEverything", "value": {} }));

        assert!(matches!(
            outcome,
            Err(GlueError::Codec(CodecError::UnknownMessage(_)))
        ));
        assert!(bridge.store.entries.is_empty());
        assert!(bridge.target.operations.is_empty());
    }

    #[test]
    fn save_then_fresh_startup_round_trip() {
        let bridge = Rc::new(RefCell::new(bridge(MemoryStore::new())));
        let ports = FakePorts::default();
        let reports = Rc::new(RefCell::new(Vec::new()));
        subscribe_outbound(&bridge, &ports, {
            let reports = Rc::clone(&reports);
            move |port, outcome| reports.borrow_mut().push((port.to_owned(), outcome.is_ok()))
        })
        .unwrap();

        ports.deliver(SEND_TO_JS, json!({ "msg": "saveConfig", "value": { "theme": "dark" } }));

        assert_eq!(*reports.borrow(), [(SEND_TO_JS.to_owned(), true)]);
        let store = bridge.borrow().store.clone();
        assert_eq!(store.get("config").as_deref(), Some(r#"{"theme":"dark"}"#));

        let mut fresh = HostBridge::new(DeploymentSettings::default(), store, ClassList::default());
        let startup = fresh.startup(&no_preference());
        assert_eq!(startup.theme.set, Some(Theme::Dark));
        assert_eq!(fresh.target.operations.last().map(String::as_str), Some("+dark-theme"));
        assert_eq!(startup.flags["theme"]["set"], json!("dark"));
    }

    #[test]
    fn split_ports_subscribe_per_tag() {
        let settings = DeploymentSettings {
            ports: PortProfile::Split,
            ..DeploymentSettings::default()
        };
        let bridge = Rc::new(RefCell::new(HostBridge::new(
            settings,
            MemoryStore::new(),
            ClassList::default(),
        )));
        let ports = FakePorts::default();
        subscribe_outbound(&bridge, &ports, |_, _| {}).unwrap();

        assert_eq!(
            ports.handlers.borrow().keys().cloned().collect::<Vec<_>>(),
            ["saveConfig", "setTheme"]
        );

        ports.deliver("setTheme", json!("dark"));
        ports.deliver("saveConfig", json!({ "theme": "light" }));

        let bridge = bridge.borrow();
        assert_eq!(body_classes(&bridge), ["dark-theme"]);
        assert_eq!(bridge.store.get("config").as_deref(), Some(r#"{"theme":"light"}"#));
    }

    #[test]
    fn navigation_is_forwarded_in_the_deployed_shape() {
        let ports = FakePorts::default();
        let url_bridge = RefCell::new(bridge(MemoryStore::new()));
        let settings = DeploymentSettings {
            navigation: NavigationMode::QueryParams,
            ports: PortProfile::Split,
            ..DeploymentSettings::default()
        };
        let params_bridge =
            RefCell::new(HostBridge::new(settings, MemoryStore::new(), ClassList::default()));

        forward_navigation(&url_bridge, &ports, "https://example.org/?a=1").unwrap();
        forward_navigation(&params_bridge, &ports, "https://example.org/?a=1&a=2").unwrap();

        assert_eq!(
            *ports.sent.borrow(),
            [
                (
                    RECEIVE_FROM_JS.to_owned(),
                    json!({ "msg": "urlChanged", "value": "https://example.org/?a=1" })
                ),
                ("changedQueryParams".to_owned(), json!({ "a": ["1", "2"] })),
            ]
        );
    }

    /// Answers every inbound message at once on `sendToJs`, the way a host
    /// application's ports deliver commands synchronously.
    struct AnsweringPorts {
        ports: FakePorts,
        answer: Value,
    }

    impl HostPorts for AnsweringPorts {
        fn subscribe(&self, port: &str, handler: Box<dyn FnMut(Value)>) -> Result<(), GlueError> {
            self.ports.subscribe(port, handler)
        }

        fn send(&self, port: &str, value: Value) -> Result<(), GlueError> {
            self.ports.send(port, value)?;
            self.ports.deliver(SEND_TO_JS, self.answer.clone());
            Ok(())
        }
    }

    #[test]
    fn host_may_answer_navigation_synchronously() {
        let bridge = Rc::new(RefCell::new(bridge(MemoryStore::new())));
        let ports = AnsweringPorts {
            ports: FakePorts::default(),
            answer: json!({ "msg": "setTheme", "value": "dark" }),
        };
        let reports = Rc::new(RefCell::new(Vec::new()));
        subscribe_outbound(&bridge, &ports, {
            let reports = Rc::clone(&reports);
            move |_, outcome| reports.borrow_mut().push(outcome.is_ok())
        })
        .unwrap();

        let message = forward_navigation(&*bridge, &ports, "https://example.org/?a=1").unwrap();

        assert_eq!(
            message,
            InboundMessage::UrlChanged("https://example.org/?a=1".to_owned())
        );
        assert_eq!(*reports.borrow(), [true]);
        assert_eq!(body_classes(&bridge.borrow()), ["dark-theme"]);
        assert_eq!(ports.ports.sent.borrow().len(), 1);
    }
}
