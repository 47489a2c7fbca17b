//! Port messages.
//!
//! Outbound messages travel host application → runtime, inbound messages
//! runtime → host application. Both are closed unions carried either inside
//! a `{msg, value}` envelope or as the raw value of a port named after the
//! tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::{CodecError, Configuration, Theme, deserialize_lenient_theme};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg", content = "value", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Persist the configuration, replacing whatever was stored.
    SaveConfig(Configuration),
    /// Apply a theme now. Anything but `"dark"`/`"light"` clears it.
    SetTheme(#[serde(deserialize_with = "deserialize_lenient_theme")] Option<Theme>),
}

impl OutboundMessage {
    pub const TAGS: [&'static str; 2] = ["saveConfig", "setTheme"];

    /// Decodes a `{msg, value}` envelope. Unknown tags are an error, never a
    /// loose match.
    pub fn from_envelope(envelope: Value) -> Result<Self, CodecError> {
        let Some(msg) = envelope.get("msg").and_then(Value::as_str) else {
            return Err(CodecError::NotAnEnvelope);
        };
        let msg = msg.to_owned();
        if !Self::TAGS.contains(&msg.as_str()) {
            return Err(CodecError::UnknownMessage(msg));
        }
        serde_json::from_value(envelope).map_err(|source| CodecError::Payload { msg, source })
    }

    /// Decodes the raw value of a port named after the message tag.
    pub fn from_port(port: &str, value: Value) -> Result<Self, CodecError> {
        if !Self::TAGS.contains(&port) {
            return Err(CodecError::UnknownMessage(port.to_owned()));
        }
        Self::from_envelope(json!({ "msg": port, "value": value }))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", content = "value", rename_all = "camelCase")]
pub enum InboundMessage {
    /// The full URL after a history navigation.
    UrlChanged(String),
    /// The query string of the URL after a history navigation, with repeated
    /// keys collected in order.
    ChangedQueryParams(BTreeMap<String, Vec<String>>),
}

impl InboundMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::UrlChanged(_) => "urlChanged",
            Self::ChangedQueryParams(_) => "changedQueryParams",
        }
    }

    pub fn to_envelope(&self) -> Value {
        json!(self)
    }

    pub fn to_payload(&self) -> Value {
        match self {
            Self::UrlChanged(url) => json!(url),
            Self::ChangedQueryParams(params) => json!(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_save_config_envelope() {
        let message =
            OutboundMessage::from_envelope(json!({ "msg": "saveConfig", "value": { "theme": "dark" } }))
                .unwrap();
        assert_eq!(
            message,
            OutboundMessage::SaveConfig(Configuration {
                theme: Some(Theme::Dark),
                ..Configuration::default()
            })
        );
    }

    #[test]
    fn set_theme_accepts_any_value() {
        let decode = |value: Value| {
            OutboundMessage::from_envelope(json!({ "msg": "setTheme", "value": value })).unwrap()
        };
        assert_eq!(decode(json!("light")), OutboundMessage::SetTheme(Some(Theme::Light)));
        assert_eq!(decode(json!(null)), OutboundMessage::SetTheme(None));
        assert_eq!(decode(json!("sepia")), OutboundMessage::SetTheme(None));
        assert_eq!(decode(json!(3)), OutboundMessage::SetTheme(None));
    }

    #[test]
    fn unknown_or_malformed_envelopes_are_rejected() {
        assert!(matches!(
            OutboundMessage::from_envelope(json!({ "msg": "reboot", "value": 1 })),
            Err(CodecError::UnknownMessage(tag)) if tag == "reboot"
        ));
        assert!(matches!(
            OutboundMessage::from_envelope(json!("saveConfig")),
            Err(CodecError::NotAnEnvelope)
        ));
        assert!(matches!(
            OutboundMessage::from_envelope(json!({ "msg": "saveConfig", "value": [1, 2] })),
            Err(CodecError::Payload { .. })
        ));
    }

    #[test]
    fn decodes_split_port_values() {
        assert_eq!(
            OutboundMessage::from_port("setTheme", json!("dark")).unwrap(),
            OutboundMessage::SetTheme(Some(Theme::Dark))
        );
        assert!(OutboundMessage::from_port("sendToJs", json!({})).is_err());
    }

    #[test]
    fn inbound_envelopes() {
        let url = InboundMessage::UrlChanged("https://example.org/a?b=c".to_owned());
        assert_eq!(
            url.to_envelope(),
            json!({ "msg": "urlChanged", "value": "https://example.org/a?b=c" })
        );

        let params = InboundMessage::ChangedQueryParams(BTreeMap::from([(
            "tag".to_owned(),
            vec!["a".to_owned(), "b".to_owned()],
        )]));
        assert_eq!(
            params.to_envelope(),
            json!({ "msg": "changedQueryParams", "value": { "tag": ["a", "b"] } })
        );
        assert_eq!(params.to_payload(), json!({ "tag": ["a", "b"] }));
    }
}
