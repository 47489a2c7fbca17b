//! Persisted configuration and its codec.
//!
//! The configuration is stored as one JSON string under a single key.
//! Reading it never fails: a missing, empty or malformed blob decodes to
//! the empty configuration ("no preference").

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// An explicit color theme. `Option<Theme>` is the theme choice, `None`
/// meaning "no preference".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// Reads a theme out of an arbitrary JSON value.
    ///
    /// Only the exact strings `"dark"` and `"light"` are themes; every other
    /// value (null, unknown strings, numbers, objects) is no theme.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Serde adapter for theme values coming from the host application, which
/// may send anything. See [`Theme::from_json`].
pub fn deserialize_lenient_theme<'de, D>(deserializer: D) -> Result<Option<Theme>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Theme::from_json(&value))
}

/// User configuration persisted in the key-value store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub theme: Option<Theme>,
    /// Fields this runtime does not interpret. Kept so that they survive a
    /// load/save cycle and reach the host application in the startup flags.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("stored configuration is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("stored configuration is not an object")]
    NotAnObject,
    #[error("stored configuration has an invalid shape: {0}")]
    Schema(#[source] serde_json::Error),
    #[error("could not encode configuration: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unknown message `{0}`")]
    UnknownMessage(String),
    #[error("message is not a `{{msg, value}}` envelope")]
    NotAnEnvelope,
    #[error("invalid payload for message `{msg}`: {source}")]
    Payload {
        msg: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct ConfigCodec;

impl ConfigCodec {
    /// Decodes a stored blob, falling back to the empty configuration.
    pub fn decode(raw: Option<&str>) -> Configuration {
        Self::decode_checked(raw).unwrap_or_default()
    }

    /// Like [`decode`](Self::decode), but reports why a present blob was
    /// rejected. A missing or blank blob is not an error.
    pub fn decode_checked(raw: Option<&str>) -> Result<Configuration, CodecError> {
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Ok(Configuration::default());
        };
        let value: Value = serde_json::from_str(raw).map_err(CodecError::Json)?;
        Self::decode_value(value)
    }

    pub fn decode_value(value: Value) -> Result<Configuration, CodecError> {
        if !value.is_object() {
            return Err(CodecError::NotAnObject);
        }
        serde_json::from_value(value).map_err(CodecError::Schema)
    }

    pub fn encode(config: &Configuration) -> Result<String, CodecError> {
        serde_json::to_string(config).map_err(CodecError::Encode)
    }
}
