//! Startup flags handed to the host application once, before it renders.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::config::{Configuration, Theme};

/// The theme as seen at startup: the user's explicit choice plus the
/// platform default derived from color-scheme preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTheme {
    pub set: Option<Theme>,
    pub default: Option<Theme>,
}

/// Shape of the flags value. Fixed per deployment; the host application's
/// decoder expects exactly one of these.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagsProfile {
    /// `{ ...config, theme: { set, default } }`
    #[default]
    Resolved,
    /// The decoded configuration as stored, or `null` when it was invalid.
    RawConfig,
    /// A constant string.
    Literal(String),
}

impl FlagsProfile {
    /// Builds the flags value.
    ///
    /// `config` is `None` when the stored configuration was rejected.
    pub fn build(&self, config: Option<&Configuration>, theme: ResolvedTheme) -> Value {
        match self {
            Self::Resolved => {
                let mut fields: Map<String, Value> = config
                    .map(|config| config.extra.clone())
                    .unwrap_or_default();
                fields.insert("theme".to_owned(), json!(theme));
                Value::Object(fields)
            }
            Self::RawConfig => config.map_or(Value::Null, |config| json!(config)),
            Self::Literal(text) => Value::String(text.clone()),
        }
    }
}
