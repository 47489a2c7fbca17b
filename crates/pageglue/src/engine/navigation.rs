//! History navigation → inbound message.

use std::collections::BTreeMap;

use pageglue_protocol::InboundMessage;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GlueError;

/// Which inbound message a deployment uses for history changes. Never both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationMode {
    Url,
    QueryParams,
}

impl Default for NavigationMode {
    fn default() -> Self {
        if cfg!(feature = "nav-query-params") {
            Self::QueryParams
        } else {
            Self::Url
        }
    }
}

impl NavigationMode {
    pub fn message_for(&self, href: &str) -> Result<InboundMessage, GlueError> {
        Ok(match self {
            Self::Url => InboundMessage::UrlChanged(href.to_owned()),
            Self::QueryParams => InboundMessage::ChangedQueryParams(query_params(href)?),
        })
    }
}

/// Decodes the query string of `href` into a multi-valued mapping.
pub fn query_params(href: &str) -> Result<BTreeMap<String, Vec<String>>, GlueError> {
    let url = Url::parse(href)?;
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        params.entry(key.into_owned()).or_default().push(value.into_owned());
    }
    Ok(params)
}
