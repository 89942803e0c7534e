//! Plot identifiers and the serialized plot payload produced by the backend.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Opaque key for one plot's data source. Doubles as the cache key and the
/// fetch-dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotIdentifier(String);

impl PlotIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlotIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PlotIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlotIdentifier {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlotIdentifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Fetched description of one plot.
///
/// `docs_json` and `render_items` are JSON text and get parsed right before
/// rendering; `custom_model_js` is executable source and is never parsed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotPayload {
    #[serde(default)]
    pub docs_json: String,
    #[serde(default)]
    pub render_items: String,
    #[serde(default)]
    pub custom_model_js: String,
}

impl PlotPayload {
    /// False for the "present but no data" payload the backend sends when a
    /// source has nothing to plot.
    pub fn has_document(&self) -> bool {
        !self.docs_json.is_empty()
    }

    pub fn parse_document(&self) -> BridgeResult<PlotDocument> {
        serde_json::from_str(&self.docs_json)
            .map(PlotDocument)
            .map_err(BridgeError::MalformedDocument)
    }

    pub fn parse_manifest(&self) -> BridgeResult<RenderManifest> {
        serde_json::from_str(&self.render_items).map_err(BridgeError::MalformedManifest)
    }
}

/// Parsed document graph, handed to the engine untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotDocument(pub serde_json::Value);

/// Render targets exactly as the backend wrote them. Entries are kept as raw
/// JSON; only the first entry's `elementid` is ever read here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderManifest(pub Vec<serde_json::Value>);

impl RenderManifest {
    pub fn items(&self) -> &[serde_json::Value] {
        &self.0
    }

    /// Element id of the first render target; the scaffold is built around it.
    /// Non-string ids are used in their JSON text form.
    pub fn first_element_id(&self) -> BridgeResult<String> {
        let first = self.0.first().ok_or(BridgeError::EmptyManifest)?;
        match first.get("elementid") {
            None | Some(serde_json::Value::Null) => Err(BridgeError::MissingElementId),
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
        }
    }
}
