use thiserror::Error;

/// Failures on the render path.
///
/// None of these are recovered inside the bridge; they surface to whoever
/// invoked the render, which for the web widget means the host's error log.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed plot document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("malformed render-item manifest: {0}")]
    MalformedManifest(#[source] serde_json::Error),

    #[error("render-item manifest is empty")]
    EmptyManifest,

    #[error("first render item has no elementid")]
    MissingElementId,

    #[error("dom: {0}")]
    Dom(String),

    #[error("custom model code failed: {0}")]
    Script(String),

    #[error("embed failed: {0}")]
    Embed(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
