use pageglue_protocol::CodecError;
use thiserror::Error;

/// Errors the runtime recovers from. They are reported to the console at the
/// browser boundary and never reach the host application.
#[derive(Debug, Error)]
pub enum GlueError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("local storage is not available")]
    StorageUnavailable,
    #[error("could not write `{key}` to storage: {reason}")]
    StorageWrite { key: String, reason: String },
    #[error("host application has no `ports` object")]
    NoPorts,
    #[error("host application has no port `{0}`")]
    MissingPort(String),
    #[error("port `{port}` has no `{method}` function")]
    PortMethod { port: String, method: &'static str },
    #[error("javascript error: {0}")]
    Js(String),
}
