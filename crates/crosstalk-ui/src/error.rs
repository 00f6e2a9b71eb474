//! Error types for the UI endpoint.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] crosstalk_core::Error),

    #[cfg(feature = "webview")]
    #[error("Web-view JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "webview")]
    #[error("Web-view base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid parameter index: {0}")]
    InvalidParameter(i64),

    #[error("Control {0} is not bound to a parameter")]
    UnboundControl(i32),
}

impl Error {
    /// True if the message was only dropped because the queue was full.
    pub fn is_drop(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_drop())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
