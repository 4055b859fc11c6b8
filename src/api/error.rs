use thiserror::Error;

use super::transport::TransportError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication was rejected and the session has been torn down.
    /// Callers must not retry; the user is being sent to the login view.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[source] TransportError),

    /// Any other transport or application failure. `message` is the text
    /// already surfaced through the notification channel.
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: TransportError,
    },

    /// The payload could not be encoded, or the response could not be
    /// decoded into the expected type.
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the underlying failure, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(source) => source.status,
            ApiError::Request { source, .. } => source.status,
            ApiError::Decode(_) => None,
        }
    }
}
