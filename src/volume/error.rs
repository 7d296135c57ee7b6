use super::api::{RpcMethod, VOLUME_NOT_FOUND};
use thiserror::Error;

/// Failures below the protocol: the remote service never produced a
/// decodable answer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{method} request failed: {source}")]
    Request {
        method: RpcMethod,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to encode {method} request: {source}")]
    Encode {
        method: RpcMethod,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {method} response: {source}")]
    Decode {
        method: RpcMethod,
        #[source]
        source: serde_json::Error,
    },

    #[error("{method} returned HTTP {status}: {body}")]
    Status {
        method: RpcMethod,
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service reported the `Volume Not Found` sentinel.
    #[error("{}", VOLUME_NOT_FOUND)]
    NotFound,

    /// Any other non-empty `Err` field, verbatim.
    #[error("{0}")]
    Service(String),

    #[error("service reported an empty mountpoint for volume '{0}'")]
    EmptyMountpoint(String),

    /// Host or port discovery failed before any remote call was made.
    #[error("failed to bind volume service client: {0}")]
    Bind(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl VolumeError {
    /// Classifies the `Err` field of a decoded response.
    ///
    /// This is the only place the sentinel text is compared.
    pub fn from_wire(message: String) -> Self {
        if message == VOLUME_NOT_FOUND {
            VolumeError::NotFound
        } else {
            VolumeError::Service(message)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VolumeError::NotFound)
    }
}
