//! Error types for the sweets API client.
//!
//! # Design
//! Each remote call has its own failure variant with a fixed, user-facing
//! message. The status is kept for logging only: a transport failure and a
//! non-2xx response render identically. Payloads that arrive with a 2xx
//! status but do not match the expected shape are `Decode` errors, so they
//! never reach rendering.

use thiserror::Error;

/// Errors returned by `SweetsClient` parse methods and the view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Listing sweets failed. `status` is `None` when the request never
    /// produced a response.
    #[error("Failed to fetch sweets")]
    ListFetch { status: Option<u16> },

    /// Purchasing a sweet failed.
    #[error("Purchase failed")]
    Purchase { status: Option<u16> },

    /// Exchanging username/password for an access token failed.
    #[error("Login failed")]
    Login { status: Option<u16> },

    /// A 2xx response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status that caused the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ListFetch { status }
            | ApiError::Purchase { status }
            | ApiError::Login { status } => *status,
            ApiError::Decode(_) | ApiError::Serialization(_) => None,
        }
    }
}

/// The host could not complete an HTTP round trip (connection refused, DNS,
/// broken pipe...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);
