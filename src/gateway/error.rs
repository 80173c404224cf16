// SPDX-License-Identifier: MIT

//! Typed error handling for the puzzle gateway
//!
//! Every variant collapses to the same externally observable outcome (the
//! sentinel puzzle); the variants exist so logs and the embedded hint text
//! can name what actually went wrong.

use super::Provider;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No credential in the config and no process-level default.
    #[error("API key not configured for provider: {0}")]
    MissingCredential(Provider),

    /// Non-success HTTP status from a provider; status and body are captured
    /// so the player-visible hint names the rejection.
    #[error("{provider} API error {status}: {body}")]
    Http {
        provider: Provider,
        status: u16,
        body: String,
    },

    /// The provider answered but produced no usable text.
    #[error("No valid response from model")]
    NoValidResponse,

    /// The model's text was not a well-formed puzzle object.
    #[error("invalid puzzle payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The single attempt ran past the gateway's deadline.
    #[error("model request timed out")]
    Timeout,

    /// Connection, TLS or other transport failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}
