use thiserror::Error;

/// Top-level error type for the `wolbot-line` crate.
///
/// Covers webhook verification, payload decoding and the reply API.
/// The binary maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Webhook verification ────────────────────────────────────────
    /// The `x-line-signature` header was absent.
    #[error("Missing webhook signature")]
    MissingSignature,

    /// The signature did not match the body under the channel secret.
    #[error("Webhook signature mismatch")]
    InvalidSignature,

    // ── Data ────────────────────────────────────────────────────────
    /// The webhook body was not a valid event payload.
    #[error("Malformed webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Messaging API ───────────────────────────────────────────────
    /// The access token contains bytes not allowed in an HTTP header.
    #[error("Channel access token is not a valid header value")]
    InvalidAccessToken,

    /// Non-success response from the Messaging API, with the raw body.
    #[error("Messaging API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
}

impl Error {
    /// Returns `true` if the request might succeed when retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the caller sent something that failed verification.
    pub fn is_rejected_webhook(&self) -> bool {
        matches!(self, Self::MissingSignature | Self::InvalidSignature)
    }
}
