//! Error types for the feed synchronization core.
//!
//! The taxonomy is deliberately two-sided: either the transport broke
//! ([`TransportError`]) or the bytes arrived but weren't a block record
//! ([`DecodeError`]). Both are recovered locally by whichever component hit
//! them: the failure is logged, the operation aborted, and the feed left
//! exactly as it was. Nothing in this crate turns a bad fetch into a crash.

use thiserror::Error;

/// A failure in the fetch or stream transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request could not be sent or did not complete (connection
    /// refused, DNS failure, timeout, dropped mid-body).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered, but not with a 2xx.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code returned by the server.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// The WebSocket handshake could not be completed.
    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    /// The live connection dropped or was closed by the server.
    #[error("connection closed: {0}")]
    Closed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.to_string())
    }
}

/// A payload that arrived intact but could not be decoded into a block
/// record: malformed JSON, a missing required field, or a height that
/// doesn't fit in a `u64`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// serde rejected the payload. The message includes the offending
    /// field or position, which is all the caller ever does with it: log it.
    #[error("malformed block record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Umbrella error for feed operations that touch both layers, such as a
/// page fetch (transport) followed by body decoding (decode).
#[derive(Debug, Error)]
pub enum FeedError {
    /// The transport layer failed; see [`TransportError`].
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The payload failed to decode; see [`DecodeError`].
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_status_display_names_url() {
        let err = TransportError::Status {
            status: 503,
            url: "http://localhost:8080/blocks/-1".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("503"));
        assert!(rendered.contains("/blocks/-1"));
    }

    #[test]
    fn decode_error_wraps_serde() {
        let serde_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err = DecodeError::from(serde_err);
        assert!(err.to_string().starts_with("malformed block record"));
    }

    #[test]
    fn feed_error_is_transparent_over_both_sides() {
        let transport: FeedError = TransportError::Closed("server went away".into()).into();
        assert!(transport.to_string().contains("server went away"));

        let decode: FeedError = DecodeError::from(
            serde_json::from_str::<u64>("{").unwrap_err(),
        )
        .into();
        assert!(decode.to_string().contains("malformed block record"));
    }
}
