//! WebSocket live push connection.
//!
//! Dials the server's push endpoint, answers pings, and hands every text
//! frame to the [`LiveListener`] for decoding and merging. The connection
//! is read-only from the client's perspective; the only thing ever written
//! back is a pong.
//!
//! The core feed contract mandates no automatic reconnection: when the
//! stream ends, live updates simply stop and the feed keeps what it has.
//! Deployments that want more resilience can opt into a bounded
//! exponential-backoff [`ReconnectPolicy`]; it is a transport-level
//! configuration decision, deliberately outside the listener itself.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::{MAX_RECONNECT_ATTEMPTS, MAX_RECONNECT_DELAY, RECONNECT_BASE_DELAY};
use crate::error::TransportError;
use crate::live::{ConnectionState, LiveListener, LiveSummary};

/// What to do when the live connection drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Don't. One connection per session; when it ends, live updates end.
    /// This is the default and the behavior the core contract specifies.
    Never,

    /// Retry with exponential backoff, up to a bounded number of attempts.
    Backoff {
        /// Attempts before giving up for good.
        max_attempts: u32,
        /// Delay before the first retry; doubles per attempt.
        base_delay: Duration,
        /// Ceiling on the backoff delay.
        max_delay: Duration,
    },
}

impl ReconnectPolicy {
    /// The standard bounded backoff (see [`crate::config`] for the values).
    pub fn backoff_defaults() -> Self {
        Self::Backoff {
            max_attempts: MAX_RECONNECT_ATTEMPTS,
            base_delay: RECONNECT_BASE_DELAY,
            max_delay: MAX_RECONNECT_DELAY,
        }
    }

    /// Delay before retry number `attempt` (1-based), or `None` when the
    /// policy says stop.
    fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::Backoff {
                max_attempts,
                base_delay,
                max_delay,
            } => {
                if attempt > *max_attempts {
                    return None;
                }
                // Shift capped so the multiplier can't overflow.
                let delay = base_delay.saturating_mul(1 << (attempt - 1).min(6));
                Some(delay.min(*max_delay))
            }
        }
    }
}

/// One live push connection: a URL, a reconnect policy, and the current
/// lifecycle state (`Connecting → Open → Closed`).
pub struct LiveConnection {
    url: String,
    policy: ReconnectPolicy,
    state: Mutex<ConnectionState>,
}

impl LiveConnection {
    /// A connection that will dial `url` once and never reconnect.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_policy(url, ReconnectPolicy::Never)
    }

    /// A connection with an explicit reconnect policy.
    pub fn with_policy(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            policy,
            state: Mutex::new(ConnectionState::Connecting),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.lock() = state;
    }

    /// Dials the push endpoint and feeds the listener until the connection
    /// ends and the reconnect policy (if any) is exhausted.
    ///
    /// A clean server close ends the run regardless of policy; only failed
    /// connections are retried. Returns the total tally across attempts.
    pub async fn run(&self, listener: &LiveListener) -> LiveSummary {
        let mut totals = LiveSummary::default();
        let mut attempt = 0u32;

        loop {
            self.set_state(ConnectionState::Connecting);
            match self.run_once(listener, &mut totals).await {
                Ok(()) => {
                    // Clean disconnect.
                    break;
                }
                Err(e) => {
                    tracing::warn!(url = %self.url, error = %e, "live connection failed");
                }
            }

            attempt += 1;
            match self.policy.delay_for(attempt) {
                Some(delay) => {
                    tracing::info!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting live stream");
                    tokio::time::sleep(delay).await;
                }
                None => break,
            }
        }

        self.set_state(ConnectionState::Closed);
        totals
    }

    /// One connection lifetime: handshake, then the receive loop.
    async fn run_once(
        &self,
        listener: &LiveListener,
        totals: &mut LiveSummary,
    ) -> Result<(), TransportError> {
        let (socket, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::Handshake(e.to_string()))?;

        self.set_state(ConnectionState::Open);
        tracing::info!(url = %self.url, "live stream connected");

        let (mut write, mut read) = socket.split();

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if listener.merge_message(&text) {
                        totals.merged += 1;
                    } else {
                        totals.dropped += 1;
                    }
                }
                Ok(Message::Ping(payload)) => {
                    let _ = write.send(Message::Pong(payload)).await;
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("live stream closed by server");
                    return Ok(());
                }
                // Binary, pong, and raw frames carry no block records.
                Ok(_) => {}
                Err(e) => return Err(TransportError::Closed(e.to_string())),
            }
        }

        // Stream exhausted without a close frame; treat as a drop so the
        // reconnect policy gets a say.
        Err(TransportError::Closed("stream ended".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The socket paths are exercised end-to-end in tests/feed_sync.rs
    // against a real local server; these pin the backoff arithmetic.

    #[test]
    fn never_policy_never_retries() {
        assert_eq!(ReconnectPolicy::Never.delay_for(1), None);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = ReconnectPolicy::Backoff {
            max_attempts: 10,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        };

        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for(3), Some(Duration::from_secs(8)));
        // 2 * 2^5 = 64 would exceed the cap.
        assert_eq!(policy.delay_for(6), Some(Duration::from_secs(60)));
        // The shift is capped, so late attempts stay at the ceiling.
        assert_eq!(policy.delay_for(10), Some(Duration::from_secs(60)));
    }

    #[test]
    fn backoff_exhausts_after_max_attempts() {
        let policy = ReconnectPolicy::Backoff {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        };

        assert!(policy.delay_for(3).is_some());
        assert_eq!(policy.delay_for(4), None);
    }
}
