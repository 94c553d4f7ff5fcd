//! # Live Push Listener
//!
//! Consumes the one-way stream of freshly produced blocks and merges each
//! arrival into the feed head, independently of whatever pagination is
//! doing at the tail. The listener itself is transport-agnostic: it folds
//! any stream of inbound text messages into the feed, which is what makes
//! it testable with a plain vector of strings. The WebSocket plumbing that
//! produces such a stream lives in [`crate::transport::ws`].
//!
//! Per-message contract: one message is one JSON-encoded block record.
//! A message that fails to decode is dropped and logged; it is never fatal
//! to the connection. A transport error ends the stream, and with it the
//! flow of live updates, but leaves every already-merged block in place.

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;

use crate::error::TransportError;
use crate::record::BlockRecord;
use crate::store::SharedFeed;

/// Broadcast capacity for merged-block notifications. 256 is large enough
/// to absorb short bursts without dropping events for attached renderers.
const EVENT_CAPACITY: usize = 256;

/// Lifecycle of a live push connection. `Closed` is reachable from any
/// state, on transport error or explicit server close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The transport is dialing and has not completed its handshake.
    Connecting,
    /// The stream is open and messages may arrive at any time.
    Open,
    /// The stream has ended. Live updates have stopped; the feed keeps
    /// whatever was merged.
    Closed,
}

/// Tally of one listener run, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveSummary {
    /// Messages decoded and merged into the feed.
    pub merged: u64,
    /// Malformed messages dropped.
    pub dropped: u64,
}

/// Merges live arrivals into the shared feed, one message at a time.
pub struct LiveListener {
    feed: SharedFeed,
    /// Every merged record is also published here for renderers. Nobody
    /// listening is fine; the send result is ignored.
    events: broadcast::Sender<BlockRecord>,
}

impl LiveListener {
    /// Creates a listener merging into the given feed.
    pub fn new(feed: SharedFeed) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { feed, events }
    }

    /// Subscribes to merged-block notifications. Receivers that fall more
    /// than [`EVENT_CAPACITY`] records behind see a lag error, not a stall.
    pub fn subscribe(&self) -> broadcast::Receiver<BlockRecord> {
        self.events.subscribe()
    }

    /// Decodes one inbound message and merges it at the feed head.
    ///
    /// Returns whether the message was merged. Malformed payloads are
    /// logged and dropped here, so the caller's receive loop stays a
    /// straight line.
    pub fn merge_message(&self, text: &str) -> bool {
        match BlockRecord::decode(text) {
            Ok(record) => {
                tracing::debug!(
                    height = record.height,
                    block = %record.short_id(),
                    "live block merged"
                );
                self.feed.write().prepend_newer(vec![record.clone()]);
                let _ = self.events.send(record);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed live message");
                false
            }
        }
    }

    /// Folds an inbound message stream into the feed until it ends.
    ///
    /// `Ok` items are merged (or dropped, if malformed); the first `Err`
    /// item is logged and ends the run, as does stream exhaustion. Returns
    /// the tally either way.
    pub async fn run<S>(&self, mut stream: S) -> LiveSummary
    where
        S: Stream<Item = Result<String, TransportError>> + Unpin,
    {
        let mut summary = LiveSummary::default();

        while let Some(message) = stream.next().await {
            match message {
                Ok(text) => {
                    if self.merge_message(&text) {
                        summary.merged += 1;
                    } else {
                        summary.dropped += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "live stream ended");
                    break;
                }
            }
        }

        tracing::debug!(
            merged = summary.merged,
            dropped = summary.dropped,
            "live listener stopped"
        );
        summary
    }
}
