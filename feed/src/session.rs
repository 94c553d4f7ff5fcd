//! # Feed Session
//!
//! Wires the store, the paginator, and the live connection together for
//! one feed lifetime: seed once, listen forever, paginate on demand. The
//! viewer binary and the integration tests both drive the feed through
//! this type rather than assembling the pieces by hand.
//!
//! A session owns nothing persistent. When it is dropped, the feed goes
//! with it; the next session starts from a fresh seed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::live::{ConnectionState, LiveListener, LiveSummary};
use crate::paginate::{LoadOutcome, Paginator};
use crate::record::BlockRecord;
use crate::store::{FeedStore, SharedFeed};
use crate::transport::http::HttpPageSource;
use crate::transport::ws::{LiveConnection, ReconnectPolicy};

/// Endpoint and policy configuration for one feed session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the HTTP API serving `GET /blocks/{cursor}`.
    pub api_url: String,
    /// URL of the live push WebSocket endpoint.
    pub ws_url: String,
    /// Per-request timeout for page fetches.
    pub request_timeout: Duration,
    /// What to do when the live connection drops. Defaults to never
    /// reconnecting, per the core contract.
    pub reconnect: ReconnectPolicy,
}

impl SessionConfig {
    /// A configuration with default timeout and no reconnection.
    pub fn new(api_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ws_url: ws_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            reconnect: ReconnectPolicy::Never,
        }
    }
}

/// One assembled feed: shared store, pagination controller, live
/// connection. See the module docs for the lifecycle.
pub struct FeedSession {
    feed: SharedFeed,
    source: Arc<HttpPageSource>,
    paginator: Arc<Paginator>,
    listener: Arc<LiveListener>,
    connection: Arc<LiveConnection>,
}

impl FeedSession {
    /// Assembles a session from the given configuration. Nothing touches
    /// the network until [`seed`](Self::seed) or
    /// [`spawn_live`](Self::spawn_live) is called.
    pub fn new(config: SessionConfig) -> Self {
        let feed = FeedStore::shared();
        let source = Arc::new(HttpPageSource::with_timeout(
            config.api_url,
            config.request_timeout,
        ));
        let paginator = Arc::new(Paginator::new(
            Arc::clone(&feed),
            Arc::clone(&source) as _,
        ));
        let listener = Arc::new(LiveListener::new(Arc::clone(&feed)));
        let connection = Arc::new(LiveConnection::with_policy(
            config.ws_url,
            config.reconnect,
        ));

        Self {
            feed,
            source,
            paginator,
            listener,
            connection,
        }
    }

    /// The shared feed store, for the rendering surface.
    pub fn feed(&self) -> SharedFeed {
        Arc::clone(&self.feed)
    }

    /// The pagination controller, for whatever drives scroll signals.
    pub fn paginator(&self) -> Arc<Paginator> {
        Arc::clone(&self.paginator)
    }

    /// Subscribes to live merged-block notifications.
    pub fn subscribe_live(&self) -> broadcast::Receiver<BlockRecord> {
        self.listener.subscribe()
    }

    /// Lifecycle state of the live connection.
    pub fn live_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Performs the one-shot initial seed and returns how many blocks it
    /// loaded.
    ///
    /// An unreachable source or a malformed body is logged and leaves the
    /// feed empty — the session stays alive, live pushes still merge, and
    /// only pagination has nothing to anchor on.
    pub async fn seed(&self) -> usize {
        match self.source.fetch_newest().await {
            Ok(page) => {
                let count = page.len();
                self.feed.write().seed(page);
                tracing::info!(blocks = count, "initial page loaded");
                count
            }
            Err(e) => {
                tracing::error!(error = %e, "initial page fetch failed; feed stays empty");
                0
            }
        }
    }

    /// Spawns the live push task and returns its handle. The task runs
    /// until the connection ends and the reconnect policy is exhausted.
    pub fn spawn_live(&self) -> JoinHandle<LiveSummary> {
        let connection = Arc::clone(&self.connection);
        let listener = Arc::clone(&self.listener);
        tokio::spawn(async move { connection.run(&listener).await })
    }

    /// Seeds the feed, then attaches the live stream. The common startup
    /// path: the two steps are independent, so a failed seed does not stop
    /// live updates from flowing.
    pub async fn start(&self) -> JoinHandle<LiveSummary> {
        let live = self.spawn_live();
        self.seed().await;
        live
    }

    /// Requests the next older page; see [`Paginator::load_more`].
    pub async fn load_more(&self) -> LoadOutcome {
        self.paginator.load_more().await
    }
}
