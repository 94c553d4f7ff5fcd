//! # Pagination Controller
//!
//! Fetches the next older page of history when the scroll trigger says so,
//! under a strict concurrency and termination policy:
//!
//! ```text
//!            load_more()
//!   Idle ───────────────────> Fetching
//!    ^                           │
//!    │   success: append page    │
//!    │   failure: log, no retry  │
//!    └───────────────────────────┘
//! ```
//!
//! A `load_more` call is *ignored*, never queued, when a fetch is already
//! in flight, when the feed is empty (nothing to paginate from), or when
//! the feed's tail is the origin block (end of history, permanently).
//! Ignoring rather than queueing is what makes the scroll trigger safe to
//! fire on every viewport event.
//!
//! ## Cursor Convention
//!
//! The next request cursor is `tail.height - 1`, exclusive of the current
//! tail. The endpoint serves blocks from the requested height downward, so
//! the exclusive cursor produces adjacent, non-overlapping pages: no block
//! skipped, no block duplicated at a page boundary. The cursor is derived
//! from the feed tail *at request time*, never from a value captured
//! earlier, so a page continuing the true tail is requested even if live
//! pushes moved the head in the meantime.
//!
//! The actual page transport is injected through [`PageSource`], which
//! keeps the controller testable without a network and lets the session
//! decide between HTTP and whatever the tests feel like mocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FeedError;
use crate::record::BlockRecord;
use crate::store::SharedFeed;

/// Something that can serve one page of block records for a cursor.
///
/// Cursors are heights; the sentinel `-1` (see
/// [`crate::config::NEWEST_PAGE_SENTINEL`]) requests the newest page.
/// Implementations return records newest-first within the page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page starting at `cursor`, descending.
    async fn fetch_page(&self, cursor: i64) -> Result<Vec<BlockRecord>, FeedError>;
}

/// What a single `load_more` call did, mainly for logging and tests.
/// Every variant except `Failed` is a normal part of feed life.
#[derive(Debug)]
pub enum LoadOutcome {
    /// A page was fetched and appended; carries the number of records.
    Appended(usize),
    /// The source answered with an empty page. Nothing was appended.
    EmptyPage,
    /// A fetch was already in flight; this call was ignored.
    AlreadyFetching,
    /// The feed is empty, so there is no tail to paginate from.
    NothingToPaginateFrom,
    /// The tail is the origin block; history is fully loaded.
    OriginReached,
    /// The fetch failed. Logged; the next scroll signal may retry.
    Failed(FeedError),
}

/// The pagination controller. One per feed session.
pub struct Paginator {
    /// The shared feed whose tail defines the next cursor.
    feed: SharedFeed,
    /// Injected page transport.
    source: Arc<dyn PageSource>,
    /// The one-request-in-flight guard. `swap` on entry makes concurrent
    /// `load_more` calls collapse to a single fetch.
    in_flight: AtomicBool,
}

impl Paginator {
    /// Creates a controller over the given feed and page source.
    pub fn new(feed: SharedFeed, source: Arc<dyn PageSource>) -> Self {
        Self {
            feed,
            source,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a page fetch is currently outstanding.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Requests the next older page, unless there is a reason not to.
    ///
    /// See the module docs for the ignore conditions. On success the page
    /// is appended to the feed tail; on failure the error is logged and the
    /// controller simply returns to idle. There is no retry and no queueing.
    pub async fn load_more(&self) -> LoadOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::trace!("load_more ignored; a page fetch is already in flight");
            return LoadOutcome::AlreadyFetching;
        }

        let outcome = self.fetch_next_page().await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    /// The single in-flight fetch: derive the cursor from the current tail,
    /// ask the source, append the result.
    async fn fetch_next_page(&self) -> LoadOutcome {
        let cursor = {
            let feed = self.feed.read();
            let Some(tail) = feed.tail() else {
                tracing::trace!("load_more ignored; feed is empty");
                return LoadOutcome::NothingToPaginateFrom;
            };
            if tail.is_origin() {
                tracing::trace!("load_more ignored; origin block reached");
                return LoadOutcome::OriginReached;
            }
            // Exclusive cursor: the page below the current tail.
            (tail.height - 1) as i64
        };

        match self.source.fetch_page(cursor).await {
            Ok(page) if page.is_empty() => {
                tracing::debug!(cursor, "page fetch returned no blocks");
                LoadOutcome::EmptyPage
            }
            Ok(page) => {
                let appended = page.len();
                self.feed.write().append_older(page);
                tracing::debug!(cursor, appended, "older page appended");
                LoadOutcome::Appended(appended)
            }
            Err(e) => {
                tracing::warn!(cursor, error = %e, "page fetch failed");
                LoadOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::store::FeedStore;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Builds a bare record at the given height.
    fn rec(height: u64) -> BlockRecord {
        BlockRecord {
            block_id: format!("blk-{height:04}"),
            producer_id: "producer-1".into(),
            height,
            txids: vec![],
        }
    }

    /// A scripted page source: pops pre-seeded responses in order, records
    /// every cursor it was asked for, and can hold each fetch open for a
    /// while to let tests overlap calls.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<BlockRecord>, FeedError>>>,
        cursors: Mutex<Vec<i64>>,
        hold: Option<Duration>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<BlockRecord>, FeedError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                cursors: Mutex::new(Vec::new()),
                hold: None,
            })
        }

        fn slow(responses: Vec<Result<Vec<BlockRecord>, FeedError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                cursors: Mutex::new(Vec::new()),
                hold: Some(Duration::from_millis(50)),
            })
        }

        fn requests(&self) -> Vec<i64> {
            self.cursors.lock().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, cursor: i64) -> Result<Vec<BlockRecord>, FeedError> {
            self.cursors.lock().push(cursor);
            if let Some(hold) = self.hold {
                tokio::time::sleep(hold).await;
            }
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![]))
        }
    }

    /// A paginator over a freshly seeded feed.
    fn setup(seed: Vec<BlockRecord>, source: Arc<ScriptedSource>) -> (Paginator, SharedFeed) {
        let feed = FeedStore::shared();
        feed.write().seed(seed);
        let paginator = Paginator::new(Arc::clone(&feed), source);
        (paginator, feed)
    }

    // -- 1. cursor_is_tail_height_minus_one -----------------------------------

    #[tokio::test]
    async fn cursor_is_derived_from_the_tail() {
        let source = ScriptedSource::new(vec![Ok(vec![rec(7), rec(6)])]);
        let (paginator, feed) = setup(vec![rec(10), rec(9), rec(8)], Arc::clone(&source));

        let outcome = paginator.load_more().await;
        assert!(matches!(outcome, LoadOutcome::Appended(2)));
        assert_eq!(source.requests(), vec![7]);
        assert_eq!(feed.read().tail_height(), Some(6));
    }

    // -- 2. empty_feed_is_a_no_op --------------------------------

    #[tokio::test]
    async fn empty_feed_never_issues_a_request() {
        let source = ScriptedSource::new(vec![]);
        let (paginator, _feed) = setup(vec![], Arc::clone(&source));

        let outcome = paginator.load_more().await;
        assert!(matches!(outcome, LoadOutcome::NothingToPaginateFrom));
        assert!(source.requests().is_empty());
    }

    // -- 3. origin_reached_is_terminal ----------------------

    #[tokio::test]
    async fn origin_tail_never_issues_a_request() {
        let source = ScriptedSource::new(vec![Ok(vec![rec(0)])]);
        let (paginator, feed) = setup(vec![rec(1)], Arc::clone(&source));

        // First call fetches the origin page.
        let outcome = paginator.load_more().await;
        assert!(matches!(outcome, LoadOutcome::Appended(1)));
        assert_eq!(feed.read().tail_height(), Some(0));

        // From here on, load_more is permanently a no-op.
        for _ in 0..3 {
            let outcome = paginator.load_more().await;
            assert!(matches!(outcome, LoadOutcome::OriginReached));
        }
        assert_eq!(source.requests(), vec![0]);
    }

    // -- 4. overlapping_calls_collapse ----------------------

    #[tokio::test(start_paused = true)]
    async fn concurrent_load_more_issues_one_request() {
        let source = ScriptedSource::slow(vec![Ok(vec![rec(4)])]);
        let (paginator, feed) = setup(vec![rec(5)], Arc::clone(&source));

        // Two rapid scroll events land while the first fetch is in flight.
        let (first, second) = tokio::join!(paginator.load_more(), paginator.load_more());

        assert!(matches!(first, LoadOutcome::Appended(1)));
        assert!(matches!(second, LoadOutcome::AlreadyFetching));
        assert_eq!(source.requests().len(), 1);
        assert_eq!(feed.read().len(), 2);
    }

    // -- 5. failure_returns_to_idle_and_allows_retry --------------------------

    #[tokio::test]
    async fn failed_fetch_is_retryable_on_the_next_signal() {
        let source = ScriptedSource::new(vec![
            Err(TransportError::Status {
                status: 500,
                url: "http://localhost/blocks/4".into(),
            }
            .into()),
            Ok(vec![rec(4), rec(3)]),
        ]);
        let (paginator, feed) = setup(vec![rec(5)], Arc::clone(&source));

        let outcome = paginator.load_more().await;
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(!paginator.is_fetching());
        assert_eq!(feed.read().len(), 1);

        // The user scrolls again; the same cursor is requested and succeeds.
        let outcome = paginator.load_more().await;
        assert!(matches!(outcome, LoadOutcome::Appended(2)));
        assert_eq!(source.requests(), vec![4, 4]);
    }

    // -- 6. head_movement_does_not_skew_the_cursor ----------------------------

    #[tokio::test]
    async fn cursor_tracks_the_tail_not_the_head() {
        let source = ScriptedSource::new(vec![Ok(vec![rec(7)]), Ok(vec![rec(6)])]);
        let (paginator, feed) = setup(vec![rec(9), rec(8)], Arc::clone(&source));

        paginator.load_more().await;

        // Live pushes move the head between pagination rounds.
        feed.write().prepend_newer(vec![rec(10)]);
        feed.write().prepend_newer(vec![rec(11)]);

        paginator.load_more().await;

        // Cursors follow the tail sequence regardless of the head.
        assert_eq!(source.requests(), vec![7, 6]);
        let heights: Vec<u64> = feed.read().iter().map(|r| r.height).collect();
        assert_eq!(heights, vec![11, 10, 9, 8, 7, 6]);
    }

    // -- 7. empty_page_appends_nothing ----------------------------------------

    #[tokio::test]
    async fn empty_page_leaves_the_feed_unchanged() {
        let source = ScriptedSource::new(vec![Ok(vec![])]);
        let (paginator, feed) = setup(vec![rec(5)], Arc::clone(&source));

        let outcome = paginator.load_more().await;
        assert!(matches!(outcome, LoadOutcome::EmptyPage));
        assert_eq!(feed.read().len(), 1);
        assert!(!paginator.is_fetching());
    }
}
