//! # Feed Store
//!
//! The single source of truth for what the feed currently shows: an ordered,
//! in-memory list of block records, newest first. Three mutations exist and
//! no others:
//!
//! ```text
//! seed(initial)          — wholesale replace, effective exactly once
//! prepend_newer(newer)   — live blocks land at the head
//! append_older(older)    — paginated history lands at the tail
//! ```
//!
//! ## Invariants
//!
//! - No two entries share a `block_id`.
//! - Entries are sorted by height, strictly descending. The store does not
//!   promise gap-freedom (pagination may simply not have reached a range
//!   yet), only relative order.
//! - Growth happens at the ends: history extends the tail, live arrivals
//!   settle into the head region. Held entries are never reordered.
//!
//! Ordering is mostly the callers' contract. The paginator guarantees its
//! pages continue the descending sequence via non-overlapping cursor
//! boundaries, so `append_older` is a blind concatenation. `prepend_newer`
//! does slightly more: live bursts may be delivered newest-first one message
//! at a time, so each arrival is slotted into the head region by height
//! rather than stacked blindly (see the method docs). What the store fully
//! owns is the seed-once rule: the second `seed` call of a session is a
//! logged no-op, whatever it carries.
//!
//! ## Sharing
//!
//! Producers share the store as [`SharedFeed`], an `Arc<RwLock<_>>`. Every
//! mutation is one short critical section with no await inside, so from any
//! caller's perspective a mutation is atomic: there is never a visible
//! partial update, and head/tail writers cannot interleave within one
//! operation. Prepends and appends target opposite ends and therefore
//! commute; no cross-source ordering is needed or provided.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::record::BlockRecord;

/// The feed store shared between the seed path, the paginator, and the
/// live listener.
pub type SharedFeed = Arc<RwLock<FeedStore>>;

/// The ordered in-memory feed. See the module docs for the mutation rules.
#[derive(Debug, Default)]
pub struct FeedStore {
    /// Records in display order: index 0 is the newest block.
    entries: VecDeque<BlockRecord>,
    /// Whether the one-shot seed has been spent.
    seeded: bool,
}

impl FeedStore {
    /// Creates an empty, unseeded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store already wrapped for sharing across the three
    /// producers.
    pub fn shared() -> SharedFeed {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Replaces the feed wholesale with the initial page. Effective exactly
    /// once per session: a second call logs and changes nothing, even if the
    /// first seed carried an empty page.
    ///
    /// Live records may already be present (the push stream can open before
    /// the initial fetch resolves); the first seed still replaces them, which
    /// matches the serving side's contract that the newest page is a superset
    /// of anything pushed in that window.
    pub fn seed(&mut self, initial: Vec<BlockRecord>) {
        if self.seeded {
            tracing::warn!(
                discarded = initial.len(),
                "seed called twice; keeping existing feed"
            );
            return;
        }
        tracing::debug!(blocks = initial.len(), "feed seeded");
        self.entries = initial.into();
        self.seeded = true;
    }

    /// Appends a page of older blocks at the tail, preserving input order.
    ///
    /// The caller guarantees `older` continues the existing descending-height
    /// sequence; the store does not re-sort and does not deduplicate.
    pub fn append_older(&mut self, older: Vec<BlockRecord>) {
        tracing::trace!(blocks = older.len(), "appending older blocks");
        self.entries.extend(older);
    }

    /// Merges `newer` at the head, preserving the relative order of `newer`.
    ///
    /// Each record is placed ahead of every currently-held record that is
    /// older than it. For internally sorted input this is exactly the
    /// concatenation `newer ++ feed`; when a burst is delivered newest-first
    /// one message at a time, each arrival settles beneath the newer records
    /// that arrived just before it, so the feed stays height-descending
    /// either way. The head region is the only place this ever lands in
    /// practice, because live arrivals are newer than everything paginated.
    pub fn prepend_newer(&mut self, newer: Vec<BlockRecord>) {
        tracing::trace!(blocks = newer.len(), "prepending newer blocks");
        for record in newer {
            let at = self
                .entries
                .iter()
                .position(|held| held.height <= record.height)
                .unwrap_or(self.entries.len());
            self.entries.insert(at, record);
        }
    }

    /// The newest block currently held, if any.
    pub fn head(&self) -> Option<&BlockRecord> {
        self.entries.front()
    }

    /// The oldest block currently held, if any. Pagination cursors are
    /// derived from this entry at request time.
    pub fn tail(&self) -> Option<&BlockRecord> {
        self.entries.back()
    }

    /// Height of the oldest block currently held.
    pub fn tail_height(&self) -> Option<u64> {
        self.tail().map(|record| record.height)
    }

    /// Number of records in the feed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the feed holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the one-shot seed has been spent.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Iterates the feed in display order (newest first).
    pub fn iter(&self) -> impl Iterator<Item = &BlockRecord> {
        self.entries.iter()
    }

    /// An owned copy of the feed in display order, for the rendering
    /// surface. The feed itself stays put.
    pub fn snapshot(&self) -> Vec<BlockRecord> {
        self.entries.iter().cloned().collect()
    }
}
