//! # Scroll Trigger
//!
//! Turns a continuous viewport-position signal into discrete "load more"
//! calls. This is the dumbest component in the crate, on purpose: it owns a
//! single threshold comparison and nothing else. It may fire on every
//! viewport event in rapid succession; collapsing those into one network
//! request is entirely the paginator's job, and is not reimplemented here.

use std::sync::Arc;

use futures::{Stream, StreamExt};

use crate::config::SCROLL_BOTTOM_THRESHOLD;
use crate::paginate::Paginator;

/// A snapshot of the scrollable content's geometry, in content units.
/// Mirrors the usual `scrollTop` / `clientHeight` / `scrollHeight` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Offset of the visible window from the top of the content.
    pub scroll_top: u32,
    /// Height of the visible window.
    pub client_height: u32,
    /// Total height of the scrollable content.
    pub scroll_height: u32,
}

impl Viewport {
    /// Content units between the bottom edge of the visible window and the
    /// bottom of the content. Zero when scrolled all the way down.
    pub fn distance_to_bottom(&self) -> u32 {
        self.scroll_height
            .saturating_sub(self.scroll_top + self.client_height)
    }
}

/// The scroll-position policy: fire when the viewport is within a fixed
/// distance of the bottom of the content.
#[derive(Debug, Clone, Copy)]
pub struct ScrollTrigger {
    threshold: u32,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollTrigger {
    /// A trigger with the standard threshold
    /// ([`SCROLL_BOTTOM_THRESHOLD`]).
    pub fn new() -> Self {
        Self {
            threshold: SCROLL_BOTTOM_THRESHOLD,
        }
    }

    /// A trigger with a custom threshold, for embedders whose content
    /// units aren't pixels.
    pub fn with_threshold(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Whether this viewport position should request more history.
    pub fn near_bottom(&self, viewport: &Viewport) -> bool {
        viewport.distance_to_bottom() < self.threshold
    }

    /// Drives the paginator from a stream of viewport positions until the
    /// stream ends.
    ///
    /// Each near-bottom position fires `load_more` without waiting for the
    /// previous one to finish, exactly like a scroll handler would; the
    /// paginator's in-flight guard collapses the burst to one request.
    pub async fn drive<S>(self, mut positions: S, paginator: Arc<Paginator>)
    where
        S: Stream<Item = Viewport> + Unpin,
    {
        while let Some(viewport) = positions.next().await {
            if self.near_bottom(&viewport) {
                let paginator = Arc::clone(&paginator);
                tokio::spawn(async move {
                    paginator.load_more().await;
                });
            }
        }
    }
}
