// Copyright (c) 2026 Pulse Labs. MIT License.
// See LICENSE for details.

//! # Pulse Feed — Core Library
//!
//! The synchronization core behind the Pulse block feed: one ordered,
//! duplicate-free list of blocks, fed by three sources that refuse to
//! coordinate with each other.
//!
//! A feed session starts with a single seed fetch, then grows at both ends
//! for the rest of its life: older blocks are appended at the tail as the
//! user pages backward through history, and freshly produced blocks arrive
//! over a long-lived WebSocket and are prepended at the head. The whole
//! point of this crate is that those three inputs — seed, pagination, live
//! push — never step on each other, never duplicate a block, and never
//! leave the list out of order.
//!
//! ## Architecture
//!
//! The modules mirror the actual moving parts of the feed:
//!
//! - **record** — The block record itself, plus wire decoding.
//! - **store** — The single in-memory feed and its three legal mutations.
//! - **paginate** — Demand-driven fetching of older pages, with a strict
//!   one-request-in-flight policy and an end-of-history terminal state.
//! - **live** — The push listener that merges newly produced blocks at
//!   the head, in arrival order.
//! - **scroll** — Translates a continuous viewport position into discrete
//!   "load more" signals. Deliberately dumb; all de-duplication lives in
//!   the paginator.
//! - **transport** — The HTTP and WebSocket adapters. Everything above
//!   this line is transport-agnostic and testable without a network.
//! - **session** — Wires the pieces together for a whole feed lifetime.
//! - **config** — Protocol constants and tunables.
//! - **error** — The two-way error taxonomy: transport broke, or the
//!   data was garbage.
//!
//! ## Design Philosophy
//!
//! 1. Head and tail mutations commute — exploit it, don't lock around it.
//! 2. A failed fetch never crashes a session; it logs and waits for the
//!    user to scroll again.
//! 3. Nothing is cancelled. A late page is still a correct page.

pub mod config;
pub mod error;
pub mod live;
pub mod paginate;
pub mod record;
pub mod scroll;
pub mod session;
pub mod store;
pub mod transport;

pub use error::{DecodeError, FeedError, TransportError};
pub use live::{ConnectionState, LiveListener, LiveSummary};
pub use paginate::{LoadOutcome, PageSource, Paginator};
pub use record::BlockRecord;
pub use scroll::{ScrollTrigger, Viewport};
pub use session::{FeedSession, SessionConfig};
pub use store::{FeedStore, SharedFeed};
pub use transport::http::HttpPageSource;
pub use transport::ws::{LiveConnection, ReconnectPolicy};
