//! # Transport Adapters
//!
//! The only two places in the crate that know a network exists:
//!
//! ```text
//! http.rs — GET /blocks/{cursor} page fetches (seed + pagination)
//! ws.rs   — the persistent live push connection
//! ```
//!
//! Everything above this module speaks [`crate::paginate::PageSource`] and
//! message streams, so swapping either adapter out (for tests, or for a
//! different wire) touches nothing else.

pub mod http;
pub mod ws;
