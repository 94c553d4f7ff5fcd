//! # CLI Interface
//!
//! Defines the command-line argument structure for `pulse-viewer` using
//! `clap` derive. Supports three subcommands: `watch`, `blocks`, and
//! `version`.

use clap::{Parser, Subcommand};

/// Pulse block feed viewer.
///
/// A terminal client for the Pulse block feed: seeds from the newest page,
/// merges live blocks as they are produced, and pages older history in on
/// demand.
#[derive(Parser, Debug)]
#[command(
    name = "pulse-viewer",
    about = "Pulse block feed viewer",
    version,
    propagate_version = true
)]
pub struct PulseViewerCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the viewer binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow the feed: seed, stream live blocks, page older history on
    /// demand (type `more`).
    Watch(WatchArgs),
    /// Fetch a single page of blocks and print it.
    Blocks(BlocksArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `watch` subcommand.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Base URL of the block API.
    #[arg(long, env = "PULSE_API_URL", default_value = "http://127.0.0.1:8080")]
    pub api_url: String,

    /// URL of the live push WebSocket endpoint.
    #[arg(long, env = "PULSE_WS_URL", default_value = "ws://127.0.0.1:8080/ws")]
    pub ws_url: String,

    /// Reconnect to the live stream with bounded backoff when it drops.
    ///
    /// Off by default: the feed keeps whatever was merged and simply stops
    /// updating, which is the core contract's behavior.
    #[arg(long)]
    pub reconnect: bool,

    /// Emit logs as JSON lines instead of pretty text.
    #[arg(long, env = "PULSE_LOG_JSON")]
    pub log_json: bool,
}

/// Arguments for the `blocks` subcommand.
#[derive(Parser, Debug)]
pub struct BlocksArgs {
    /// Base URL of the block API.
    #[arg(long, env = "PULSE_API_URL", default_value = "http://127.0.0.1:8080")]
    pub api_url: String,

    /// Page cursor: a block height, or -1 for the newest page.
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub cursor: i64,

    /// Print the raw JSON page instead of the formatted listing.
    #[arg(long)]
    pub json: bool,
}
