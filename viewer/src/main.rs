// Copyright (c) 2026 Pulse Labs. MIT License.
// See LICENSE for details.

//! # Pulse Viewer
//!
//! Entry point for the `pulse-viewer` binary. Parses CLI arguments,
//! initializes logging, and drives a feed session against a running block
//! API: seed from the newest page, merge live blocks as they arrive, and
//! page older history in when the user asks for more.
//!
//! The binary supports three subcommands:
//!
//! - `watch`   — follow the live feed interactively
//! - `blocks`  — fetch and print a single page
//! - `version` — print build version information

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast;

use pulse_feed::{
    BlockRecord, FeedSession, HttpPageSource, LoadOutcome, PageSource, ReconnectPolicy,
    SessionConfig,
};

use cli::{Commands, PulseViewerCli};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = PulseViewerCli::parse();

    match cli.command {
        Commands::Watch(args) => watch(args).await,
        Commands::Blocks(args) => print_page(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Runs the interactive feed: seed, live stream, and a `more` prompt that
/// stands in for the scroll position of a real rendering surface.
async fn watch(args: cli::WatchArgs) -> Result<()> {
    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init_logging("pulse_viewer=info,pulse_feed=info", format);

    let mut config = SessionConfig::new(&args.api_url, &args.ws_url);
    if args.reconnect {
        config.reconnect = ReconnectPolicy::backoff_defaults();
    }

    tracing::info!(api = %args.api_url, ws = %args.ws_url, "starting feed session");

    let session = FeedSession::new(config);
    let mut live_events = session.subscribe_live();
    let live = session.start().await;

    // Print the seeded page, newest first.
    {
        let feed = session.feed();
        let feed = feed.read();
        for record in feed.iter() {
            print_record(record);
        }
    }
    println!("-- type 'more' for older blocks, 'quit' to exit --");

    let mut input_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut live_open = true;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = live_events.recv(), if live_open => match event {
                Ok(record) => print_record(&record),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "display fell behind the live stream");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    // The live task is gone; keep serving `more` from here on.
                    tracing::info!("live stream ended");
                    live_open = false;
                }
            },
            line = input_lines.next_line() => match line {
                Ok(Some(input)) => match input.trim() {
                    "more" | "m" => page_older(&session).await,
                    "quit" | "q" => break,
                    "" => {}
                    other => println!("unknown command: {other} (try 'more' or 'quit')"),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    break;
                }
            },
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    live.abort();
    tracing::info!("pulse-viewer stopped");
    Ok(())
}

/// One `more` request: load the next older page and print what arrived.
async fn page_older(session: &FeedSession) {
    match session.load_more().await {
        LoadOutcome::Appended(count) => {
            let snapshot = session.feed().read().snapshot();
            for record in snapshot.iter().skip(snapshot.len().saturating_sub(count)) {
                print_record(record);
            }
        }
        LoadOutcome::OriginReached => println!("-- end of history --"),
        LoadOutcome::NothingToPaginateFrom => println!("-- feed is empty; nothing to page --"),
        LoadOutcome::EmptyPage => println!("-- no older blocks available --"),
        LoadOutcome::AlreadyFetching => {
            // Another request is already in flight; this one was ignored.
        }
        LoadOutcome::Failed(_) => println!("-- page load failed; try again --"),
    }
}

/// Fetches one page and prints it, formatted or as raw JSON.
async fn print_page(args: cli::BlocksArgs) -> Result<()> {
    logging::init_logging("pulse_viewer=warn,pulse_feed=warn", LogFormat::Pretty);

    let source = HttpPageSource::new(&args.api_url);
    let page = source.fetch_page(args.cursor).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    for record in &page {
        println!("block   {}", record.block_id);
        println!("  height   {}", record.height);
        println!("  producer {}", record.producer_id);
        if record.txids.is_empty() {
            println!("  txids    (none)");
        } else {
            println!("  txids    {}", record.txids.len());
            for txid in &record.txids {
                println!("    {txid}");
            }
        }
    }
    println!("{} block(s)", page.len());

    Ok(())
}

/// One line per block, timestamped with local receipt time.
fn print_record(record: &BlockRecord) {
    println!(
        "[{}] height {:>8}  block {}  producer {}  txs {}",
        chrono::Local::now().format("%H:%M:%S"),
        record.height,
        record.short_id(),
        record.producer_id,
        record.txids.len(),
    );
}

/// Prints version information to stdout.
fn print_version() {
    println!("pulse-viewer {}", env!("CARGO_PKG_VERSION"));
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
