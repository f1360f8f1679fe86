//! # Git Cleanup CLI Entry Point
//!
//! The main entry point for the git-cleanup command-line tool, which finds
//! stale local branches and helps delete them.

use anyhow::{Context, Result};
use clap::Parser;
use cleanup_cli::cli::{self, handle_cli};
use cleanup_core::{CancellationToken, print_muted};
use cleanup_core::consts::EXITING_MESSAGE;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
  // Parse CLI arguments using the derive-based implementation
  let cmd = cli::Cli::parse();

  // Set up tracing based on verbosity level
  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: info, warnings, and errors
    2 => tracing::Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => tracing::Level::TRACE, // -vvv or more: trace and everything else
  };

  // Diagnostics go to stderr so they never interleave with the branch table
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  let cancel = CancellationToken::new();
  install_interrupt_handler(cancel.clone())?;

  handle_cli(cmd, &cancel)
}

/// Exit quietly on SIGINT/SIGTERM.
///
/// A line-mode prompt keeps blocking on stdin after the signal, so the
/// process exits from the handler once the token is marked.
fn install_interrupt_handler(cancel: CancellationToken) -> Result<()> {
  ctrlc::set_handler(move || {
    cancel.cancel();
    println!();
    print_muted(EXITING_MESSAGE);
    std::process::exit(0);
  })
  .context("Failed to install interrupt handler")
}
