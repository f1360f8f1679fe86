//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for git-cleanup.

pub mod list;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cleanup_core::CancellationToken;

/// Controls when colored output is used
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

/// Top-level CLI command for git-cleanup
#[derive(Parser)]
#[command(name = "git-cleanup")]
#[command(display_name = "🧹 Git Cleanup")]
#[command(about = "CLI tool to clean up stale git branches")]
#[command(
  long_about = "Finds local branches whose last commit is older than a threshold and\n\
        walks you through deleting them.\n\n\
        Branches are compared against 'main' for merge status and divergence."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    global = true,
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    global = true,
    ignore_case = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Run as if started in PATH instead of the current directory
  #[arg(short = 'C', long = "repo", value_name = "PATH", global = true)]
  pub repo: Option<PathBuf>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for git-cleanup
#[derive(Subcommand)]
pub enum Commands {
  /// List stale branches and optionally delete them
  #[command(long_about = "List local branches with no commits in the last N days.\n\n\
            The table shows each branch's last commit date, whether it is merged\n\
            into main and how many commits it carries that main does not.\n\
            Afterwards you can choose branches to delete; deletion always\n\
            requires typing 'delete' to confirm.")]
  #[command(alias = "ls")]
  List(list::ListArgs),
}

/// Handle the parsed CLI
pub fn handle_cli(cli: Cli, cancel: &CancellationToken) -> Result<()> {
  // Set global color override based on --colors argument
  match cli.colors {
    ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
    ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
    ColorMode::Auto => {
      // Let owo_colors use its default auto-detection
    }
  }

  let repo = resolve_repo_path(cli.repo)?;

  match cli.command {
    Commands::List(list) => list::handle_list_command(list, &repo, cancel),
  }
}

/// Pick the repository directory, defaulting to the current directory.
fn resolve_repo_path(repo: Option<PathBuf>) -> Result<PathBuf> {
  let path = match repo {
    Some(path) => path,
    None => std::env::current_dir().context("Failed to determine the current directory")?,
  };

  if !path.is_dir() {
    bail!("Repository path does not exist: {}", path.display());
  }

  Ok(path)
}
