//! # Error Types
//!
//! Typed failures produced by the git collaborator, the analyzer and the
//! prompt layer. The CLI wraps these in `anyhow` at its boundary.

use std::io;

use thiserror::Error;

/// Failure of a single external git invocation.
#[derive(Debug, Error)]
pub enum GitCommandError {
  /// The git executable could not be launched at all.
  #[error("Error running git command: {command}: {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  /// Git ran but exited with a non-zero status.
  #[error("Error running git command: {command}{}", format_stderr(.stderr))]
  Failed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  /// Git succeeded but printed something we could not interpret.
  #[error("Unexpected output from git command: {command}: {detail}")]
  Parse { command: String, detail: String },
}

impl GitCommandError {
  /// The command line that was attempted, e.g. `git branch -D foo`.
  pub fn command(&self) -> &str {
    match self {
      Self::Spawn { command, .. } | Self::Failed { command, .. } | Self::Parse { command, .. } => command,
    }
  }
}

fn format_stderr(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(" ({stderr})")
  }
}

/// Failures that abort a whole analysis run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
  /// One of the run-wide queries (branch listing, current branch) failed.
  #[error(transparent)]
  Git(#[from] GitCommandError),

  /// The cancellation token fired while branches were being analyzed.
  #[error("Branch analysis was cancelled")]
  Cancelled,
}

/// Why a branch was left out of the analysis result.
#[derive(Debug, Error)]
pub enum SkipReason {
  /// The tip commit could not be resolved.
  #[error("failed to look up last commit: {0}")]
  LookupFailed(#[source] GitCommandError),

  /// The tip commit is newer than the staleness cutoff.
  #[error("last commit is newer than the staleness cutoff")]
  NotStale,

  /// Only merged branches were requested and this one is not merged.
  #[error("branch is not merged into the reference branch")]
  NotMerged,

  /// Only the user's own branches were requested and the author differs.
  #[error("branch was not authored by the current user")]
  NotAuthoredByUser,
}

/// Failure of an interactive prompt.
#[derive(Debug, Error)]
pub enum PromptError {
  /// The user aborted the prompt (Ctrl-C, closed input).
  #[error("Prompt was interrupted")]
  Interrupted,

  /// The terminal could not be read or written.
  #[error("Prompt failed: {0}")]
  Io(#[from] io::Error),
}
