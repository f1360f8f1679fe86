//! # List Command
//!
//! Shows stale branches as a table and offers to delete them.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Args};
use cleanup_core::consts::{DEFAULT_STALE_DAYS, EXITING_MESSAGE};
use cleanup_core::output::{format_branch_name, format_merged};
use cleanup_core::text::pluralize;
use cleanup_core::{
  AnalyzeError, AnalyzeOptions, BranchAnalyzer, BranchInfo, CancellationToken, DeletionOutcome, DeletionWorkflow,
  GitRunner, PromptError, Prompter, SystemGit, TerminalPrompter, WorkflowOutcome, print_info,
  print_muted,
};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::info;

/// Question asked after the table is shown.
pub const DELETE_OFFER_PROMPT: &str = "Would you like to delete any of these stale branches?";
pub const NO_STALE_BRANCHES: &str = "No stale branches found.";
const NOT_A_TERMINAL: &str = "Not running in an interactive terminal; skipping deletion.";

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
  /// Number of days without commits before a branch is considered stale
  #[arg(short = 's', long = "stale-days", value_name = "DAYS", default_value_t = DEFAULT_STALE_DAYS)]
  pub stale_days: u32,

  /// Only show branches already merged into main
  #[arg(
    short = 'm',
    long = "merged",
    value_name = "BOOL",
    num_args = 0..=1,
    default_value_t = false,
    default_missing_value = "true",
    action = ArgAction::Set
  )]
  pub merged: bool,

  /// Only show branches whose last commit you authored
  #[arg(long = "my-branches")]
  pub my_branches: bool,
}

impl ListArgs {
  pub fn options(&self) -> AnalyzeOptions {
    AnalyzeOptions {
      stale_days: self.stale_days,
      merged_only: self.merged,
      my_branches_only: self.my_branches,
    }
  }
}

/// How a list run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
  NoStaleBranches,
  /// The table was shown and no deletion was attempted.
  Listed,
  Deleted(Vec<DeletionOutcome>),
  Cancelled,
}

#[derive(Tabled)]
struct StaleBranchRow {
  #[tabled(rename = "Branch")]
  branch: String,
  #[tabled(rename = "Last Commit")]
  last_commit: String,
  #[tabled(rename = "Merged")]
  merged: String,
  #[tabled(rename = "Commits Behind Main")]
  commits_behind_main: u64,
}

impl From<&BranchInfo> for StaleBranchRow {
  fn from(branch: &BranchInfo) -> Self {
    Self {
      branch: format_branch_name(&branch.name, branch.is_current),
      last_commit: branch
        .last_commit_date
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string(),
      merged: format_merged(branch.is_merged),
      commits_behind_main: branch.commits_behind_main,
    }
  }
}

/// Handle the list command
pub(crate) fn handle_list_command(args: ListArgs, repo: &Path, cancel: &CancellationToken) -> Result<()> {
  let git = SystemGit::new(repo);
  let mut prompter = TerminalPrompter::new();
  let interactive = std::io::stdin().is_terminal();

  run_list(&args.options(), &git, &mut prompter, cancel, interactive)?;
  Ok(())
}

/// The analysis banner, e.g. "Analyzing merged branches that have been stale
/// for 30 days...".
pub fn banner(options: &AnalyzeOptions) -> String {
  format!(
    "Analyzing {} that have been stale for {}...",
    options.describe(),
    pluralize("day", options.stale_days as usize, None)
  )
}

/// Render stale branches as a table.
pub fn render_table(branches: &[BranchInfo]) -> String {
  let rows: Vec<StaleBranchRow> = branches.iter().map(StaleBranchRow::from).collect();
  Table::new(rows).with(Style::sharp()).to_string()
}

/// Analyze, show the table, and run the deletion workflow if asked to.
///
/// Without an interactive terminal the table is shown and no question is
/// asked.
pub fn run_list(
  options: &AnalyzeOptions,
  git: &dyn GitRunner,
  prompter: &mut dyn Prompter,
  cancel: &CancellationToken,
  interactive: bool,
) -> Result<ListOutcome> {
  print_info(&banner(options));

  let branches = match BranchAnalyzer::new(git)
    .with_cancellation(cancel.clone())
    .analyze(options)
  {
    Ok(branches) => branches,
    Err(AnalyzeError::Cancelled) => return Ok(exiting()),
    Err(e) => return Err(e).context("Failed to analyze branches"),
  };

  if branches.is_empty() {
    print_info(NO_STALE_BRANCHES);
    return Ok(ListOutcome::NoStaleBranches);
  }

  println!("\n{}\n", render_table(&branches));

  if !interactive {
    print_info(NOT_A_TERMINAL);
    return Ok(ListOutcome::Listed);
  }

  match prompter.confirm(DELETE_OFFER_PROMPT, false) {
    Ok(true) => {}
    Ok(false) => return Ok(ListOutcome::Listed),
    Err(PromptError::Interrupted) => return Ok(exiting()),
    Err(e) => return Err(e).context("Failed to read answer"),
  }

  let outcome = DeletionWorkflow::new(git, prompter)
    .with_cancellation(cancel.clone())
    .run(&branches)
    .context("Failed to read answer")?;

  Ok(match outcome {
    WorkflowOutcome::Completed(outcomes) => {
      let failed = outcomes.iter().filter(|o| !o.is_success()).count();
      info!(deleted = outcomes.len() - failed, failed, "Deletion finished");
      ListOutcome::Deleted(outcomes)
    }
    WorkflowOutcome::NoDeletableBranches => ListOutcome::Listed,
    WorkflowOutcome::Cancelled => exiting(),
  })
}

fn exiting() -> ListOutcome {
  print_muted(EXITING_MESSAGE);
  ListOutcome::Cancelled
}
