//! # Branch Analyzer
//!
//! Turns the repository's local branches into the list of stale
//! [`BranchInfo`] records shown to the user.
//!
//! Run-wide facts (branch list with authors, current branch, user identity)
//! are fetched once. Each branch is then analyzed on its own: a failure on
//! one branch skips that branch and never aborts the run. Cheap checks come
//! first so that fresh branches never pay for the ancestry and divergence
//! queries.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::branch::{BranchInfo, BranchRef, UserIdentity};
use crate::cancel::CancellationToken;
use crate::consts::{DEFAULT_STALE_DAYS, REFERENCE_BRANCH, SECONDS_PER_DAY};
use crate::error::{AnalyzeError, SkipReason};
use crate::git::{self, GitRunner};

/// Filters for a single analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
  /// A branch is stale when its tip is older than this many days.
  pub stale_days: u32,
  /// Keep only branches merged into the reference branch.
  pub merged_only: bool,
  /// Keep only branches authored by the configured git user.
  pub my_branches_only: bool,
}

impl Default for AnalyzeOptions {
  fn default() -> Self {
    Self {
      stale_days: DEFAULT_STALE_DAYS,
      merged_only: false,
      my_branches_only: false,
    }
  }
}

impl AnalyzeOptions {
  /// Human-readable name of the branch population these filters select.
  pub const fn describe(&self) -> &'static str {
    match (self.my_branches_only, self.merged_only) {
      (true, true) => "your merged branches",
      (true, false) => "your branches",
      (false, true) => "merged branches",
      (false, false) => "branches",
    }
  }
}

/// Context shared by every per-branch analysis in one run.
struct RunContext {
  cutoff: DateTime<Utc>,
  current: Option<String>,
  identity: Option<UserIdentity>,
}

/// Analyzes local branches through a [`GitRunner`].
pub struct BranchAnalyzer<'a> {
  git: &'a dyn GitRunner,
  reference: String,
  now: Option<DateTime<Utc>>,
  cancel: CancellationToken,
}

impl<'a> BranchAnalyzer<'a> {
  pub fn new(git: &'a dyn GitRunner) -> Self {
    Self {
      git,
      reference: REFERENCE_BRANCH.to_string(),
      now: None,
      cancel: CancellationToken::new(),
    }
  }

  /// Measure merge status and divergence against `reference` instead of `main`.
  pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
    self.reference = reference.into();
    self
  }

  /// Pin "now" for the staleness cutoff.
  pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
    self.now = Some(now);
    self
  }

  pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }

  /// Return the stale branches that pass `options`, most recently committed
  /// first.
  pub fn analyze(&self, options: &AnalyzeOptions) -> Result<Vec<BranchInfo>, AnalyzeError> {
    let refs = git::list_local_branches(self.git)?;
    let current = git::current_branch(self.git)?;
    let identity = options.my_branches_only.then(|| git::user_identity(self.git));

    let now = self.now.unwrap_or_else(Utc::now);
    let ctx = RunContext {
      cutoff: now
        .checked_sub_signed(Duration::seconds(i64::from(options.stale_days) * SECONDS_PER_DAY))
        .unwrap_or(DateTime::<Utc>::MIN_UTC),
      current,
      identity,
    };

    info!(
      branches = refs.len(),
      stale_days = options.stale_days,
      merged_only = options.merged_only,
      my_branches_only = options.my_branches_only,
      "Analyzing branches"
    );

    let mut stale = Vec::new();
    for branch in &refs {
      if self.cancel.is_cancelled() {
        return Err(AnalyzeError::Cancelled);
      }

      match self.analyze_branch(branch, options, &ctx) {
        Ok(info) => stale.push(info),
        Err(SkipReason::LookupFailed(e)) => {
          warn!(branch = %branch.name, error = %e, "Skipping branch that could not be analyzed");
        }
        Err(reason) => debug!(branch = %branch.name, %reason, "Skipping branch"),
      }
    }

    Ok(stale)
  }

  fn analyze_branch(
    &self,
    branch: &BranchRef,
    options: &AnalyzeOptions,
    ctx: &RunContext,
  ) -> Result<BranchInfo, SkipReason> {
    let commit = git::last_commit(self.git, &branch.name).map_err(SkipReason::LookupFailed)?;

    let is_stale = commit.date < ctx.cutoff;
    if !is_stale {
      return Err(SkipReason::NotStale);
    }

    let is_merged = git::is_merged(self.git, &branch.name, &self.reference);
    if options.merged_only && !is_merged {
      return Err(SkipReason::NotMerged);
    }

    if let Some(identity) = &ctx.identity
      && !identity.matches(branch)
    {
      return Err(SkipReason::NotAuthoredByUser);
    }

    let commits_behind_main = git::commits_behind_main(self.git, &branch.name, &self.reference);

    Ok(BranchInfo {
      name: branch.name.clone(),
      last_commit_date: commit.date,
      last_commit_hash: Some(commit.hash),
      is_merged,
      commits_behind_main,
      is_stale,
      is_current: ctx.current.as_deref() == Some(branch.name.as_str()),
    })
  }
}
