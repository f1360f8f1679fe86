//! Branch domain models produced by the analyzer and consumed by the
//! deletion workflow and the list table.

use chrono::{DateTime, FixedOffset};

/// A local branch as listed by the batch ref query, before any analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
  /// Short branch name, e.g. `feature/login`.
  pub name: String,
  /// Author display name of the tip commit.
  pub author_name: String,
  /// Author email of the tip commit, without angle brackets.
  pub author_email: String,
}

/// The identity configured for the invoking user (`user.name` / `user.email`).
///
/// Either field may be empty when git has no value configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
  pub name: String,
  pub email: String,
}

impl UserIdentity {
  /// Whether `branch` was authored by this user.
  ///
  /// A name match or an email match is enough. An empty configured value
  /// never matches, so an unset `user.email` cannot pair with a branch whose
  /// recorded email is also empty.
  pub fn matches(&self, branch: &BranchRef) -> bool {
    let name_matches = !self.name.is_empty() && self.name == branch.author_name;
    let email_matches = !self.email.is_empty() && self.email == branch.author_email;
    name_matches || email_matches
  }
}

/// Tip commit of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCommit {
  pub hash: String,
  pub date: DateTime<FixedOffset>,
}

/// A fully analyzed stale branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
  pub name: String,
  pub last_commit_date: DateTime<FixedOffset>,
  pub last_commit_hash: Option<String>,
  /// The tip is an ancestor of the reference branch.
  pub is_merged: bool,
  /// Result of `rev-list --count <reference>..<branch>`.
  ///
  /// Despite the name this counts commits on the branch that the reference
  /// branch does not have. Displays and tests depend on this direction.
  pub commits_behind_main: u64,
  pub is_stale: bool,
  /// The branch is currently checked out.
  pub is_current: bool,
}
