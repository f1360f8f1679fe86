//! # Git Collaborator
//!
//! The only way the rest of the crate talks to git. [`GitRunner`] runs one
//! git subcommand and captures its trimmed stdout; the free functions below
//! each wrap exactly one query or mutation and decide how its failure is
//! surfaced (propagated, failed open, or failed closed).

use std::path::PathBuf;
use std::process::Command;

use chrono::DateTime;
use tracing::{debug, trace};

use crate::branch::{BranchRef, LastCommit, UserIdentity};
use crate::consts;
use crate::error::GitCommandError;

/// Runs git subcommands synchronously.
///
/// Implementations return the trimmed stdout on a zero exit status and a
/// [`GitCommandError`] otherwise.
pub trait GitRunner {
  fn run(&self, args: &[&str]) -> Result<String, GitCommandError>;
}

/// [`GitRunner`] that spawns the git executable inside a repository.
#[derive(Debug, Clone)]
pub struct SystemGit {
  repo_path: PathBuf,
}

impl SystemGit {
  pub fn new(repo_path: impl Into<PathBuf>) -> Self {
    Self {
      repo_path: repo_path.into(),
    }
  }
}

impl GitRunner for SystemGit {
  fn run(&self, args: &[&str]) -> Result<String, GitCommandError> {
    let command = format_command(args);
    trace!(command = %command, repo = %self.repo_path.display(), "Running git command");

    let output = Command::new(consts::GIT_EXECUTABLE)
      .args(args)
      .current_dir(&self.repo_path)
      .output()
      .map_err(|source| GitCommandError::Spawn {
        command: command.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(GitCommandError::Failed {
        command,
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Render an argument list the way a user would type it.
pub fn format_command(args: &[&str]) -> String {
  let mut command = String::from("git");
  for arg in args {
    command.push(' ');
    command.push_str(arg);
  }
  command
}

/// How `git branch` should delete a branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
  /// `git branch -D`: deletes even when the branch is unmerged.
  #[default]
  Force,
  /// `git branch -d`: refuses to delete unmerged branches.
  Safe,
}

impl DeleteMode {
  const fn flag(self) -> &'static str {
    match self {
      Self::Force => "-D",
      Self::Safe => "-d",
    }
  }
}

// `lstrip=2` rather than `short`: a tag named like a branch turns `short` into `heads/<name>`.
const BRANCH_FORMAT: &str = "--format=%(refname:lstrip=2)%09%(authorname)%09%(authoremail)";

/// List every local branch with its tip author, most recently committed first.
pub fn list_local_branches(git: &dyn GitRunner) -> Result<Vec<BranchRef>, GitCommandError> {
  let output = git.run(&["for-each-ref", "--sort=-committerdate", BRANCH_FORMAT, "refs/heads/"])?;

  Ok(
    output
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(parse_branch_line)
      .collect(),
  )
}

fn parse_branch_line(line: &str) -> BranchRef {
  let mut fields = line.split('\t');
  let name = fields.next().unwrap_or_default().to_string();
  let author_name = fields.next().unwrap_or_default().to_string();
  let author_email = fields
    .next()
    .unwrap_or_default()
    .trim_start_matches('<')
    .trim_end_matches('>')
    .to_string();

  BranchRef {
    name,
    author_name,
    author_email,
  }
}

/// Name of the checked-out branch, or `None` on a detached HEAD.
pub fn current_branch(git: &dyn GitRunner) -> Result<Option<String>, GitCommandError> {
  let name = git.run(&["branch", "--show-current"])?;
  Ok(if name.is_empty() { None } else { Some(name) })
}

/// The configured `user.name` / `user.email`.
///
/// Unset or unreadable values become empty strings rather than errors.
pub fn user_identity(git: &dyn GitRunner) -> UserIdentity {
  let lookup = |key: &str| match git.run(&["config", key]) {
    Ok(value) => value,
    Err(e) => {
      debug!(key, error = %e, "Git identity lookup failed, treating as unset");
      String::new()
    }
  };

  UserIdentity {
    name: lookup("user.name"),
    email: lookup("user.email"),
  }
}

/// Hash and committer date of the tip of `branch`.
pub fn last_commit(git: &dyn GitRunner, branch: &str) -> Result<LastCommit, GitCommandError> {
  let args = ["log", "-1", "--format=%H%n%cI", branch, "--"];
  let output = git.run(&args)?;

  let mut lines = output.lines();
  let (Some(hash), Some(date)) = (lines.next(), lines.next()) else {
    return Err(GitCommandError::Parse {
      command: format_command(&args),
      detail: format!("expected hash and date, got {output:?}"),
    });
  };

  let date = DateTime::parse_from_rfc3339(date.trim()).map_err(|e| GitCommandError::Parse {
    command: format_command(&args),
    detail: format!("invalid commit date {date:?}: {e}"),
  })?;

  Ok(LastCommit {
    hash: hash.trim().to_string(),
    date,
  })
}

/// Whether the tip of `branch` is an ancestor of `reference`.
///
/// Any failure, including an unknown branch, counts as "not merged".
pub fn is_merged(git: &dyn GitRunner, branch: &str, reference: &str) -> bool {
  match git.run(&["merge-base", "--is-ancestor", branch, reference]) {
    Ok(_) => true,
    Err(e) => {
      trace!(branch, reference, error = %e, "Ancestry check failed");
      false
    }
  }
}

/// Count of commits in `<reference>..<branch>`.
///
/// Any failure yields 0.
pub fn commits_behind_main(git: &dyn GitRunner, branch: &str, reference: &str) -> u64 {
  let range = format!("{reference}..{branch}");
  match git.run(&["rev-list", "--count", &range]) {
    Ok(count) => count.trim().parse().unwrap_or_else(|e| {
      debug!(branch, count = %count, error = %e, "Unparseable rev-list count");
      0
    }),
    Err(e) => {
      debug!(branch, reference, error = %e, "Divergence count failed");
      0
    }
  }
}

/// Delete a local branch.
pub fn delete_branch(git: &dyn GitRunner, branch: &str, mode: DeleteMode) -> Result<(), GitCommandError> {
  git.run(&["branch", mode.flag(), branch]).map(|_| ())
}
