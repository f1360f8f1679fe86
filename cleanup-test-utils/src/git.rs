//! Git repository management for testing
//!
//! This module provides utilities for creating temporary git repositories
//! whose history has controlled dates and authors.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use git2::{BranchType, Repository, RepositoryInitOptions, Signature, Time};
use tempfile::TempDir;

/// Identity configured as `user.name` / `user.email` in every test repository.
pub const TEST_USER: Author = Author {
  name: "Cleanup Test User",
  email: "cleanup-test@example.com",
};

/// Commit author (also used as committer).
#[derive(Debug, Clone, Copy)]
pub struct Author {
  pub name: &'static str,
  pub email: &'static str,
}

/// A test guard that owns a temporary git repository whose initial branch
/// is `main` and whose local config carries [`TEST_USER`].
pub struct GitRepoTestGuard {
  /// The temporary directory containing the git repository
  pub temp_dir: TempDir,
  /// The git repository
  pub repo: Repository,
}

impl GitRepoTestGuard {
  /// Create a new test git repository
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    let repo = Repository::init_opts(temp_dir.path(), &options).expect("Failed to initialize git repository");

    let mut config = repo.config().expect("Failed to get repository config");
    config
      .set_str("user.name", TEST_USER.name)
      .expect("Failed to set user.name");
    config
      .set_str("user.email", TEST_USER.email)
      .expect("Failed to set user.email");

    assert!(
      temp_dir.path().join(".git").exists(),
      "Git repository was not properly initialized"
    );

    Self { temp_dir, repo }
  }

  /// Create a repository with one commit on `main`, `days` days old.
  pub fn with_initial_commit(days: i64) -> Self {
    let guard = Self::new();
    create_commit(&guard.repo, "README.md", "init", "Initial commit", TEST_USER, days_ago(days))
      .expect("Failed to create initial commit");
    guard
  }

  /// Get the path to the git repository
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }
}

impl Default for GitRepoTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

/// A git timestamp `days` days before now, in UTC.
pub fn days_ago(days: i64) -> Time {
  let now = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_secs() as i64)
    .unwrap_or_default();
  Time::new(now - days * 86_400, 0)
}

/// Commit `file_name` with `content` on HEAD, authored and committed by
/// `author` at `when`.
pub fn create_commit(
  repo: &Repository,
  file_name: &str,
  content: &str,
  message: &str,
  author: Author,
  when: Time,
) -> Result<()> {
  let workdir = repo.workdir().context("Repository has no working directory")?;
  fs::write(workdir.join(file_name), content)?;

  let mut index = repo.index()?;
  index.add_path(Path::new(file_name))?;
  index.write()?;

  let tree_id = index.write_tree()?;
  let tree = repo.find_tree(tree_id)?;
  let signature = Signature::new(author.name, author.email, &when)?;

  match repo.head().ok().and_then(|head| head.peel_to_commit().ok()) {
    Some(parent) => repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?,
    None => repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])?,
  };

  Ok(())
}

/// Helper function to create a branch at HEAD or at `start_point`
pub fn create_branch(repo: &Repository, branch_name: &str, start_point: Option<&str>) -> Result<()> {
  let head = if let Some(start) = start_point {
    repo
      .find_branch(start, BranchType::Local)?
      .into_reference()
      .peel_to_commit()?
  } else {
    repo.head()?.peel_to_commit()?
  };

  repo.branch(branch_name, &head, false)?;
  Ok(())
}

/// Helper function to checkout a branch
pub fn checkout_branch(repo: &Repository, branch_name: &str) -> Result<()> {
  let obj = repo
    .revparse_single(&format!("refs/heads/{branch_name}"))?
    .peel_to_commit()?;

  let mut checkout = git2::build::CheckoutBuilder::new();
  checkout.force();
  repo.checkout_tree(&obj.into_object(), Some(&mut checkout))?;
  repo.set_head(&format!("refs/heads/{branch_name}"))?;

  Ok(())
}

/// Merge `branch` into the checked-out branch with a merge commit at `when`.
///
/// The merge keeps the checked-out branch's tree, which is all the ancestry
/// checks care about.
pub fn merge_no_ff(repo: &Repository, branch: &str, when: Time) -> Result<()> {
  let head = repo.head()?.peel_to_commit()?;
  let other = repo
    .find_branch(branch, BranchType::Local)?
    .into_reference()
    .peel_to_commit()?;

  let signature = Signature::new(TEST_USER.name, TEST_USER.email, &when)?;
  let message = format!("Merge branch '{branch}'");
  repo.commit(
    Some("HEAD"),
    &signature,
    &signature,
    &message,
    &head.tree()?,
    &[&head, &other],
  )?;

  Ok(())
}
