//! Test utilities shared across the git-cleanup workspace
//!
//! Builds throwaway repositories with backdated commits and arbitrary authors
//! so the analyzer and the CLI can be exercised against real git.
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod git;

pub use git::{Author, GitRepoTestGuard, checkout_branch, create_branch, create_commit, days_ago, merge_no_ff};
