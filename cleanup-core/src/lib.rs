//! # Git Cleanup Core Library
//!
//! Finds stale local branches and walks the user through deleting them. All
//! git access goes through the [`GitRunner`] seam and all interaction through
//! the [`Prompter`] seam, so both halves can run against fakes.

pub mod analyzer;
pub mod branch;
pub mod cancel;
pub mod consts;
pub mod deletion;
pub mod error;
pub mod git;
pub mod output;
pub mod prompts;
pub mod text;

#[cfg(test)]
mod test_support;

pub use analyzer::{AnalyzeOptions, BranchAnalyzer};
pub use branch::{BranchInfo, BranchRef, LastCommit, UserIdentity};
pub use cancel::CancellationToken;
pub use deletion::{DeletionOutcome, DeletionWorkflow, WorkflowOutcome};
pub use error::{AnalyzeError, GitCommandError, PromptError, SkipReason};
pub use git::{DeleteMode, GitRunner, SystemGit};
pub use output::{print_info, print_muted, print_warning};
pub use prompts::{Prompter, TerminalPrompter};
