//! # Git Cleanup CLI Library
//!
//! Command-line surface for the git-cleanup tool: argument parsing and the
//! `list` command that ties the branch analyzer to the deletion workflow.

pub mod cli;
