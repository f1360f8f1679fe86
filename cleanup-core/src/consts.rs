//! Constants shared by the analyzer, the deletion workflow and the CLI.

/// Branch that merge status and divergence are measured against.
pub const REFERENCE_BRANCH: &str = "main";

/// Default age threshold, in days, after which a branch counts as stale.
pub const DEFAULT_STALE_DAYS: u32 = 30;

/// Literal the user must type before any branch is deleted.
pub const CONFIRMATION_TOKEN: &str = "delete";

/// Seconds in one staleness day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Message printed when the user aborts or the process is signalled.
pub const EXITING_MESSAGE: &str = "Exiting...";

/// Platform-specific Git executable name
#[cfg(windows)]
pub const GIT_EXECUTABLE: &str = "git.exe";

/// Platform-specific Git executable name
#[cfg(not(windows))]
pub const GIT_EXECUTABLE: &str = "git";
