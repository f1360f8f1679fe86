//! # Deletion Workflow
//!
//! Drives the user from "yes, delete some" to a finished batch of deletions:
//!
//! ```text
//! ChooseMethod -> InteractiveSelect | SelectAll -> TypeConfirm -> Deleting -> Done
//! ```
//!
//! The checked-out branch is filtered out before any selection is offered, so
//! it is never passed to `git branch -D`. Each deletion is attempted on its
//! own; a failure is reported and the loop moves on.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::branch::BranchInfo;
use crate::cancel::CancellationToken;
use crate::consts::CONFIRMATION_TOKEN;
use crate::error::PromptError;
use crate::git::{self, DeleteMode, GitRunner};
use crate::output::{celebration_line, error_line, format_token, success_line, warning_line};
use crate::prompts::Prompter;
use crate::text::pluralize;

pub const DELETION_METHOD_PROMPT: &str = "How would you like to delete the stale branches?";
pub const INTERACTIVE_CHOICE: &str = "📋 Interactively choose specific branches to delete";
pub const SELECT_BRANCHES_PROMPT: &str = "Select branches to delete:";
pub const SELECTION_REQUIRED: &str = "You must choose at least one branch to delete.";
pub const NO_DELETABLE_BRANCHES: &str = "No branches available for deletion (current branch cannot be deleted).";
pub const DELETION_COMPLETED: &str = "Branch deletion completed!";

/// Label for the "delete everything" choice.
pub fn delete_all_choice(count: usize) -> String {
  format!("🗑️  Delete all {count} stale branches")
}

/// Label for one branch in the multi-select.
pub fn selection_label(branch: &BranchInfo) -> String {
  let status = if branch.is_merged { "merged" } else { "not merged" };
  format!("{} ({status})", branch.name)
}

/// Accepts the confirmation literal in any letter case.
pub fn validate_confirmation(answer: &str) -> Result<(), String> {
  if answer.eq_ignore_ascii_case(CONFIRMATION_TOKEN) {
    Ok(())
  } else {
    Err(format!("You must type '{CONFIRMATION_TOKEN}' to confirm this action."))
  }
}

/// Rejects an empty multi-select answer.
pub fn validate_selection(chosen: &[usize]) -> Result<(), String> {
  if chosen.is_empty() {
    Err(SELECTION_REQUIRED.to_string())
  } else {
    Ok(())
  }
}

/// Result of one attempted deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
  pub branch: String,
  /// `Err` holds the underlying cause as displayed to the user.
  pub result: Result<(), String>,
}

impl DeletionOutcome {
  pub fn is_success(&self) -> bool {
    self.result.is_ok()
  }
}

/// How a workflow run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
  /// Every offered branch was the checked-out one; nothing was asked.
  NoDeletableBranches,
  /// The user aborted a prompt or the process was signalled.
  Cancelled,
  /// Every candidate was attempted and the completion banner was shown.
  Completed(Vec<DeletionOutcome>),
}

/// The user's answer to the method question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMethod {
  Interactive,
  All,
}

enum State {
  ChooseMethod,
  InteractiveSelect,
  SelectAll,
  TypeConfirm(Vec<String>),
  Deleting(Vec<String>),
  Done(Vec<DeletionOutcome>),
}

/// Interactive deletion of an analyzed branch set.
pub struct DeletionWorkflow<'a> {
  git: &'a dyn GitRunner,
  prompter: &'a mut dyn Prompter,
  mode: DeleteMode,
  cancel: CancellationToken,
  out: Box<dyn Write + 'a>,
}

impl<'a> DeletionWorkflow<'a> {
  pub fn new(git: &'a dyn GitRunner, prompter: &'a mut dyn Prompter) -> Self {
    Self {
      git,
      prompter,
      mode: DeleteMode::default(),
      cancel: CancellationToken::new(),
      out: Box::new(io::stdout()),
    }
  }

  pub fn with_mode(mut self, mode: DeleteMode) -> Self {
    self.mode = mode;
    self
  }

  pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }

  /// Send progress lines to `out` instead of stdout.
  pub fn with_output(mut self, out: impl Write + 'a) -> Self {
    self.out = Box::new(out);
    self
  }

  /// Run the workflow over `branches` (the full analyzed set, current branch
  /// included).
  ///
  /// A user abort ends in [`WorkflowOutcome::Cancelled`]; a terminal that can
  /// no longer be read is an error.
  pub fn run(mut self, branches: &[BranchInfo]) -> Result<WorkflowOutcome, PromptError> {
    let mut state = State::ChooseMethod;

    loop {
      let next = match self.step(state, branches) {
        Ok(next) => next,
        Err(Stop::NothingToDelete) => {
          self.say(&warning_line(NO_DELETABLE_BRANCHES));
          return Ok(WorkflowOutcome::NoDeletableBranches);
        }
        Err(Stop::Cancelled) => {
          info!("Deletion workflow cancelled");
          return Ok(WorkflowOutcome::Cancelled);
        }
        Err(Stop::Prompt(e)) => {
          warn!(error = %e, "Prompt failed, abandoning deletion");
          return Err(e);
        }
      };

      match next {
        State::Done(outcomes) => {
          self.say(&celebration_line(DELETION_COMPLETED));
          return Ok(WorkflowOutcome::Completed(outcomes));
        }
        other => state = other,
      }
    }
  }

  fn step(&mut self, state: State, branches: &[BranchInfo]) -> Result<State, Stop> {
    match state {
      State::ChooseMethod => match self.choose_method(branches.len())? {
        DeletionMethod::Interactive => Ok(State::InteractiveSelect),
        DeletionMethod::All => Ok(State::SelectAll),
      },
      State::InteractiveSelect => {
        let deletable = deletable(branches)?;
        let labels: Vec<String> = deletable.iter().map(|b| selection_label(b)).collect();
        let chosen = self
          .prompter
          .multi_select(SELECT_BRANCHES_PROMPT, &labels, &validate_selection)?;
        let names = chosen
          .into_iter()
          .filter_map(|index| deletable.get(index).map(|b| b.name.clone()))
          .collect();
        Ok(State::TypeConfirm(names))
      }
      State::SelectAll => {
        let names = deletable(branches)?.into_iter().map(|b| b.name.clone()).collect();
        Ok(State::TypeConfirm(names))
      }
      State::TypeConfirm(names) => {
        let prompt = format!(
          "This will delete {}. Type '{}' to confirm:",
          pluralize("branch", names.len(), None),
          format_token(CONFIRMATION_TOKEN)
        );
        self.prompter.input(&prompt, &validate_confirmation)?;
        Ok(State::Deleting(names))
      }
      State::Deleting(names) => self.delete_each(&names).map(State::Done),
      State::Done(outcomes) => Ok(State::Done(outcomes)),
    }
  }

  fn choose_method(&mut self, count: usize) -> Result<DeletionMethod, Stop> {
    let items = [INTERACTIVE_CHOICE.to_string(), delete_all_choice(count)];
    let choice = self.prompter.select(DELETION_METHOD_PROMPT, &items, 0)?;
    Ok(if choice == 1 {
      DeletionMethod::All
    } else {
      DeletionMethod::Interactive
    })
  }

  fn delete_each(&mut self, names: &[String]) -> Result<Vec<DeletionOutcome>, Stop> {
    self.say(&warning_line(&format!("Deleting {}...", pluralize("branch", names.len(), None))));
    self.say("");

    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
      if self.cancel.is_cancelled() {
        return Err(Stop::Cancelled);
      }

      let result = git::delete_branch(self.git, name, self.mode).map_err(|e| e.to_string());
      match &result {
        Ok(()) => self.say(&success_line(&format!("Deleted branch: {name}"))),
        Err(cause) => {
          warn!(branch = %name, error = %cause, "Branch deletion failed");
          self.say(&error_line(&format!("Failed to delete branch: {name} - {cause}")));
        }
      }

      outcomes.push(DeletionOutcome {
        branch: name.clone(),
        result,
      });
    }

    Ok(outcomes)
  }

  fn say(&mut self, line: &str) {
    if let Err(e) = writeln!(self.out, "{line}") {
      warn!(error = %e, "Failed to write workflow output");
    }
  }
}

/// Reasons the state machine stops before `Done`.
enum Stop {
  NothingToDelete,
  Cancelled,
  Prompt(PromptError),
}

impl From<PromptError> for Stop {
  fn from(error: PromptError) -> Self {
    match error {
      PromptError::Interrupted => Self::Cancelled,
      e @ PromptError::Io(_) => Self::Prompt(e),
    }
  }
}

/// Branches that may be deleted: everything except the checked-out branch.
fn deletable(branches: &[BranchInfo]) -> Result<Vec<&BranchInfo>, Stop> {
  let deletable: Vec<&BranchInfo> = branches.iter().filter(|b| !b.is_current).collect();
  if deletable.is_empty() {
    Err(Stop::NothingToDelete)
  } else {
    Ok(deletable)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{Answer, FakeGit, ScriptedPrompter, stale_branch};

  fn branches() -> Vec<BranchInfo> {
    let mut current = stale_branch("main");
    current.is_current = true;
    current.is_merged = true;
    vec![stale_branch("a"), current, stale_branch("b")]
  }

  #[test]
  fn test_select_all_deletes_everything_but_current() {
    let git = FakeGit::new()
      .respond(&["branch", "-D", "a"], "")
      .respond(&["branch", "-D", "b"], "");
    let mut prompter = ScriptedPrompter::new(vec![Answer::Select(1), Answer::Text("delete")]);

    let outcome = DeletionWorkflow::new(&git, &mut prompter).run(&branches()).expect("workflow");

    let WorkflowOutcome::Completed(outcomes) = outcome else {
      panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(DeletionOutcome::is_success));
    assert!(!git.calls().iter().any(|c| c.ends_with(" main")));
  }

  #[test]
  fn test_method_prompt_counts_every_branch() {
    let git = FakeGit::new();
    let mut prompter = ScriptedPrompter::new(vec![]);

    let outcome = DeletionWorkflow::new(&git, &mut prompter).run(&branches()).expect("workflow");

    assert_eq!(outcome, WorkflowOutcome::Cancelled);
    let (prompt, items) = &prompter.selects()[0];
    assert_eq!(prompt, DELETION_METHOD_PROMPT);
    assert_eq!(items[0], INTERACTIVE_CHOICE);
    assert_eq!(items[1], delete_all_choice(3));
  }

  #[test]
  fn test_failure_does_not_stop_the_batch() {
    owo_colors::set_override(false);
    let git = FakeGit::new()
      .fail(&["branch", "-D", "a"], "error: cannot lock ref")
      .respond(&["branch", "-D", "b"], "");
    let mut prompter = ScriptedPrompter::new(vec![Answer::Select(1), Answer::Text("DELETE")]);
    let mut out = Vec::new();

    let outcome = DeletionWorkflow::new(&git, &mut prompter)
      .with_output(&mut out)
      .run(&branches())
      .expect("workflow");

    let WorkflowOutcome::Completed(outcomes) = outcome else {
      panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].branch, "a");
    let cause = outcomes[0].result.as_ref().expect_err("a should fail");
    assert!(cause.contains("cannot lock ref"));
    assert_eq!(outcomes[1].branch, "b");
    assert!(outcomes[1].is_success());

    let printed = String::from_utf8(out).expect("utf-8 output");
    assert!(printed.contains("Deleting 2 branches..."));
    assert!(printed.contains("Failed to delete branch: a - "));
    assert!(printed.contains("cannot lock ref"));
    assert!(printed.contains("Deleted branch: b"));
    assert_eq!(printed.matches(DELETION_COMPLETED).count(), 1);
  }

  #[test]
  fn test_cancelled_run_prints_no_banner() {
    let git = FakeGit::new();
    let mut prompter = ScriptedPrompter::new(vec![Answer::Select(1)]);
    let mut out = Vec::new();

    let outcome = DeletionWorkflow::new(&git, &mut prompter)
      .with_output(&mut out)
      .run(&branches())
      .expect("workflow");

    assert_eq!(outcome, WorkflowOutcome::Cancelled);
    let printed = String::from_utf8(out).expect("utf-8 output");
    assert!(!printed.contains(DELETION_COMPLETED));
  }

  #[test]
  fn test_broken_terminal_is_an_error_not_a_cancel() {
    let git = FakeGit::new();
    let mut prompter = ScriptedPrompter::new(vec![Answer::Select(1), Answer::Broken]);

    let err = DeletionWorkflow::new(&git, &mut prompter)
      .run(&branches())
      .expect_err("terminal failure");

    assert!(matches!(err, PromptError::Io(_)));
    assert!(git.calls().is_empty());
  }

  #[test]
  fn test_interactive_offers_only_deletable_branches_with_status() {
    let git = FakeGit::new().respond(&["branch", "-D", "b"], "");
    let mut prompter = ScriptedPrompter::new(vec![
      Answer::Select(0),
      Answer::MultiSelect(vec![1]),
      Answer::Text("delete"),
    ]);

    let mut all = branches();
    all[2].is_merged = true;
    let outcome = DeletionWorkflow::new(&git, &mut prompter).run(&all).expect("workflow");

    assert_eq!(
      prompter.multi_selects()[0],
      vec!["a (not merged)".to_string(), "b (merged)".to_string()]
    );
    let WorkflowOutcome::Completed(outcomes) = outcome else {
      panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].branch, "b");
    assert_eq!(git.calls(), vec!["git branch -D b"]);
  }

  #[test]
  fn test_empty_selection_reprompts() {
    let git = FakeGit::new().respond(&["branch", "-D", "a"], "");
    let mut prompter = ScriptedPrompter::new(vec![
      Answer::Select(0),
      Answer::MultiSelect(vec![]),
      Answer::MultiSelect(vec![]),
      Answer::MultiSelect(vec![0]),
      Answer::Text("delete"),
    ]);

    let outcome = DeletionWorkflow::new(&git, &mut prompter).run(&branches()).expect("workflow");

    assert_eq!(prompter.rejections(), vec![SELECTION_REQUIRED.to_string(); 2]);
    assert!(matches!(outcome, WorkflowOutcome::Completed(ref o) if o.len() == 1));
  }

  #[test]
  fn test_empty_selection_never_proceeds() {
    let git = FakeGit::new();
    let mut prompter = ScriptedPrompter::new(vec![
      Answer::Select(0),
      Answer::MultiSelect(vec![]),
      Answer::MultiSelect(vec![]),
    ]);

    let outcome = DeletionWorkflow::new(&git, &mut prompter).run(&branches()).expect("workflow");

    assert_eq!(outcome, WorkflowOutcome::Cancelled);
    assert!(prompter.inputs().is_empty());
    assert!(git.calls().is_empty());
  }

  #[test]
  fn test_wrong_token_never_deletes() {
    let git = FakeGit::new();
    let mut prompter = ScriptedPrompter::new(vec![
      Answer::Select(1),
      Answer::Text("yes"),
      Answer::Text("delete!"),
      Answer::Text(" delete"),
      Answer::Text("y"),
    ]);

    let outcome = DeletionWorkflow::new(&git, &mut prompter).run(&branches()).expect("workflow");

    assert_eq!(outcome, WorkflowOutcome::Cancelled);
    assert_eq!(prompter.rejections().len(), 4);
    assert!(git.calls().is_empty());
  }

  #[test]
  fn test_confirmation_prompt_is_pluralised() {
    owo_colors::set_override(false);
    let git = FakeGit::new();
    let mut prompter = ScriptedPrompter::new(vec![Answer::Select(1)]);

    DeletionWorkflow::new(&git, &mut prompter).run(&branches()).expect("workflow");

    assert_eq!(
      prompter.inputs(),
      vec!["This will delete 2 branches. Type 'delete' to confirm:".to_string()]
    );
  }

  #[test]
  fn test_only_current_branch_short_circuits() {
    let mut only = stale_branch("main");
    only.is_current = true;

    for method in [0, 1] {
      let git = FakeGit::new();
      let mut prompter = ScriptedPrompter::new(vec![Answer::Select(method)]);

      let outcome = DeletionWorkflow::new(&git, &mut prompter)
        .run(std::slice::from_ref(&only))
        .expect("workflow");

      assert_eq!(outcome, WorkflowOutcome::NoDeletableBranches);
      assert!(prompter.multi_selects().is_empty());
      assert!(prompter.inputs().is_empty());
      assert!(git.calls().is_empty());
    }
  }

  #[test]
  fn test_cancellation_stops_before_deleting() {
    let git = FakeGit::new()
      .respond(&["branch", "-D", "a"], "")
      .respond(&["branch", "-D", "b"], "");
    let mut prompter = ScriptedPrompter::new(vec![Answer::Select(1), Answer::Text("delete")]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = DeletionWorkflow::new(&git, &mut prompter)
      .with_cancellation(cancel)
      .run(&branches())
      .expect("workflow");

    assert_eq!(outcome, WorkflowOutcome::Cancelled);
    assert!(git.calls().is_empty());
  }

  #[test]
  fn test_safe_mode_uses_lowercase_flag() {
    let git = FakeGit::new()
      .respond(&["branch", "-d", "a"], "")
      .fail(&["branch", "-d", "b"], "error: the branch 'b' is not fully merged");
    let mut prompter = ScriptedPrompter::new(vec![Answer::Select(1), Answer::Text("delete")]);

    let outcome = DeletionWorkflow::new(&git, &mut prompter)
      .with_mode(DeleteMode::Safe)
      .run(&branches())
      .expect("workflow");

    let WorkflowOutcome::Completed(outcomes) = outcome else {
      panic!("expected completion, got {outcome:?}");
    };
    assert!(outcomes[0].is_success());
    assert!(!outcomes[1].is_success());
  }

  #[test]
  fn test_validate_confirmation_is_case_insensitive() {
    assert!(validate_confirmation("delete").is_ok());
    assert!(validate_confirmation("DeLeTe").is_ok());
    assert!(validate_confirmation("").is_err());
    assert!(validate_confirmation("no").is_err());
  }
}
