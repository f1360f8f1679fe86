//! In-memory fakes for the git and prompt seams.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::io;

use chrono::DateTime;

use crate::branch::BranchInfo;
use crate::error::{GitCommandError, PromptError};
use crate::git::{GitRunner, format_command};
use crate::prompts::{Prompter, SelectionValidator, TextValidator};

/// [`GitRunner`] answering from a table keyed on the full command line.
/// Unknown commands fail like a non-zero git exit.
#[derive(Default)]
pub struct FakeGit {
  responses: HashMap<String, Result<String, String>>,
  calls: RefCell<Vec<String>>,
}

impl FakeGit {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn respond(mut self, args: &[&str], stdout: &str) -> Self {
    self.responses.insert(format_command(args), Ok(stdout.trim().to_string()));
    self
  }

  pub fn fail(mut self, args: &[&str], stderr: &str) -> Self {
    self.responses.insert(format_command(args), Err(stderr.to_string()));
    self
  }

  /// Every command run so far, in order.
  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().clone()
  }
}

impl GitRunner for FakeGit {
  fn run(&self, args: &[&str]) -> Result<String, GitCommandError> {
    let command = format_command(args);
    self.calls.borrow_mut().push(command.clone());

    match self.responses.get(&command) {
      Some(Ok(stdout)) => Ok(stdout.clone()),
      Some(Err(stderr)) => Err(GitCommandError::Failed {
        command,
        code: Some(1),
        stderr: stderr.clone(),
      }),
      None => Err(GitCommandError::Failed {
        command,
        code: Some(128),
        stderr: String::new(),
      }),
    }
  }
}

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Answer {
  Select(usize),
  MultiSelect(Vec<usize>),
  Text(&'static str),
  /// The terminal fails instead of answering.
  Broken,
}

/// [`Prompter`] that replays answers in order and behaves like a user who
/// gives up (interrupt) once the script runs out.
///
/// Validators are applied exactly as a terminal would: a rejected answer is
/// recorded and the next scripted answer is tried.
#[derive(Default)]
pub struct ScriptedPrompter {
  answers: VecDeque<Answer>,
  selects: Vec<(String, Vec<String>)>,
  multi_selects: Vec<Vec<String>>,
  inputs: Vec<String>,
  rejections: Vec<String>,
}

impl ScriptedPrompter {
  pub fn new(answers: Vec<Answer>) -> Self {
    Self {
      answers: answers.into(),
      ..Self::default()
    }
  }

  pub fn selects(&self) -> &[(String, Vec<String>)] {
    &self.selects
  }

  pub fn multi_selects(&self) -> &[Vec<String>] {
    &self.multi_selects
  }

  /// Prompts shown for free-text input.
  pub fn inputs(&self) -> Vec<String> {
    self.inputs.clone()
  }

  /// Validation messages shown before each re-prompt.
  pub fn rejections(&self) -> Vec<String> {
    self.rejections.clone()
  }

  fn next(&mut self) -> Result<Answer, PromptError> {
    match self.answers.pop_front() {
      Some(Answer::Broken) => Err(PromptError::Io(io::Error::other("terminal went away"))),
      Some(answer) => Ok(answer),
      None => Err(PromptError::Interrupted),
    }
  }
}

impl Prompter for ScriptedPrompter {
  fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool, PromptError> {
    panic!("unexpected confirm prompt: {prompt}");
  }

  fn select(&mut self, prompt: &str, items: &[String], _default: usize) -> Result<usize, PromptError> {
    self.selects.push((prompt.to_string(), items.to_vec()));
    match self.next()? {
      Answer::Select(index) => Ok(index),
      other => panic!("expected a select answer, got {other:?}"),
    }
  }

  fn multi_select(
    &mut self,
    _prompt: &str,
    items: &[String],
    validate: SelectionValidator<'_>,
  ) -> Result<Vec<usize>, PromptError> {
    self.multi_selects.push(items.to_vec());
    loop {
      let Answer::MultiSelect(chosen) = self.next()? else {
        panic!("expected a multi-select answer");
      };
      match validate(&chosen) {
        Ok(()) => return Ok(chosen),
        Err(message) => self.rejections.push(message),
      }
    }
  }

  fn input(&mut self, prompt: &str, validate: TextValidator<'_>) -> Result<String, PromptError> {
    self.inputs.push(prompt.to_string());
    loop {
      let Answer::Text(text) = self.next()? else {
        panic!("expected a text answer");
      };
      match validate(text) {
        Ok(()) => return Ok(text.to_string()),
        Err(message) => self.rejections.push(message),
      }
    }
  }
}

/// A stale, unmerged, not-current branch named `name`.
pub fn stale_branch(name: &str) -> BranchInfo {
  BranchInfo {
    name: name.to_string(),
    last_commit_date: DateTime::parse_from_rfc3339("2023-01-01T00:00:00+00:00").expect("valid date"),
    last_commit_hash: Some(format!("{name}-hash")),
    is_merged: false,
    commits_behind_main: 1,
    is_stale: true,
    is_current: false,
  }
}
