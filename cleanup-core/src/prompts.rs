//! # Prompts Module
//!
//! The interactive surface used by the deletion workflow. [`Prompter`] is the
//! seam; [`TerminalPrompter`] is the dialoguer-backed implementation with the
//! shared color theme.

use std::io;

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::PromptError;
use crate::output::print_warning;

/// Validation callback for multi-select answers. `Err` carries the message
/// shown before re-prompting.
pub type SelectionValidator<'a> = &'a dyn Fn(&[usize]) -> Result<(), String>;

/// Validation callback for free-text answers.
pub type TextValidator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Interactive prompts. Every method blocks until the user answers.
///
/// Validators never cause a method to return: a rejected answer re-prompts.
/// [`PromptError::Interrupted`] means the user aborted.
pub trait Prompter {
  /// Yes/no question.
  fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError>;

  /// Pick exactly one item; returns its index.
  fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize, PromptError>;

  /// Pick any number of items; returns their indices in item order.
  fn multi_select(
    &mut self,
    prompt: &str,
    items: &[String],
    validate: SelectionValidator<'_>,
  ) -> Result<Vec<usize>, PromptError>;

  /// Free-text input.
  fn input(&mut self, prompt: &str, validate: TextValidator<'_>) -> Result<String, PromptError>;
}

/// Returns a dialoguer theme matching the tool's color palette.
///
/// Features:
/// - Cyan bold prompt text
/// - Green `❯` prefix on active item
/// - Green highlight on active item text
pub fn cleanup_theme() -> ColorfulTheme {
  ColorfulTheme {
    prompt_style: Style::new().cyan().bold(),
    active_item_prefix: Style::new().green().apply_to("❯ ".to_string()),
    active_item_style: Style::new().green(),
    ..ColorfulTheme::default()
  }
}

/// [`Prompter`] that talks to the user's terminal through dialoguer.
pub struct TerminalPrompter {
  theme: ColorfulTheme,
}

impl TerminalPrompter {
  pub fn new() -> Self {
    Self { theme: cleanup_theme() }
  }
}

impl Default for TerminalPrompter {
  fn default() -> Self {
    Self::new()
  }
}

impl Prompter for TerminalPrompter {
  fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
    Confirm::with_theme(&self.theme)
      .with_prompt(prompt)
      .default(default)
      .interact()
      .map_err(map_dialoguer_error)
  }

  fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize, PromptError> {
    Select::with_theme(&self.theme)
      .with_prompt(prompt)
      .items(items)
      .default(default)
      .interact()
      .map_err(map_dialoguer_error)
  }

  fn multi_select(
    &mut self,
    prompt: &str,
    items: &[String],
    validate: SelectionValidator<'_>,
  ) -> Result<Vec<usize>, PromptError> {
    // dialoguer's MultiSelect has no validation hook, so re-prompt by hand.
    loop {
      let chosen = MultiSelect::with_theme(&self.theme)
        .with_prompt(prompt)
        .items(items)
        .interact()
        .map_err(map_dialoguer_error)?;

      match validate(&chosen) {
        Ok(()) => return Ok(chosen),
        Err(message) => print_warning(&message),
      }
    }
  }

  fn input(&mut self, prompt: &str, validate: TextValidator<'_>) -> Result<String, PromptError> {
    Input::<String>::with_theme(&self.theme)
      .with_prompt(prompt)
      .validate_with(|answer: &String| validate(answer.as_str()))
      .interact_text()
      .map_err(map_dialoguer_error)
  }
}

/// Translate dialoguer failures into [`PromptError`].
///
/// console reports Ctrl-C inside a prompt as an `Interrupted` I/O error.
fn map_dialoguer_error(error: dialoguer::Error) -> PromptError {
  let dialoguer::Error::IO(io_error) = error;
  match io_error.kind() {
    io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => PromptError::Interrupted,
    _ => PromptError::Io(io_error),
  }
}
