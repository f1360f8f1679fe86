//! # Output Formatting
//!
//! Colored, emoji-prefixed helpers for user-facing messages, plus the
//! formatters used by the branch table and the deletion workflow.

use owo_colors::{OwoColorize, Stream, Style};

/// Apply `style` when stdout supports colors (honouring `--colors`).
fn paint(text: &str, style: Style) -> String {
  text
    .if_supports_color(Stream::Stdout, |t| t.style(style))
    .to_string()
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// A success line: green check mark and message
pub fn success_line(message: &str) -> String {
  let check = get_emoji_or_default("white_check_mark", "✓");
  format!("{} {}", paint(&check, Style::new().green().bold()), paint(message, Style::new().green()))
}

/// An error line: red cross and message
pub fn error_line(message: &str) -> String {
  let cross = get_emoji_or_default("x", "✗");
  format!("{} {}", paint(&cross, Style::new().red().bold()), paint(message, Style::new().red()))
}

/// A warning line: yellow warning sign and message
pub fn warning_line(message: &str) -> String {
  let warning = get_emoji_or_default("warning", "⚠");
  format!(
    "{} {}",
    paint(&warning, Style::new().yellow().bold()),
    paint(message, Style::new().yellow())
  )
}

/// An info line: magnifier and blue message
pub fn info_line(message: &str) -> String {
  let info = get_emoji_or_default("mag", "ℹ");
  format!("{} {}", paint(&info, Style::new().blue().bold()), paint(message, Style::new().blue()))
}

/// A celebration block, padded by blank lines
pub fn celebration_line(message: &str) -> String {
  let tada = get_emoji_or_default("tada", "*");
  format!("\n{} {}\n", tada, paint(message, Style::new().green()))
}

/// Print a warning message
pub fn print_warning(message: &str) {
  println!("{}", warning_line(message));
}

/// Print an info message
pub fn print_info(message: &str) {
  println!("{}", info_line(message));
}

/// Print a dimmed status line
pub fn print_muted(message: &str) {
  println!("{}", paint(message, Style::new().bright_black()));
}

/// Format a branch name, marking the checked-out branch
pub fn format_branch_name(name: &str, is_current: bool) -> String {
  if is_current {
    paint(&format!("* {name}"), Style::new().yellow())
  } else {
    name.to_string()
  }
}

/// Format a merge status as `Yes` / `No`
pub fn format_merged(is_merged: bool) -> String {
  if is_merged {
    paint("Yes", Style::new().green())
  } else {
    paint("No", Style::new().blue())
  }
}

/// Format the literal the user has to type to confirm deletion
pub fn format_token(token: &str) -> String {
  paint(token, Style::new().red())
}
