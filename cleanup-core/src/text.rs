//! Small text helpers used when composing user-facing messages.

/// Prefix `word` with `count`, pluralising with simple English rules.
///
/// `plural_form` overrides the rules for irregular words.
///
/// ```
/// use cleanup_core::text::pluralize;
///
/// assert_eq!(pluralize("branch", 1, None), "1 branch");
/// assert_eq!(pluralize("branch", 3, None), "3 branches");
/// assert_eq!(pluralize("day", 30, None), "30 days");
/// ```
pub fn pluralize(word: &str, count: usize, plural_form: Option<&str>) -> String {
  if count == 1 {
    return format!("{count} {word}");
  }

  if let Some(plural) = plural_form {
    return format!("{count} {plural}");
  }

  let plural = if ["ch", "sh", "s", "x", "z"].iter().any(|suffix| word.ends_with(suffix)) {
    format!("{word}es")
  } else if let Some(stem) = word.strip_suffix('y')
    && let Some(before_y) = stem.chars().last()
    && !"aeiou".contains(before_y)
  {
    format!("{stem}ies")
  } else {
    format!("{word}s")
  };

  format!("{count} {plural}")
}
