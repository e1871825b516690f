//! Answer grading. No partial credit and no fuzzy matching.

use crate::domain::QuestionKind;

/// True if `submitted` matches `reference` under the rule for `kind`.
///
/// Both sides are trimmed first. Subjective answers compare case-insensitively;
/// every other kind requires an exact match.
pub fn judge(submitted: &str, reference: &str, kind: &QuestionKind) -> bool {
  let ua = submitted.trim();
  let ca = reference.trim();
  match kind {
    QuestionKind::Subjective => ua.to_lowercase() == ca.to_lowercase(),
    QuestionKind::MultipleChoice | QuestionKind::Other(_) => ua == ca,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kind(raw: &str) -> QuestionKind {
    QuestionKind::from_cell(raw)
  }

  #[test]
  fn subjective_ignores_case() {
    assert!(judge("Yolo", "yolo", &kind("주관식")));
    assert!(judge("  YOLO ", "yolo", &kind("주관식")));
    assert!(!judge("yolo!", "yolo", &kind("주관식")));
  }

  #[test]
  fn multiple_choice_is_exact() {
    assert!(!judge("Yolo", "yolo", &kind("객관식")));
    assert!(judge(" 나 ", "나", &kind("객관식")));
  }

  #[test]
  fn unknown_kinds_fall_through_to_exact() {
    assert!(!judge("A", "a", &kind("ox")));
    assert!(judge("O", "O", &kind("")));
  }

  #[test]
  fn empty_matches_empty() {
    assert!(judge("", "", &kind("주관식")));
    assert!(judge("", "  ", &kind("객관식")));
    assert!(!judge("", "a", &kind("주관식")));
  }
}
