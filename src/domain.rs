//! Domain models: questions, question kinds, result tiers, and graded results.

use serde::Serialize;

/// Raw `type` cell values recognised in the question source.
pub const KIND_SUBJECTIVE: &str = "주관식";
pub const KIND_MULTIPLE_CHOICE: &str = "객관식";

/// How a question is answered and graded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  /// Free text, graded case-insensitively.
  Subjective,
  /// One of up to three choices, graded exactly.
  MultipleChoice,
  /// Unrecognised `type` value; rendered as free text and graded exactly.
  Other(String),
}

impl QuestionKind {
  pub fn from_cell(raw: &str) -> Self {
    match raw.trim() {
      KIND_SUBJECTIVE => QuestionKind::Subjective,
      KIND_MULTIPLE_CHOICE => QuestionKind::MultipleChoice,
      other => QuestionKind::Other(other.to_string()),
    }
  }
}

impl Default for QuestionKind {
  fn default() -> Self { QuestionKind::Other(String::new()) }
}

/// One row of the question source, cleaned once at load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Question {
  /// Kept in string form; ordering uses `sort_key`.
  pub id: String,
  pub question: String,
  pub kind: QuestionKind,
  /// Filename relative to the asset directory. `None` when the cell is blank.
  pub image: Option<String>,
  /// `[choice1, choice2, choice3]`, empty strings kept as-is.
  pub choices: [String; 3],
  pub answer: String,
}

/// Sort position for ids that do not parse as integers.
pub const UNPARSABLE_ID_KEY: i64 = i64::MAX;

impl Question {
  pub fn sort_key(&self) -> i64 {
    self.id.parse::<i64>().unwrap_or(UNPARSABLE_ID_KEY)
  }

  /// Choices as shown to the user: empty entries dropped, order kept.
  pub fn visible_choices(&self) -> Vec<String> {
    self.choices.iter().filter(|c| !c.is_empty()).cloned().collect()
  }
}

/// Result bucket chosen from the number of correct answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
  Tier1,
  Tier2,
  Tier3,
  Tier4,
}

impl Tier {
  /// Asset filename resolved against the asset directory.
  pub fn asset(self) -> &'static str {
    match self {
      Tier::Tier1 => "result1.png",
      Tier::Tier2 => "result2.png",
      Tier::Tier3 => "result3.png",
      Tier::Tier4 => "result4.png",
    }
  }

  pub fn message(self) -> &'static str {
    match self {
      Tier::Tier1 => "오.. 아직 MZ 감성 입문! 다음엔 더 잘하실 수 있어요 😉",
      Tier::Tier2 => "좋아요! 감이 오기 시작했어요 😎",
      Tier::Tier3 => "우와! 꽤나 MZ 트렌디하신데요? 🔥",
      Tier::Tier4 => "완벽! 당신은 거의 MZ 그 자체 🙌",
    }
  }
}

/// One line of the answer sheet on the result page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GradedRow {
  pub id: String,
  pub question: String,
  pub submitted: String,
  pub reference: String,
  #[serde(rename = "isCorrect")]
  pub is_correct: bool,
}

impl GradedRow {
  pub fn mark(&self) -> &'static str {
    if self.is_correct { "O" } else { "X" }
  }
}

/// Derived on every visit to the result page; never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizResult {
  pub correct: usize,
  pub total: usize,
  pub tier: Tier,
  pub rows: Vec<GradedRow>,
}
