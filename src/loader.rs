//! Question source loading.
//!
//! The source is a header-first CSV with the columns
//! `id, question, type, image, choice1, choice2, choice3, answer`.
//! Blank lines are dropped before parsing, BOMs are stripped from the text and
//! from every header name, missing columns or cells read as "", and the result is
//! stably sorted by integer id with unparsable ids last.

use std::collections::HashMap;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, instrument, warn};

use crate::domain::{Question, QuestionKind, UNPARSABLE_ID_KEY};
use crate::error::QuizError;
use crate::util::{is_blank, strip_bom};

/// Read, clean and sort the question source at `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_questions(path: &Path) -> Result<Vec<Question>, QuizError> {
  if !path.exists() {
    return Err(QuizError::SourceMissing { path: path.to_path_buf() });
  }
  let raw = std::fs::read_to_string(path)
    .map_err(|source| QuizError::SourceUnreadable { path: path.to_path_buf(), source })?;

  let questions = parse_questions(&raw)?;
  if questions.is_empty() {
    return Err(QuizError::SourceEmpty { path: path.to_path_buf() });
  }

  let unparsable = questions.iter().filter(|q| q.sort_key() == UNPARSABLE_ID_KEY).count();
  if unparsable > 0 {
    warn!(target: "quiz", unparsable, "Some question ids are not integers; they are ordered last");
  }
  info!(target: "quiz", count = questions.len(), "Loaded questions");
  Ok(questions)
}

/// Parse source text into sorted questions. Returns an empty list when the text
/// has no header or no data rows.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, csv::Error> {
  // CRLF, bare CR and LF all end a line; the empty piece inside CRLF is blank.
  let lines: Vec<&str> = strip_bom(raw).split(['\r', '\n']).filter(|l| !is_blank(l)).collect();
  if lines.is_empty() {
    return Ok(Vec::new());
  }
  let text = lines.join("\n");

  let mut rdr = ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(text.as_bytes());

  let columns = ColumnMap::from_headers(rdr.headers()?);
  debug!(target: "quiz", columns = ?columns.index.keys().collect::<Vec<_>>(), "Parsed header");

  let mut questions = Vec::with_capacity(lines.len().saturating_sub(1));
  for record in rdr.records() {
    questions.push(columns.question(&record?));
  }

  // Stable: equal keys keep their input order.
  questions.sort_by_key(Question::sort_key);
  Ok(questions)
}

/// Header lookup keyed by BOM-free column name.
struct ColumnMap {
  index: HashMap<String, usize>,
}

impl ColumnMap {
  fn from_headers(headers: &StringRecord) -> Self {
    let index = headers
      .iter()
      .enumerate()
      .map(|(i, name)| (strip_bom(name).to_string(), i))
      .collect();
    Self { index }
  }

  /// Trimmed cell for `name`, or "" when the column or cell is absent.
  fn field(&self, record: &StringRecord, name: &str) -> String {
    self
      .index
      .get(name)
      .and_then(|&i| record.get(i))
      .unwrap_or("")
      .trim()
      .to_string()
  }

  fn question(&self, record: &StringRecord) -> Question {
    let image = self.field(record, "image");
    Question {
      id: self.field(record, "id"),
      question: self.field(record, "question"),
      kind: QuestionKind::from_cell(&self.field(record, "type")),
      image: if image.is_empty() { None } else { Some(image) },
      choices: [
        self.field(record, "choice1"),
        self.field(record, "choice2"),
        self.field(record, "choice3"),
      ],
      answer: self.field(record, "answer"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;
  use tempfile::{tempdir, NamedTempFile};

  const HEADER: &str = "id,question,type,image,choice1,choice2,choice3,answer";

  fn ids(qs: &[Question]) -> Vec<&str> {
    qs.iter().map(|q| q.id.as_str()).collect()
  }

  #[test]
  fn blank_lines_are_not_records() {
    let src = format!(
      "{HEADER}\n\n1,첫 문제,주관식,,,,,답\n   \n\t\n2,둘째,객관식,q2.png,가,나,다,나\n\n\n"
    );
    let qs = parse_questions(&src).unwrap();
    assert_eq!(qs.len(), 2);
    assert_eq!(qs[1].choices, ["가".to_string(), "나".into(), "다".into()]);
    assert_eq!(qs[1].image.as_deref(), Some("q2.png"));
    assert_eq!(qs[1].kind, QuestionKind::MultipleChoice);
  }

  #[test]
  fn bare_carriage_returns_end_lines() {
    let src = format!("{HEADER}\r1,q,주관식,,,,,a\r  \r2,r,주관식,,,,,b\r");
    let qs = parse_questions(&src).unwrap();
    assert_eq!(ids(&qs), vec!["1", "2"]);

    let mixed = format!("{HEADER}\r\n1,q,주관식,,,,,a\r\n \r\n2,r,주관식,,,,,b\n\r");
    assert_eq!(ids(&parse_questions(&mixed).unwrap()), vec!["1", "2"]);
  }

  #[test]
  fn bom_is_stripped_from_text_and_header() {
    let src = format!("\u{feff}{HEADER}\n7,q,주관식,,,,,a\n");
    let qs = parse_questions(&src).unwrap();
    assert_eq!(qs[0].id, "7");

    // A BOM in front of a header name that is not at the start of the text.
    let src = "id,\u{feff}question,type,image,choice1,choice2,choice3,\u{feff}answer\n8,q,주관식,,,,,a\n";
    let qs = parse_questions(src).unwrap();
    assert_eq!(qs[0].question, "q");
    assert_eq!(qs[0].answer, "a");
  }

  #[test]
  fn missing_columns_and_cells_default_to_empty() {
    let src = "id,question,answer\n1, 무엇? ,  정답  \n2\n";
    let qs = parse_questions(src).unwrap();
    assert_eq!(qs.len(), 2);
    assert_eq!(qs[0].question, "무엇?");
    assert_eq!(qs[0].answer, "정답");
    assert_eq!(qs[0].kind, QuestionKind::Other(String::new()));
    assert_eq!(qs[0].image, None);
    assert_eq!(qs[0].choices, [String::new(), String::new(), String::new()]);
    assert_eq!(qs[1].question, "");
    assert_eq!(qs[1].answer, "");
  }

  #[test]
  fn sorts_by_integer_id_with_unparsable_last_in_input_order() {
    let src = format!(
      "{HEADER}\nb,,,,,,,\n10,,,,,,,\n2,,,,,,,\na,,,,,,,\n-1,,,,,,,\n2,,,,,,,dup\n"
    );
    let qs = parse_questions(&src).unwrap();
    assert_eq!(ids(&qs), vec!["-1", "2", "2", "10", "b", "a"]);
    // Ties keep input order.
    assert_eq!(qs[1].answer, "");
    assert_eq!(qs[2].answer, "dup");
  }

  #[test]
  fn quoted_fields_keep_commas() {
    let src = format!("{HEADER}\n1,\"하나, 둘\",객관식,,\"a,b\",c,d,\"a,b\"\n");
    let qs = parse_questions(&src).unwrap();
    assert_eq!(qs[0].question, "하나, 둘");
    assert_eq!(qs[0].choices[0], "a,b");
    assert_eq!(qs[0].answer, "a,b");
  }

  #[test]
  fn missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    assert!(matches!(load_questions(&path), Err(QuizError::SourceMissing { .. })));
  }

  #[test]
  fn blank_only_and_header_only_files_are_empty() {
    let mut blank = NamedTempFile::new().unwrap();
    write!(blank, "\n  \n\t\n").unwrap();
    assert!(matches!(load_questions(blank.path()), Err(QuizError::SourceEmpty { .. })));

    let mut header_only = NamedTempFile::new().unwrap();
    writeln!(header_only, "{HEADER}").unwrap();
    assert!(matches!(load_questions(header_only.path()), Err(QuizError::SourceEmpty { .. })));
  }

  #[test]
  fn loads_from_disk() {
    let mut f = NamedTempFile::new().unwrap();
    write!(f, "\u{feff}{HEADER}\r\n2,두번째,주관식,,,,,B\r\n1,첫번째,객관식,,a,b,,a\r\n").unwrap();
    let qs = load_questions(f.path()).unwrap();
    assert_eq!(ids(&qs), vec!["1", "2"]);
    assert_eq!(qs[1].answer, "B");
  }
}
