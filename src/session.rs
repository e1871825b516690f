//! Per-user quiz session: page progression, answer capture and scoring.
//!
//! Pages: `0` is the start screen, `1..=N` are questions (1-based), `N + 1` is
//! the result screen. Transitions are `start`, `submit` and `restart`; the page
//! only moves forward by one on an accepted submit or back to `0` on restart.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::{GradedRow, Question, QuestionKind, QuizResult};
use crate::error::{SubmitError, TransitionError, ValidationWarning};
use crate::grader::judge;
use crate::tier::result_tier;

/// Where a session currently is, borrowed from the shared question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page<'q> {
    Start,
    Question { number: usize, question: &'q Question },
    Result,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    page: usize,
    /// question id -> trimmed submitted answer
    answers: HashMap<String, String>,
    /// Stored as typed; trimmed when the result is displayed.
    username: String,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn answers(&self) -> &HashMap<String, String> {
        &self.answers
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn current<'q>(&self, questions: &'q [Question]) -> Page<'q> {
        match self.page {
            0 => Page::Start,
            n if n <= questions.len() => Page::Question { number: n, question: &questions[n - 1] },
            _ => Page::Result,
        }
    }

    /// Start -> Question(1). Captures the username.
    #[instrument(level = "debug", skip(self, questions, username))]
    pub fn start<'q>(&mut self, questions: &'q [Question], username: &str) -> Result<Page<'q>, TransitionError> {
        if self.page != 0 {
            return Err(TransitionError::NotOnStartPage { page: self.page });
        }
        self.username = username.to_string();
        self.page = 1;
        debug!(target: "quiz", total = questions.len(), "Session started");
        Ok(self.current(questions))
    }

    /// Question(n) -> Question(n + 1) or Result.
    ///
    /// `answer` is `None` when nothing was selected. A rejected answer leaves the
    /// session untouched.
    #[instrument(level = "debug", skip(self, questions, answer), fields(page = self.page))]
    pub fn submit<'q>(&mut self, questions: &'q [Question], answer: Option<&str>) -> Result<Page<'q>, SubmitError> {
        let question = match self.current(questions) {
            Page::Question { question, .. } => question,
            _ => return Err(TransitionError::NotOnQuestionPage { page: self.page }.into()),
        };

        let trimmed = answer.unwrap_or("").trim();
        match question.kind {
            QuestionKind::MultipleChoice if trimmed.is_empty() => {
                return Err(ValidationWarning::ChoiceRequired.into());
            }
            QuestionKind::Subjective if trimmed.is_empty() => {
                return Err(ValidationWarning::AnswerRequired.into());
            }
            _ => {}
        }

        self.answers.insert(question.id.clone(), trimmed.to_string());
        self.page += 1;
        debug!(target: "quiz", id = %question.id, next_page = self.page, "Answer recorded");
        Ok(self.current(questions))
    }

    /// Result -> Start. Answers are cleared; the username is kept so the start
    /// page can pre-fill it.
    #[instrument(level = "debug", skip(self), fields(page = self.page))]
    pub fn restart(&mut self, total: usize) -> Result<(), TransitionError> {
        if self.page <= total {
            return Err(TransitionError::NotOnResultPage { page: self.page });
        }
        self.answers.clear();
        self.page = 0;
        debug!(target: "quiz", "Session restarted");
        Ok(())
    }

    /// Graded result, available only on the result page.
    pub fn result(&self, questions: &[Question]) -> Option<QuizResult> {
        match self.current(questions) {
            Page::Result => Some(grade_all(questions, &self.answers)),
            _ => None,
        }
    }
}

/// Grade every question in order. Unanswered questions count as "" and are wrong
/// unless the reference is also blank.
pub fn grade_all(questions: &[Question], answers: &HashMap<String, String>) -> QuizResult {
    let rows: Vec<GradedRow> = questions
        .iter()
        .map(|q| {
            let submitted = answers.get(&q.id).cloned().unwrap_or_default();
            let is_correct = judge(&submitted, &q.answer, &q.kind);
            GradedRow {
                id: q.id.clone(),
                question: q.question.clone(),
                submitted,
                reference: q.answer.clone(),
                is_correct,
            }
        })
        .collect();
    let correct = rows.iter().filter(|r| r.is_correct).count();

    QuizResult { correct, total: questions.len(), tier: result_tier(correct), rows }
}
