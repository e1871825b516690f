//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Building the view for a session's current page
//!   - Applying user actions (start / submit / restart) and reporting the outcome

use tracing::{debug, info, instrument};

use crate::domain::QuestionKind;
use crate::error::{SubmitError, TransitionError, ValidationWarning};
use crate::protocol::{QuestionView, ResultView, RowOut, StartView, ViewOut};
use crate::session::{grade_all, Page, QuizSession};
use crate::state::AppState;
use crate::util::trunc_for_log;

/// A user action coming from either transport.
#[derive(Debug, Clone)]
pub enum Action {
  Start { username: String },
  Submit { answer: Option<String> },
  Restart,
}

/// Result of an action that was valid for the current page.
#[derive(Debug, Clone)]
pub enum Outcome {
  /// The session moved; this is the new page.
  Moved(ViewOut),
  /// The submission was rejected; the page is unchanged.
  Rejected { warning: ValidationWarning, view: ViewOut },
}

pub fn render(state: &AppState, session: &QuizSession) -> ViewOut {
  let questions = &state.questions;
  match session.current(questions) {
    Page::Start => ViewOut::Start(StartView {
      title: state.config.title.clone(),
      intro: state.config.intro.clone(),
      username: session.username().to_string(),
    }),

    Page::Question { number, question } => {
      let question_text = if question.question.is_empty() {
        format!("문제 {}", number)
      } else {
        question.question.clone()
      };
      let choices = match question.kind {
        QuestionKind::MultipleChoice => question.visible_choices(),
        _ => Vec::new(),
      };
      ViewOut::Question(QuestionView {
        id: question.id.clone(),
        page_number: number,
        total_pages: questions.len(),
        question_text,
        image: state.assets.question_image(question.image.as_deref()),
        kind: question.kind.clone(),
        choices,
      })
    }

    Page::Result => {
      let result = grade_all(questions, session.answers());
      let name = session.username().trim().to_string();
      let header = if name.is_empty() { "결과".to_string() } else { format!("{}님의 결과", name) };
      let tier_message = result.tier.message().to_string();
      ViewOut::Result(ResultView {
        header,
        username: name,
        correct_count: result.correct,
        total: result.total,
        tier: result.tier,
        tier_image: state.assets.tier_image(result.tier),
        summary: format!("총 {}문제 중 {}개 정답!  {}", result.total, result.correct, tier_message),
        tier_message,
        rows: result.rows.iter().map(RowOut::from).collect(),
      })
    }
  }
}

/// Apply `action` to `session` without touching the filesystem.
///
/// Returns the validation warning when a submission was rejected; the session is
/// unchanged in that case.
#[instrument(level = "info", skip(state, session, action), fields(page = session.page()))]
pub fn transition(
  state: &AppState,
  session: &mut QuizSession,
  action: Action,
) -> Result<Option<ValidationWarning>, TransitionError> {
  let questions = &state.questions;
  match action {
    Action::Start { username } => {
      session.start(questions, &username)?;
      info!(target: "quiz", username = %trunc_for_log(&username, 32), total = questions.len(), "Quiz started");
    }
    Action::Submit { answer } => match session.submit(questions, answer.as_deref()) {
      Ok(page) => {
        if page == Page::Result {
          if let Some(result) = session.result(questions) {
            info!(target: "quiz", correct = result.correct, total = result.total, tier = ?result.tier, "Quiz finished");
          }
        }
      }
      Err(SubmitError::Invalid(warning)) => {
        debug!(target: "quiz", page = session.page(), %warning, "Submission rejected");
        return Ok(Some(warning));
      }
      Err(SubmitError::Transition(e)) => return Err(e),
    },
    Action::Restart => {
      session.restart(questions.len())?;
      info!(target: "quiz", "Quiz restarted");
    }
  }
  Ok(None)
}

/// Pair a transition result with the view for the session's page.
pub fn outcome(state: &AppState, session: &QuizSession, warning: Option<ValidationWarning>) -> Outcome {
  let view = render(state, session);
  match warning {
    Some(warning) => Outcome::Rejected { warning, view },
    None => Outcome::Moved(view),
  }
}

/// Apply `action` to `session` and return what to show next.
pub fn apply(state: &AppState, session: &mut QuizSession, action: Action) -> Result<Outcome, TransitionError> {
  let warning = transition(state, session, action)?;
  Ok(outcome(state, session, warning))
}
