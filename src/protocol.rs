//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! The views are what the UI renders; the inputs are the three user actions.

use serde::{Deserialize, Serialize};

use crate::assets::ImageRef;
use crate::domain::{GradedRow, QuestionKind, Tier};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Ask for the current view without changing anything.
    View,
    Start {
        #[serde(default)]
        username: String,
    },
    Submit {
        #[serde(default)]
        answer: Option<String>,
    },
    Restart,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    View {
        view: ViewOut,
    },
    /// Submission rejected; `view` is the unchanged current page.
    Warning {
        message: String,
        view: ViewOut,
    },
    Error {
        message: String,
    },
}

/// What to show for the session's current page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum ViewOut {
    Start(StartView),
    Question(QuestionView),
    Result(ResultView),
}

#[derive(Debug, Clone, Serialize)]
pub struct StartView {
    pub title: String,
    pub intro: String,
    /// Pre-filled from the previous run after a restart.
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub page_number: usize,
    pub total_pages: usize,
    pub question_text: String,
    pub image: Option<ImageRef>,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Empty choices already removed. Empty for non multiple-choice questions.
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub username: String,
    pub header: String,
    pub correct_count: usize,
    pub total: usize,
    pub tier: Tier,
    pub tier_image: Option<ImageRef>,
    pub tier_message: String,
    pub summary: String,
    pub rows: Vec<RowOut>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOut {
    pub id: String,
    pub question: String,
    pub submitted: String,
    pub reference: String,
    pub is_correct: bool,
    /// "O" or "X".
    pub mark: String,
}

impl From<&GradedRow> for RowOut {
    fn from(r: &GradedRow) -> Self {
        RowOut {
            id: r.id.clone(),
            question: r.question.clone(),
            submitted: r.submitted.clone(),
            reference: r.reference.clone(),
            is_correct: r.is_correct,
            mark: r.mark().to_string(),
        }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartIn {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitIn {
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub session_id: String,
    pub view: ViewOut,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewOut>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub questions: usize,
}
