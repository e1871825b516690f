//! Error taxonomy for question loading and session transitions.
//!
//! Only the loader errors are fatal. Malformed ids, missing cells and missing
//! assets are recovered where they happen and never reach these types.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while reading the question source.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("CSV 파일을 찾을 수 없습니다: {}", path.display())]
    SourceMissing { path: PathBuf },

    #[error("CSV 파일을 읽을 수 없습니다 ({}): {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV에 데이터가 없습니다: {}", path.display())]
    SourceEmpty { path: PathBuf },

    #[error("CSV 파싱 실패: {0}")]
    Csv(#[from] csv::Error),
}

/// A rejected submission. The session is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("보기를 선택해 주세요.")]
    ChoiceRequired,
    #[error("정답을 입력해 주세요.")]
    AnswerRequired,
}

/// An action that does not apply to the page the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("start is only valid on the start page (page {page})")]
    NotOnStartPage { page: usize },
    #[error("submit is only valid on a question page (page {page})")]
    NotOnQuestionPage { page: usize },
    #[error("restart is only valid on the result page (page {page})")]
    NotOnResultPage { page: usize },
}

/// Outcome of a submit that did not advance the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationWarning),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
