//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::CountdownError;
use quiz_core::model::{QuestionError, RequestError};

use crate::sessions::QuizPhase;

/// Errors emitted by the quiz session state machine.
///
/// A `Phase` error means an operation was invoked outside its valid phase.
/// That is a programming defect in the caller, not a user-facing failure;
/// the presentation layer is expected to disable unavailable actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{operation} is not valid in the {phase} phase")]
    Phase {
        operation: &'static str,
        phase: QuizPhase,
    },

    #[error("no questions available for quiz")]
    Empty,
}

/// Errors emitted by quiz generators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("quiz generation is not configured")]
    Disabled,

    #[error("generator returned an empty reply")]
    EmptyResponse,

    #[error("generator request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("generator reply is not valid quiz JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("generator returned no questions")]
    NoQuestions,
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Countdown(#[from] CountdownError),
}
