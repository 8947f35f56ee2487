mod question;
mod report;
mod request;

pub use question::{OPTION_COUNT, QuestionDraft, QuestionError, QuestionRecord};
pub use report::{QuestionOutcome, ScoreReport};
pub use request::{
    DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT, QuizRequest, RequestError,
};
