#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod sessions;
pub mod timer;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{GenerationError, QuizError, SessionError};
pub use generator::{GeneratorConfig, OpenAiGenerator, QuizGenerator};
pub use sessions::{
    Advance, QuestionView, QuizLoopService, QuizPhase, QuizProgress, QuizSession, Selection,
    SessionSnapshot,
};
pub use timer::CountdownHandle;
