mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use service::{Advance, QuizPhase, QuizSession, Selection};
pub use view::{QuestionView, SessionSnapshot};
pub use workflow::QuizLoopService;
