use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::ScoreReport;

use super::service::{QuizPhase, QuizSession};

/// Render-ready view of the question being presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

/// Point-in-time, serializable view of a session for any front end.
///
/// `remaining_secs` comes from the timer's owner; the session itself does
/// not track wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: QuizPhase,
    pub error: Option<String>,
    pub index: usize,
    pub total: usize,
    pub question: Option<QuestionView>,
    pub remaining_secs: Option<u32>,
    pub score: Option<ScoreReport>,
    pub expired_by_timer: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// Capture the session's presentation-facing state.
    #[must_use]
    pub fn capture(session: &QuizSession, remaining_secs: Option<u32>) -> Self {
        let question = session.current_question().map(|question| QuestionView {
            prompt: question.prompt().to_string(),
            options: question.options().to_vec(),
            selected: session
                .answer(session.current_index())
                .map(str::to_string),
        });

        Self {
            phase: session.phase(),
            error: session.error().map(str::to_string),
            index: session.current_index(),
            total: session.total_questions(),
            question,
            remaining_secs,
            score: session.score().cloned(),
            expired_by_timer: session.expired_by_timer(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
        }
    }
}
