use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{QuestionRecord, ScoreReport};

use super::progress::QuizProgress;
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle stage of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    TopicEntry,
    Generating,
    Active,
    Results,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizPhase::TopicEntry => "topic entry",
            QuizPhase::Generating => "generating",
            QuizPhase::Active => "active",
            QuizPhase::Results => "results",
        };
        f.write_str(name)
    }
}

/// Effect of a `select_answer` call on the active question's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Selected,
    Deselected,
}

/// Effect of an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Moved(usize),
    /// Advanced past the last question; the session is in `Results`.
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session.
///
/// Owns the whole lifecycle as one aggregate — phase, questions, answer
/// slots, current index, expiry flag, and the computed score — so no
/// partial combination of phase and data can be observed. The presentation
/// layer dispatches events and reads snapshots; it never mutates state
/// directly.
///
/// Phases: `TopicEntry → Generating → {Active, TopicEntry(error)} →
/// Results → (reset) → TopicEntry`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    phase: QuizPhase,
    error: Option<String>,
    questions: Vec<QuestionRecord>,
    answers: Vec<Option<String>>,
    current: usize,
    expired_by_timer: bool,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    score: Option<ScoreReport>,
}

impl QuizSession {
    /// A fresh session in the `TopicEntry` phase.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::TopicEntry,
            error: None,
            questions: Vec::new(),
            answers: Vec::new(),
            current: 0,
            expired_by_timer: false,
            started_at: None,
            completed_at: None,
            score: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// The user-visible message from the last failed generation, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based index of the question being presented.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        if self.phase == QuizPhase::Active {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    /// One slot per question: the selected option, or `None` for unanswered.
    #[must_use]
    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|slot| slot.as_deref())
    }

    /// True if the session reached `Results` through timer expiry rather
    /// than manual completion.
    #[must_use]
    pub fn expired_by_timer(&self) -> bool {
        self.expired_by_timer
    }

    /// The final score, available once the session is in `Results`.
    #[must_use]
    pub fn score(&self) -> Option<&ScoreReport> {
        self.score.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            answered: self.answers.iter().filter(|slot| slot.is_some()).count(),
            index: self.current,
            is_complete: self.phase == QuizPhase::Results,
        }
    }

    fn require_phase(
        &self,
        operation: &'static str,
        expected: QuizPhase,
    ) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::Phase {
                operation,
                phase: self.phase,
            })
        }
    }

    /// Leave `TopicEntry` for `Generating`, clearing any prior error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Phase` outside `TopicEntry`.
    pub fn begin_generation(&mut self) -> Result<(), SessionError> {
        self.require_phase("begin_generation", QuizPhase::TopicEntry)?;
        self.error = None;
        self.phase = QuizPhase::Generating;
        Ok(())
    }

    /// Enter `Active` with the generated questions.
    ///
    /// Initializes one unanswered slot per question and presents the first
    /// question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Phase` outside `Generating` and
    /// `SessionError::Empty` for an empty question list; the session stays
    /// in `Generating` in the latter case so the failure path can run.
    pub fn activate(
        &mut self,
        questions: Vec<QuestionRecord>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.require_phase("activate", QuizPhase::Generating)?;
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.current = 0;
        self.started_at = Some(started_at);
        self.phase = QuizPhase::Active;
        Ok(())
    }

    /// Return to `TopicEntry` with a user-visible error message.
    ///
    /// No partial quiz state survives.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Phase` outside `Generating`.
    pub fn fail_generation(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        self.require_phase("fail_generation", QuizPhase::Generating)?;
        *self = Self::new();
        self.error = Some(message.into());
        Ok(())
    }

    /// Toggle the selection for the current question.
    ///
    /// Re-selecting the recorded option clears the slot; any other option
    /// overwrites it. At most one selection per question at any time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Phase` outside `Active`.
    pub fn select_answer(&mut self, option: &str) -> Result<Selection, SessionError> {
        self.require_phase("select_answer", QuizPhase::Active)?;
        let Some(slot) = self.answers.get_mut(self.current) else {
            return Err(SessionError::Empty);
        };

        match slot {
            Some(selected) if selected == option => {
                *slot = None;
                Ok(Selection::Deselected)
            }
            _ => {
                *slot = Some(option.to_string());
                Ok(Selection::Selected)
            }
        }
    }

    /// Move to the next question, or finish the quiz from the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Phase` outside `Active`.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<Advance, SessionError> {
        self.require_phase("advance", QuizPhase::Active)?;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(Advance::Moved(self.current))
        } else {
            self.finish(at);
            Ok(Advance::Completed)
        }
    }

    /// Move to the previous question. No-op at index 0.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Phase` outside `Active`.
    pub fn retreat(&mut self) -> Result<usize, SessionError> {
        self.require_phase("retreat", QuizPhase::Active)?;
        if self.current > 0 {
            self.current -= 1;
        }
        Ok(self.current)
    }

    /// Force `Results` after timer expiry, scoring whatever was recorded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Phase` outside `Active`.
    pub fn expire(&mut self, at: DateTime<Utc>) -> Result<(), SessionError> {
        self.require_phase("expire", QuizPhase::Active)?;
        self.expired_by_timer = true;
        self.finish(at);
        Ok(())
    }

    /// Replace the session with a fresh `TopicEntry` instance.
    ///
    /// Valid from any phase; nothing carries over.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn finish(&mut self, at: DateTime<Utc>) {
        self.score = Some(ScoreReport::from_answers(&self.questions, &self.answers));
        self.completed_at = Some(at);
        self.phase = QuizPhase::Results;
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
