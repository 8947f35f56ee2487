use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::countdown::{CountdownError, DEFAULT_QUIZ_SECONDS};
use quiz_core::model::QuizRequest;

use super::service::{Advance, QuizSession, Selection};
use crate::error::QuizError;
use crate::generator::QuizGenerator;
use crate::timer::CountdownHandle;

/// User-facing message shown when generation fails for any reason.
const GENERATION_FAILURE_MESSAGE: &str = "Failed to generate questions. Please try again.";

/// Orchestrates topic submission, content generation, and timing.
///
/// The session stays with the caller; this service supplies the clock, the
/// generator boundary, and the countdown. Session mutation happens only on
/// the caller's task in response to discrete events — the timer task never
/// touches the session, it only signals.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    generator: Arc<dyn QuizGenerator>,
    duration_secs: u32,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, generator: Arc<dyn QuizGenerator>) -> Self {
        Self {
            clock,
            generator,
            duration_secs: DEFAULT_QUIZ_SECONDS,
        }
    }

    /// Override the countdown duration for quizzes started by this service.
    ///
    /// The configured duration is authoritative; `DEFAULT_QUIZ_SECONDS`
    /// applies only when nothing was configured.
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Submit a topic: generate content and start the quiz.
    ///
    /// On success the session is `Active` with fresh answer slots and the
    /// returned handle owns the running countdown; drop or stop it on every
    /// exit from `Active`. On generation failure the session is back in
    /// `TopicEntry` carrying a user-visible message and no partial state.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` when called outside `TopicEntry` (a
    /// submission while `Generating` lands here), `QuizError::Generation`
    /// when the provider call fails or returns nothing usable, and
    /// `QuizError::Countdown` when the configured duration is zero.
    pub async fn submit_topic(
        &self,
        session: &mut QuizSession,
        request: QuizRequest,
    ) -> Result<CountdownHandle, QuizError> {
        if self.duration_secs == 0 {
            return Err(QuizError::Countdown(CountdownError::ZeroDuration));
        }

        session.begin_generation()?;
        match self.generator.generate(&request).await {
            Ok(questions) if !questions.is_empty() => {
                session.activate(questions, self.clock.now())?;
                let timer = CountdownHandle::start(self.duration_secs)?;
                tracing::info!(
                    topic = request.topic(),
                    count = session.total_questions(),
                    duration_secs = self.duration_secs,
                    "quiz started"
                );
                Ok(timer)
            }
            Ok(_) => {
                tracing::warn!(topic = request.topic(), "generator returned no questions");
                session.fail_generation(GENERATION_FAILURE_MESSAGE)?;
                Err(QuizError::Generation(
                    crate::error::GenerationError::NoQuestions,
                ))
            }
            Err(error) => {
                tracing::warn!(topic = request.topic(), "quiz generation failed: {error}");
                session.fail_generation(GENERATION_FAILURE_MESSAGE)?;
                Err(error.into())
            }
        }
    }

    /// Toggle the selection for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` outside the `Active` phase.
    pub fn select_answer(
        &self,
        session: &mut QuizSession,
        option: &str,
    ) -> Result<Selection, QuizError> {
        Ok(session.select_answer(option)?)
    }

    /// Move to the next question, or finish the quiz from the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` outside the `Active` phase.
    pub fn advance(&self, session: &mut QuizSession) -> Result<Advance, QuizError> {
        Ok(session.advance(self.clock.now())?)
    }

    /// Move to the previous question. No-op at index 0.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` outside the `Active` phase.
    pub fn retreat(&self, session: &mut QuizSession) -> Result<usize, QuizError> {
        Ok(session.retreat()?)
    }

    /// Apply timer expiry to the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` outside the `Active` phase.
    pub fn finish_expired(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        session.expire(self.clock.now())?;
        tracing::info!("quiz time expired");
        Ok(())
    }
}
