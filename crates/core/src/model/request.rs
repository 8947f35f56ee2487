use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_QUESTION_COUNT: u32 = 1;
pub const MAX_QUESTION_COUNT: u32 = 20;
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RequestError {
    #[error("quiz topic is empty")]
    EmptyTopic,

    #[error("question count {count} is outside {MIN_QUESTION_COUNT}..={MAX_QUESTION_COUNT}")]
    CountOutOfRange { count: u32 },
}

/// A validated request for quiz content: topic, question count, and optional
/// free-text instructions for the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    topic: String,
    question_count: u32,
    instructions: String,
}

impl QuizRequest {
    /// Validate and build a request.
    ///
    /// The topic and instructions are trimmed; instructions may be empty.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::EmptyTopic` if the topic is empty after
    /// trimming, or `RequestError::CountOutOfRange` if `question_count` is
    /// outside `MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT`.
    pub fn new(
        topic: impl Into<String>,
        question_count: u32,
        instructions: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(RequestError::EmptyTopic);
        }

        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&question_count) {
            return Err(RequestError::CountOutOfRange {
                count: question_count,
            });
        }

        Ok(Self {
            topic,
            question_count,
            instructions: instructions.into().trim().to_string(),
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// The generation prompt sent to a content provider.
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Generate a quiz about {} with {} questions.",
            self.topic, self.question_count
        );
        if !self.instructions.is_empty() {
            prompt.push(' ');
            prompt.push_str(&self.instructions);
        }
        prompt
    }
}
