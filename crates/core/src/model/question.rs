use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question data, as produced by a content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_options: Vec<String>,
}

impl QuestionDraft {
    /// Validate the draft into a [`QuestionRecord`].
    ///
    /// The prompt must be non-empty after trimming. There must be exactly
    /// [`OPTION_COUNT`] options, each non-empty and all distinct. The correct
    /// options must be a non-empty subset of the options; duplicates among
    /// them are dropped.
    ///
    /// # Errors
    ///
    /// Returns a `QuestionError` naming the first violated invariant.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::OptionCount {
                len: self.options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption {
                    option: option.clone(),
                });
            }
        }

        let mut correct_options = Vec::new();
        for option in self.correct_options {
            if !self.options.contains(&option) {
                return Err(QuestionError::UnknownCorrectOption { option });
            }
            if !correct_options.contains(&option) {
                correct_options.push(option);
            }
        }
        if correct_options.is_empty() {
            return Err(QuestionError::NoCorrectOptions);
        }

        Ok(QuestionRecord {
            prompt,
            options: self.options,
            correct_options,
        })
    }
}

/// A validated multiple-choice question.
///
/// Construction goes through [`QuestionDraft::validate`], so every record
/// holds exactly [`OPTION_COUNT`] distinct options and at least one correct
/// option drawn from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    prompt: String,
    options: Vec<String>,
    correct_options: Vec<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// All options accepted as correct. More than one is allowed even though
    /// a session records a single selection per question.
    #[must_use]
    pub fn correct_options(&self) -> &[String] {
        &self.correct_options
    }

    /// True if the given answer is one of the correct options.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_options.iter().any(|option| option == answer)
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("expected {OPTION_COUNT} options, got {len}")]
    OptionCount { len: usize },

    #[error("option text is empty")]
    EmptyOption,

    #[error("duplicate option: {option}")]
    DuplicateOption { option: String },

    #[error("no correct options provided")]
    NoCorrectOptions,

    #[error("correct option is not one of the options: {option}")]
    UnknownCorrectOption { option: String },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            prompt: "Which planet is known as the Red Planet?".into(),
            options: vec!["Mars".into(), "Venus".into(), "Jupiter".into(), "Saturn".into()],
            correct_options: vec!["Mars".into()],
        }
    }

    #[test]
    fn valid_draft_validates() {
        let question = draft().validate().unwrap();
        assert_eq!(question.prompt(), "Which planet is known as the Red Planet?");
        assert_eq!(question.options().len(), OPTION_COUNT);
        assert!(question.is_correct("Mars"));
        assert!(!question.is_correct("Venus"));
        assert!(!question.is_correct("mars"));
    }

    #[test]
    fn rejects_empty_prompt() {
        let mut d = draft();
        d.prompt = "   ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyPrompt);
    }

    #[test]
    fn rejects_wrong_option_count() {
        let mut d = draft();
        d.options.pop();
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::OptionCount { len: 3 }
        );
    }

    #[test]
    fn rejects_duplicate_options() {
        let mut d = draft();
        d.options[1] = "Mars".into();
        assert!(matches!(
            d.validate().unwrap_err(),
            QuestionError::DuplicateOption { .. }
        ));
    }

    #[test]
    fn rejects_empty_option_text() {
        let mut d = draft();
        d.options[2] = "  ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyOption);
    }

    #[test]
    fn rejects_missing_correct_options() {
        let mut d = draft();
        d.correct_options.clear();
        assert_eq!(d.validate().unwrap_err(), QuestionError::NoCorrectOptions);
    }

    #[test]
    fn rejects_correct_option_outside_options() {
        let mut d = draft();
        d.correct_options = vec!["Pluto".into()];
        assert!(matches!(
            d.validate().unwrap_err(),
            QuestionError::UnknownCorrectOption { .. }
        ));
    }

    #[test]
    fn deduplicates_correct_options() {
        let mut d = draft();
        d.correct_options = vec!["Mars".into(), "Mars".into(), "Venus".into()];
        let question = d.validate().unwrap();
        assert_eq!(question.correct_options(), ["Mars", "Venus"]);
    }
}
