use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::QuestionRecord;

/// Outcome of a single question once a quiz concludes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub selected: Option<String>,
    pub correct: bool,
}

/// Final score with a per-question breakdown.
///
/// An index counts as correct iff an answer was recorded for it and that
/// answer is one of the question's correct options. Missing slots and
/// questions without correct options count as incorrect; the provider is
/// trusted but not assumed perfect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    correct: usize,
    total: usize,
    outcomes: Vec<QuestionOutcome>,
}

impl ScoreReport {
    /// Score recorded answers against their questions.
    #[must_use]
    pub fn from_answers(questions: &[QuestionRecord], answers: &[Option<String>]) -> Self {
        let mut outcomes = Vec::with_capacity(questions.len());
        let mut correct = 0;

        for (index, question) in questions.iter().enumerate() {
            let selected = answers.get(index).cloned().flatten();
            let is_correct = selected
                .as_deref()
                .is_some_and(|answer| question.is_correct(answer));
            if is_correct {
                correct += 1;
            }
            outcomes.push(QuestionOutcome {
                selected,
                correct: is_correct,
            });
        }

        Self {
            correct,
            total: questions.len(),
            outcomes,
        }
    }

    /// Number of correctly answered questions.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Number of questions in the quiz.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Per-question breakdown, in question order.
    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;

    fn question(prompt: &str, correct: &str) -> QuestionRecord {
        QuestionDraft {
            prompt: prompt.into(),
            options: vec![correct.into(), "B".into(), "C".into(), "D".into()],
            correct_options: vec![correct.into()],
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn counts_member_answers_as_correct() {
        let questions = vec![question("Q1", "A1"), question("Q2", "A2"), question("Q3", "A3")];
        let answers = vec![Some("A1".into()), Some("B".into()), Some("A3".into())];

        let report = ScoreReport::from_answers(&questions, &answers);

        assert_eq!(report.correct(), 2);
        assert_eq!(report.total(), 3);
        assert_eq!(report.to_string(), "2 / 3");
        assert!(report.outcomes()[0].correct);
        assert!(!report.outcomes()[1].correct);
        assert!(report.outcomes()[2].correct);
    }

    #[test]
    fn unanswered_slots_count_as_incorrect() {
        let questions = vec![question("Q1", "A1"), question("Q2", "A2")];
        let answers = vec![None, Some("A2".into())];

        let report = ScoreReport::from_answers(&questions, &answers);

        assert_eq!(report.correct(), 1);
        assert_eq!(report.outcomes()[0].selected, None);
        assert!(!report.outcomes()[0].correct);
    }

    #[test]
    fn short_answer_list_scores_missing_slots_as_incorrect() {
        let questions = vec![question("Q1", "A1"), question("Q2", "A2")];
        let answers = vec![Some("A1".into())];

        let report = ScoreReport::from_answers(&questions, &answers);

        assert_eq!(report.correct(), 1);
        assert_eq!(report.total(), 2);
        assert_eq!(report.outcomes().len(), 2);
        assert_eq!(report.outcomes()[1].selected, None);
    }

    #[test]
    fn all_unanswered_scores_zero() {
        let questions = vec![question("Q1", "A1"), question("Q2", "A2")];
        let report = ScoreReport::from_answers(&questions, &[None, None]);
        assert_eq!(report.correct(), 0);
        assert_eq!(report.to_string(), "0 / 2");
    }
}
