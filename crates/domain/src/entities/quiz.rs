//! Quiz entities

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Number of questions in a complete quiz
pub const QUIZ_LENGTH: usize = 5;

/// Number of answer options per question
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Check the structural rules of a question
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.question.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "question text is empty".to_string(),
            ));
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(DomainError::ValidationError(format!(
                "expected {OPTIONS_PER_QUESTION} options, got {}",
                self.options.len()
            )));
        }
        if self.correct_answer_index >= OPTIONS_PER_QUESTION {
            return Err(DomainError::ValidationError(format!(
                "correct answer index {} out of range",
                self.correct_answer_index
            )));
        }
        Ok(())
    }
}

/// A quiz is either complete or absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Build a quiz from model output.
    ///
    /// Any invalid question discards the whole set, extra questions are
    /// dropped, and fewer than [`QUIZ_LENGTH`] questions yield an empty quiz.
    pub fn from_candidates(candidates: Vec<QuizQuestion>) -> Self {
        if candidates.iter().any(|q| q.validate().is_err()) || candidates.len() < QUIZ_LENGTH {
            return Self::default();
        }
        let mut questions = candidates;
        questions.truncate(QUIZ_LENGTH);
        Self { questions }
    }

    pub fn is_available(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn into_questions(self) -> Vec<QuizQuestion> {
        self.questions
    }
}
