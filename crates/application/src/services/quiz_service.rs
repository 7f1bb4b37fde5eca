//! Quiz service - Five-question practice quizzes

use std::sync::Arc;

use domain::{ClassLevel, Quiz, QuizQuestion};
use tracing::{debug, instrument, warn};

use crate::ports::AiGatewayPort;

/// Generates quizzes and enforces the all-or-nothing length rule
pub struct QuizService {
    gateway: Arc<dyn AiGatewayPort>,
}

impl std::fmt::Debug for QuizService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizService").finish_non_exhaustive()
    }
}

impl QuizService {
    pub fn new(gateway: Arc<dyn AiGatewayPort>) -> Self {
        Self { gateway }
    }

    /// Exactly five valid questions, or none at all
    #[instrument(skip(self))]
    pub async fn quiz_for(
        &self,
        topic: &str,
        subject: &str,
        class_level: ClassLevel,
    ) -> Vec<QuizQuestion> {
        match self.gateway.generate_quiz(topic, subject, class_level).await {
            Ok(candidates) => {
                let received = candidates.len();
                let quiz = Quiz::from_candidates(candidates);
                if !quiz.is_available() {
                    debug!(received, "Model output did not form a complete quiz");
                }
                quiz.into_questions()
            },
            Err(e) => {
                warn!(error = %e, "Quiz generation failed");
                Vec::new()
            },
        }
    }
}
