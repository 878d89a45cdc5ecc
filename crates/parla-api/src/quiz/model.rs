use parla_core::{ItemId, ProgressAggregate, exercise::QuizQuestion};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    pub count: Option<usize>,
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub topic: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must contain between 1 and 50 answers"))]
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: ItemId,
    pub user_answer: String,
    /// Client-side verdict; only trusted for generated questions, which the
    /// server does not keep
    #[serde(default)]
    pub is_correct: bool,
    /// Seconds
    #[serde(default)]
    pub time_taken: i32,
}

#[derive(Debug, Serialize)]
pub struct AnswerResult {
    pub question_id: ItemId,
    pub is_correct: bool,
    /// Expected meaning, for questions built from stored vocabulary
    pub correct_answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub correct: usize,
    pub total: usize,
    /// Percentage of correct answers
    pub score: u32,
    pub results: Vec<AnswerResult>,
    pub progress: ProgressAggregate,
}
