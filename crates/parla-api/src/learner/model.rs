use parla_core::{ProficiencyLevel, ProgressAggregate};
use parla_db::models::Learner;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLearnerRequest {
    #[validate(
        length(min = 1, max = 50, message = "must be between 1 and 50 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLevelRequest {
    pub level: String,
}

#[derive(Debug, Serialize)]
pub struct LearnerResponse {
    #[serde(flatten)]
    pub learner: Learner,
    pub progress: ProgressAggregate,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub level: ProficiencyLevel,
    pub topics: &'static [&'static str],
}
