mod model;
mod routes;

pub use model::{CreateLearnerRequest, LearnerResponse, TopicsResponse, UpdateLevelRequest};
pub use routes::{require_learner, routes};
