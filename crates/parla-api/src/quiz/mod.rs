mod model;
mod routes;

pub use model::{
    AnswerResult, QuizAnswer, QuizQuery, QuizResponse, SubmitQuizRequest, SubmitQuizResponse,
};
pub use routes::routes;
