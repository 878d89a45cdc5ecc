mod feedback;
mod routes;

pub use feedback::feedback_message;
pub use routes::{
    CheckRequest, CheckResponse, CompareRequest, CompareResponse, SentenceQuery, SentenceResponse,
    routes,
};
