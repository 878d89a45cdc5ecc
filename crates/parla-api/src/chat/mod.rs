mod routes;

pub use routes::{ChatRequest, ChatResponse, HistoryQuery, routes};
