mod routes;

pub use routes::{ProgressResponse, routes};
