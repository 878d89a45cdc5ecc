//! HTTP boundary for Parla.
//!
//! Every learner-scoped route carries the learner ID in its path; there is
//! no session state. Handlers validate input, call the AI client where
//! needed, score through `parla_core`, persist through `parla_db`, and fold
//! the resulting delta into the learner's progress.

pub mod chat;
pub mod config;
pub mod error;
pub mod game;
pub mod gemini;
pub mod learner;
pub mod listening;
pub mod metrics;
pub mod middleware;
pub mod progress;
pub mod quiz;
pub mod router;
pub mod state;
pub mod tracing;
pub mod validation;
pub mod vocabulary;

pub use config::ApiConfig;
pub use error::ApiError;
pub use state::ApiState;
