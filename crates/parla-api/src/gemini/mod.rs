//! Client for the hosted Gemini language model.
//!
//! The model is an opaque collaborator: handlers build a [`prompts::Prompt`],
//! send it through [`GeminiClient`], and run the reply through [`parse`]
//! before anything reaches `parla_core`.

pub mod client;
pub mod parse;
pub mod prompts;

pub use client::GeminiClient;
pub use parse::{GeneratedWord, VocabularyEnrichment};
pub use prompts::{ChatMode, Difficulty, Prompt};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("request to AI service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("AI service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("AI service returned no text")]
    EmptyResponse,
    #[error("could not parse AI response: {0}")]
    ParseFailure(String),
}
