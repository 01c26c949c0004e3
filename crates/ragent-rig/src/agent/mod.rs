//! Question answering over the ingested documents.
//!
//! [`RagAgent`] runs a rig agent over any chat model. The model searches the
//! collection with [`SearchTool`] and finishes with a JSON reply that is
//! checked against [`StructuredAnswer`].

mod answer;
mod config;
mod executor;
mod response;
pub mod tool;

pub use answer::{AnswerSchema, StructuredAnswer};
pub use config::{AgentConfig, DEFAULT_INSTRUCTIONS, DEFAULT_MAX_TURNS, REFUSAL};
pub use executor::RagAgent;
pub use tool::SearchTool;
