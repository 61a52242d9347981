//! ideagen - LLM-backed content idea generator
//!
//! Turns a topic plus generation parameters into a list of short content
//! ideas: one prompt, one completion call, one parse. Results accumulate in
//! an `IdeaList` that can be exported as plain text or CSV.
//!
//! # Modules
//!
//! - [`ideas`] - Requests, the idea list, response parsing and export
//! - [`prompts`] - Prompt templates with user overrides
//! - [`llm`] - LLM client trait with OpenAI and Anthropic implementations
//! - [`pipeline`] - Request → completion → parsed ideas
//! - [`session`] - Interactive session that accumulates ideas
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod ideas;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ExportConfig, GenerationConfig, LlmConfig};
pub use error::GenerateError;
pub use ideas::{
    CountBounds, ExportFormat, GenerationRequest, Idea, IdeaList, Style, Tone, ValidationError, parse_ideas,
};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use pipeline::{GenerationOutcome, IdeaPipeline};
pub use prompts::PromptLoader;
pub use session::{IdeaSession, SessionCommand, SessionSettings};
