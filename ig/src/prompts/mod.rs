//! Prompt templates for idea generation
//!
//! Templates are Handlebars files that can be overridden on disk; the
//! embedded defaults are used otherwise.

pub mod embedded;
mod loader;

pub use loader::{IdeaPromptContext, PromptLoader, RenderedPrompt};
