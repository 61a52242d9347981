//! Idea domain: requests, parsing, the session accumulator and exports

pub mod export;
mod list;
mod parser;
mod request;

pub use export::{ExportFormat, export_file_name, to_csv, to_numbered_text, to_text, write_export};
pub use list::{Idea, IdeaList};
pub use parser::parse_ideas;
pub use request::{CountBounds, GenerationRequest, MAX_TEMPERATURE, MIN_TEMPERATURE, Style, Tone, ValidationError};
