//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ideas::{Style, Tone};

/// ideagen - content idea generator
#[derive(Parser)]
#[command(
    name = "ig",
    about = "Generate content ideas for a topic with an LLM",
    version,
    after_help = "Logs are written to: ~/.local/share/ideagen/logs/ideagen.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Generate one batch of ideas and print or export them
    Generate {
        /// Topic, niche or keywords (e.g. "vegan breakfast recipes")
        topic: String,

        #[command(flatten)]
        options: GenerationArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Write the ideas to a file in this directory instead of stdout (txt, or csv with --format csv)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Start an interactive session that accumulates ideas
    Session {
        /// Topic to generate for immediately
        topic: Option<String>,

        #[command(flatten)]
        options: GenerationArgs,
    },

    /// List available styles and tones
    Styles,

    /// Print the effective configuration
    Config,
}

/// Generation parameters shared by `generate` and `session`
///
/// Anything left unset falls back to the `generation` section of the config.
#[derive(Args, Clone, Default)]
pub struct GenerationArgs {
    /// Ideas per generation
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Content style (listicle, how-to, twitter-thread, video-hook, newsletter-subject)
    #[arg(short, long)]
    pub style: Option<Style>,

    /// Tone (practical, persuasive, funny, curious, controversial)
    #[arg(short, long)]
    pub tone: Option<Tone>,

    /// Creativity, 0.0-2.0
    #[arg(long)]
    pub temperature: Option<f32>,

    /// API key for this run only (otherwise read from the configured environment variable)
    #[arg(long)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for GenerationArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationArgs")
            .field("count", &self.count)
            .field("style", &self.style)
            .field("tone", &self.tone)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Output format for generated ideas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Numbered,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(Self::Text),
            "numbered" => Ok(Self::Numbered),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text, numbered, csv, or json", s)),
        }
    }
}
