//! ideagen - content idea generator
//!
//! CLI entry point for one-shot generation and interactive sessions.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use serde::Serialize;
use tracing::info;

use ideagen::cli::{Cli, Command, GenerationArgs, OutputFormat};
use ideagen::config::Config;
use ideagen::error::GenerateError;
use ideagen::ideas::{
    ExportFormat, GenerationRequest, Idea, IdeaList, Style, Tone, to_csv, to_numbered_text, to_text, write_export,
};
use ideagen::llm::create_client;
use ideagen::pipeline::IdeaPipeline;
use ideagen::session::{IdeaSession, SessionSettings};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ideagen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("ideagen.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "ideagen loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Generate {
            topic,
            options,
            format,
            output,
        }) => cmd_generate(&config, &topic, &options, format, output.as_deref()).await,
        Some(Command::Session { topic, options }) => cmd_session(&config, topic, &options).await,
        Some(Command::Styles) => cmd_styles(),
        Some(Command::Config) => cmd_config(&config),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Generation settings from config, overridden by command-line flags
fn resolve_settings(config: &Config, options: &GenerationArgs) -> SessionSettings {
    let defaults = SessionSettings::from_config(config);
    SessionSettings {
        count: options.count.unwrap_or(defaults.count),
        style: options.style.unwrap_or(defaults.style),
        tone: options.tone.unwrap_or(defaults.tone),
        temperature: options.temperature.unwrap_or(defaults.temperature),
    }
}

/// Ideas plus request metadata, as printed by `--format json`
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct JsonReport<'a> {
    topic: &'a str,
    style: Style,
    tone: Tone,
    requested: u32,
    model: &'a str,
    generated_at: String,
    ideas: &'a [Idea],
}

/// Run one generation and print or export the result
async fn cmd_generate(
    config: &Config,
    topic: &str,
    options: &GenerationArgs,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let export_format = match (output, format) {
        (Some(_), OutputFormat::Json) => {
            return Err(eyre::eyre!("--output writes txt or csv; use --format text, numbered or csv"));
        }
        (_, OutputFormat::Csv) => ExportFormat::Csv,
        _ => ExportFormat::Text,
    };

    // Validate before touching credentials so bad input never reaches the API
    let s = resolve_settings(config, options);
    let request = GenerationRequest::new(
        topic,
        s.count,
        s.style,
        s.tone,
        s.temperature,
        config.generation.count_bounds(),
    )
    .map_err(GenerateError::from)?;

    let llm = create_client(&config.llm, options.api_key.as_deref()).map_err(GenerateError::from)?;
    let pipeline = IdeaPipeline::from_config(llm, config);

    eprintln!("{}", format!("Generating {} ideas with {}...", request.count(), pipeline.model()).dimmed());
    let outcome = pipeline.generate(&request).await?;

    if outcome.is_empty() {
        return Err(eyre::eyre!(
            "The model returned no usable ideas. Try again or adjust the topic."
        ));
    }

    let ideas: IdeaList = outcome.ideas.iter().cloned().collect();

    if let Some(dir) = output {
        let path = write_export(&ideas, export_format, dir, request.topic(), config.export.csv_header)?;
        println!("Saved {} ideas to {}", ideas.len(), path.display());
    } else {
        match format {
            OutputFormat::Text => println!("{}", to_text(&ideas)),
            OutputFormat::Numbered => println!("{}", to_numbered_text(&ideas)),
            OutputFormat::Csv => print!("{}", to_csv(&ideas, config.export.csv_header)),
            OutputFormat::Json => {
                let report = JsonReport {
                    topic: request.topic(),
                    style: request.style(),
                    tone: request.tone(),
                    requested: request.count(),
                    model: pipeline.model(),
                    generated_at: chrono::Utc::now().to_rfc3339(),
                    ideas: ideas.as_slice(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    let mut summary = format!(
        "Generated {} ideas in {:.1}s",
        ideas.len(),
        outcome.elapsed.as_secs_f64()
    );
    if outcome.is_short() {
        summary.push_str(&format!(" (asked for {})", outcome.requested));
    }
    eprintln!("{}", summary.green());

    Ok(())
}

/// Run the interactive session
async fn cmd_session(config: &Config, topic: Option<String>, options: &GenerationArgs) -> Result<()> {
    let settings = resolve_settings(config, options);
    let bounds = config.generation.count_bounds();
    if !bounds.contains(settings.count) {
        return Err(eyre::eyre!(
            "Count must be between {} and {}, got {}",
            bounds.min,
            bounds.max,
            settings.count
        ));
    }

    let llm = create_client(&config.llm, options.api_key.as_deref()).map_err(GenerateError::from)?;
    let pipeline = IdeaPipeline::from_config(llm, config);

    let mut session = IdeaSession::new(pipeline, config, settings);
    session.run(topic).await
}

/// List available styles and tones
fn cmd_styles() -> Result<()> {
    println!("{}", "Styles:".bright_cyan());
    for style in Style::ALL {
        println!("  {:20} {}", style.id().yellow(), style.format_hint());
    }
    println!();
    println!("{}", "Tones:".bright_cyan());
    for tone in Tone::ALL {
        println!("  {:20} {}", tone.id().yellow(), tone.label());
    }
    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    print!("{}", yaml);
    Ok(())
}
