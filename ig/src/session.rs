//! Interactive idea session
//!
//! Holds the session's `IdeaList` and topic. Every successful generation
//! appends; only `/clear` empties the list.

use std::path::PathBuf;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::config::{Config, ExportConfig};
use crate::error::GenerateError;
use crate::ideas::{
    CountBounds, ExportFormat, GenerationRequest, IdeaList, MAX_TEMPERATURE, MIN_TEMPERATURE, Style, Tone,
    to_numbered_text, write_export,
};
use crate::pipeline::{GenerationOutcome, IdeaPipeline};

/// Parameters applied to the next generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub count: u32,
    pub style: Style,
    pub tone: Tone,
    pub temperature: f32,
}

impl SessionSettings {
    /// Defaults from the `generation` config section
    pub fn from_config(config: &Config) -> Self {
        Self {
            count: config.generation.default_count,
            style: config.generation.style,
            tone: config.generation.tone,
            temperature: config.generation.temperature,
        }
    }
}

/// A parsed line of session input
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Generate for a topic (or the current one)
    Generate(Option<String>),
    /// Generate more for the current topic
    More,
    Clear,
    List,
    Copy,
    Save { format: ExportFormat, dir: Option<PathBuf> },
    Count(u32),
    Style(Style),
    Tone(Tone),
    Temperature(f32),
    Settings,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse one line of input; plain text is a topic to generate for
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if !input.starts_with('/') {
            return Ok(Self::Generate(Some(input.to_string())));
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        let required = |example: &str| require_value(cmd, rest, example);

        match cmd {
            "/generate" | "/g" => Ok(Self::Generate((!rest.is_empty()).then(|| rest.to_string()))),
            "/more" | "/m" => Ok(Self::More),
            "/clear" | "/c" => Ok(Self::Clear),
            "/list" | "/l" => Ok(Self::List),
            "/copy" => Ok(Self::Copy),
            "/save" | "/s" => {
                let mut parts = required("csv")?.splitn(2, char::is_whitespace);
                let format = parts.next().unwrap_or_default().parse::<ExportFormat>()?;
                let dir = parts.next().map(str::trim).filter(|d| !d.is_empty()).map(PathBuf::from);
                Ok(Self::Save { format, dir })
            }
            "/count" | "/n" => required("10")?
                .parse::<u32>()
                .map(Self::Count)
                .map_err(|_| format!("Not a whole number: {}", rest)),
            "/style" => required("how-to")?
                .parse::<Style>()
                .map(Self::Style)
                .map_err(|e| e.to_string()),
            "/tone" => required("funny")?
                .parse::<Tone>()
                .map(Self::Tone)
                .map_err(|e| e.to_string()),
            "/temp" | "/temperature" => required("0.9")?
                .parse::<f32>()
                .map(Self::Temperature)
                .map_err(|_| format!("Not a number: {}", rest)),
            "/settings" => Ok(Self::Settings),
            "/help" | "/h" => Ok(Self::Help),
            "/quit" | "/q" | "/exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

fn require_value<'a>(cmd: &str, rest: &'a str, example: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("{} needs a value, e.g. {} {}", cmd, cmd, example))
    } else {
        Ok(rest)
    }
}

/// Result of handling a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashResult {
    Continue,
    Quit,
}

/// Interactive session state
pub struct IdeaSession {
    pipeline: IdeaPipeline,
    settings: SessionSettings,
    bounds: CountBounds,
    export: ExportConfig,
    topic: Option<String>,
    ideas: IdeaList,
}

impl IdeaSession {
    /// Create a session with settings from config
    pub fn new(pipeline: IdeaPipeline, config: &Config, settings: SessionSettings) -> Self {
        Self {
            pipeline,
            settings,
            bounds: config.generation.count_bounds(),
            export: config.export.clone(),
            topic: None,
            ideas: IdeaList::new(),
        }
    }

    pub fn ideas(&self) -> &IdeaList {
        &self.ideas
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Run the session main loop
    pub async fn run(&mut self, initial_topic: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(topic) = initial_topic {
            println!("{} {}", ">".bright_green(), topic);
            self.execute(SessionCommand::Generate(Some(topic))).await?;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    match SessionCommand::parse(input) {
                        Ok(cmd) => {
                            if self.execute(cmd).await? == SlashResult::Quit {
                                break;
                            }
                        }
                        Err(msg) => {
                            println!("{} {}", "?".yellow(), msg);
                            println!("Type {} for available commands", "/help".yellow());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Execute one command against the session
    pub async fn execute(&mut self, cmd: SessionCommand) -> Result<SlashResult> {
        debug!(?cmd, "execute: called");
        match cmd {
            SessionCommand::Generate(topic) => {
                let topic = topic.or_else(|| self.topic.clone()).unwrap_or_default();
                self.generate(&topic).await;
            }
            SessionCommand::More => match self.topic.clone() {
                Some(topic) => self.generate(&topic).await,
                None => println!(
                    "{} No previous topic. Enter a topic or use {} first.",
                    "!".red(),
                    "/generate <topic>".yellow()
                ),
            },
            SessionCommand::Clear => {
                self.ideas = std::mem::take(&mut self.ideas).clear();
                self.topic = None;
                println!("{}", "Ideas cleared.".dimmed());
            }
            SessionCommand::List => self.print_ideas(),
            SessionCommand::Copy => {
                if self.ideas.is_empty() {
                    println!("{}", "No ideas yet.".dimmed());
                } else {
                    println!("{}", to_numbered_text(&self.ideas));
                }
            }
            SessionCommand::Save { format, dir } => self.save(format, dir)?,
            SessionCommand::Count(count) => {
                if self.bounds.contains(count) {
                    self.settings.count = count;
                    println!("Ideas per generation: {}", count);
                } else {
                    println!(
                        "{} Count must be between {} and {}",
                        "!".red(),
                        self.bounds.min,
                        self.bounds.max
                    );
                }
            }
            SessionCommand::Style(style) => {
                self.settings.style = style;
                println!("Style: {}", style);
            }
            SessionCommand::Tone(tone) => {
                self.settings.tone = tone;
                println!("Tone: {}", tone);
            }
            SessionCommand::Temperature(temperature) => {
                if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
                    self.settings.temperature = temperature;
                    println!("Temperature: {}", temperature);
                } else {
                    println!(
                        "{} Temperature must be between {} and {}",
                        "!".red(),
                        MIN_TEMPERATURE,
                        MAX_TEMPERATURE
                    );
                }
            }
            SessionCommand::Settings => self.print_settings(),
            SessionCommand::Help => self.print_help(),
            SessionCommand::Quit => return Ok(SlashResult::Quit),
        }

        Ok(SlashResult::Continue)
    }

    /// Generate for `topic` and append; failures are printed and leave the list as it was
    async fn generate(&mut self, topic: &str) {
        let request = match self.build_request(topic) {
            Ok(request) => request,
            Err(e) => {
                report_error(&e);
                return;
            }
        };

        println!("{}", "Generating ideas...".dimmed());
        let ideas = std::mem::take(&mut self.ideas);
        let (ideas, result) = self.pipeline.generate_into(ideas, &request).await;
        self.ideas = ideas;

        match result {
            Ok(outcome) => {
                self.topic = Some(request.topic().to_string());
                self.report_outcome(&outcome);
            }
            Err(e) => report_error(&e),
        }
    }

    fn build_request(&self, topic: &str) -> Result<GenerationRequest, GenerateError> {
        let s = &self.settings;
        Ok(GenerationRequest::new(
            topic,
            s.count,
            s.style,
            s.tone,
            s.temperature,
            self.bounds,
        )?)
    }

    fn report_outcome(&self, outcome: &GenerationOutcome) {
        if outcome.is_empty() {
            println!(
                "{} The model returned no usable ideas. Try again or adjust the topic.",
                "!".yellow()
            );
            return;
        }

        let start = self.ideas.len() - outcome.ideas.len();
        for (i, idea) in outcome.ideas.iter().enumerate() {
            println!("{} {}", format!("{}.", start + i + 1).bright_white().bold(), idea);
        }

        let summary = format!(
            "Generated {} ideas in {:.1}s, {} total",
            outcome.ideas.len(),
            outcome.elapsed.as_secs_f64(),
            self.ideas.len()
        );
        println!("{}", summary.green());
        if outcome.is_short() {
            println!(
                "{}",
                format!("(asked for {}, the model returned fewer)", outcome.requested).dimmed()
            );
        }
    }

    fn save(&self, format: ExportFormat, dir: Option<PathBuf>) -> Result<()> {
        if self.ideas.is_empty() {
            println!("{}", "No ideas to save.".dimmed());
            return Ok(());
        }

        let dir = dir.unwrap_or_else(|| self.export.dir.clone());
        let topic = self.topic.as_deref().unwrap_or("ideas");
        match write_export(&self.ideas, format, &dir, topic, self.export.csv_header) {
            Ok(path) => println!("Saved {} ideas to {}", self.ideas.len(), path.display()),
            Err(e) => println!("{} {:#}", "!".red(), e),
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "ideagen interactive session".bright_cyan().bold());
        println!("Model: {}", self.pipeline.model());
        println!(
            "Type a topic to generate ideas, {} for help, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    fn print_ideas(&self) {
        if self.ideas.is_empty() {
            println!("{}", "No ideas yet.".dimmed());
            return;
        }

        println!();
        if let Some(topic) = &self.topic {
            println!("{} {}", "Ideas for".bright_cyan(), topic.bright_white());
        }
        for (i, idea) in self.ideas.iter().enumerate() {
            println!("{} {}", format!("{}.", i + 1).bright_white().bold(), idea);
        }
        println!();
    }

    fn print_settings(&self) {
        let s = &self.settings;
        println!();
        println!("{}", "Settings:".bright_cyan());
        println!("  {:12} {}", "topic".yellow(), self.topic.as_deref().unwrap_or("-"));
        println!(
            "  {:12} {} ({}-{})",
            "count".yellow(),
            s.count,
            self.bounds.min,
            self.bounds.max
        );
        println!("  {:12} {}", "style".yellow(), s.style);
        println!("  {:12} {}", "tone".yellow(), s.tone);
        println!("  {:12} {}", "temperature".yellow(), s.temperature);
        println!("  {:12} {}", "ideas".yellow(), self.ideas.len());
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:22} Generate ideas for a new topic", "<topic>".yellow());
        println!("  {:22} Generate for a topic (or the current one)", "/generate [topic]".yellow());
        println!("  {:22} Append more ideas for the current topic", "/more".yellow());
        println!("  {:22} Show all ideas", "/list".yellow());
        println!("  {:22} Print ideas as a numbered list for copying", "/copy".yellow());
        println!("  {:22} Save ideas to a file", "/save txt|csv [dir]".yellow());
        println!("  {:22} Clear all ideas", "/clear".yellow());
        println!("  {:22} Ideas per generation", "/count N".yellow());
        println!("  {:22} Content style", "/style S".yellow());
        println!("  {:22} Tone", "/tone T".yellow());
        println!("  {:22} Creativity, 0.0-2.0", "/temp T".yellow());
        println!("  {:22} Show current settings", "/settings".yellow());
        println!("  {:22} Exit the session", "/quit".yellow());
        println!();
    }
}

fn report_error(err: &GenerateError) {
    println!("{} {}", "Error:".red(), err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionResponse, LlmError};
    use crate::prompts::PromptLoader;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn session(mock: Arc<MockLlmClient>) -> IdeaSession {
        let mut config = Config::default();
        config.generation.prompts_dir = None;
        let pipeline = IdeaPipeline::new(mock, PromptLoader::embedded_only(), 600);
        IdeaSession::new(pipeline, &config, SessionSettings::from_config(&config))
    }

    fn texts(session: &IdeaSession) -> Vec<&str> {
        session.ideas().iter().map(|i| i.as_str()).collect()
    }

    #[test]
    fn test_parse_plain_text_is_topic() {
        assert_eq!(
            SessionCommand::parse("vegan breakfast"),
            Ok(SessionCommand::Generate(Some("vegan breakfast".to_string())))
        );
    }

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(SessionCommand::parse("/more"), Ok(SessionCommand::More));
        assert_eq!(SessionCommand::parse("/generate"), Ok(SessionCommand::Generate(None)));
        assert_eq!(
            SessionCommand::parse("/g home workouts"),
            Ok(SessionCommand::Generate(Some("home workouts".to_string())))
        );
        assert_eq!(SessionCommand::parse("/count 12"), Ok(SessionCommand::Count(12)));
        assert_eq!(SessionCommand::parse("/style how to"), Ok(SessionCommand::Style(Style::HowTo)));
        assert_eq!(SessionCommand::parse("/tone curious"), Ok(SessionCommand::Tone(Tone::Curious)));
        assert_eq!(SessionCommand::parse("/temp 1.5"), Ok(SessionCommand::Temperature(1.5)));
        assert_eq!(
            SessionCommand::parse("/save csv /tmp/out dir"),
            Ok(SessionCommand::Save {
                format: ExportFormat::Csv,
                dir: Some(PathBuf::from("/tmp/out dir")),
            })
        );
        assert_eq!(SessionCommand::parse("/q"), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(SessionCommand::parse("/count").is_err());
        assert!(SessionCommand::parse("/count many").is_err());
        assert!(SessionCommand::parse("/style sonnet").is_err());
        assert!(SessionCommand::parse("/save pdf").is_err());
        assert!(SessionCommand::parse("/dance").is_err());
    }

    #[tokio::test]
    async fn test_generate_then_more_accumulates() {
        let mock = Arc::new(MockLlmClient::new(vec![
            CompletionResponse::text("1. A\n2. B"),
            CompletionResponse::text("- B\n- C"),
        ]));
        let mut session = session(mock.clone());

        session
            .execute(SessionCommand::Generate(Some("  sourdough ".to_string())))
            .await
            .unwrap();
        session.execute(SessionCommand::More).await.unwrap();

        assert_eq!(session.topic(), Some("sourdough"));
        assert_eq!(texts(&session), vec!["A", "B", "B", "C"]);
        assert!(mock.requests()[1].prompt.contains("sourdough"));
    }

    #[tokio::test]
    async fn test_empty_topic_never_calls_api() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let mut session = session(mock.clone());

        session.execute(SessionCommand::Generate(None)).await.unwrap();
        session
            .execute(SessionCommand::Generate(Some("   ".to_string())))
            .await
            .unwrap();
        session.execute(SessionCommand::More).await.unwrap();

        assert_eq!(mock.call_count(), 0);
        assert!(session.ideas().is_empty());
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_ideas() {
        let mock = Arc::new(MockLlmClient::with_results(vec![
            Ok(CompletionResponse::text("first idea")),
            Err(LlmError::from_status(500, "boom")),
        ]));
        let mut session = session(mock);

        session
            .execute(SessionCommand::Generate(Some("topic".to_string())))
            .await
            .unwrap();
        session.execute(SessionCommand::More).await.unwrap();

        assert_eq!(texts(&session), vec!["first idea"]);
    }

    #[tokio::test]
    async fn test_clear_resets_ideas_and_topic() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("idea")]));
        let mut session = session(mock);

        session
            .execute(SessionCommand::Generate(Some("topic".to_string())))
            .await
            .unwrap();
        session.execute(SessionCommand::Clear).await.unwrap();

        assert!(session.ideas().is_empty());
        assert_eq!(session.topic(), None);
    }

    #[tokio::test]
    async fn test_settings_are_validated() {
        let mut session = session(Arc::new(MockLlmClient::new(vec![])));

        session.execute(SessionCommand::Count(12)).await.unwrap();
        session.execute(SessionCommand::Count(99)).await.unwrap();
        session.execute(SessionCommand::Temperature(1.4)).await.unwrap();
        session.execute(SessionCommand::Temperature(7.0)).await.unwrap();
        session.execute(SessionCommand::Style(Style::VideoHook)).await.unwrap();

        let settings = session.settings();
        assert_eq!(settings.count, 12);
        assert_eq!(settings.temperature, 1.4);
        assert_eq!(settings.style, Style::VideoHook);
    }

    #[tokio::test]
    async fn test_save_writes_export() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("a, b\nc")]));
        let mut session = session(mock);
        let dir = tempdir().unwrap();

        session
            .execute(SessionCommand::Generate(Some("Home Office".to_string())))
            .await
            .unwrap();
        session
            .execute(SessionCommand::Save {
                format: ExportFormat::Csv,
                dir: Some(dir.path().to_path_buf()),
            })
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("content-ideas-home-office.csv")).unwrap();
        assert_eq!(written, "idea\n\"a, b\"\nc\n");
    }

    #[tokio::test]
    async fn test_quit() {
        let mut session = session(Arc::new(MockLlmClient::new(vec![])));
        assert_eq!(session.execute(SessionCommand::Quit).await.unwrap(), SlashResult::Quit);
        assert_eq!(session.execute(SessionCommand::Help).await.unwrap(), SlashResult::Continue);
    }
}
