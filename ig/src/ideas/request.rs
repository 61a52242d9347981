//! Generation request building and validation

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Lowest temperature accepted by the completion providers
pub const MIN_TEMPERATURE: f32 = 0.0;

/// Highest temperature accepted by the completion providers
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Input rejected before any completion call is made
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter a topic before generating ideas")]
    EmptyTopic,

    #[error("Idea count {count} is outside the allowed range {min}-{max}")]
    CountOutOfRange { count: u32, min: u32, max: u32 },

    #[error("Temperature {0} is outside the allowed range 0.0-2.0")]
    TemperatureOutOfRange(f32),

    #[error("Unknown {kind}: '{value}'. Valid values: {valid}")]
    UnknownChoice {
        kind: &'static str,
        value: String,
        valid: String,
    },
}

/// Content format the ideas should target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    Listicle,
    HowTo,
    TwitterThread,
    VideoHook,
    NewsletterSubject,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::Listicle,
        Style::HowTo,
        Style::TwitterThread,
        Style::VideoHook,
        Style::NewsletterSubject,
    ];

    /// Human-readable label, as shown to users and embedded in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Listicle => "Listicle",
            Self::HowTo => "How-to",
            Self::TwitterThread => "Twitter thread",
            Self::VideoHook => "Video hook",
            Self::NewsletterSubject => "Newsletter subject",
        }
    }

    /// Identifier accepted on the command line and in config files
    pub fn id(&self) -> &'static str {
        match self {
            Self::Listicle => "listicle",
            Self::HowTo => "how-to",
            Self::TwitterThread => "twitter-thread",
            Self::VideoHook => "video-hook",
            Self::NewsletterSubject => "newsletter-subject",
        }
    }

    /// One-line description of what a single idea looks like in this style
    pub fn format_hint(&self) -> &'static str {
        match self {
            Self::Listicle => "each idea is a list-article headline such as \"7 ways to ...\"",
            Self::HowTo => "each idea is a step-by-step tutorial title starting with \"How to\"",
            Self::TwitterThread => "each idea is the opening tweet of a thread, under 280 characters",
            Self::VideoHook => "each idea is the first spoken line of a short video that stops the scroll",
            Self::NewsletterSubject => "each idea is an email subject line under 60 characters",
        }
    }
}

/// Voice the ideas should be written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[default]
    Practical,
    Persuasive,
    Funny,
    Curious,
    Controversial,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Practical,
        Tone::Persuasive,
        Tone::Funny,
        Tone::Curious,
        Tone::Controversial,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Practical => "Practical",
            Self::Persuasive => "Persuasive",
            Self::Funny => "Funny",
            Self::Curious => "Curious",
            Self::Controversial => "Controversial",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Practical => "practical",
            Self::Persuasive => "persuasive",
            Self::Funny => "funny",
            Self::Curious => "curious",
            Self::Controversial => "controversial",
        }
    }
}

/// Normalize "How-to", "how to", "HOW_TO" all to "how-to"
fn normalize_choice(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl std::str::FromStr for Style {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        Self::ALL
            .into_iter()
            .find(|style| style.id() == wanted)
            .ok_or_else(|| ValidationError::UnknownChoice {
                kind: "style",
                value: s.to_string(),
                valid: Self::ALL.iter().map(Style::id).collect::<Vec<_>>().join(", "),
            })
    }
}

impl std::str::FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        Self::ALL
            .into_iter()
            .find(|tone| tone.id() == wanted)
            .ok_or_else(|| ValidationError::UnknownChoice {
                kind: "tone",
                value: s.to_string(),
                valid: Self::ALL.iter().map(Tone::id).collect::<Vec<_>>().join(", "),
            })
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive bound on how many ideas a single request may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for CountBounds {
    fn default() -> Self {
        Self { min: 5, max: 20 }
    }
}

impl CountBounds {
    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && count <= self.max
    }
}

/// A validated request for one batch of ideas
///
/// Created per user action and consumed by a single pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    topic: String,
    count: u32,
    style: Style,
    tone: Tone,
    temperature: f32,
}

impl GenerationRequest {
    /// Validate raw parameters and build a request
    ///
    /// The topic is stored trimmed. Counts outside `bounds` are rejected, not clamped.
    pub fn new(
        topic: &str,
        count: u32,
        style: Style,
        tone: Tone,
        temperature: f32,
        bounds: CountBounds,
    ) -> Result<Self, ValidationError> {
        debug!(topic_len = topic.len(), %count, %style, %tone, %temperature, "GenerationRequest::new: called");
        let topic = topic.trim();
        if topic.is_empty() {
            debug!("GenerationRequest::new: empty topic");
            return Err(ValidationError::EmptyTopic);
        }

        if count == 0 || !bounds.contains(count) {
            debug!(%count, ?bounds, "GenerationRequest::new: count out of range");
            return Err(ValidationError::CountOutOfRange {
                count,
                min: bounds.min,
                max: bounds.max,
            });
        }

        if !temperature.is_finite() || !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
            debug!(%temperature, "GenerationRequest::new: temperature out of range");
            return Err(ValidationError::TemperatureOutOfRange(temperature));
        }

        Ok(Self {
            topic: topic.to_string(),
            count,
            style,
            tone,
            temperature,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(topic: &str, count: u32, temperature: f32) -> Result<GenerationRequest, ValidationError> {
        GenerationRequest::new(
            topic,
            count,
            Style::Listicle,
            Tone::Practical,
            temperature,
            CountBounds::default(),
        )
    }

    #[test]
    fn test_valid_request_trims_topic() {
        let req = build("  vegan breakfast recipes ", 5, 0.7).unwrap();
        assert_eq!(req.topic(), "vegan breakfast recipes");
        assert_eq!(req.count(), 5);
        assert_eq!(req.style(), Style::Listicle);
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert_eq!(build("", 5, 0.7), Err(ValidationError::EmptyTopic));
        assert_eq!(build("   \n\t", 5, 0.7), Err(ValidationError::EmptyTopic));
    }

    #[test]
    fn test_count_bounds_enforced() {
        assert!(build("topic", 5, 0.7).is_ok());
        assert!(build("topic", 20, 0.7).is_ok());
        assert_eq!(
            build("topic", 4, 0.7),
            Err(ValidationError::CountOutOfRange { count: 4, min: 5, max: 20 })
        );
        assert!(build("topic", 21, 0.7).is_err());
        assert!(build("topic", 0, 0.7).is_err());
    }

    #[test]
    fn test_zero_count_rejected_even_with_zero_min() {
        let bounds = CountBounds { min: 0, max: 10 };
        let result = GenerationRequest::new("topic", 0, Style::HowTo, Tone::Funny, 1.0, bounds);
        assert!(matches!(result, Err(ValidationError::CountOutOfRange { .. })));
    }

    #[test]
    fn test_temperature_range() {
        assert!(build("topic", 5, 0.0).is_ok());
        assert!(build("topic", 5, 2.0).is_ok());
        assert!(build("topic", 5, -0.1).is_err());
        assert!(build("topic", 5, 2.5).is_err());
        assert!(build("topic", 5, f32::NAN).is_err());
    }

    #[test]
    fn test_style_parsing_accepts_labels_and_ids() {
        assert_eq!("how-to".parse::<Style>().unwrap(), Style::HowTo);
        assert_eq!("How to".parse::<Style>().unwrap(), Style::HowTo);
        assert_eq!("Twitter thread".parse::<Style>().unwrap(), Style::TwitterThread);
        assert_eq!("NEWSLETTER_SUBJECT".parse::<Style>().unwrap(), Style::NewsletterSubject);
        assert!("poem".parse::<Style>().is_err());
    }

    #[test]
    fn test_tone_parsing() {
        assert_eq!("funny".parse::<Tone>().unwrap(), Tone::Funny);
        assert_eq!(" Controversial ".parse::<Tone>().unwrap(), Tone::Controversial);

        let err = "sarcastic".parse::<Tone>().unwrap_err();
        assert!(err.to_string().contains("practical, persuasive"));
    }

    #[test]
    fn test_style_roundtrips_through_yaml() {
        let yaml = serde_yaml::to_string(&Style::VideoHook).unwrap();
        assert_eq!(yaml.trim(), "video-hook");
        let parsed: Style = serde_yaml::from_str("twitter-thread").unwrap();
        assert_eq!(parsed, Style::TwitterThread);
    }
}
