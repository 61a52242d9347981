//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::ideas::GenerationRequest;

/// Context for rendering the idea templates
#[derive(Debug, Clone, Serialize)]
pub struct IdeaPromptContext {
    pub topic: String,
    pub count: u32,
    pub style: String,
    pub tone: String,
    pub format_hint: String,
}

impl From<&GenerationRequest> for IdeaPromptContext {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            topic: request.topic().to_string(),
            count: request.count(),
            style: request.style().label().to_string(),
            tone: request.tone().label().to_string(),
            format_hint: request.style().format_hint().to_string(),
        }
    }
}

/// System and user prompt for one completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `~/.config/ideagen/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates in `user_dir` when it exists
    pub fn new(user_dir: Option<&Path>) -> Self {
        Self {
            hbs: Self::engine(),
            user_dir: user_dir.filter(|dir| dir.exists()).map(Path::to_path_buf),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{user_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from user override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &IdeaPromptContext) -> Result<String> {
        let template = self.load_template(template_name)?;
        debug!(%template_name, topic = %context.topic, count = %context.count, "render: called");

        self.hbs
            .render_template(&template, context)
            .map(|rendered| rendered.trim().to_string())
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the system and user prompts for a generation request
    pub fn idea_prompt(&self, request: &GenerationRequest) -> Result<RenderedPrompt> {
        let context = IdeaPromptContext::from(request);
        Ok(RenderedPrompt {
            system: self.render("ideas-system", &context)?,
            user: self.render("ideas-user", &context)?,
        })
    }
}
