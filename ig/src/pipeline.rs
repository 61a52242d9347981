//! IdeaPipeline - request → completion → parsed ideas
//!
//! The pipeline is stateless. The caller owns the session `IdeaList` and
//! passes it through `generate_into`, which only appends on success.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::GenerateError;
use crate::ideas::{GenerationRequest, Idea, IdeaList, parse_ideas};
use crate::llm::{CompletionRequest, LlmClient, StopReason, TokenUsage};
use crate::prompts::PromptLoader;

/// Result of one successful generation
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Parsed ideas in the order the model produced them
    pub ideas: Vec<Idea>,
    /// How many ideas were asked for
    pub requested: u32,
    /// Wall-clock time of the completion call
    pub elapsed: Duration,
    pub usage: TokenUsage,
    pub stop_reason: StopReason,
}

impl GenerationOutcome {
    /// The response held no usable ideas
    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    /// The model returned fewer ideas than requested
    pub fn is_short(&self) -> bool {
        self.ideas.len() < self.requested as usize
    }
}

/// Turns generation requests into ideas via an LLM client
pub struct IdeaPipeline {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl IdeaPipeline {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Create a pipeline using the prompt overrides and token limit from config
    pub fn from_config(llm: Arc<dyn LlmClient>, config: &Config) -> Self {
        let prompts = PromptLoader::new(config.generation.prompts_dir.as_deref());
        Self::new(llm, prompts, config.llm.max_tokens)
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Render the prompts for a request into a completion request
    pub fn build_completion(&self, request: &GenerationRequest) -> Result<CompletionRequest, GenerateError> {
        let prompt = self
            .prompts
            .idea_prompt(request)
            .map_err(|e| GenerateError::Prompt(e.to_string()))?;

        Ok(CompletionRequest {
            system_prompt: prompt.system,
            prompt: prompt.user,
            temperature: request.temperature(),
            max_tokens: self.max_tokens,
        })
    }

    /// Run one generation: a single completion call, no retries
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome, GenerateError> {
        debug!(topic = %request.topic(), count = %request.count(), model = %self.llm.model(), "generate: called");
        let completion = self.build_completion(request)?;

        let start = Instant::now();
        let response = self.llm.complete(completion).await.map_err(|e| {
            warn!(error = %e, "generate: completion failed");
            GenerateError::from(e)
        })?;
        let elapsed = start.elapsed();

        let raw = response.content.unwrap_or_default();
        let ideas = parse_ideas(&raw);

        if ideas.is_empty() {
            warn!(raw_len = raw.len(), "generate: response contained no usable ideas");
        } else if ideas.len() != request.count() as usize {
            debug!(requested = %request.count(), received = ideas.len(), "generate: count mismatch accepted");
        }
        if response.stop_reason == StopReason::MaxTokens {
            warn!("generate: response truncated by max-tokens limit");
        }

        info!(
            "Generated {} ideas for '{}' in {:.1}s",
            ideas.len(),
            request.topic(),
            elapsed.as_secs_f64()
        );

        Ok(GenerationOutcome {
            ideas,
            requested: request.count(),
            elapsed,
            usage: response.usage,
            stop_reason: response.stop_reason,
        })
    }

    /// Generate and append to `list`; on failure the list comes back unchanged
    pub async fn generate_into(
        &self,
        list: IdeaList,
        request: &GenerationRequest,
    ) -> (IdeaList, Result<GenerationOutcome, GenerateError>) {
        match self.generate(request).await {
            Ok(outcome) => {
                let list = list.append(outcome.ideas.iter().cloned());
                (list, Ok(outcome))
            }
            Err(e) => (list, Err(e)),
        }
    }
}
