//! Integration tests for the generation pipeline through the public API

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ideagen::ideas::{ExportFormat, to_csv, write_export};
use ideagen::{
    CompletionRequest, CompletionResponse, CountBounds, GenerateError, GenerationRequest, IdeaList, IdeaPipeline,
    LlmClient, LlmError, PromptLoader, Style, Tone,
};
use tempfile::TempDir;

/// Replays canned replies in order and records every prompt it was sent
struct ScriptedClient {
    replies: Mutex<Vec<Result<String, u16>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(mut replies: Vec<Result<String, u16>>) -> Arc<Self> {
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt);
        match self.replies.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(CompletionResponse::text(text)),
            Some(Err(status)) => Err(LlmError::from_status(status, "scripted failure")),
            None => Err(LlmError::InvalidResponse("script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn request(topic: &str, count: u32) -> GenerationRequest {
    GenerationRequest::new(
        topic,
        count,
        Style::Listicle,
        Tone::Practical,
        0.7,
        CountBounds::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_session_flow_accumulates_and_exports() {
    let client = ScriptedClient::new(vec![
        Ok("1. Idea A\n2. Idea B\n\n3. Idea C".to_string()),
        Err(503),
        Ok("* Idea C\n* Idea \"D\"".to_string()),
    ]);
    let pipeline = IdeaPipeline::new(client.clone(), PromptLoader::embedded_only(), 600);

    let (list, result) = pipeline.generate_into(IdeaList::new(), &request("sourdough", 5)).await;
    assert_eq!(result.unwrap().ideas.len(), 3);

    let (list, result) = pipeline.generate_into(list, &request("sourdough", 5)).await;
    assert!(matches!(result, Err(GenerateError::Provider(_))));
    assert_eq!(list.len(), 3);

    let (list, result) = pipeline.generate_into(list, &request("sourdough", 5)).await;
    assert!(result.is_ok());

    assert_eq!(
        to_csv(&list, true),
        "idea\nIdea A\nIdea B\nIdea C\nIdea C\n\"Idea \"\"D\"\"\"\n"
    );

    let dir = TempDir::new().unwrap();
    let path = write_export(&list, ExportFormat::Text, dir.path(), "sourdough", true).unwrap();
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "Idea A\nIdea B\nIdea C\nIdea C\nIdea \"D\"\n"
    );

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts.iter().all(|p| p.contains("sourdough") && p.contains('5')));
}

#[tokio::test]
async fn test_clear_then_generate_starts_fresh() {
    let client = ScriptedClient::new(vec![Ok("Old".to_string()), Ok("New".to_string())]);
    let pipeline = IdeaPipeline::new(client, PromptLoader::embedded_only(), 600);

    let (list, _) = pipeline.generate_into(IdeaList::new(), &request("topic", 5)).await;
    let (list, _) = pipeline.generate_into(list.clear(), &request("topic", 5)).await;

    let texts: Vec<&str> = list.iter().map(|i| i.as_str()).collect();
    assert_eq!(texts, vec!["New"]);
}

#[tokio::test]
async fn test_prompt_override_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ideas-user.pmt"),
        "Give {{count}} {{tone}} ideas about {{topic}}",
    )
    .unwrap();

    let client = ScriptedClient::new(vec![Ok("Idea".to_string())]);
    let pipeline = IdeaPipeline::new(client.clone(), PromptLoader::new(Some(dir.path())), 600);
    pipeline.generate(&request("bonsai", 7)).await.unwrap();

    assert_eq!(client.prompts(), vec!["Give 7 Practical ideas about bonsai".to_string()]);
}
