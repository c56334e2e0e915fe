use crate::domain::model::{CourseRecord, NarrativeSettings};
use crate::domain::ports::NarrativeGenerator;
use crate::narrative::prompt::{pathway_messages, summary_messages, ChatMessage};
use crate::utils::error::{Result, SkillError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Narrative generator backed by an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatNarrativeGenerator {
    client: Client,
    settings: NarrativeSettings,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatNarrativeGenerator {
    pub fn new(settings: NarrativeSettings) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, settings })
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": messages,
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
        });

        tracing::debug!("Requesting narrative from {}", self.settings.endpoint);
        let mut request = self.client.post(&self.settings.endpoint).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SkillError::NarrativeError {
                message: format!("{} returned {}: {}", self.settings.endpoint, status, text),
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SkillError::NarrativeError {
                message: "response contained no message content".to_string(),
            })
    }
}

#[async_trait]
impl NarrativeGenerator for ChatNarrativeGenerator {
    async fn skill_pathway(&self, skill_name: &str) -> Result<String> {
        self.complete(pathway_messages(skill_name)).await
    }

    async fn summary(&self, skill_names: &[String], courses: &[CourseRecord]) -> Result<String> {
        self.complete(summary_messages(skill_names, courses)).await
    }
}
