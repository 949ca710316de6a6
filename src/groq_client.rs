// src/groq_client.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::{LlmClient, LlmError};
use crate::models::chat::ChatTurn;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: CompletionMessage,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GROQ_BASE_URL.to_string(),
        }
    }

    fn build_request(&self, messages: &[ChatTurn]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: GROQ_MODEL.to_string(),
            messages: messages
                .iter()
                .map(|turn| CompletionMessage {
                    role: turn.role.as_str().to_string(),
                    content: turn.content.clone(),
                })
                .collect(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.build_request(messages);

        tracing::debug!(
            message_count = request.messages.len(),
            model = %request.model,
            "sending chat completion to Groq"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Groq API error: {}", body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::MessageRole;

    #[test]
    fn request_carries_full_history_in_order() {
        let client = GroqClient::new("test-key".to_string());
        let turns = vec![
            ChatTurn {
                role: MessageRole::Assistant,
                content: "Hi! I'm Nyx. How can I help you today?".to_string(),
            },
            ChatTurn {
                role: MessageRole::User,
                content: "hi".to_string(),
            },
        ];

        let request = client.build_request(&turns);
        assert_eq!(request.model, GROQ_MODEL);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "assistant");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "hi");
    }
}
