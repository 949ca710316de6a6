// src/gemini_client.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::{LlmClient, LlmError};
use crate::models::chat::{ChatTurn, MessageRole};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    // Gemini labels assistant turns "model" on the wire.
    fn to_content(turn: &ChatTurn) -> Content {
        let role = match turn.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        };
        Content {
            parts: vec![Part {
                text: turn.content.clone(),
            }],
            role: Some(role.to_string()),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );

        let request = GenerateContentRequest {
            contents: messages.iter().map(Self::to_content).collect(),
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 2000,
            },
        };

        tracing::debug!(
            message_count = request.contents.len(),
            model = GEMINI_MODEL,
            "sending generateContent to Gemini"
        );

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Gemini API error: {}", body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateContentResponse = response.json().await?;
        let reply = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_role_maps_to_model() {
        let turn = ChatTurn {
            role: MessageRole::Assistant,
            content: "hello".to_string(),
        };
        let content = GeminiClient::to_content(&turn);
        assert_eq!(content.role.as_deref(), Some("model"));
        assert_eq!(content.parts[0].text, "hello");
    }

    #[test]
    fn user_role_stays_user() {
        let turn = ChatTurn {
            role: MessageRole::User,
            content: "hi".to_string(),
        };
        assert_eq!(GeminiClient::to_content(&turn).role.as_deref(), Some("user"));
    }
}
