//! OpenAI chat completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{handle_response, request_error};
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::error::{ExternalServiceError, Service};

pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    n: u32,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            n: request.n,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<String>, ExternalServiceError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatRequest::new(&self.model, request))
            .send()
            .await
            .map_err(request_error(Service::Completion))?;

        let body: ChatResponse = handle_response(Service::Completion, response).await?;

        Ok(body
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_system_and_user_messages() {
        let request = CompletionRequest {
            system: "You are a copywriter.".to_string(),
            prompt: "Write a post".to_string(),
            n: 3,
            max_tokens: 280,
            temperature: 0.7,
        };

        let json = serde_json::to_value(ChatRequest::new("gpt-4", &request)).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["n"], 3);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Write a post");
    }

    #[test]
    fn null_content_parses_as_none() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "hi"}}, {"message": {"content": null}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices.len(), 2);
        assert!(body.choices[1].message.content.is_none());
    }
}
