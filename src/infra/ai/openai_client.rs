use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::core::analysis::{AnalysisConfig, AnalysisError, ChatMessage, CompletionProvider};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn chat_complete(
        &self,
        messages: &[ChatMessage],
        config: &AnalysisConfig,
    ) -> Result<String, AnalysisError> {
        let payload = json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
        });

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AnalysisError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| AnalysisError::Api(e.to_string()))?;
            return Err(AnalysisError::Api(format!(
                "OpenAI API error: {} - {}",
                status, text
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::Api(e.to_string()))?;

        // Extract content
        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AnalysisError::Api("Failed to parse response content".to_string()))?
            .to_string();

        Ok(content)
    }
}
