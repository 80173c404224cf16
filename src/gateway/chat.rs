// SPDX-License-Identifier: MIT

//! OpenAI-compatible chat completions adapter
//!
//! Serves the openai, deepseek, ollama and groq provider keys; they share the
//! `/chat/completions` wire format and differ only in base URL and whether a
//! credential is required.

use super::error::GatewayError;
use super::{ModelConfig, ProviderAdapter};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

pub struct ChatCompletionAdapter {
    client: Client,
}

impl ChatCompletionAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build_body(prompt: &str, temperature: f64, model: &str) -> Value {
        json!({
            "model": model,
            "messages": [
                { "role": "system", "content": format!("{prompt} Return ONLY valid JSON.") },
                { "role": "user", "content": "Generate a new puzzle now." }
            ],
            "temperature": temperature,
            // JSON mode where the endpoint supports it; harmless elsewhere.
            "response_format": { "type": "json_object" }
        })
    }

    fn extract_content(response: &Value) -> Result<String, GatewayError> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string)
            .ok_or(GatewayError::NoValidResponse)
    }
}

#[async_trait]
impl ProviderAdapter for ChatCompletionAdapter {
    async fn invoke(
        &self,
        prompt: &str,
        temperature: f64,
        config: &ModelConfig,
    ) -> Result<String, GatewayError> {
        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let body = Self::build_body(prompt, temperature, &config.model_name);

        log::debug!(
            "chat completion request to {}: {}",
            url,
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let mut request = self.client.post(&url).json(&body);
        // Some endpoints are unauthenticated (local inference); only attach
        // the bearer token when a credential is actually set.
        if !config.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", config.api_key));
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(GatewayError::Http {
                provider: config.provider,
                status: status.as_u16(),
                body: text,
            });
        }

        let resp_json: Value = resp.json().await?;
        log::debug!("chat completion response: {}", resp_json);

        Self::extract_content(&resp_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_shape() {
        let body = ChatCompletionAdapter::build_body("Make a puzzle.", 0.7, "gpt-4o-mini");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["response_format"]["type"], "json_object");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(
            messages[0]["content"],
            "Make a puzzle. Return ONLY valid JSON."
        );
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Generate a new puzzle now.");
    }

    #[test]
    fn test_extract_content() {
        let response = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "{\"emojis\":\"🦁\"}" }
            }]
        });
        assert_eq!(
            ChatCompletionAdapter::extract_content(&response).unwrap(),
            "{\"emojis\":\"🦁\"}"
        );
    }

    #[test]
    fn test_extract_content_null_fails() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        });
        assert!(matches!(
            ChatCompletionAdapter::extract_content(&response),
            Err(GatewayError::NoValidResponse)
        ));
    }

    #[test]
    fn test_extract_content_no_choices_fails() {
        let response = json!({ "choices": [] });
        assert!(matches!(
            ChatCompletionAdapter::extract_content(&response),
            Err(GatewayError::NoValidResponse)
        ));
    }
}
