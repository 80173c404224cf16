//! Anthropic messages API adapter

use super::error::GatewayError;
use super::{ModelConfig, Provider, ProviderAdapter};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

pub struct AnthropicAdapter {
    client: Client,
}

impl AnthropicAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build_body(prompt: &str, temperature: f64, model: &str) -> Value {
        json!({
            "model": model,
            "max_tokens": MAX_TOKENS,
            "system": format!("{prompt} Return ONLY valid JSON."),
            "messages": [{ "role": "user", "content": "Generate puzzle." }],
            "temperature": temperature
        })
    }

    fn extract_text(response: &Value) -> Result<String, GatewayError> {
        response["content"][0]["text"]
            .as_str()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or(GatewayError::NoValidResponse)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    async fn invoke(
        &self,
        prompt: &str,
        temperature: f64,
        config: &ModelConfig,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/messages", config.base_url.trim_end_matches('/'));
        let body = Self::build_body(prompt, temperature, &config.model_name);

        log::debug!(
            "Anthropic request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        // The key is sent as-is, even when empty; the provider's HTTP
        // rejection is the real validation.
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(GatewayError::Http {
                provider: Provider::Anthropic,
                status: status.as_u16(),
                body: text,
            });
        }

        let resp_json: Value = resp.json().await?;
        log::debug!("Anthropic response: {}", resp_json);

        Self::extract_text(&resp_json)
    }
}
