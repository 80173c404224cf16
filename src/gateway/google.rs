// SPDX-License-Identifier: MIT

//! Google Gemini adapter - generateContent API with a declared output schema

use super::error::GatewayError;
use super::{ModelConfig, Provider, ProviderAdapter};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Structured-output schema declared to Gemini so the model emits puzzle JSON
/// directly instead of prose around it.
static PUZZLE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "emojis": { "type": "STRING", "description": "A sequence of 2-5 emojis." },
            "answer": { "type": "STRING", "description": "The primary answer." },
            "acceptable_answers": { "type": "ARRAY", "items": { "type": "STRING" } },
            "hint": { "type": "STRING", "description": "A hint." }
        },
        "required": ["emojis", "answer", "acceptable_answers", "hint"]
    })
});

/// Gemini adapter. Ignores `base_url`; the API origin is fixed unless
/// overridden through [`GoogleAdapter::with_endpoint`] (proxies, tests).
pub struct GoogleAdapter {
    client: Client,
    default_api_key: Option<String>,
    endpoint: String,
}

impl GoogleAdapter {
    pub fn new(client: Client, default_api_key: Option<String>) -> Self {
        Self {
            client,
            default_api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Config credential wins; the gateway-level default is the fallback.
    fn resolve_api_key<'a>(&'a self, config: &'a ModelConfig) -> Result<&'a str, GatewayError> {
        if !config.api_key.is_empty() {
            return Ok(&config.api_key);
        }
        match self.default_api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(GatewayError::MissingCredential(Provider::Google)),
        }
    }

    fn extract_text(response: &Value) -> Result<String, GatewayError> {
        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or(GatewayError::NoValidResponse)
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    async fn invoke(
        &self,
        prompt: &str,
        temperature: f64,
        config: &ModelConfig,
    ) -> Result<String, GatewayError> {
        let api_key = self.resolve_api_key(config)?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, config.model_name, api_key
        );

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": PUZZLE_SCHEMA.clone(),
                "temperature": temperature
            }
        });

        log::debug!(
            "Gemini request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(GatewayError::Http {
                provider: Provider::Google,
                status: status.as_u16(),
                body: text,
            });
        }

        let resp_json: Value = resp.json().await?;
        log::debug!("Gemini response: {}", resp_json);

        Self::extract_text(&resp_json)
    }
}
