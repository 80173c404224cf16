// SPDX-License-Identifier: MIT

//! Puzzle generation gateway - multi-provider LLM invocation layer
//!
//! This module provides the shared contract types and the gateway itself.
//! Adapter implementations are in their own submodules:
//! - [anthropic] - Anthropic's messages API
//! - [chat] - OpenAI-compatible chat completions (OpenAI, DeepSeek, Ollama, Groq)
//! - [google] - Google's Gemini generateContent API
//!
//! The gateway's one operation, [`PuzzleGateway::generate_puzzle`], is total:
//! every failure is logged and folded into the sentinel [`PuzzleData`], so
//! callers render the result uniformly and never branch on an error type.

pub mod anthropic;
pub mod chat;
pub mod error;
pub mod google;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

pub use error::GatewayError;

use anthropic::AnthropicAdapter;
use chat::ChatCompletionAdapter;
use google::GoogleAdapter;

/// Sampling floor applied to every provider call; lower temperatures produce
/// repetitive, low-quality puzzles.
pub const MIN_TEMPERATURE: f64 = 0.7;

/// Budget for a single provider attempt. One attempt per invocation, no retries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Game topics offered on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topic {
    Movies,
    Food,
    Animals,
    Actions,
    #[serde(rename = "Daily Objects")]
    DailyObjects,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Movies,
        Topic::Food,
        Topic::Animals,
        Topic::Actions,
        Topic::DailyObjects,
    ];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::Movies => "Movies",
            Topic::Food => "Food",
            Topic::Animals => "Animals",
            Topic::Actions => "Actions",
            Topic::DailyObjects => "Daily Objects",
        };
        f.write_str(name)
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movies" => Ok(Topic::Movies),
            "food" => Ok(Topic::Food),
            "animals" => Ok(Topic::Animals),
            "actions" => Ok(Topic::Actions),
            "objects" | "daily objects" | "daily-objects" => Ok(Topic::DailyObjects),
            other => Err(format!(
                "unknown topic '{other}' (expected movies, food, animals, actions or objects)"
            )),
        }
    }
}

/// Target language for generated puzzles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Language {
    /// Name used inside prompts to tell the model which language to answer in.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::ZhCn => "Chinese (Simplified)",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh-cn" | "zh" | "cn" | "chinese" => Ok(Language::ZhCn),
            other => Err(format!("unknown language '{other}' (expected en or zh-CN)")),
        }
    }
}

/// The closed set of supported provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    OpenAi,
    DeepSeek,
    Anthropic,
    Ollama,
    Groq,
}

/// Per-provider connection defaults, looked up by provider key.
pub struct ProviderDefaults {
    pub label: &'static str,
    pub base_url: &'static str,
    pub model: &'static str,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::Google,
        Provider::OpenAi,
        Provider::DeepSeek,
        Provider::Anthropic,
        Provider::Ollama,
        Provider::Groq,
    ];

    /// The stable lowercase key, as stored in settings files.
    pub fn key(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAi => "openai",
            Provider::DeepSeek => "deepseek",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
            Provider::Groq => "groq",
        }
    }

    pub fn defaults(self) -> ProviderDefaults {
        match self {
            // base_url is unused for Google; the adapter has its own endpoint.
            Provider::Google => ProviderDefaults {
                label: "Google Gemini",
                base_url: "",
                model: "gemini-2.5-flash",
            },
            Provider::OpenAi => ProviderDefaults {
                label: "OpenAI",
                base_url: "https://api.openai.com/v1",
                model: "gpt-4o-mini",
            },
            Provider::DeepSeek => ProviderDefaults {
                label: "DeepSeek",
                base_url: "https://api.deepseek.com/v1",
                model: "deepseek-chat",
            },
            Provider::Anthropic => ProviderDefaults {
                label: "Anthropic Claude",
                base_url: "https://api.anthropic.com/v1",
                model: "claude-3-5-sonnet-20241022",
            },
            Provider::Ollama => ProviderDefaults {
                label: "Ollama (local)",
                base_url: "http://localhost:11434/v1",
                model: "llama3.1",
            },
            Provider::Groq => ProviderDefaults {
                label: "Groq",
                base_url: "https://api.groq.com/openai/v1",
                model: "llama-3.3-70b-versatile",
            },
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" => Ok(Provider::Google),
            "openai" => Ok(Provider::OpenAi),
            "deepseek" => Ok(Provider::DeepSeek),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "ollama" => Ok(Provider::Ollama),
            "groq" => Ok(Provider::Groq),
            other => Err(format!(
                "unknown provider '{other}' (expected google, openai, deepseek, anthropic, ollama or groq)"
            )),
        }
    }
}

/// A named connection profile for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    /// May be empty; Google falls back to the gateway's default credential,
    /// HTTP providers send no auth header (local endpoints) or let the
    /// provider reject the request.
    #[serde(default)]
    pub api_key: String,
    /// HTTP origin for the chat-completion and messages adapters. Unused by Google.
    #[serde(default)]
    pub base_url: String,
    pub model_name: String,
}

impl ModelConfig {
    /// A fresh config seeded from the provider's defaults.
    pub fn for_provider(provider: Provider, name: impl Into<String>) -> Self {
        let defaults = provider.defaults();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            provider,
            api_key: String::new(),
            base_url: defaults.base_url.to_string(),
            model_name: defaults.model.to_string(),
        }
    }

    /// The config every new installation starts with. Uses the gateway's
    /// default credential rather than a stored key.
    pub fn default_gemini() -> Self {
        Self {
            id: "default-gemini".to_string(),
            name: "Default (Gemini)".to_string(),
            provider: Provider::Google,
            api_key: String::new(),
            base_url: String::new(),
            model_name: Provider::Google.defaults().model.to_string(),
        }
    }
}

/// A generated puzzle. Immutable once returned; discarded when the next
/// round starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleData {
    pub emojis: String,
    pub answer: String,
    pub acceptable_answers: Vec<String>,
    pub hint: String,
}

impl PuzzleData {
    /// The fixed fallback substituted for any failure. The hint carries the
    /// underlying error message so the player sees why generation failed.
    pub fn error_fallback(message: &str) -> Self {
        Self {
            emojis: "⚠️🤖".to_string(),
            answer: "Error".to_string(),
            acceptable_answers: Vec::new(),
            hint: format!("Model error: {message}. Check settings."),
        }
    }

    pub fn is_error(&self) -> bool {
        self.answer == "Error"
    }
}

/// Per-provider strategy mapping the canonical request into a provider's wire
/// format and back. Returns the raw text the model produced, expected to be a
/// JSON object in the puzzle shape.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    async fn invoke(
        &self,
        prompt: &str,
        temperature: f64,
        config: &ModelConfig,
    ) -> Result<String, GatewayError>;
}

/// The temperature actually sent to a provider.
pub fn effective_temperature(creativity: f64) -> f64 {
    creativity.max(MIN_TEMPERATURE)
}

/// Provider-agnostic instruction payload. Adapters decide whether it travels
/// as a system message or a single content blob.
fn build_prompt(topic: Topic, language: Language, seed: u32) -> String {
    format!(
        "You are a creative game master.\n\
         Generate a unique emoji puzzle.\n\
         Topic: \"{topic}\"\n\
         Target Language: {lang}\n\
         Random Seed: {seed}\n\n\
         Strategies:\n\
         1. Roll internally for sub-genre and difficulty (Easy/Medium/Hard).\n\
         2. Pick an entity that is NOT a cliché.\n\
         3. Output JSON.\n\n\
         Format: JSON matching {{ emojis, answer, acceptable_answers, hint }}.\n\
         Diversity Rule: Do NOT repeat recent outputs.",
        lang = language.display_name(),
    )
}

/// Parse raw model output into a typed puzzle. A missing or mistyped field is
/// a parse failure, never silently default-filled.
fn parse_puzzle(raw: &str) -> Result<PuzzleData, GatewayError> {
    if raw.trim().is_empty() {
        return Err(GatewayError::NoValidResponse);
    }
    Ok(serde_json::from_str(raw)?)
}

/// The puzzle generation gateway. Stateless per invocation; holds only the
/// shared HTTP client and the process-level default Google credential, which
/// is injected here instead of read from the environment inside the adapter.
pub struct PuzzleGateway {
    client: Client,
    default_google_key: Option<String>,
}

impl PuzzleGateway {
    pub fn new(default_google_key: Option<String>) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            default_google_key,
        })
    }

    /// Generate one puzzle. This never fails: any error in prompt dispatch,
    /// transport, HTTP status or parsing is logged and converted into the
    /// sentinel puzzle. Exactly one provider call is attempted.
    pub async fn generate_puzzle(
        &self,
        topic: Topic,
        language: Language,
        creativity: f64,
        config: &ModelConfig,
    ) -> PuzzleData {
        match self.try_generate(topic, language, creativity, config).await {
            Ok(puzzle) => puzzle,
            Err(err) => {
                log::error!(
                    "puzzle generation via {} ({}) failed: {}",
                    config.provider,
                    config.model_name,
                    err
                );
                PuzzleData::error_fallback(&err.to_string())
            }
        }
    }

    async fn try_generate(
        &self,
        topic: Topic,
        language: Language,
        creativity: f64,
        config: &ModelConfig,
    ) -> Result<PuzzleData, GatewayError> {
        // Anti-repetition entropy; a fresh seed per invocation.
        let seed = rand::thread_rng().gen_range(0..1_000_000);
        let prompt = build_prompt(topic, language, seed);
        let temperature = effective_temperature(creativity);

        log::debug!(
            "generating puzzle: topic={} language={} temperature={} provider={}",
            topic,
            language.display_name(),
            temperature,
            config.provider
        );

        let raw = self
            .adapter_for(config.provider)
            .invoke(&prompt, temperature, config)
            .await?;
        parse_puzzle(&raw)
    }

    fn adapter_for(&self, provider: Provider) -> Box<dyn ProviderAdapter> {
        match provider {
            Provider::Google => Box::new(GoogleAdapter::new(
                self.client.clone(),
                self.default_google_key.clone(),
            )),
            Provider::OpenAi | Provider::DeepSeek | Provider::Ollama | Provider::Groq => {
                Box::new(ChatCompletionAdapter::new(self.client.clone()))
            }
            Provider::Anthropic => Box::new(AnthropicAdapter::new(self.client.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_floor() {
        assert_eq!(effective_temperature(0.2), 0.7);
        assert_eq!(effective_temperature(0.0), 0.7);
        assert_eq!(effective_temperature(0.7), 0.7);
        assert_eq!(effective_temperature(0.9), 0.9);
        assert_eq!(effective_temperature(1.0), 1.0);
    }

    #[test]
    fn test_prompt_carries_topic_language_and_seed() {
        let prompt = build_prompt(Topic::Movies, Language::En, 42);
        assert!(prompt.contains("Topic: \"Movies\""));
        assert!(prompt.contains("Target Language: English"));
        assert!(prompt.contains("Random Seed: 42"));
        assert!(prompt.contains("Do NOT repeat recent outputs"));
    }

    #[test]
    fn test_prompt_uses_chinese_display_name() {
        let prompt = build_prompt(Topic::Food, Language::ZhCn, 7);
        assert!(prompt.contains("Target Language: Chinese (Simplified)"));
    }

    #[test]
    fn test_parse_puzzle_round_trip() {
        let raw = r#"{"emojis":"🎬👽","answer":"Alien","acceptable_answers":["Alien (1979)"],"hint":"A horror film in space"}"#;
        let puzzle = parse_puzzle(raw).unwrap();
        assert_eq!(puzzle.emojis, "🎬👽");
        assert_eq!(puzzle.answer, "Alien");
        assert_eq!(puzzle.acceptable_answers, vec!["Alien (1979)".to_string()]);
        assert_eq!(puzzle.hint, "A horror film in space");

        let back = serde_json::to_value(&puzzle).unwrap();
        assert_eq!(
            back,
            serde_json::from_str::<serde_json::Value>(raw).unwrap()
        );
    }

    #[test]
    fn test_parse_puzzle_rejects_missing_field() {
        // No hint - must fail the typed parse, not default-fill.
        let raw = r#"{"emojis":"🦁","answer":"Lion","acceptable_answers":[]}"#;
        assert!(matches!(
            parse_puzzle(raw),
            Err(GatewayError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_parse_puzzle_rejects_empty_text() {
        assert!(matches!(
            parse_puzzle("  \n"),
            Err(GatewayError::NoValidResponse)
        ));
    }

    #[test]
    fn test_error_fallback_shape() {
        let sentinel = PuzzleData::error_fallback("No valid response from model");
        assert_eq!(sentinel.emojis, "⚠️🤖");
        assert_eq!(sentinel.answer, "Error");
        assert!(sentinel.acceptable_answers.is_empty());
        assert!(sentinel.hint.contains("No valid response from model"));
        assert!(sentinel.is_error());
    }

    #[test]
    fn test_provider_serde_keys() {
        for provider in Provider::ALL {
            let json = serde_json::to_string(&provider).unwrap();
            assert_eq!(json, format!("\"{}\"", provider.key()));
            let back: Provider = serde_json::from_str(&json).unwrap();
            assert_eq!(back, provider);
        }
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("Claude".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("bedrock".parse::<Provider>().is_err());
    }

    #[test]
    fn test_topic_display_matches_wire_text() {
        assert_eq!(Topic::DailyObjects.to_string(), "Daily Objects");
        assert_eq!(
            serde_json::to_string(&Topic::DailyObjects).unwrap(),
            "\"Daily Objects\""
        );
    }

    #[test]
    fn test_config_for_provider_seeds_defaults() {
        let config = ModelConfig::for_provider(Provider::Groq, "My Groq");
        assert_eq!(config.provider, Provider::Groq);
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.model_name, "llama-3.3-70b-versatile");
        assert!(config.api_key.is_empty());
        assert!(!config.id.is_empty());
    }
}
