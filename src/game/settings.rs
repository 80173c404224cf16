// SPDX-License-Identifier: MIT

//! Player settings and the model configuration list
//!
//! Settings persist as a YAML file in the store directory. After load the
//! config list always holds at least one entry and `active_config_id` always
//! points into it; deleting the last remaining config is rejected here, not
//! by the gateway.

use crate::game::GameError;
use crate::gateway::{Language, ModelConfig, Provider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

pub const MIN_CREATIVITY: f64 = 0.2;
pub const MAX_CREATIVITY: f64 = 1.0;

fn default_creativity() -> f64 {
    0.7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_creativity")]
    pub creativity: f64,
    #[serde(default)]
    pub model_configs: Vec<ModelConfig>,
    #[serde(default)]
    pub active_config_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        let config = ModelConfig::default_gemini();
        Self {
            language: Language::En,
            creativity: default_creativity(),
            active_config_id: config.id.clone(),
            model_configs: vec![config],
        }
    }
}

impl Settings {
    /// Repair a file written by an older version: an empty config list gets
    /// the default Gemini config, a dangling active id is re-pointed.
    fn migrate(mut self) -> Self {
        if self.model_configs.is_empty() {
            let config = ModelConfig::default_gemini();
            self.active_config_id = config.id.clone();
            self.model_configs.push(config);
        } else if !self.model_configs.iter().any(|c| c.id == self.active_config_id) {
            self.active_config_id = self.model_configs[0].id.clone();
        }
        self
    }

    pub fn active_config(&self) -> &ModelConfig {
        self.model_configs
            .iter()
            .find(|c| c.id == self.active_config_id)
            .unwrap_or(&self.model_configs[0])
    }

    /// Add a config seeded from the provider's defaults and make it active.
    /// Returns the new config's id.
    pub fn add_config(&mut self, provider: Provider, name: Option<String>) -> String {
        let name = name.unwrap_or_else(|| format!("New {}", provider.defaults().label));
        let config = ModelConfig::for_provider(provider, name);
        let id = config.id.clone();
        self.model_configs.push(config);
        self.active_config_id = id.clone();
        id
    }

    /// Switching provider re-seeds base URL and model from its defaults, like
    /// the settings form does.
    pub fn set_provider(&mut self, id: &str, provider: Provider) -> Result<(), GameError> {
        let config = self.config_mut(id)?;
        let defaults = provider.defaults();
        config.provider = provider;
        config.base_url = defaults.base_url.to_string();
        config.model_name = defaults.model.to_string();
        Ok(())
    }

    pub fn set_name(&mut self, id: &str, name: &str) -> Result<(), GameError> {
        self.config_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_api_key(&mut self, id: &str, api_key: &str) -> Result<(), GameError> {
        self.config_mut(id)?.api_key = api_key.to_string();
        Ok(())
    }

    pub fn set_base_url(&mut self, id: &str, base_url: &str) -> Result<(), GameError> {
        Url::parse(base_url).map_err(|_| GameError::InvalidBaseUrl(base_url.to_string()))?;
        self.config_mut(id)?.base_url = base_url.to_string();
        Ok(())
    }

    pub fn set_model_name(&mut self, id: &str, model_name: &str) -> Result<(), GameError> {
        self.config_mut(id)?.model_name = model_name.to_string();
        Ok(())
    }

    pub fn set_active(&mut self, id: &str) -> Result<(), GameError> {
        if !self.model_configs.iter().any(|c| c.id == id) {
            return Err(GameError::UnknownConfig(id.to_string()));
        }
        self.active_config_id = id.to_string();
        Ok(())
    }

    /// Deleting the last remaining config is rejected. Deleting the active
    /// config moves the active id to the first survivor.
    pub fn remove_config(&mut self, id: &str) -> Result<(), GameError> {
        if self.model_configs.len() <= 1 {
            return Err(GameError::LastConfig);
        }
        let index = self
            .model_configs
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| GameError::UnknownConfig(id.to_string()))?;
        self.model_configs.remove(index);
        if self.active_config_id == id {
            self.active_config_id = self.model_configs[0].id.clone();
        }
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_creativity(&mut self, value: f64) {
        self.creativity = value.clamp(MIN_CREATIVITY, MAX_CREATIVITY);
    }

    fn config_mut(&mut self, id: &str) -> Result<&mut ModelConfig, GameError> {
        self.model_configs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| GameError::UnknownConfig(id.to_string()))
    }
}

/// YAML-backed settings store.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file yields the defaults; the first save creates it.
    pub fn load(&self) -> Result<Settings, GameError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings.migrate())
    }

    pub fn save(&self, settings: &Settings) -> Result<(), GameError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(settings)?)?;
        Ok(())
    }
}
