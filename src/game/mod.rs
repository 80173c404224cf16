// SPDX-License-Identifier: MIT

//! Game-side state: settings, statistics, guess checking and UI text

pub mod engine;
pub mod settings;
pub mod stats;
pub mod text;

use thiserror::Error;

/// Errors from settings/stats management. The puzzle gateway never surfaces
/// these; they belong to the local stores and the config CLI.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("the last remaining model config cannot be deleted")]
    LastConfig,

    #[error("no model config with id '{0}'")]
    UnknownConfig(String),

    #[error("'{0}' is not a valid base URL")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
