// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors that can occur while loading a processor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A debug trace pattern failed to compile.
    #[error("invalid trace pattern for '{tag}': {source}")]
    InvalidPattern {
        tag: String,
        #[source]
        source: regex::Error,
    },

    /// File extension is not one of yaml, yml, toml or json.
    #[error("unsupported config format: '{0}'")]
    UnsupportedFormat(String),
}
