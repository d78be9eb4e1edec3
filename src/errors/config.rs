// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Problems found while loading configuration or registering calls.
///
/// These are raised before a request is served (config load, runtime build) or at
/// the moment a call is pushed into a batch, never mid-flight.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config format: {} (expected .yaml, .yml or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The merged configuration did not fit the expected shape.
    #[error("invalid configuration: {0}")]
    Shape(String),

    #[error("{owner} is missing required field '{field}'")]
    MissingField { owner: String, field: &'static str },

    #[error("nodule '{nodule}' registers namespace '{namespace}' more than once")]
    DuplicateNamespace { nodule: String, namespace: String },

    #[error("route {verb} {route} is registered by both '{first}' and '{second}'")]
    DuplicateRoute {
        verb: String,
        route: String,
        first: String,
        second: String,
    },

    #[error("nodule name '{0}' is used more than once")]
    DuplicateNodule(String),

    #[error("{owner} has a zero timeout")]
    InvalidTimeout { owner: String },

    #[error("no nodule named '{0}'")]
    UnknownNodule(String),

    /// Every problem found by a validation pass.
    #[error("configuration validation failed:\n{}", format_all(.0))]
    Invalid(Vec<ConfigError>),
}

fn format_all(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
