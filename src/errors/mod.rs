// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for every layer of the request lifecycle.
//!
//! * [`CallFailure`] - one outbound call did not produce a usable response. Always
//!   reified into a `CallResult`, never raised by the dispatcher on its own.
//! * [`BatchFailure`] - a completion hook declared a call fatal for the whole batch.
//! * [`ConfigError`] - configuration or registration problems, surfaced before any
//!   request is served.
//! * [`YukonError`] - what a pipeline stage hands back to the runtime.

mod batch;
mod call;
mod config;

pub use batch::{BatchFailure, FatalCause};
pub use call::CallFailure;
pub use config::ConfigError;

use thiserror::Error;

/// Top-level error produced while handling one request.
#[derive(Error, Debug)]
pub enum YukonError {
    #[error(transparent)]
    Batch(#[from] BatchFailure),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A nodule pre- or post-processor rejected the request.
    #[error("nodule '{nodule}' {stage} failed: {message}")]
    Nodule {
        nodule: String,
        stage: &'static str,
        message: String,
    },

    /// An app-defined middleware failed.
    #[error("middleware '{stage}' failed: {message}")]
    Middleware { stage: String, message: String },

    #[error("no nodule registered for {verb} {path}")]
    NotFound { verb: String, path: String },
}

impl YukonError {
    pub fn nodule(nodule: impl Into<String>, stage: &'static str, message: impl Into<String>) -> Self {
        Self::Nodule {
            nodule: nodule.into(),
            stage,
            message: message.into(),
        }
    }

    pub fn middleware(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Middleware {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// HTTP status the runtime answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            YukonError::NotFound { .. } => 404,
            _ => 500,
        }
    }
}
