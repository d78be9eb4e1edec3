// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::CallFailure;
use thiserror::Error;

/// What a completion hook gave as the reason for failing the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FatalCause {
    /// The call itself failed and nobody handled it.
    #[error(transparent)]
    Call(#[from] CallFailure),

    /// The call succeeded but the hook rejected the response.
    #[error("{0}")]
    Rejected(String),
}

/// A batch-fatal error, propagated once per batch.
///
/// Carries which call triggered it and the underlying cause so it can be logged
/// meaningfully wherever it ends up. Fatal verdicts from other calls in the same
/// batch are listed in `suppressed`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("API failed for {namespace} ({path}): {cause}")]
pub struct BatchFailure {
    pub namespace: String,
    pub path: String,
    #[source]
    pub cause: FatalCause,
    pub suppressed: Vec<String>,
}

impl BatchFailure {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>, cause: FatalCause) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            cause,
            suppressed: Vec::new(),
        }
    }

    /// The failed call's error, when the cause was a transport failure.
    pub fn call_failure(&self) -> Option<&CallFailure> {
        match &self.cause {
            FatalCause::Call(failure) => Some(failure),
            FatalCause::Rejected(_) => None,
        }
    }
}
