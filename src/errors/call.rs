// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a single outbound call failed to produce a usable response.
///
/// A `CallFailure` is data, not control flow: the dispatcher stores it in the
/// call's `CallResult` and hands it to the completion hook, which decides whether
/// it matters for the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallFailure {
    /// Connection refused, reset, DNS failure and friends.
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },

    /// The call did not settle within its timeout.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16, body: String },

    /// The API answered 2xx but the body was not JSON.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The stub fixture could not be read or parsed.
    #[error("stub fixture {} unavailable: {message}", path.display())]
    Stub { path: PathBuf, message: String },

    /// No usable URL could be built from the call.
    #[error("cannot build a target for {path}: {message}")]
    InvalidTarget { path: String, message: String },
}

impl CallFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CallFailure::Timeout(_))
    }

    /// Status code attached to the failure, if the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CallFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
