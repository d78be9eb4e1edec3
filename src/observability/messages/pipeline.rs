// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for request routing and the middleware pipeline.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A request matched a nodule.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct RequestRouted<'a> {
    pub verb: &'a str,
    pub path: &'a str,
    pub nodule: &'a str,
}

impl Display for RequestRouted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {} -> nodule '{}'", self.verb, self.path, self.nodule)
    }
}

impl StructuredLog for RequestRouted<'_> {
    fn log(&self) {
        tracing::debug!(verb = self.verb, path = self.path, nodule = self.nodule, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "request",
            span_name = name,
            verb = self.verb,
            path = self.path,
            nodule = self.nodule,
        )
    }
}

/// A pipeline stage is about to run.
///
/// # Log Level
/// `trace!` - Very chatty
pub struct StageEntered<'a> {
    pub nodule: &'a str,
    pub stage: &'a str,
}

impl Display for StageEntered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} called for nodule '{}'", self.stage, self.nodule)
    }
}

impl StructuredLog for StageEntered<'_> {
    fn log(&self) {
        tracing::trace!(nodule = self.nodule, stage = self.stage, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("stage", span_name = name, stage = self.stage)
    }
}

/// A request ended in the error handler.
///
/// # Log Level
/// `error!` for 5xx, `warn!` otherwise
pub struct RequestFailed<'a> {
    pub path: &'a str,
    pub status: u16,
    pub error: &'a dyn std::error::Error,
}

impl Display for RequestFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} answered {}: {}", self.path, self.status, self.error)
    }
}

impl StructuredLog for RequestFailed<'_> {
    fn log(&self) {
        if self.status >= 500 {
            tracing::error!(path = self.path, status = self.status, error = %self.error, "{}", self);
        } else {
            tracing::warn!(path = self.path, status = self.status, error = %self.error, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "request_failed",
            span_name = name,
            path = self.path,
            status = self.status,
        )
    }
}
