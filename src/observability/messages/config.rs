// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading and call registration.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// Configuration loaded and merged over the defaults.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoaded<'a> {
    pub path: &'a Path,
    pub nodule_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} with {} nodules",
            self.path.display(),
            self.nodule_count
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            nodule_count = self.nodule_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("config", span_name = name, path = %self.path.display())
    }
}

/// A call was pushed under a namespace already present in the batch.
///
/// # Log Level
/// `warn!` - Probably a mistake, but allowed
pub struct DuplicateNamespace<'a> {
    pub namespace: &'a str,
    pub path: &'a str,
}

impl Display for DuplicateNamespace<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "namespace '{}' registered again by {}; the call settling last wins",
            self.namespace, self.path
        )
    }
}

impl StructuredLog for DuplicateNamespace<'_> {
    fn log(&self) {
        tracing::warn!(namespace = self.namespace, path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("duplicate_namespace", span_name = name, namespace = self.namespace)
    }
}
