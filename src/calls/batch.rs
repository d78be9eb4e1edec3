// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::{CallResult, CallSpec};
use crate::errors::ConfigError;
use crate::observability::messages::config::DuplicateNamespace;
use crate::observability::messages::StructuredLog;

/// The calls registered for one incoming request and the results they settled with.
///
/// Created empty for every request, filled by upstream stages, dispatched once by
/// the fan-out dispatcher and read by everything after it. Never shared between
/// requests.
#[derive(Debug, Default)]
pub struct RequestBatch {
    specs: Vec<CallSpec>,
    results: HashMap<String, CallResult>,
}

impl RequestBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a call.
    ///
    /// Calls missing required fields are rejected here. A namespace already in the
    /// batch is accepted; whichever of the two settles last owns the key.
    pub fn push(&mut self, spec: CallSpec) -> Result<(), ConfigError> {
        spec.validate()?;
        if self.specs.iter().any(|s| s.namespace == spec.namespace) {
            DuplicateNamespace {
                namespace: &spec.namespace,
                path: &spec.path,
            }
            .log();
        }
        self.specs.push(spec);
        Ok(())
    }

    pub fn specs(&self) -> &[CallSpec] {
        &self.specs
    }

    pub(crate) fn specs_mut(&mut self) -> &mut [CallSpec] {
        &mut self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn result(&self, namespace: &str) -> Option<&CallResult> {
        self.results.get(namespace)
    }

    pub fn results(&self) -> &HashMap<String, CallResult> {
        &self.results
    }

    /// Namespaces registered but not yet settled.
    pub fn pending(&self) -> Vec<&str> {
        self.specs
            .iter()
            .map(|s| s.namespace.as_str())
            .filter(|ns| !self.results.contains_key(*ns))
            .collect()
    }

    /// Every registered call has a result.
    pub fn is_complete(&self) -> bool {
        self.pending().is_empty()
    }

    pub(crate) fn record(&mut self, namespace: String, result: CallResult) {
        self.results.insert(namespace, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::ApiResponse;
    use crate::errors::CallFailure;
    use serde_json::json;

    #[test]
    fn push_rejects_incomplete_specs() {
        let mut batch = RequestBatch::new();
        assert!(batch.push(CallSpec::new("profile", "")).is_err());
        assert!(batch.is_empty());
    }

    #[test]
    fn duplicate_namespace_is_accepted_and_last_write_wins() {
        let mut batch = RequestBatch::new();
        batch.push(CallSpec::new("nav", "/api/nav/a")).unwrap();
        batch.push(CallSpec::new("nav", "/api/nav/b")).unwrap();
        assert_eq!(batch.len(), 2);

        batch.record("nav".into(), CallResult::Success(ApiResponse::ok("/api/nav/a", json!("a"))));
        batch.record("nav".into(), CallResult::Success(ApiResponse::ok("/api/nav/b", json!("b"))));

        assert_eq!(batch.results().len(), 1);
        assert_eq!(batch.result("nav").and_then(|r| r.body()), Some(&json!("b")));
        assert!(batch.is_complete());
    }

    #[test]
    fn pending_lists_unsettled_namespaces() {
        let mut batch = RequestBatch::new();
        batch.push(CallSpec::new("profile", "/api/profile")).unwrap();
        batch.push(CallSpec::new("nav", "/api/globalnav")).unwrap();
        assert_eq!(batch.pending(), vec!["profile", "nav"]);

        batch.record(
            "nav".into(),
            CallResult::Failure(CallFailure::Network {
                url: "http://x/api/globalnav".into(),
                message: "refused".into(),
            }),
        );
        assert_eq!(batch.pending(), vec!["profile"]);
        assert!(!batch.is_complete());
    }

    #[test]
    fn empty_batch_is_complete() {
        assert!(RequestBatch::new().is_complete());
    }
}
