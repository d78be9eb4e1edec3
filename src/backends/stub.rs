// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::calls::{ApiResponse, CallSpec};
use crate::errors::CallFailure;
use crate::traits::Transport;

/// A test transport that answers every call from memory and records what it was sent.
///
/// Unless configured otherwise, a call answers `200` with `{"path": <path>}`.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<CallSpec>>,
    bodies: HashMap<String, Value>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, CallFailure>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, path: &str, body: Value) -> Self {
        self.bodies.insert(path.to_string(), body);
        self
    }

    /// Hold the response for `path` back by `delay`.
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn failing(mut self, path: &str, failure: CallFailure) -> Self {
        self.failures.insert(path.to_string(), failure);
        self
    }

    /// Every spec received, in the order the calls were started.
    pub fn calls(&self) -> Vec<CallSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn call(&self, spec: &CallSpec) -> Result<ApiResponse, CallFailure> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(spec.clone());
        }

        if let Some(delay) = self.delays.get(&spec.path) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(failure) = self.failures.get(&spec.path) {
            return Err(failure.clone());
        }

        let body = self
            .bodies
            .get(&spec.path)
            .cloned()
            .unwrap_or_else(|| json!({ "path": spec.path }));
        Ok(ApiResponse {
            status: 200,
            request_path: spec.path.clone(),
            request_headers: spec.custom_headers.clone(),
            headers: Vec::new(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
