// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::calls::{ApiResponse, CallSpec};
use crate::errors::CallFailure;
use crate::traits::Transport;

/// Answers stubbed calls from JSON files on disk.
///
/// The response has the same shape as a live one: status `200`, the call's path
/// and headers, and the file's contents as the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureTransport;

#[async_trait]
impl Transport for FixtureTransport {
    async fn call(&self, spec: &CallSpec) -> Result<ApiResponse, CallFailure> {
        let path = spec.stub_path.clone().ok_or_else(|| CallFailure::Stub {
            path: PathBuf::new(),
            message: format!("no stub path resolved for '{}'", spec.namespace),
        })?;

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CallFailure::Stub {
                path: path.clone(),
                message: e.to_string(),
            })?;
        let body: Value = serde_json::from_str(&content).map_err(|e| CallFailure::Stub {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(ApiResponse {
            status: 200,
            request_path: spec.path.clone(),
            request_headers: spec.custom_headers.clone(),
            headers: Vec::new(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
