// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::Header;
use crate::errors::CallFailure;

/// Response metadata plus the decoded body of a successful call.
///
/// Live and stubbed calls produce the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Path the request was sent to, as issued.
    pub request_path: String,
    /// Custom headers the request carried.
    pub request_headers: Vec<Header>,
    pub headers: Vec<Header>,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(request_path: impl Into<String>, body: Value) -> Self {
        Self {
            status: 200,
            request_path: request_path.into(),
            request_headers: Vec::new(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// The settled outcome of exactly one [`CallSpec`](super::CallSpec).
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    Success(ApiResponse),
    Failure(CallFailure),
}

impl CallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CallResult::Success(_))
    }

    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            CallResult::Success(response) => Some(response),
            CallResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&CallFailure> {
        match self {
            CallResult::Success(_) => None,
            CallResult::Failure(failure) => Some(failure),
        }
    }

    pub fn body(&self) -> Option<&Value> {
        self.response().map(|r| &r.body)
    }

    pub fn body_mut(&mut self) -> Option<&mut Value> {
        match self {
            CallResult::Success(response) => Some(&mut response.body),
            CallResult::Failure(_) => None,
        }
    }
}

impl From<Result<ApiResponse, CallFailure>> for CallResult {
    fn from(outcome: Result<ApiResponse, CallFailure>) -> Self {
        match outcome {
            Ok(response) => CallResult::Success(response),
            Err(failure) => CallResult::Failure(failure),
        }
    }
}
