// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{Map, Value};

use crate::calls::{ApiResponse, BodyType, CallSpec, Header, Verb};
use crate::errors::CallFailure;
use crate::traits::Transport;

/// Outbound calls over HTTP.
///
/// The URL is the call's host (or the default host) plus its path; hosts without
/// a scheme get `http://`. `get` and `del` send params as a query string, `post`
/// and `put` as a JSON or form-encoded body.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
    default_host: Option<String>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            default_host: None,
        }
    }

    /// Used for calls that still have no host after the before-call hook.
    pub fn with_default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = Some(host.into());
        self
    }

    fn url(&self, spec: &CallSpec) -> Result<String, CallFailure> {
        let host = spec
            .host
            .as_deref()
            .or(self.default_host.as_deref())
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| CallFailure::InvalidTarget {
                path: spec.path.clone(),
                message: "no host configured".to_string(),
            })?
            .trim_end_matches('/');

        let base = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };
        if spec.path.starts_with('/') {
            Ok(format!("{}{}", base, spec.path))
        } else {
            Ok(format!("{}/{}", base, spec.path))
        }
    }

    fn request(&self, spec: &CallSpec) -> Result<(String, RequestBuilder), CallFailure> {
        let url = self.url(spec)?;
        let method = match spec.verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Del => Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if spec.verb.has_body() {
            builder = match spec.body_type {
                BodyType::Json => builder.json(&spec.params),
                BodyType::Form => builder.form(&flatten(&spec.params)),
            };
        } else if !spec.params.is_empty() {
            builder = builder.query(&flatten(&spec.params));
        }
        for header in &spec.custom_headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        Ok((url, builder))
    }
}

/// Params as name/value pairs; strings as is, everything else as JSON text.
fn flatten(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), value)
        })
        .collect()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, spec: &CallSpec) -> Result<ApiResponse, CallFailure> {
        let (url, builder) = self.request(spec)?;
        let network = |e: reqwest::Error| CallFailure::Network {
            url: url.clone(),
            message: e.to_string(),
        };

        let response = builder.send().await.map_err(network)?;
        let status = response.status();
        let headers: Vec<Header> = response
            .headers()
            .iter()
            .map(|(name, value)| Header::new(name.as_str(), value.to_str().unwrap_or_default()))
            .collect();
        let text = response.text().await.map_err(network)?;

        if !status.is_success() {
            return Err(CallFailure::Status {
                url,
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| CallFailure::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            request_path: spec.path.clone(),
            request_headers: spec.custom_headers.clone(),
            headers,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
