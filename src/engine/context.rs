// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::calls::{RequestBatch, Verb};
use crate::engine::Nodule;
use crate::traits::Flow;

/// The incoming request as the pipeline sees it.
///
/// Header names are stored lowercase. `params` holds the values captured by the
/// route's `:name` segments; `props` is scratch space for app middlewares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingRequest {
    pub verb: Verb,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub props: Map<String, Value>,
}

impl IncomingRequest {
    /// `path` may carry a query string; it is split off into `query`.
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        let raw: String = path.into();
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path.to_string(), parse_query(query)),
            None => (raw, HashMap::new()),
        };
        Self {
            verb,
            path,
            query,
            ..Self::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    pub fn set_prop(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(name.into(), value.into());
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// What a response carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    /// Handed to the template engine: the resolved template file and its data.
    Render { template: PathBuf, data: Value },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Body,
}

impl Response {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: Body::Json(body),
        }
    }

    pub fn render(template: PathBuf, data: Value) -> Self {
        Self {
            status: 200,
            body: Body::Render { template, data },
        }
    }

    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            body: Body::Text(text.into()),
        }
    }

    /// The only thing a client ever sees of a failed request.
    pub fn server_error() -> Self {
        Self::text(500, "500 Server Error")
    }

    pub fn content_type(&self) -> &'static str {
        match self.body {
            Body::Json(_) => "application/json",
            Body::Render { .. } => "text/html",
            Body::Text(_) => "text/plain",
        }
    }
}

/// Per-request state threaded through every pipeline stage.
#[derive(Debug)]
pub struct RequestContext {
    pub request: IncomingRequest,
    /// The nodule the router matched.
    pub nodule: Arc<Nodule>,
    pub batch: RequestBatch,
    /// API bodies by namespace plus anything stages add for rendering.
    pub locals: Map<String, Value>,
    /// Set by the post-processor to override what gets rendered.
    pub render_data: Option<Value>,
    pub response: Option<Response>,
}

impl RequestContext {
    pub fn new(request: IncomingRequest, nodule: Arc<Nodule>) -> Self {
        Self {
            request,
            nodule,
            batch: RequestBatch::new(),
            locals: Map::new(),
            render_data: None,
            response: None,
        }
    }

    /// Set the response and tell the pipeline to stop.
    pub fn respond(&mut self, response: Response) -> Flow {
        self.response = Some(response);
        Flow::Respond
    }
}
