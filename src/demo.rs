// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A small app built on yukon, used by the `yukon` binary and the end-to-end tests.
//!
//! * `start` detects the device type from the user agent.
//! * `pre_data` adds a global navigation call to every HTML page unless the nodule
//!   sets `suppress_nav`.
//! * [`DemoHooks`] gives calls a default host and an `x-device-type` header, fails
//!   the request on unhandled API errors and stamps `systemMsg` on every success.
//! * `post_data` and `finish` pass the device type on to the navigation data and
//!   the rendered page.

use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;

use crate::calls::{CallResult, CallSpec};
use crate::config::ContentType;
use crate::engine::resolve::{resolve_content_type, resolve_stub_path};
use crate::engine::{AppMiddlewares, IncomingRequest, RequestContext};
use crate::errors::YukonError;
use crate::traits::{from_fn, CallHooks, Flow, SettledCall, Verdict};

pub const DEVICE_TYPE: &str = "deviceType";
pub const GLOBAL_NAV: &str = "globalNav";
pub const GLOBAL_NAV_PATH: &str = "/api/globalnav";
pub const GLOBAL_NAV_STUB: &str = "globalnav.stub.json";

/// Rough device detection from a user agent.
pub fn device_type(user_agent: &str) -> &'static str {
    let agent = user_agent.to_ascii_lowercase();
    if agent.contains("android") {
        "Android"
    } else if agent.contains("iphone") {
        "iPhone"
    } else if agent.contains("ipad") {
        "iPad"
    } else {
        "web"
    }
}

fn request_device(request: &IncomingRequest) -> &str {
    request
        .prop(DEVICE_TYPE)
        .and_then(Value::as_str)
        .unwrap_or("web")
}

fn start(ctx: &mut RequestContext) -> Result<Flow, YukonError> {
    let device = device_type(ctx.request.header("user-agent").unwrap_or_default());
    ctx.request.set_prop(DEVICE_TYPE, device);
    Ok(Flow::Continue)
}

fn pre_data(ctx: &mut RequestContext) -> Result<Flow, YukonError> {
    let is_json = resolve_content_type(&ctx.nodule, &ctx.request) == ContentType::Json;
    if is_json || ctx.nodule.prop_bool("suppress_nav") {
        return Ok(Flow::Continue);
    }

    let mut nav = CallSpec::new(GLOBAL_NAV, GLOBAL_NAV_PATH);
    if ctx.nodule.use_stub {
        nav = nav.stubbed(resolve_stub_path(Some(Path::new(GLOBAL_NAV_STUB)), &ctx.nodule));
    }
    ctx.batch.push(nav)?;
    Ok(Flow::Continue)
}

fn post_data(ctx: &mut RequestContext) -> Result<Flow, YukonError> {
    let device = request_device(&ctx.request).to_string();
    if let Some(Value::Object(nav)) = ctx.locals.get_mut(GLOBAL_NAV) {
        nav.insert(DEVICE_TYPE.to_string(), Value::String(device));
    }
    Ok(Flow::Continue)
}

fn finish(ctx: &mut RequestContext) -> Result<Flow, YukonError> {
    let device = request_device(&ctx.request).to_string();
    if resolve_content_type(&ctx.nodule, &ctx.request) == ContentType::Json {
        ctx.locals
            .insert("clientData".to_string(), json!({ "deviceType": device }));
    } else if let Some(Value::Object(data)) = ctx.render_data.as_mut() {
        data.insert(DEVICE_TYPE.to_string(), Value::String(device));
    }
    Ok(Flow::Continue)
}

/// The demo's middlewares; `get_data` is left to the built-in API stage.
pub fn middlewares() -> AppMiddlewares {
    AppMiddlewares::new()
        .start(from_fn("start", start))
        .pre_data(from_fn("pre_data", pre_data))
        .post_data(from_fn("post_data", post_data))
        .finish(from_fn("finish", finish))
}

/// Per-call hooks of the demo app.
#[derive(Debug, Clone)]
pub struct DemoHooks {
    default_host: String,
}

impl DemoHooks {
    /// `default_host` is used when neither the call nor the request names one.
    pub fn new(default_host: impl Into<String>) -> Self {
        Self {
            default_host: default_host.into(),
        }
    }
}

impl CallHooks for DemoHooks {
    fn before_call(&self, spec: &mut CallSpec, request: &IncomingRequest) {
        if spec.host.is_none() {
            let host = request.header("host").unwrap_or(&self.default_host);
            spec.host = Some(host.to_string());
        }
        spec.push_header("x-device-type", request_device(request));
    }

    fn after_call(&self, call: &mut SettledCall, _request: &IncomingRequest) -> Verdict {
        if call.is_unhandled_failure() {
            return call.default_verdict();
        }

        if let CallResult::Success(response) = &mut call.result {
            let message = format!(
                "RESPONSE FROM {}: statusCode={}",
                response.request_path, response.status
            );
            let sent: Map<String, Value> = response
                .request_headers
                .iter()
                .map(|h| (h.name.clone(), Value::String(h.value.clone())))
                .collect();
            if let Value::Object(body) = &mut response.body {
                body.insert("systemMsg".to_string(), Value::String(message));
                if !sent.is_empty() {
                    body.insert("customHeaders".to_string(), Value::Object(sent));
                }
            }
        }
        Verdict::Continue
    }
}

/// Convenience for wiring the demo hooks into a runtime.
pub fn hooks(default_host: impl Into<String>) -> Arc<dyn CallHooks> {
    Arc::new(DemoHooks::new(default_host))
}
