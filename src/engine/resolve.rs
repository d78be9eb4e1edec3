// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fallback rules for values a nodule may leave unset.
//!
//! Each function returns a definite answer and touches nothing but its inputs
//! (template lookup also checks which candidate files exist).

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::calls::CallSpec;
use crate::config::consts::{
    DEFAULT_NAMESPACE_PREFIX, DEFAULT_RENDER_NAMESPACE, ID_PARAM, JSON_PATH_PREFIX, STUB_FILE_SUFFIX,
};
use crate::config::{ApiCallConfig, ContentType};
use crate::engine::{IncomingRequest, Nodule};

/// Explicit namespace, else `data<n>` for the call at zero-based `index`.
pub fn resolve_namespace(explicit: Option<&str>, index: usize) -> String {
    match explicit {
        Some(ns) if !ns.trim().is_empty() => ns.to_string(),
        _ => format!("{}{}", DEFAULT_NAMESPACE_PREFIX, index + 1),
    }
}

/// A path ending in `/` gets the request's `:id` param appended when it has one.
pub fn resolve_api_path(path: &str, request: &IncomingRequest) -> String {
    match request.param(ID_PARAM) {
        Some(id) if path.ends_with('/') => format!("{}{}", path, id),
        _ => path.to_string(),
    }
}

/// Where a stubbed call reads its fixture.
///
/// * absolute path - used as is
/// * relative path or bare file name - inside the nodule's folder
/// * nothing - `<nodule dir>/<nodule name>.stub.json`
pub fn resolve_stub_path(stub_path: Option<&Path>, nodule: &Nodule) -> PathBuf {
    match stub_path {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => nodule.dir.join(path),
        None => nodule
            .dir
            .join(format!("{}{}", nodule.name, STUB_FILE_SUFFIX)),
    }
}

/// The template file an HTML nodule renders.
///
/// The name is `template_name` or, failing that, the nodule name; `template_ext` is
/// appended unless the name already carries an extension. The nodule's folder is
/// tried first, then `shared_dir`. When neither has the file the nodule-folder path
/// is returned so the renderer can report it.
pub fn resolve_template(nodule: &Nodule, shared_dir: Option<&Path>) -> PathBuf {
    let name = nodule.template_name.as_deref().unwrap_or(&nodule.name);
    let file = if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{}{}", name, nodule.template_ext)
    };

    let local = nodule.dir.join(&file);
    if local.is_file() {
        return local;
    }
    if let Some(shared) = shared_dir.map(|dir| dir.join(&file)) {
        if shared.is_file() {
            return shared;
        }
    }
    local
}

/// JSON or HTML: explicit setting, else the `/json/` path convention, else HTML.
pub fn resolve_content_type(nodule: &Nodule, request: &IncomingRequest) -> ContentType {
    if let Some(content_type) = nodule.content_type {
        return content_type;
    }
    if request.path.starts_with(JSON_PATH_PREFIX) || nodule.route.starts_with(JSON_PATH_PREFIX) {
        ContentType::Json
    } else {
        ContentType::Html
    }
}

/// Explicit render data, else the `data1` body, else an empty object.
pub fn resolve_render_data(explicit: Option<Value>, locals: &Map<String, Value>) -> Value {
    explicit
        .or_else(|| locals.get(DEFAULT_RENDER_NAMESPACE).cloned())
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Turn the configured call at `index` into the spec that will be dispatched.
pub fn build_call_spec(
    call: &ApiCallConfig,
    index: usize,
    nodule: &Nodule,
    request: &IncomingRequest,
) -> CallSpec {
    let use_stub = call.use_stub || nodule.use_stub;
    let stub_path = use_stub.then(|| resolve_stub_path(call.stub_path.as_deref(), nodule));

    CallSpec {
        namespace: resolve_namespace(call.namespace.as_deref(), index),
        host: call.host.clone(),
        path: call
            .path
            .as_deref()
            .map(|p| resolve_api_path(p, request))
            .unwrap_or_default(),
        verb: call.verb,
        body_type: call.body_type,
        params: call.params.clone(),
        custom_headers: call.custom_headers.clone(),
        timeout: call.timeout(),
        use_stub,
        stub_path,
        handle_error: call.handle_error,
    }
}
