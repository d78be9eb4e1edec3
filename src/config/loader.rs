// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::calls::{BodyType, Header, Verb};
use crate::config::consts::DEFAULT_TEMPLATE_EXT;
use crate::config::merge::{merge, merge_each};
use crate::errors::ConfigError;
use crate::observability::messages::config::ConfigLoaded;
use crate::observability::messages::StructuredLog;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete yukon configuration: app settings merged over the built-in defaults.
///
/// Built once at startup and never mutated afterwards; the runtime shares it
/// behind an `Arc`. Every nodule in `nodules` already has `nodule_defaults`
/// merged in, and every API call already has `api_defaults` merged in.
///
/// # Example
/// ```yaml
/// debug_to_console: true
/// shared_template_dir: templates
/// nodule_defaults:
///   use_stub: true
/// api_defaults:
///   host: api.example.com
///   timeout: 2000
/// nodules:
///   - name: home
///     route: /
///     api_calls:
///       - namespace: profile
///         path: /api/profile
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YukonConfig {
    pub debug_to_console: bool,
    /// Second place to look for templates after the nodule's own directory.
    pub shared_template_dir: Option<PathBuf>,
    pub nodule_defaults: NoduleConfig,
    pub api_defaults: ApiCallConfig,
    pub nodules: Vec<NoduleConfig>,
}

/// Response flavour of a nodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Html,
    Json,
}

/// Configuration of one nodule: a route plus everything needed to answer it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoduleConfig {
    pub name: String,
    pub route: String,
    pub route_verb: Verb,
    /// Lower indexes are matched first.
    pub route_index: i32,
    /// Folder holding the nodule's templates and stub fixtures.
    pub dir: Option<PathBuf>,
    /// `None` falls back to the nodule name.
    pub template_name: Option<String>,
    pub template_ext: String,
    /// Force JSON or HTML regardless of path conventions.
    pub content_type: Option<ContentType>,
    /// Answer every call of this nodule from fixtures.
    pub use_stub: bool,
    pub api_calls: Vec<ApiCallConfig>,
    /// App-defined properties, e.g. `suppress_nav`.
    pub props: Map<String, serde_json::Value>,
}

impl Default for NoduleConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            route: String::new(),
            route_verb: Verb::Get,
            route_index: 0,
            dir: None,
            template_name: None,
            template_ext: DEFAULT_TEMPLATE_EXT.to_string(),
            content_type: None,
            use_stub: false,
            api_calls: Vec::new(),
            props: Map::new(),
        }
    }
}

/// One configured API call. Also the shape of `api_defaults`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiCallConfig {
    /// `None` becomes `data<n>` by position.
    pub namespace: Option<String>,
    pub host: Option<String>,
    /// A trailing `/` gets the request's `:id` param appended.
    pub path: Option<String>,
    pub params: Map<String, serde_json::Value>,
    pub verb: Verb,
    pub body_type: BodyType,
    pub custom_headers: Vec<Header>,
    /// Milliseconds.
    #[serde(rename = "timeout")]
    pub timeout_ms: Option<u64>,
    pub use_stub: bool,
    /// A bare file name is looked up in the nodule's folder.
    pub stub_path: Option<PathBuf>,
    /// The app handles this call's failures; they never fail the request.
    pub handle_error: bool,
}

impl ApiCallConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl YukonConfig {
    /// Merge an app configuration tree over the built-in defaults.
    ///
    /// Order: built-in defaults <- `overlay`, then every nodule <- `nodule_defaults`,
    /// then every API call <- `api_defaults`.
    pub fn merged(overlay: serde_yaml::Value) -> Result<Self, ConfigError> {
        let mut root = serde_yaml::to_value(YukonConfig::default())
            .map_err(|e| ConfigError::Shape(e.to_string()))?;
        merge(&mut root, overlay);

        let nodule_defaults = root
            .get("nodule_defaults")
            .cloned()
            .unwrap_or(serde_yaml::Value::Null);
        let api_defaults = root
            .get("api_defaults")
            .cloned()
            .unwrap_or(serde_yaml::Value::Null);

        merge_each(&mut root, "nodules", &nodule_defaults);
        if let Some(serde_yaml::Value::Sequence(nodules)) = root.get_mut("nodules") {
            for nodule in nodules.iter_mut() {
                merge_each(nodule, "api_calls", &api_defaults);
            }
        }
        if let Some(defaults) = root.get_mut("nodule_defaults") {
            merge_each(defaults, "api_calls", &api_defaults);
        }

        serde_yaml::from_value(root).map_err(|e| ConfigError::Shape(e.to_string()))
    }

    /// Resolve relative directories against `base`. Nodules without a `dir` use `base`.
    pub fn anchor_dirs(&mut self, base: &Path) {
        for nodule in &mut self.nodules {
            nodule.dir = Some(match nodule.dir.take() {
                Some(dir) if dir.is_relative() => base.join(dir),
                Some(dir) => dir,
                None => base.to_path_buf(),
            });
        }
        if let Some(shared) = self.shared_template_dir.take() {
            self.shared_template_dir = Some(if shared.is_relative() {
                base.join(shared)
            } else {
                shared
            });
        }
    }

    pub fn nodule(&self, name: &str) -> Option<&NoduleConfig> {
        self.nodules.iter().find(|n| n.name == name)
    }
}

/// Load a config from a YAML or TOML file and merge it over the defaults.
///
/// Relative nodule folders are resolved against the file's own folder.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<YukonConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let overlay = parse_tree(path, &content)?;
    let mut cfg = YukonConfig::merged(overlay)?;

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    cfg.anchor_dirs(base);

    ConfigLoaded {
        path,
        nodule_count: cfg.nodules.len(),
    }
    .log();
    Ok(cfg)
}

/// Load a config and reject it if validation finds any problem.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<YukonConfig, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

fn parse_tree(path: &Path, content: &str) -> Result<serde_yaml::Value, ConfigError> {
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
        }
        Some("toml") => {
            let table: toml::Value = toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            serde_yaml::to_value(table).map_err(|e| parse_error(e.to_string()))
        }
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}
