// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::calls::Verb;
use crate::config::{ApiCallConfig, ContentType, NoduleConfig};
use crate::traits::NoduleHook;

/// A nodule as the runtime uses it: its merged configuration plus the
/// processors the app registered for it.
#[derive(Clone)]
pub struct Nodule {
    pub name: String,
    pub route: String,
    pub route_verb: Verb,
    pub route_index: i32,
    pub dir: PathBuf,
    pub template_name: Option<String>,
    pub template_ext: String,
    pub content_type: Option<ContentType>,
    pub use_stub: bool,
    pub api_calls: Vec<ApiCallConfig>,
    pub props: Map<String, Value>,
    pub pre_processor: Option<Arc<dyn NoduleHook>>,
    pub post_processor: Option<Arc<dyn NoduleHook>>,
}

impl Nodule {
    pub fn from_config(config: &NoduleConfig) -> Self {
        Self {
            name: config.name.clone(),
            route: config.route.clone(),
            route_verb: config.route_verb,
            route_index: config.route_index,
            dir: config.dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            template_name: config.template_name.clone(),
            template_ext: config.template_ext.clone(),
            content_type: config.content_type,
            use_stub: config.use_stub,
            api_calls: config.api_calls.clone(),
            props: config.props.clone(),
            pre_processor: None,
            post_processor: None,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// A prop read as a flag; absent or non-boolean is `false`.
    pub fn prop_bool(&self, name: &str) -> bool {
        self.prop(name).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl fmt::Debug for Nodule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nodule")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("route_verb", &self.route_verb)
            .field("dir", &self.dir)
            .field("content_type", &self.content_type)
            .field("api_calls", &self.api_calls.len())
            .field("pre_processor", &self.pre_processor.is_some())
            .field("post_processor", &self.post_processor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_config_defaults_dir_and_reads_props() {
        let mut config = NoduleConfig {
            name: "home".into(),
            route: "/".into(),
            ..NoduleConfig::default()
        };
        config.props.insert("suppress_nav".into(), json!(true));
        config.props.insert("title".into(), json!("Home"));

        let nodule = Nodule::from_config(&config);
        assert_eq!(nodule.dir, PathBuf::from("."));
        assert_eq!(nodule.template_ext, ".jade");
        assert!(nodule.prop_bool("suppress_nav"));
        assert!(!nodule.prop_bool("title"));
        assert!(!nodule.prop_bool("missing"));
        assert!(nodule.pre_processor.is_none());
    }
}
