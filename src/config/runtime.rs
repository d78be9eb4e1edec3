// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::{FixtureTransport, HttpTransport};
use crate::config::{validate_config, YukonConfig};
use crate::engine::{AppMiddlewares, FanOutDispatcher, Nodule, Pipeline, Router, Yukon};
use crate::errors::ConfigError;
use crate::traits::{CallHooks, DefaultHooks, NoduleHook, Transport};

/// Assembles a [`Yukon`] runtime from configuration and app-supplied pieces.
///
/// Anything not supplied falls back to a default: [`HttpTransport`] for live
/// calls, [`FixtureTransport`] for stubs, [`DefaultHooks`], and pass-through
/// middlewares.
///
/// # Examples
///
/// ```
/// use yukon::config::{NoduleConfig, RuntimeBuilder, YukonConfig};
///
/// let config = YukonConfig {
///     nodules: vec![NoduleConfig {
///         name: "home".into(),
///         route: "/".into(),
///         ..NoduleConfig::default()
///     }],
///     ..YukonConfig::default()
/// };
///
/// let yukon = RuntimeBuilder::new(config).build().unwrap();
/// assert_eq!(yukon.config().nodules.len(), 1);
/// ```
pub struct RuntimeBuilder {
    config: YukonConfig,
    transport: Option<Arc<dyn Transport>>,
    fixtures: Option<Arc<dyn Transport>>,
    hooks: Arc<dyn CallHooks>,
    middlewares: AppMiddlewares,
    pre_processors: HashMap<String, Arc<dyn NoduleHook>>,
    post_processors: HashMap<String, Arc<dyn NoduleHook>>,
}

impl RuntimeBuilder {
    pub fn new(config: YukonConfig) -> Self {
        Self {
            config,
            transport: None,
            fixtures: None,
            hooks: Arc::new(DefaultHooks),
            middlewares: AppMiddlewares::default(),
            pre_processors: HashMap::new(),
            post_processors: HashMap::new(),
        }
    }

    /// Transport for live calls.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Transport for stubbed calls.
    pub fn fixtures(mut self, fixtures: Arc<dyn Transport>) -> Self {
        self.fixtures = Some(fixtures);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn CallHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn middlewares(mut self, middlewares: AppMiddlewares) -> Self {
        self.middlewares = middlewares;
        self
    }

    pub fn pre_processor(mut self, nodule: impl Into<String>, hook: Arc<dyn NoduleHook>) -> Self {
        self.pre_processors.insert(nodule.into(), hook);
        self
    }

    pub fn post_processor(mut self, nodule: impl Into<String>, hook: Arc<dyn NoduleHook>) -> Self {
        self.post_processors.insert(nodule.into(), hook);
        self
    }

    /// Validate everything and build the runtime.
    ///
    /// Fails with every configuration problem at once, or with
    /// [`ConfigError::UnknownNodule`] when a processor names a nodule that does
    /// not exist.
    pub fn build(self) -> Result<Yukon, ConfigError> {
        validate_config(&self.config).map_err(ConfigError::Invalid)?;

        let known = |name: &String| self.config.nodule(name).is_some();
        if let Some(unknown) = self
            .pre_processors
            .keys()
            .chain(self.post_processors.keys())
            .find(|name| !known(*name))
        {
            return Err(ConfigError::UnknownNodule(unknown.clone()));
        }

        let nodules: Vec<Nodule> = self
            .config
            .nodules
            .iter()
            .map(|cfg| {
                let mut nodule = Nodule::from_config(cfg);
                nodule.pre_processor = self.pre_processors.get(&cfg.name).cloned();
                nodule.post_processor = self.post_processors.get(&cfg.name).cloned();
                nodule
            })
            .collect();

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::new()));
        let fixtures = self.fixtures.unwrap_or_else(|| Arc::new(FixtureTransport));
        let dispatcher = FanOutDispatcher::new(transport, fixtures)
            .with_hooks(self.hooks)
            .with_default_timeout(self.config.api_defaults.timeout());

        let pipeline = Pipeline::assemble(
            self.middlewares,
            dispatcher,
            self.config.shared_template_dir.clone(),
        );

        Ok(Yukon::new(Arc::new(self.config), Router::new(nodules), pipeline))
    }
}
