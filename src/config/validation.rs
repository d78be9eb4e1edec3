// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registration-time validation of a merged configuration.
//!
//! Problems are collected rather than reported one at a time, so a broken config
//! file can be fixed in a single pass. Checks:
//!
//! 1. every nodule has a name and a route, and names are unique
//! 2. no two nodules claim the same verb + route
//! 3. every API call has a path and a non-zero timeout
//! 4. namespace keys are unique within a nodule, counting generated `data<n>` keys

use std::collections::{HashMap, HashSet};

use crate::config::{NoduleConfig, YukonConfig};
use crate::engine::resolve::resolve_namespace;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// # Returns
///
/// * `Ok(())` - every nodule can be registered
/// * `Err(Vec<ConfigError>)` - every problem found
///
/// # Examples
///
/// ```rust
/// use yukon::config::{validate_config, NoduleConfig, YukonConfig};
///
/// let mut config = YukonConfig::default();
/// config.nodules.push(NoduleConfig {
///     name: "home".to_string(),
///     route: "/".to_string(),
///     ..NoduleConfig::default()
/// });
///
/// assert!(validate_config(&config).is_ok());
/// ```
pub fn validate_config(config: &YukonConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut routes: HashMap<(String, String), &str> = HashMap::new();

    for (index, nodule) in config.nodules.iter().enumerate() {
        let owner = nodule_owner(nodule, index);

        if nodule.name.trim().is_empty() {
            errors.push(ConfigError::MissingField {
                owner: owner.clone(),
                field: "name",
            });
        } else if !names.insert(nodule.name.as_str()) {
            errors.push(ConfigError::DuplicateNodule(nodule.name.clone()));
        }

        if nodule.route.trim().is_empty() {
            errors.push(ConfigError::MissingField {
                owner: owner.clone(),
                field: "route",
            });
        } else {
            let key = (nodule.route_verb.to_string(), nodule.route.clone());
            if let Some(first) = routes.get(&key) {
                errors.push(ConfigError::DuplicateRoute {
                    verb: key.0.clone(),
                    route: key.1.clone(),
                    first: first.to_string(),
                    second: nodule.name.clone(),
                });
            } else {
                routes.insert(key, nodule.name.as_str());
            }
        }

        errors.extend(validate_api_calls(nodule, &owner));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_api_calls(nodule: &NoduleConfig, owner: &str) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut namespaces = HashSet::new();

    for (index, call) in nodule.api_calls.iter().enumerate() {
        let call_owner = format!("{} API call #{}", owner, index + 1);

        if call.path.as_deref().map_or(true, |p| p.trim().is_empty()) {
            errors.push(ConfigError::MissingField {
                owner: call_owner.clone(),
                field: "path",
            });
        }
        if call.timeout_ms == Some(0) {
            errors.push(ConfigError::InvalidTimeout { owner: call_owner });
        }

        let namespace = resolve_namespace(call.namespace.as_deref(), index);
        if !namespaces.insert(namespace.clone()) {
            errors.push(ConfigError::DuplicateNamespace {
                nodule: nodule.name.clone(),
                namespace,
            });
        }
    }

    errors
}

fn nodule_owner(nodule: &NoduleConfig, index: usize) -> String {
    if nodule.name.trim().is_empty() {
        format!("nodule #{}", index + 1)
    } else {
        format!("nodule '{}'", nodule.name)
    }
}
