// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deep merge of configuration trees.
//!
//! Rules:
//! * mapping over mapping merges key by key, recursively
//! * `null` in the overlay leaves the base value alone
//! * anything else in the overlay (scalars, sequences) replaces the base value
//!
//! Sequences are replaced rather than merged by index, so a nodule listing its own
//! `api_calls` does not inherit half of the default list.

use serde_yaml::Value;

/// Merge `overlay` into `base` in place.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply `defaults` under every element of the sequence stored at `key`.
pub(crate) fn merge_each(parent: &mut Value, key: &str, defaults: &Value) {
    if let Some(Value::Sequence(items)) = parent.get_mut(key) {
        for item in items.iter_mut() {
            let mut merged = defaults.clone();
            merge(&mut merged, std::mem::take(item));
            *item = merged;
        }
    }
}
