// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Verb and path-pattern lookup of nodules.
//!
//! Patterns are `/`-separated segments: literals match exactly, `:name` captures one
//! segment, and a trailing `*` matches whatever remains (including nothing).
//! Routes are tried in ascending `route_index`; ties keep configuration order.

use std::collections::HashMap;
use std::sync::Arc;

use crate::calls::Verb;
use crate::engine::Nodule;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest,
}

#[derive(Debug)]
struct Route {
    verb: Verb,
    segments: Vec<Segment>,
    nodule: Arc<Nodule>,
}

/// A matched route: the nodule and the params its pattern captured.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub nodule: Arc<Nodule>,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(nodules: Vec<Nodule>) -> Self {
        let mut routes: Vec<Route> = nodules
            .into_iter()
            .map(|nodule| Route {
                verb: nodule.route_verb,
                segments: parse_pattern(&nodule.route),
                nodule: Arc::new(nodule),
            })
            .collect();
        routes.sort_by_key(|route| route.nodule.route_index);
        Self { routes }
    }

    pub fn route(&self, verb: Verb, path: &str) -> Option<RouteMatch> {
        let parts = split(path);
        self.routes
            .iter()
            .filter(|route| route.verb == verb)
            .find_map(|route| {
                match_segments(&route.segments, &parts).map(|params| RouteMatch {
                    nodule: Arc::clone(&route.nodule),
                    params,
                })
            })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split(pattern)
        .into_iter()
        .map(|segment| {
            if segment == "*" {
                Segment::Rest
            } else if let Some(name) = segment.strip_prefix(':') {
                Segment::Param(name.to_string())
            } else {
                Segment::Literal(segment.to_string())
            }
        })
        .collect()
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> Option<HashMap<String, String>> {
    let mut params = HashMap::new();
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Rest => return Some(params),
            Segment::Literal(literal) => {
                if parts.get(i) != Some(&literal.as_str()) {
                    return None;
                }
            }
            Segment::Param(name) => {
                let value = parts.get(i)?;
                params.insert(name.clone(), (*value).to_string());
            }
        }
    }
    (segments.len() == parts.len()).then_some(params)
}
