// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;

/// HTTP verb of an outbound call or a nodule route.
///
/// `del` is the configured spelling for DELETE; `delete` is accepted as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    #[default]
    Get,
    Post,
    Put,
    #[serde(alias = "delete")]
    Del,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Del => "DELETE",
        }
    }

    /// Whether params travel in the request body rather than the query string.
    pub fn has_body(&self) -> bool {
        matches!(self, Verb::Post | Verb::Put)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How params are encoded when the verb carries a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// Deep JSON object.
    #[default]
    Json,
    /// Shallow name/value pairs, `application/x-www-form-urlencoded`.
    Form,
}

/// A custom header sent with an outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One outbound call to be issued as part of a [`RequestBatch`](super::RequestBatch).
///
/// The before-call hook may still change a `CallSpec`; the dispatcher issues a copy
/// taken right after that hook ran, so what was issued never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSpec {
    /// Key the result is stored under.
    pub namespace: String,
    /// Server to call; `None` leaves it to the hook or the transport's default.
    pub host: Option<String>,
    pub path: String,
    pub verb: Verb,
    pub body_type: BodyType,
    pub params: Map<String, Value>,
    pub custom_headers: Vec<Header>,
    pub timeout: Option<Duration>,
    /// Answer from a local fixture instead of the network.
    pub use_stub: bool,
    pub stub_path: Option<PathBuf>,
    /// The caller handles failures of this call itself; they never fail the batch.
    pub handle_error: bool,
}

impl CallSpec {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            host: None,
            path: path.into(),
            verb: Verb::default(),
            body_type: BodyType::default(),
            params: Map::new(),
            custom_headers: Vec::new(),
            timeout: None,
            use_stub: false,
            stub_path: None,
            handle_error: false,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_verb(mut self, verb: Verb) -> Self {
        self.verb = verb;
        self
    }

    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_header(name, value);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Answer this call from the fixture at `stub_path`.
    pub fn stubbed(mut self, stub_path: impl Into<PathBuf>) -> Self {
        self.use_stub = true;
        self.stub_path = Some(stub_path.into());
        self
    }

    pub fn handling_errors(mut self) -> Self {
        self.handle_error = true;
        self
    }

    pub fn push_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.custom_headers.push(Header::new(name, value));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.custom_headers
            .iter()
            .rev()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Host and path joined, for logs and error messages.
    pub fn target(&self) -> String {
        match &self.host {
            Some(host) => format!("{}{}", host.trim_end_matches('/'), self.path),
            None => self.path.clone(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::MissingField {
                owner: format!("API call to '{}'", self.path),
                field: "namespace",
            });
        }
        if self.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                owner: format!("API call '{}'", self.namespace),
                field: "path",
            });
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidTimeout {
                owner: format!("API call '{}'", self.namespace),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let spec = CallSpec::new("profile", "/api/profile")
            .with_host("api.local:3000")
            .with_verb(Verb::Post)
            .with_body_type(BodyType::Form)
            .with_param("id", 7)
            .with_header("x-device-type", "web")
            .with_timeout(Duration::from_millis(250));

        assert_eq!(spec.verb, Verb::Post);
        assert_eq!(spec.body_type, BodyType::Form);
        assert_eq!(spec.params.get("id"), Some(&Value::from(7)));
        assert_eq!(spec.header("X-Device-Type"), Some("web"));
        assert_eq!(spec.timeout, Some(Duration::from_millis(250)));
        assert_eq!(spec.target(), "api.local:3000/api/profile");
        assert!(!spec.use_stub);
    }

    #[test]
    fn later_header_wins_on_lookup() {
        let spec = CallSpec::new("a", "/a")
            .with_header("x-trace", "one")
            .with_header("x-trace", "two");
        assert_eq!(spec.header("x-trace"), Some("two"));
        assert_eq!(spec.custom_headers.len(), 2);
    }

    #[test]
    fn validate_rejects_missing_path_and_namespace() {
        assert!(matches!(
            CallSpec::new("nav", "").validate(),
            Err(ConfigError::MissingField { field: "path", .. })
        ));
        assert!(matches!(
            CallSpec::new(" ", "/api/nav").validate(),
            Err(ConfigError::MissingField { field: "namespace", .. })
        ));
        assert!(matches!(
            CallSpec::new("nav", "/api/nav").with_timeout(Duration::ZERO).validate(),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(CallSpec::new("nav", "/api/nav").validate().is_ok());
    }

    #[test]
    fn verb_accepts_delete_alias() {
        let verb: Verb = serde_yaml::from_str("delete").unwrap();
        assert_eq!(verb, Verb::Del);
        let verb: Verb = serde_yaml::from_str("del").unwrap();
        assert_eq!(verb.as_str(), "DELETE");
        assert!(!verb.has_body());
        assert!(Verb::Put.has_body());
    }
}
