// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the fan-out dispatcher.
//!
//! This module contains message types for logging events related to:
//! * Batch lifecycle (start, completion, batch-fatal failure)
//! * Individual outbound calls (issued, settled, failed)
//! * Completion hooks signaling a fatal verdict

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A batch is about to be dispatched.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct BatchStarted {
    pub call_count: usize,
}

impl Display for BatchStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dispatching {} API calls in parallel", self.call_count)
    }
}

impl StructuredLog for BatchStarted {
    fn log(&self) {
        tracing::debug!(call_count = self.call_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("batch", span_name = name, call_count = self.call_count)
    }
}

/// One call left the before-hook and was handed to its transport.
///
/// # Log Level
/// `debug!` - Per-request detail
///
/// # Example
/// ```
/// use yukon::observability::messages::dispatch::CallIssued;
///
/// let msg = CallIssued {
///     namespace: "nav",
///     verb: "GET",
///     target: "/api/globalnav",
///     transport: "fixture",
/// };
///
/// assert_eq!(msg.to_string(), "calling API nav - GET: /api/globalnav (fixture)");
/// ```
pub struct CallIssued<'a> {
    pub namespace: &'a str,
    pub verb: &'a str,
    pub target: &'a str,
    pub transport: &'a str,
}

impl Display for CallIssued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "calling API {} - {}: {} ({})",
            self.namespace, self.verb, self.target, self.transport
        )
    }
}

impl StructuredLog for CallIssued<'_> {
    fn log(&self) {
        tracing::debug!(
            namespace = self.namespace,
            verb = self.verb,
            target = self.target,
            transport = self.transport,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "call",
            span_name = name,
            namespace = self.namespace,
            verb = self.verb,
            target = self.target,
        )
    }
}

/// A call settled with a response.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct CallSettled<'a> {
    pub namespace: &'a str,
    pub request_path: &'a str,
    pub status: u16,
    pub duration: Duration,
}

impl Display for CallSettled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "RESPONSE FROM {}: statusCode={} in {:?}",
            self.request_path, self.status, self.duration
        )
    }
}

impl StructuredLog for CallSettled<'_> {
    fn log(&self) {
        tracing::debug!(
            namespace = self.namespace,
            request_path = self.request_path,
            status = self.status,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "call_settled",
            span_name = name,
            namespace = self.namespace,
            status = self.status,
        )
    }
}

/// A call settled with a failure. Whether it matters is up to the completion hook.
///
/// # Log Level
/// `warn!` - Degraded but not necessarily fatal
pub struct CallFailed<'a> {
    pub namespace: &'a str,
    pub target: &'a str,
    pub error: &'a dyn std::error::Error,
    pub handled: bool,
}

impl Display for CallFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "API call {} to {} failed: {}", self.namespace, self.target, self.error)?;
        if self.handled {
            write!(f, " (handled by component)")?;
        }
        Ok(())
    }
}

impl StructuredLog for CallFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            namespace = self.namespace,
            target = self.target,
            error = %self.error,
            handled = self.handled,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "call_failed",
            span_name = name,
            namespace = self.namespace,
            error = %self.error,
        )
    }
}

/// Every call in the batch settled and no hook signaled a fatal verdict.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct BatchCompleted {
    pub call_count: usize,
    pub failed_count: usize,
    pub duration: Duration,
}

impl Display for BatchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "All {} API calls settled ({} failed) in {:?}",
            self.call_count, self.failed_count, self.duration
        )
    }
}

impl StructuredLog for BatchCompleted {
    fn log(&self) {
        tracing::debug!(
            call_count = self.call_count,
            failed_count = self.failed_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "batch_completed",
            span_name = name,
            call_count = self.call_count,
            failed_count = self.failed_count,
        )
    }
}

/// The batch settled with a fatal verdict from at least one completion hook.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct BatchFailed<'a> {
    pub namespace: &'a str,
    pub error: &'a dyn std::error::Error,
    pub suppressed: &'a [String],
}

impl Display for BatchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.error)?;
        if !self.suppressed.is_empty() {
            write!(f, " (also fatal: {})", self.suppressed.join(", "))?;
        }
        Ok(())
    }
}

impl StructuredLog for BatchFailed<'_> {
    fn log(&self) {
        tracing::error!(
            namespace = self.namespace,
            error = %self.error,
            suppressed = self.suppressed.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "batch_failed",
            span_name = name,
            namespace = self.namespace,
            error = %self.error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CallFailure;

    #[test]
    fn call_failed_mentions_handled_state() {
        let error = CallFailure::Timeout(Duration::from_millis(20));
        let msg = CallFailed {
            namespace: "nav",
            target: "/api/globalnav",
            error: &error,
            handled: true,
        };
        assert_eq!(
            msg.to_string(),
            "API call nav to /api/globalnav failed: call timed out after 20ms (handled by component)"
        );
    }

    #[test]
    fn batch_failed_lists_suppressed() {
        let error = CallFailure::Timeout(Duration::from_millis(20));
        let suppressed = vec!["ads".to_string()];
        let msg = BatchFailed {
            namespace: "nav",
            error: &error,
            suppressed: &suppressed,
        };
        assert!(msg.to_string().ends_with("(also fatal: ads)"));
    }
}
