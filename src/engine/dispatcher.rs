// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fan-out dispatcher: issue a request's API calls concurrently and join them.
//!
//! # Execution Flow
//!
//! 1. For each [`CallSpec`] in registration order, run the before-call hook and
//!    push a copy of the (possibly rewritten) spec into a `FuturesUnordered`.
//! 2. Poll the set on the request's own task. Calls settle in any order; each one
//!    is bounded by its own timeout and never cancels the others.
//! 3. As each call settles, run the completion hook and record the result under
//!    its namespace.
//! 4. Once every call has settled, return `Ok(())`, or the [`BatchFailure`] of the
//!    lowest-indexed call whose hook returned a fatal verdict.
//!
//! Transport failures are data: they land in the batch as `CallResult::Failure`
//! and only become fatal through a hook verdict.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::calls::{CallResult, CallSpec, RequestBatch};
use crate::engine::IncomingRequest;
use crate::errors::{BatchFailure, CallFailure, FatalCause};
use crate::observability::messages::dispatch::{
    BatchCompleted, BatchFailed, BatchStarted, CallFailed, CallIssued, CallSettled,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{CallHooks, DefaultHooks, SettledCall, Transport, Verdict};

struct Settled {
    index: usize,
    spec: CallSpec,
    result: CallResult,
    duration: Duration,
}

struct FatalVerdict {
    index: usize,
    namespace: String,
    path: String,
    cause: FatalCause,
}

/// Issues every call of a [`RequestBatch`] concurrently.
///
/// Stubbed calls go to `fixtures`, everything else to `transport`. Shared
/// read-only across requests.
#[derive(Clone)]
pub struct FanOutDispatcher {
    transport: Arc<dyn Transport>,
    fixtures: Arc<dyn Transport>,
    hooks: Arc<dyn CallHooks>,
    default_timeout: Option<Duration>,
}

impl FanOutDispatcher {
    pub fn new(transport: Arc<dyn Transport>, fixtures: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            fixtures,
            hooks: Arc::new(DefaultHooks),
            default_timeout: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn CallHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Applied to calls that carry no timeout of their own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Run every call in `batch` and wait for all of them to settle.
    ///
    /// Afterwards every registered namespace has a result in the batch, whether
    /// or not an error is returned.
    pub async fn dispatch(
        &self,
        batch: &mut RequestBatch,
        request: &IncomingRequest,
    ) -> Result<(), BatchFailure> {
        if batch.is_empty() {
            return Ok(());
        }

        let started = Instant::now();
        let call_count = batch.len();
        BatchStarted { call_count }.log();

        let mut in_flight = FuturesUnordered::new();
        for (index, spec) in batch.specs_mut().iter_mut().enumerate() {
            self.hooks.before_call(spec, request);
            in_flight.push(self.issue(index, spec.clone()));
        }

        let mut fatal: Vec<FatalVerdict> = Vec::new();
        let mut failed_count = 0;

        while let Some(settled) = in_flight.next().await {
            let Settled {
                index,
                spec,
                result,
                duration,
            } = settled;
            let mut call = SettledCall::new(spec, result);
            let verdict = self.hooks.after_call(&mut call, request);

            match &call.result {
                CallResult::Success(response) => CallSettled {
                    namespace: &call.spec.namespace,
                    request_path: &response.request_path,
                    status: response.status,
                    duration,
                }
                .log(),
                CallResult::Failure(failure) => {
                    failed_count += 1;
                    CallFailed {
                        namespace: &call.spec.namespace,
                        target: &call.spec.target(),
                        error: failure,
                        handled: call.error_handled,
                    }
                    .log();
                }
            }

            if let Verdict::Fatal(cause) = verdict {
                fatal.push(FatalVerdict {
                    index,
                    namespace: call.spec.namespace.clone(),
                    path: call.spec.path.clone(),
                    cause,
                });
            }
            batch.record(call.spec.namespace, call.result);
        }

        match pick_fatal(fatal) {
            Some(failure) => {
                BatchFailed {
                    namespace: &failure.namespace,
                    error: &failure,
                    suppressed: &failure.suppressed,
                }
                .log();
                Err(failure)
            }
            None => {
                BatchCompleted {
                    call_count,
                    failed_count,
                    duration: started.elapsed(),
                }
                .log();
                Ok(())
            }
        }
    }

    async fn issue(&self, index: usize, spec: CallSpec) -> Settled {
        let transport = if spec.use_stub {
            &self.fixtures
        } else {
            &self.transport
        };
        CallIssued {
            namespace: &spec.namespace,
            verb: spec.verb.as_str(),
            target: &spec.target(),
            transport: transport.name(),
        }
        .log();

        let started = Instant::now();
        let outcome = match spec.timeout.or(self.default_timeout) {
            Some(limit) => tokio::time::timeout(limit, transport.call(&spec))
                .await
                .unwrap_or_else(|_| Err(CallFailure::Timeout(limit))),
            None => transport.call(&spec).await,
        };

        Settled {
            index,
            result: CallResult::from(outcome),
            spec,
            duration: started.elapsed(),
        }
    }
}

/// The lowest registration index wins; the rest are listed as suppressed.
fn pick_fatal(mut fatal: Vec<FatalVerdict>) -> Option<BatchFailure> {
    fatal.sort_by_key(|f| f.index);
    let mut verdicts = fatal.into_iter();
    let first = verdicts.next()?;
    let mut failure = BatchFailure::new(first.namespace, first.path, first.cause);
    failure.suppressed = verdicts.map(|f| f.namespace).collect();
    Some(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::RecordingTransport;
    use serde_json::json;

    fn dispatcher(transport: RecordingTransport) -> (FanOutDispatcher, Arc<RecordingTransport>, Arc<RecordingTransport>) {
        let transport = Arc::new(transport);
        let fixtures = Arc::new(RecordingTransport::new());
        let dispatcher = FanOutDispatcher::new(transport.clone(), fixtures.clone());
        (dispatcher, transport, fixtures)
    }

    fn batch_of(specs: Vec<CallSpec>) -> RequestBatch {
        let mut batch = RequestBatch::new();
        for spec in specs {
            batch.push(spec).unwrap();
        }
        batch
    }

    fn network_down(path: &str) -> CallFailure {
        CallFailure::Network {
            url: path.to_string(),
            message: "connection refused".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_batch_completes_immediately() {
        let (dispatcher, transport, _) = dispatcher(RecordingTransport::new());
        let mut batch = RequestBatch::new();

        let outcome = dispatcher.dispatch(&mut batch, &IncomingRequest::get("/")).await;

        assert!(outcome.is_ok());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn two_successes_are_both_recorded() {
        let (dispatcher, _, _) = dispatcher(
            RecordingTransport::new()
                .with_body("/api/profile", json!({"name": "ann"}))
                .with_body("/api/globalnav", json!({"links": []})),
        );
        let mut batch = batch_of(vec![
            CallSpec::new("profile", "/api/profile"),
            CallSpec::new("nav", "/api/globalnav"),
        ]);

        dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap();

        assert!(batch.is_complete());
        assert_eq!(batch.result("profile").and_then(|r| r.body()), Some(&json!({"name": "ann"})));
        assert_eq!(batch.result("nav").and_then(|r| r.body()), Some(&json!({"links": []})));
    }

    #[tokio::test]
    async fn unhandled_failure_fails_batch_but_keeps_other_results() {
        let (dispatcher, _, _) =
            dispatcher(RecordingTransport::new().failing("/api/globalnav", network_down("/api/globalnav")));
        let mut batch = batch_of(vec![
            CallSpec::new("profile", "/api/profile"),
            CallSpec::new("nav", "/api/globalnav"),
        ]);

        let failure = dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap_err();

        assert_eq!(failure.namespace, "nav");
        assert_eq!(failure.path, "/api/globalnav");
        assert!(matches!(failure.call_failure(), Some(CallFailure::Network { .. })));
        assert!(failure.suppressed.is_empty());

        assert!(batch.is_complete());
        assert!(batch.result("profile").unwrap().is_success());
        assert!(!batch.result("nav").unwrap().is_success());
    }

    #[tokio::test]
    async fn handled_failure_never_propagates() {
        let (dispatcher, _, _) =
            dispatcher(RecordingTransport::new().failing("/api/ads", network_down("/api/ads")));
        let mut batch = batch_of(vec![
            CallSpec::new("profile", "/api/profile"),
            CallSpec::new("ads", "/api/ads").handling_errors(),
        ]);

        dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap();

        assert!(batch.result("ads").unwrap().failure().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_namespace_keeps_last_settled() {
        let (dispatcher, _, _) = dispatcher(
            RecordingTransport::new()
                .with_body("/api/nav/slow", json!("slow"))
                .with_delay("/api/nav/slow", Duration::from_millis(50))
                .with_body("/api/nav/fast", json!("fast")),
        );
        let mut batch = batch_of(vec![
            CallSpec::new("nav", "/api/nav/slow"),
            CallSpec::new("nav", "/api/nav/fast"),
        ]);

        dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap();

        assert_eq!(batch.results().len(), 1);
        assert_eq!(batch.result("nav").and_then(|r| r.body()), Some(&json!("slow")));
    }

    #[tokio::test]
    async fn stubbed_calls_never_reach_the_network() {
        let (dispatcher, transport, fixtures) = dispatcher(RecordingTransport::new());
        let mut batch = batch_of(vec![
            CallSpec::new("profile", "/api/profile").stubbed("/fixtures/profile.stub.json"),
            CallSpec::new("nav", "/api/globalnav"),
        ]);

        dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap();

        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.calls()[0].namespace, "nav");
        assert_eq!(fixtures.call_count(), 1);
        assert_eq!(fixtures.calls()[0].namespace, "profile");
        assert!(batch.result("profile").unwrap().is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_affects_only_the_slow_call() {
        let (dispatcher, _, _) = dispatcher(
            RecordingTransport::new().with_delay("/api/slow", Duration::from_secs(5)),
        );
        let mut batch = batch_of(vec![
            CallSpec::new("slow", "/api/slow")
                .with_timeout(Duration::from_millis(100))
                .handling_errors(),
            CallSpec::new("fast", "/api/fast").with_timeout(Duration::from_millis(100)),
        ]);

        dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap();

        let slow = batch.result("slow").and_then(|r| r.failure()).unwrap();
        assert!(slow.is_timeout());
        assert!(batch.result("fast").unwrap().is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn default_timeout_applies_when_call_has_none() {
        let (dispatcher, _, _) = dispatcher(
            RecordingTransport::new().with_delay("/api/slow", Duration::from_secs(5)),
        );
        let dispatcher = dispatcher.with_default_timeout(Some(Duration::from_millis(250)));
        let mut batch = batch_of(vec![CallSpec::new("slow", "/api/slow")]);

        let failure = dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap_err();

        assert_eq!(
            failure.call_failure(),
            Some(&CallFailure::Timeout(Duration::from_millis(250)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn calls_run_concurrently() {
        let (dispatcher, _, _) = dispatcher(
            RecordingTransport::new()
                .with_delay("/api/a", Duration::from_millis(300))
                .with_delay("/api/b", Duration::from_millis(300))
                .with_delay("/api/c", Duration::from_millis(300)),
        );
        let mut batch = batch_of(vec![
            CallSpec::new("a", "/api/a"),
            CallSpec::new("b", "/api/b"),
            CallSpec::new("c", "/api/c"),
        ]);

        let started = tokio::time::Instant::now();
        dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_millis(600));
    }

    struct DeviceHeader;

    impl CallHooks for DeviceHeader {
        fn before_call(&self, spec: &mut CallSpec, request: &IncomingRequest) {
            if spec.host.is_none() {
                spec.host = Some("api.local".to_string());
            }
            let device = request.header("x-device").unwrap_or("desktop");
            spec.push_header("x-device-type", device);
        }
    }

    #[tokio::test]
    async fn before_hook_changes_are_what_gets_issued() {
        let (dispatcher, transport, _) = dispatcher(RecordingTransport::new());
        let dispatcher = dispatcher.with_hooks(Arc::new(DeviceHeader));
        let mut batch = batch_of(vec![
            CallSpec::new("profile", "/api/profile"),
            CallSpec::new("nav", "/api/globalnav").with_host("nav.local"),
        ]);
        let request = IncomingRequest::get("/").with_header("X-Device", "phone");

        dispatcher.dispatch(&mut batch, &request).await.unwrap();

        let issued = transport.calls();
        assert_eq!(issued.len(), 2);
        for spec in &issued {
            assert_eq!(spec.header("x-device-type"), Some("phone"));
        }
        let profile = issued.iter().find(|s| s.namespace == "profile").unwrap();
        assert_eq!(profile.host.as_deref(), Some("api.local"));
        let nav = issued.iter().find(|s| s.namespace == "nav").unwrap();
        assert_eq!(nav.host.as_deref(), Some("nav.local"));

        let response = batch.result("profile").and_then(|r| r.response()).unwrap();
        assert_eq!(response.request_headers.len(), 1);
    }

    struct RejectEverything;

    impl CallHooks for RejectEverything {
        fn after_call(&self, call: &mut SettledCall, _request: &IncomingRequest) -> Verdict {
            Verdict::reject(format!("{} rejected", call.spec.namespace))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn lowest_index_fatal_wins_and_rest_are_suppressed() {
        // "first" settles last but was registered first
        let (dispatcher, _, _) = dispatcher(
            RecordingTransport::new().with_delay("/api/first", Duration::from_millis(200)),
        );
        let dispatcher = dispatcher.with_hooks(Arc::new(RejectEverything));
        let mut batch = batch_of(vec![
            CallSpec::new("first", "/api/first"),
            CallSpec::new("second", "/api/second"),
            CallSpec::new("third", "/api/third"),
        ]);

        let failure = dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap_err();

        assert_eq!(failure.namespace, "first");
        assert_eq!(failure.cause, FatalCause::Rejected("first rejected".into()));
        assert_eq!(failure.suppressed, vec!["second".to_string(), "third".to_string()]);
        assert!(batch.is_complete());
    }

    struct MarkHandled;

    impl CallHooks for MarkHandled {
        fn after_call(&self, call: &mut SettledCall, _request: &IncomingRequest) -> Verdict {
            if call.failure().is_some() {
                call.error_handled = true;
                call.result = CallResult::Success(crate::calls::ApiResponse::ok(
                    call.spec.path.clone(),
                    json!({"fallback": true}),
                ));
            }
            call.default_verdict()
        }
    }

    #[tokio::test]
    async fn completion_hook_can_replace_a_failure() {
        let (dispatcher, _, _) =
            dispatcher(RecordingTransport::new().failing("/api/ads", network_down("/api/ads")));
        let dispatcher = dispatcher.with_hooks(Arc::new(MarkHandled));
        let mut batch = batch_of(vec![CallSpec::new("ads", "/api/ads")]);

        dispatcher
            .dispatch(&mut batch, &IncomingRequest::get("/"))
            .await
            .unwrap();

        assert_eq!(batch.result("ads").and_then(|r| r.body()), Some(&json!({"fallback": true})));
    }
}
