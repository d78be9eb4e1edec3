use crate::calls::{CallResult, CallSpec};
use crate::engine::IncomingRequest;
use crate::errors::{CallFailure, FatalCause};

/// A call after it settled, as seen by the completion hook.
#[derive(Debug, Clone)]
pub struct SettledCall {
    /// The call exactly as it was issued.
    pub spec: CallSpec,
    pub result: CallResult,
    /// Set by the hook when the app deals with the failure itself. Starts out as
    /// the call's `handle_error` flag.
    pub error_handled: bool,
}

impl SettledCall {
    pub fn new(spec: CallSpec, result: CallResult) -> Self {
        let error_handled = spec.handle_error;
        Self {
            spec,
            result,
            error_handled,
        }
    }

    pub fn failure(&self) -> Option<&CallFailure> {
        self.result.failure()
    }

    pub fn is_unhandled_failure(&self) -> bool {
        self.failure().is_some() && !self.error_handled
    }

    /// Unhandled failures are fatal, everything else continues.
    pub fn default_verdict(&self) -> Verdict {
        match self.failure() {
            Some(failure) if !self.error_handled => Verdict::Fatal(FatalCause::Call(failure.clone())),
            _ => Verdict::Continue,
        }
    }
}

/// What the completion hook decided about one settled call.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Continue,
    /// Fail the whole batch once every call has settled.
    Fatal(FatalCause),
}

impl Verdict {
    pub fn reject(message: impl Into<String>) -> Self {
        Verdict::Fatal(FatalCause::Rejected(message.into()))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Verdict::Fatal(_))
    }
}

/// Per-call hooks run by the fan-out dispatcher.
///
/// Both hooks are synchronous and run on the request's own task: `before_call`
/// right before its call is issued, `after_call` as soon as that call settles.
pub trait CallHooks: Send + Sync {
    /// Adjust a call before it goes out (resolve a host, add headers).
    fn before_call(&self, _spec: &mut CallSpec, _request: &IncomingRequest) {}

    /// Inspect or rewrite the result, mark a failure handled, or fail the batch.
    fn after_call(&self, call: &mut SettledCall, _request: &IncomingRequest) -> Verdict {
        call.default_verdict()
    }
}

/// Hooks used when the app installs none.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl CallHooks for DefaultHooks {}
