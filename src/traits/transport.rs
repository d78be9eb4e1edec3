use async_trait::async_trait;

use crate::calls::{ApiResponse, CallSpec};
use crate::errors::CallFailure;

/// Issues one outbound call and reports how it settled.
///
/// Implementations must not panic on bad responses; every problem becomes a
/// `CallFailure`. Timeouts are enforced by the dispatcher, not the transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, spec: &CallSpec) -> Result<ApiResponse, CallFailure>;

    fn name(&self) -> &'static str;
}
