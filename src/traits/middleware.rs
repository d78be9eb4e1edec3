use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::RequestContext;
use crate::errors::YukonError;

/// What the pipeline does after a stage returns successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next stage.
    Continue,
    /// `ctx.response` is set; skip the remaining stages.
    Respond,
}

/// One stage of the per-request pipeline.
///
/// Returning `Err` ends the pipeline and sends the error to the runtime's error
/// handler. Async stages suspend the request until they resolve.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Flow, YukonError>;

    fn name(&self) -> &str;
}

/// A stage that does nothing; fills every app slot left unset.
#[derive(Debug, Clone, Copy)]
pub struct PassThrough(pub &'static str);

#[async_trait]
impl Middleware for PassThrough {
    async fn handle(&self, _ctx: &mut RequestContext) -> Result<Flow, YukonError> {
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        self.0
    }
}

struct FnMiddleware<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut RequestContext) -> Result<Flow, YukonError> + Send + Sync,
{
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Flow, YukonError> {
        (self.f)(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a synchronous closure as a middleware stage.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn Middleware>
where
    F: Fn(&mut RequestContext) -> Result<Flow, YukonError> + Send + Sync + 'static,
{
    Arc::new(FnMiddleware {
        name: name.into(),
        f,
    })
}

/// A nodule's own pre- or post-processor.
///
/// Runs synchronously inside the matching system stage. An `Err` fails the request.
pub trait NoduleHook: Send + Sync {
    fn run(&self, ctx: &mut RequestContext) -> Result<(), YukonError>;
}

impl<F> NoduleHook for F
where
    F: Fn(&mut RequestContext) -> Result<(), YukonError> + Send + Sync,
{
    fn run(&self, ctx: &mut RequestContext) -> Result<(), YukonError> {
        self(ctx)
    }
}
