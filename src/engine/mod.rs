//! Request handling: routing, the middleware pipeline and the fan-out dispatcher.

mod app;
mod context;
mod dispatcher;
mod nodule;
mod pipeline;
pub mod resolve;
mod router;
pub mod stages;

pub use app::Yukon;
pub use context::{Body, IncomingRequest, RequestContext, Response};
pub use dispatcher::FanOutDispatcher;
pub use nodule::Nodule;
pub use pipeline::{AppMiddlewares, Pipeline};
pub use router::{RouteMatch, Router};
