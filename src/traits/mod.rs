pub mod hooks;
pub mod middleware;
pub mod transport;

pub use hooks::{CallHooks, DefaultHooks, SettledCall, Verdict};
pub use middleware::{from_fn, Flow, Middleware, NoduleHook, PassThrough};
pub use transport::Transport;
