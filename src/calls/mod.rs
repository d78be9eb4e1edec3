// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Outbound call model: what to call, what came back, and the per-request batch
//! that ties the two together by namespace key.

mod batch;
mod result;
mod spec;

pub use batch::RequestBatch;
pub use result::{ApiResponse, CallResult};
pub use spec::{BodyType, CallSpec, Header, Verb};
