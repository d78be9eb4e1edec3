// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transports that carry outbound API calls.
//!
//! # Available Transports
//!
//! ## HTTP
//! [`HttpTransport`] sends live calls with `reqwest`. Verbs, params, body
//! encoding and custom headers come straight from the [`CallSpec`](crate::calls::CallSpec).
//!
//! ## Fixtures
//! [`FixtureTransport`] answers stubbed calls from JSON files, with the same
//! response shape as a live call.
//!
//! ## Recording (test-only)
//! `stub::RecordingTransport` answers from memory and remembers every call, with
//! optional per-path delays and failures.
//!
//! # Examples
//!
//! ```rust
//! use yukon::backends::{FixtureTransport, HttpTransport};
//! use yukon::engine::FanOutDispatcher;
//! use std::sync::Arc;
//!
//! let dispatcher = FanOutDispatcher::new(
//!     Arc::new(HttpTransport::new().with_default_host("api.example.com")),
//!     Arc::new(FixtureTransport),
//! );
//! # let _ = dispatcher;
//! ```

mod fixture;
mod http;
#[cfg(test)]
pub mod stub;

pub use fixture::FixtureTransport;
pub use http::HttpTransport;
