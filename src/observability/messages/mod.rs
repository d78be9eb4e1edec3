// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for a consistent human-readable line and
//! [`StructuredLog`] to emit the same event with typed fields at the right level.
//!
//! # Usage Pattern
//!
//! ```rust
//! use yukon::observability::messages::dispatch::CallIssued;
//! use yukon::observability::messages::StructuredLog;
//!
//! let msg = CallIssued {
//!     namespace: "profile",
//!     verb: "GET",
//!     target: "api.local/api/profile",
//!     transport: "http",
//! };
//!
//! msg.log();
//! ```

pub mod config;
pub mod dispatch;
pub mod pipeline;

use tracing::Span;

/// An event that knows its own level and fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// A span carrying the same fields, for work that belongs to this event.
    fn span(&self, name: &str) -> Span;
}
