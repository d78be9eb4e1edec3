// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for yukon.
//!
//! Every diagnostic event is a small struct under [`messages`] that implements
//! `Display` for the human-readable line and [`messages::StructuredLog`] for the
//! fields, so no log text is scattered through the engine as magic strings.
//!
//! Messages are organized by subsystem:
//! * `messages::dispatch` - fan-out batches and individual outbound calls
//! * `messages::pipeline` - request routing and middleware stages
//! * `messages::config` - configuration loading and registration warnings
//!
//! # Usage
//!
//! ```rust
//! use yukon::observability::messages::dispatch::BatchStarted;
//! use yukon::observability::messages::StructuredLog;
//!
//! BatchStarted { call_count: 2 }.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";
const DEBUG_FILTER: &str = "yukon=debug,info";

/// Install the global `tracing` subscriber.
///
/// `debug_to_console` raises yukon's own events to `debug`. `RUST_LOG` wins over
/// both defaults. Calling this twice is harmless; the second call is ignored.
pub fn init_logging(debug_to_console: bool) {
    let fallback = if debug_to_console {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
