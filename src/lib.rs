// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // outbound transports
pub mod calls;      // call specs, results, batches
pub mod config;     // config loading + runtime builder
pub mod demo;       // example app wiring
pub mod engine;     // router, pipeline, fan-out dispatcher
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // transport, hook and middleware seams
