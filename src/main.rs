// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use serde_json::{Map, Value};
use std::env;
use std::sync::Arc;
use std::time::Instant;
use yukon::config::{load_and_validate_config, RuntimeBuilder};
use yukon::demo;
use yukon::engine::{Body, IncomingRequest, RequestContext};
use yukon::errors::YukonError;
use yukon::observability::init_logging;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64)";
const DEFAULT_HOST: &str = "localhost:3000";

/// The home page renders a few namespaces side by side instead of `data1`.
fn home_post_processor(ctx: &mut RequestContext) -> Result<(), YukonError> {
    let data: Map<String, Value> = ["profile", "promos", demo::GLOBAL_NAV]
        .iter()
        .filter_map(|ns| ctx.locals.get(*ns).map(|v| (ns.to_string(), v.clone())))
        .collect();
    ctx.render_data = Some(Value::Object(data));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <config.yaml|config.toml> <path> [user-agent]", args[0]);
        eprintln!("Example: {} demo/demo.yaml /", args[0]);
        eprintln!("Example: {} demo/demo.yaml /product/42 \"Mozilla/5.0 (iPhone)\"", args[0]);
        std::process::exit(1);
    }

    let config_file = &args[1];
    let path = &args[2];
    let user_agent = args.get(3).map(String::as_str).unwrap_or(DEFAULT_USER_AGENT);

    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    init_logging(config.debug_to_console);

    let yukon = RuntimeBuilder::new(config)
        .hooks(demo::hooks(DEFAULT_HOST))
        .middlewares(demo::middlewares())
        .post_processor("home", Arc::new(home_post_processor))
        .build()
        .context("building runtime")?;

    println!("📋 Configuration: {}", config_file);
    println!("➡️  GET {} ({})", path, user_agent);

    let started = Instant::now();
    let request = IncomingRequest::get(path.as_str()).with_header("user-agent", user_agent);
    let response = yukon.handle(request).await;

    println!("⬅️  {} {} in {:?}", response.status, response.content_type(), started.elapsed());
    match &response.body {
        Body::Json(body) => println!("{}", serde_json::to_string_pretty(body)?),
        Body::Render { template, data } => {
            println!("🖼️  render {}", template.display());
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        Body::Text(text) => println!("{}", text),
    }

    Ok(())
}
