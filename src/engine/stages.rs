// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The built-in stages every request passes through.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::config::ContentType;
use crate::engine::resolve::{
    build_call_spec, resolve_content_type, resolve_render_data, resolve_template,
};
use crate::engine::{FanOutDispatcher, RequestContext, Response};
use crate::errors::YukonError;
use crate::traits::{Flow, Middleware};

/// Runs the nodule's pre-processor, if it has one.
pub struct PreProcessor;

#[async_trait]
impl Middleware for PreProcessor {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Flow, YukonError> {
        if let Some(hook) = ctx.nodule.pre_processor.clone() {
            hook.run(ctx)?;
        }
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "pre_processor"
    }
}

/// Registers the nodule's configured calls after whatever `pre_data` added,
/// dispatches the batch and stores every successful body in `locals`.
pub struct DoApi {
    dispatcher: FanOutDispatcher,
}

impl DoApi {
    pub fn new(dispatcher: FanOutDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Middleware for DoApi {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Flow, YukonError> {
        let specs: Vec<_> = ctx
            .nodule
            .api_calls
            .iter()
            .enumerate()
            .map(|(index, call)| build_call_spec(call, index, &ctx.nodule, &ctx.request))
            .collect();
        for spec in specs {
            ctx.batch.push(spec)?;
        }

        let outcome = self.dispatcher.dispatch(&mut ctx.batch, &ctx.request).await;

        for (namespace, result) in ctx.batch.results() {
            if let Some(body) = result.body() {
                ctx.locals.insert(namespace.clone(), body.clone());
            }
        }
        outcome?;
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "do_api"
    }
}

/// Runs the nodule's post-processor, then settles what will be rendered.
pub struct PostProcessor;

#[async_trait]
impl Middleware for PostProcessor {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Flow, YukonError> {
        if let Some(hook) = ctx.nodule.post_processor.clone() {
            hook.run(ctx)?;
        }
        ctx.render_data = Some(resolve_render_data(ctx.render_data.take(), &ctx.locals));
        Ok(Flow::Continue)
    }

    fn name(&self) -> &str {
        "post_processor"
    }
}

/// Builds the response: JSON as is, HTML as a render request for the template engine.
pub struct Finish {
    shared_template_dir: Option<PathBuf>,
}

impl Finish {
    pub fn new(shared_template_dir: Option<PathBuf>) -> Self {
        Self { shared_template_dir }
    }
}

#[async_trait]
impl Middleware for Finish {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Flow, YukonError> {
        let data = resolve_render_data(ctx.render_data.clone(), &ctx.locals);
        let response = match resolve_content_type(&ctx.nodule, &ctx.request) {
            ContentType::Json => Response::json(data),
            ContentType::Html => Response::render(
                resolve_template(&ctx.nodule, self.shared_template_dir.as_deref()),
                data,
            ),
        };
        Ok(ctx.respond(response))
    }

    fn name(&self) -> &str {
        "send_response"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::RecordingTransport;
    use crate::calls::CallSpec;
    use crate::config::{ApiCallConfig, NoduleConfig};
    use crate::engine::{Body, IncomingRequest, Nodule};
    use serde_json::json;
    use std::path::Path;
    use std::sync::Arc;

    fn context(config: NoduleConfig, path: &str) -> RequestContext {
        RequestContext::new(IncomingRequest::get(path), Arc::new(Nodule::from_config(&config)))
    }

    fn api_call(namespace: Option<&str>, path: &str) -> ApiCallConfig {
        ApiCallConfig {
            namespace: namespace.map(str::to_string),
            path: Some(path.to_string()),
            ..ApiCallConfig::default()
        }
    }

    fn dispatcher(transport: Arc<RecordingTransport>) -> FanOutDispatcher {
        FanOutDispatcher::new(transport, Arc::new(RecordingTransport::new()))
    }

    #[tokio::test]
    async fn do_api_appends_configured_calls_after_existing_ones() {
        let transport = Arc::new(
            RecordingTransport::new()
                .with_body("/api/globalnav", json!({"links": ["home"]}))
                .with_body("/api/profile", json!({"name": "ann"})),
        );
        let mut ctx = context(
            NoduleConfig {
                name: "home".into(),
                route: "/".into(),
                api_calls: vec![api_call(None, "/api/profile"), api_call(Some("ads"), "/api/ads")],
                ..NoduleConfig::default()
            },
            "/",
        );
        ctx.batch
            .push(CallSpec::new("globalNav", "/api/globalnav"))
            .unwrap();

        let flow = DoApi::new(dispatcher(transport.clone()))
            .handle(&mut ctx)
            .await
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        let namespaces: Vec<_> = ctx.batch.specs().iter().map(|s| s.namespace.as_str()).collect();
        assert_eq!(namespaces, vec!["globalNav", "data1", "ads"]);
        assert_eq!(ctx.locals.get("data1"), Some(&json!({"name": "ann"})));
        assert_eq!(ctx.locals.get("globalNav"), Some(&json!({"links": ["home"]})));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn do_api_failure_still_fills_locals_for_settled_calls() {
        let transport = Arc::new(RecordingTransport::new().failing(
            "/api/broken",
            crate::errors::CallFailure::Status {
                url: "/api/broken".into(),
                status: 503,
                body: String::new(),
            },
        ));
        let mut ctx = context(
            NoduleConfig {
                name: "home".into(),
                route: "/".into(),
                api_calls: vec![api_call(Some("ok"), "/api/ok"), api_call(Some("broken"), "/api/broken")],
                ..NoduleConfig::default()
            },
            "/",
        );

        let error = DoApi::new(dispatcher(transport)).handle(&mut ctx).await.unwrap_err();

        assert!(matches!(error, YukonError::Batch(ref failure) if failure.namespace == "broken"));
        assert!(ctx.locals.contains_key("ok"));
        assert!(!ctx.locals.contains_key("broken"));
    }

    #[tokio::test]
    async fn pre_processor_error_is_returned() {
        let mut nodule = Nodule::from_config(&NoduleConfig {
            name: "home".into(),
            route: "/".into(),
            ..NoduleConfig::default()
        });
        nodule.pre_processor = Some(Arc::new(|ctx: &mut RequestContext| -> Result<(), YukonError> {
            Err(YukonError::nodule(ctx.nodule.name.clone(), "pre_processor", "not allowed"))
        }));
        let mut ctx = RequestContext::new(IncomingRequest::get("/"), Arc::new(nodule));

        let error = PreProcessor.handle(&mut ctx).await.unwrap_err();
        assert_eq!(error.to_string(), "nodule 'home' pre_processor failed: not allowed");
    }

    #[tokio::test]
    async fn post_processor_sets_render_data() {
        let mut nodule = Nodule::from_config(&NoduleConfig {
            name: "home".into(),
            route: "/".into(),
            ..NoduleConfig::default()
        });
        nodule.post_processor = Some(Arc::new(|ctx: &mut RequestContext| -> Result<(), YukonError> {
            let name = ctx.locals.get("data1").cloned().unwrap_or_default();
            ctx.render_data = Some(json!({ "greeting": name }));
            Ok(())
        }));
        let mut ctx = RequestContext::new(IncomingRequest::get("/"), Arc::new(nodule));
        ctx.locals.insert("data1".into(), json!("ann"));

        PostProcessor.handle(&mut ctx).await.unwrap();
        assert_eq!(ctx.render_data, Some(json!({"greeting": "ann"})));
    }

    #[tokio::test]
    async fn post_processor_defaults_render_data_to_data1() {
        let mut ctx = context(
            NoduleConfig {
                name: "home".into(),
                route: "/".into(),
                ..NoduleConfig::default()
            },
            "/",
        );
        ctx.locals.insert("data1".into(), json!({"a": 1}));

        PostProcessor.handle(&mut ctx).await.unwrap();
        assert_eq!(ctx.render_data, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn finish_answers_json_for_json_routes() {
        let mut ctx = context(
            NoduleConfig {
                name: "cart".into(),
                route: "/json/cart".into(),
                ..NoduleConfig::default()
            },
            "/json/cart",
        );
        ctx.render_data = Some(json!({"items": 2}));

        let flow = Finish::new(None).handle(&mut ctx).await.unwrap();

        assert_eq!(flow, Flow::Respond);
        assert_eq!(ctx.response, Some(Response::json(json!({"items": 2}))));
    }

    #[tokio::test]
    async fn finish_renders_html_with_resolved_template() {
        let mut ctx = context(
            NoduleConfig {
                name: "home".into(),
                route: "/".into(),
                dir: Some(PathBuf::from("/app/home")),
                ..NoduleConfig::default()
            },
            "/",
        );

        Finish::new(Some(PathBuf::from("/app/shared")))
            .handle(&mut ctx)
            .await
            .unwrap();

        let response = ctx.response.unwrap();
        assert_eq!(
            response.body,
            Body::Render {
                template: Path::new("/app/home/home.jade").to_path_buf(),
                data: json!({}),
            }
        );
    }
}
