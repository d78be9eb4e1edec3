// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The fixed, ordered list of stages a request runs through.
//!
//! ```text
//! start -> pre_processor -> pre_data -> get_data | do_api -> post_data
//!       -> post_processor -> finish -> send_response
//! ```
//!
//! App slots left unset are pass-through stages. A stage returning
//! [`Flow::Respond`] ends the run early; an `Err` skips everything after it.

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::stages::{DoApi, Finish, PostProcessor, PreProcessor};
use crate::engine::{FanOutDispatcher, RequestContext};
use crate::errors::YukonError;
use crate::observability::messages::pipeline::StageEntered;
use crate::observability::messages::StructuredLog;
use crate::traits::{Flow, Middleware, PassThrough};

/// Middlewares an app plugs into the pipeline.
#[derive(Clone, Default)]
pub struct AppMiddlewares {
    pub start: Option<Arc<dyn Middleware>>,
    /// Runs before the API calls; may push extra calls onto the batch.
    pub pre_data: Option<Arc<dyn Middleware>>,
    /// Replaces the built-in API stage entirely.
    pub get_data: Option<Arc<dyn Middleware>>,
    pub post_data: Option<Arc<dyn Middleware>>,
    pub finish: Option<Arc<dyn Middleware>>,
}

impl AppMiddlewares {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.start = Some(stage);
        self
    }

    pub fn pre_data(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.pre_data = Some(stage);
        self
    }

    pub fn get_data(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.get_data = Some(stage);
        self
    }

    pub fn post_data(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.post_data = Some(stage);
        self
    }

    pub fn finish(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.finish = Some(stage);
        self
    }
}

pub struct Pipeline {
    stages: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    pub fn assemble(
        app: AppMiddlewares,
        dispatcher: FanOutDispatcher,
        shared_template_dir: Option<PathBuf>,
    ) -> Self {
        fn slot(stage: Option<Arc<dyn Middleware>>, name: &'static str) -> Arc<dyn Middleware> {
            stage.unwrap_or_else(|| Arc::new(PassThrough(name)))
        }

        let get_data = app
            .get_data
            .unwrap_or_else(|| Arc::new(DoApi::new(dispatcher)));

        Self {
            stages: vec![
                slot(app.start, "start"),
                Arc::new(PreProcessor),
                slot(app.pre_data, "pre_data"),
                get_data,
                slot(app.post_data, "post_data"),
                Arc::new(PostProcessor),
                slot(app.finish, "finish"),
                Arc::new(Finish::new(shared_template_dir)),
            ],
        }
    }

    pub async fn run(&self, ctx: &mut RequestContext) -> Result<(), YukonError> {
        for stage in &self.stages {
            StageEntered {
                nodule: &ctx.nodule.name,
                stage: stage.name(),
            }
            .log();
            if stage.handle(ctx).await? == Flow::Respond {
                break;
            }
        }
        Ok(())
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}
