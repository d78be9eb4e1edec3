// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tracing::Instrument;

use crate::config::YukonConfig;
use crate::engine::{IncomingRequest, Pipeline, RequestContext, Response, Router};
use crate::errors::YukonError;
use crate::observability::messages::pipeline::{RequestFailed, RequestRouted};
use crate::observability::messages::StructuredLog;

/// A configured yukon runtime. Built by [`RuntimeBuilder`](crate::config::RuntimeBuilder).
///
/// Everything inside is read-only, so one `Yukon` serves any number of
/// concurrent requests.
pub struct Yukon {
    config: Arc<YukonConfig>,
    router: Router,
    pipeline: Pipeline,
}

impl Yukon {
    pub(crate) fn new(config: Arc<YukonConfig>, router: Router, pipeline: Pipeline) -> Self {
        Self {
            config,
            router,
            pipeline,
        }
    }

    pub fn config(&self) -> &YukonConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Answer one request.
    ///
    /// Never fails: an unknown route becomes a 404, any other error a bare 500
    /// whose details only go to the log.
    pub async fn handle(&self, request: IncomingRequest) -> Response {
        let path = request.path.clone();
        match self.serve(request).await {
            Ok(response) => response,
            Err(error) => {
                let status = error.status_code();
                RequestFailed {
                    path: &path,
                    status,
                    error: &error,
                }
                .log();
                match error {
                    YukonError::NotFound { .. } => Response::text(404, "404 Not Found"),
                    _ => Response::server_error(),
                }
            }
        }
    }

    async fn serve(&self, mut request: IncomingRequest) -> Result<Response, YukonError> {
        let matched = self
            .router
            .route(request.verb, &request.path)
            .ok_or_else(|| YukonError::NotFound {
                verb: request.verb.to_string(),
                path: request.path.clone(),
            })?;
        request.params = matched.params;

        let routed = RequestRouted {
            verb: request.verb.as_str(),
            path: &request.path,
            nodule: &matched.nodule.name,
        };
        routed.log();
        let span = routed.span("handle");

        let mut ctx = RequestContext::new(request, matched.nodule);
        self.pipeline.run(&mut ctx).instrument(span).await?;

        ctx.response.ok_or_else(|| {
            YukonError::middleware("send_response", "pipeline finished without a response")
        })
    }
}
