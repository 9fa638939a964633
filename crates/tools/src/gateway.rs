//! The service gateway: one `dispatch` over three collaborators.
//!
//! Every call is bounded by a timeout. Collaborator errors and timeouts are
//! folded into `ToolResult::Failure` with a reason code; nothing escapes as
//! an error. Retries are not attempted here: a failed call is reported once
//! and the planner decides whether to try again.

use async_trait::async_trait;
use sahayak_core::error::ToolError;
use sahayak_core::tool::{
    ApplicationEndpoint, EligibilityEngine, FailureReason, SchemeRetriever, ToolGateway, ToolKind,
    ToolRequest, ToolResult,
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct ServiceGateway {
    retriever: Arc<dyn SchemeRetriever>,
    eligibility: Arc<dyn EligibilityEngine>,
    applications: Arc<dyn ApplicationEndpoint>,
    timeout: Duration,
}

impl ServiceGateway {
    pub fn new(
        retriever: Arc<dyn SchemeRetriever>,
        eligibility: Arc<dyn EligibilityEngine>,
        applications: Arc<dyn ApplicationEndpoint>,
    ) -> Self {
        Self {
            retriever,
            eligibility,
            applications,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T, F>(&self, kind: ToolKind, call: F) -> Result<T, ToolError>
    where
        F: Future<Output = Result<T, ToolError>> + Send,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout {
                tool_name: kind.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl ToolGateway for ServiceGateway {
    async fn dispatch(&self, request: ToolRequest) -> ToolResult {
        let kind = request.kind();
        let start = Instant::now();

        let outcome = match &request {
            ToolRequest::Retrieve(query) => self
                .bounded(kind, self.retriever.retrieve(query))
                .await
                .map(|schemes| ToolResult::Retrieve { schemes }),
            ToolRequest::Evaluate(req) => self
                .bounded(kind, self.eligibility.evaluate(req))
                .await
                .map(ToolResult::Evaluate),
            ToolRequest::Apply(form) => self
                .bounded(kind, self.applications.submit(form))
                .await
                .map(ToolResult::Apply),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(result) => {
                debug!(tool = %kind, elapsed_ms, "Tool dispatch completed");
                result
            }
            Err(e) => {
                warn!(tool = %kind, error = %e, elapsed_ms, "Tool dispatch failed");
                ToolResult::failure(kind, FailureReason::from(&e))
            }
        }
    }
}
