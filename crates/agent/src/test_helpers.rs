//! Shared test helpers for session tests.

use sahayak_core::tool::{FailureReason, ToolGateway, ToolRequest, ToolResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A gateway that returns a sequence of scripted results.
///
/// Each dispatch returns the next result in the queue and records the
/// request. Once the queue is empty every call fails as unavailable.
pub struct ScriptedGateway {
    results: Mutex<VecDeque<ToolResult>>,
    requests: Mutex<Vec<ToolRequest>>,
}

impl ScriptedGateway {
    pub fn new(results: Vec<ToolResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ToolRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ToolGateway for ScriptedGateway {
    async fn dispatch(&self, request: ToolRequest) -> ToolResult {
        let kind = request.kind();
        self.requests.lock().unwrap().push(request);
        self.results.lock().unwrap().pop_front().unwrap_or_else(|| {
            ToolResult::failure(
                kind,
                FailureReason::Unavailable {
                    detail: "script exhausted".into(),
                },
            )
        })
    }
}
