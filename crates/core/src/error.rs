//! Error types for the Sahayak domain.
//!
//! Conversation-level failures (garbled input, contradictions, empty
//! retrievals, missing documents) are *not* errors here: they surface as
//! [`Verdict`](crate::verdict::Verdict)s and flow through the planner. The
//! types below cover collaborator failures before the gateway converts them,
//! and misuse of the session API.

use thiserror::Error;

/// Failures raised by an external collaborator behind the tool gateway.
///
/// The gateway never lets these escape; it folds them into
/// `ToolResult::Failure` with a matching reason code.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed response from {tool_name}: {reason}")]
    Malformed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Unknown scheme: {0}")]
    UnknownScheme(String),
}

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Session {session_id} has already concluded")]
    Concluded { session_id: String },
}
