//! # Sahayak Core
//!
//! Domain types, traits, and error definitions for the Sahayak welfare-scheme
//! agent. This crate has **no framework dependencies**; it defines the
//! vocabulary every other crate speaks: profile fields, utterances, tool
//! requests and results, verdicts, and session configuration.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (intent extraction, scheme retrieval,
//! eligibility, application submission) is a trait here. Implementations
//! live in their own crates, so sessions can be driven by real services or
//! by deterministic stubs in tests.

pub mod error;
pub mod event;
pub mod profile;
pub mod session;
pub mod tool;
pub mod utterance;
pub mod verdict;

// Re-export key types at crate root for ergonomics
pub use error::{SessionError, ToolError};
pub use event::{DomainEvent, EventBus, SessionEvents};
pub use profile::{Field, FieldAssignment, FieldValue, ProfileSnapshot};
pub use session::{Language, Phase, SessionConfig, SessionId};
pub use tool::{
    ApplicationEndpoint, ApplicationForm, ApplicationStatus, EligibilityEngine,
    EligibilityReport, EligibilityRequest, EligibilityRules, FailureReason, RetrieveQuery,
    Scheme, SchemeRetriever, ToolFailure, ToolGateway, ToolKind, ToolRequest, ToolResult,
};
pub use utterance::{ExtractionContext, Intent, IntentExtractor, Signal, Utterance};
pub use verdict::{ErrorClass, Verdict};
