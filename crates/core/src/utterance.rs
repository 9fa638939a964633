//! Utterances and the intent-extraction seam.
//!
//! An utterance is the plain text produced by the external speech-to-text
//! collaborator, its recognition confidence, and the structured intent the
//! reasoning engine extracted from it. The core never interprets free-form
//! text itself; it only consumes [`Intent`]s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::profile::{Field, FieldAssignment, FieldValue};

/// A yes/no style signal carried by an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Agreement: "yes", "retry", "go ahead".
    Affirm,
    /// Refusal: "no", "stop".
    Deny,
}

/// Structured meaning extracted from one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Candidate field assignments, at most one per field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<FieldAssignment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,

    /// The user asked to hear more about the scheme under discussion.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wants_details: bool,
}

impl Intent {
    pub fn with_assignment(mut self, field: Field, value: FieldValue) -> Self {
        self.assignments.retain(|a| a.field != field);
        self.assignments.push(FieldAssignment::new(field, value));
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_details_request(mut self) -> Self {
        self.wants_details = true;
        self
    }

    /// Nothing recognisable was extracted.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.signal.is_none() && !self.wants_details
    }

    pub fn value_for(&self, field: Field) -> Option<&FieldValue> {
        self.assignments
            .iter()
            .find(|a| a.field == field)
            .map(|a| &a.value)
    }
}

/// One inbound turn. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,

    /// Speech-to-text confidence in `[0.0, 1.0]`. Typed input is `1.0`.
    pub confidence: f32,

    pub intent: Intent,
}

impl Utterance {
    pub fn new(text: impl Into<String>, confidence: f32, intent: Intent) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            intent,
        }
    }
}

/// What the session is currently waiting for, handed to the extractor so
/// that a bare "40" can be attributed to the field just asked about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionContext {
    pub awaiting: Option<Field>,
}

/// The natural-language capability: utterance text + context → intent.
///
/// Implementations must not fail: text they cannot interpret yields an
/// empty [`Intent`], which the evaluator classifies as unrecognised input.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// The extractor name (e.g., "rules", "llm").
    fn name(&self) -> &str;

    async fn extract(&self, text: &str, context: &ExtractionContext) -> Intent;
}
