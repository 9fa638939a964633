//! Evaluator verdicts and the conversation-level error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::{Field, FieldValue};
use crate::tool::{FailureReason, ToolFailure};

/// The evaluator's classification of an utterance or tool result.
///
/// Consumed by the planner in the same turn; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Valid,

    /// Required fields still unset, in the configured ask order.
    MissingFields { fields: Vec<Field> },

    Contradiction {
        field: Field,
        old: FieldValue,
        new: FieldValue,
    },

    NoEligibleScheme,

    ToolFailure(ToolFailure),

    InputUnrecognized,

    /// The user explicitly refused to continue.
    Declined,
}

/// Conversation-level error taxonomy. Every class surfaces as a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    InputError,
    ContradictionError,
    ToolError,
    EligibilityExhausted,
    DocumentError,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorClass::InputError => "input_error",
            ErrorClass::ContradictionError => "contradiction_error",
            ErrorClass::ToolError => "tool_error",
            ErrorClass::EligibilityExhausted => "eligibility_exhausted",
            ErrorClass::DocumentError => "document_error",
        };
        f.write_str(s)
    }
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Short label for logs and events.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Valid => "valid",
            Verdict::MissingFields { .. } => "missing_fields",
            Verdict::Contradiction { .. } => "contradiction",
            Verdict::NoEligibleScheme => "no_eligible_scheme",
            Verdict::ToolFailure(_) => "tool_failure",
            Verdict::InputUnrecognized => "input_unrecognized",
            Verdict::Declined => "declined",
        }
    }

    /// The error class this verdict represents, if it is a failure.
    pub fn error_class(&self) -> Option<ErrorClass> {
        match self {
            Verdict::Valid | Verdict::MissingFields { .. } | Verdict::Declined => None,
            Verdict::Contradiction { .. } => Some(ErrorClass::ContradictionError),
            Verdict::NoEligibleScheme => Some(ErrorClass::EligibilityExhausted),
            Verdict::InputUnrecognized => Some(ErrorClass::InputError),
            Verdict::ToolFailure(failure) => match failure.reason {
                FailureReason::MissingDocument { .. } => Some(ErrorClass::DocumentError),
                _ => Some(ErrorClass::ToolError),
            },
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::MissingFields { fields } => {
                let names: Vec<&str> = fields.iter().map(Field::as_str).collect();
                write!(f, "missing_fields({})", names.join(", "))
            }
            Verdict::Contradiction { field, old, new } => {
                write!(f, "contradiction({field}: {old} -> {new})")
            }
            Verdict::ToolFailure(failure) => write!(f, "tool_failure({failure})"),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolKind;

    #[test]
    fn missing_document_is_a_document_error() {
        let verdict = Verdict::ToolFailure(ToolFailure {
            tool: ToolKind::Apply,
            reason: FailureReason::MissingDocument {
                documents: vec!["income certificate".into()],
            },
        });
        assert_eq!(verdict.error_class(), Some(ErrorClass::DocumentError));
        assert_eq!(verdict.label(), "tool_failure");
    }

    #[test]
    fn timeouts_are_tool_errors() {
        let verdict = Verdict::ToolFailure(ToolFailure {
            tool: ToolKind::Retrieve,
            reason: FailureReason::Timeout { after_secs: 10 },
        });
        assert_eq!(verdict.error_class(), Some(ErrorClass::ToolError));
        assert_eq!(verdict.to_string(), "tool_failure(retrieve failed (timeout))");
    }

    #[test]
    fn progress_verdicts_have_no_error_class() {
        assert!(Verdict::Valid.error_class().is_none());
        assert!(Verdict::MissingFields { fields: vec![Field::Age] }
            .error_class()
            .is_none());
    }

    #[test]
    fn contradiction_display_names_both_values() {
        let verdict = Verdict::Contradiction {
            field: Field::Age,
            old: FieldValue::Number(40),
            new: FieldValue::Number(25),
        };
        assert_eq!(verdict.to_string(), "contradiction(age: 40 -> 25)");
    }
}
