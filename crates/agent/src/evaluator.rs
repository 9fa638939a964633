//! The evaluator: classifies one utterance or tool result into a [`Verdict`].
//!
//! Evaluation is a pure function of the profile memory and the input. It
//! never writes memory itself; the writes it approves are returned in the
//! [`Evaluation`] and applied by the session.
//!
//! Priority for an utterance outside recovery:
//!
//! 1. Low recognition confidence → `InputUnrecognized`
//! 2. A value that conflicts with a stored field → `Contradiction`
//! 3. No assignment that sets an unset field → `InputUnrecognized`
//! 4. Required fields still unset → `MissingFields`
//! 5. Otherwise → `Valid`
//!
//! While recovering, the utterance is read as an answer to the pending
//! cause (see [`Evaluator::evaluate`]).

use sahayak_core::profile::{Field, FieldAssignment};
use sahayak_core::tool::{ApplicationStatus, FailureReason, ToolFailure, ToolKind, ToolResult};
use sahayak_core::utterance::{Signal, Utterance};
use sahayak_core::verdict::Verdict;
use sahayak_memory::{ProfileMemory, ProposeOutcome};
use std::collections::BTreeSet;

/// What is being evaluated.
#[derive(Debug, Clone, Copy)]
pub enum EvaluationInput<'a> {
    Utterance {
        utterance: &'a Utterance,
        /// The verdict the session is recovering from, if any.
        recovering: Option<&'a Verdict>,
    },
    ToolResult {
        result: &'a ToolResult,
        /// Scheme ids already found ineligible in this session.
        excluded: &'a BTreeSet<String>,
    },
}

/// A verdict plus the memory writes and document confirmations it approves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,

    /// Values to pass through [`ProfileMemory::propose`].
    pub proposals: Vec<FieldAssignment>,

    /// Explicitly confirmed values for [`ProfileMemory::resolve`].
    pub resolutions: Vec<FieldAssignment>,

    /// Documents the user confirmed holding.
    pub acknowledged_documents: Vec<String>,

    /// The user asked about the scheme while a document confirmation was
    /// pending. The verdict is `InputUnrecognized`; the pending prompt
    /// stands.
    pub details_requested: bool,
}

impl Evaluation {
    fn verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            proposals: Vec::new(),
            resolutions: Vec::new(),
            acknowledged_documents: Vec::new(),
            details_requested: false,
        }
    }

    fn details() -> Self {
        let mut evaluation = Self::verdict(Verdict::InputUnrecognized);
        evaluation.details_requested = true;
        evaluation
    }

    fn with_proposals(mut self, proposals: Vec<FieldAssignment>) -> Self {
        self.proposals = proposals;
        self
    }

    fn with_resolutions(mut self, resolutions: Vec<FieldAssignment>) -> Self {
        self.resolutions = resolutions;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    field_order: Vec<Field>,
    confidence_threshold: f32,
}

impl Evaluator {
    pub fn new(field_order: Vec<Field>, confidence_threshold: f32) -> Self {
        Self {
            field_order,
            confidence_threshold,
        }
    }

    pub fn field_order(&self) -> &[Field] {
        &self.field_order
    }

    /// Classify `input` against `memory`.
    ///
    /// While recovering from a verdict, the utterance answers that verdict:
    ///
    /// - `Contradiction(f, old, new)`: yes resolves `f` to `new`, no keeps
    ///   `old`, an explicit value for `f` resolves to that value.
    /// - `ToolFailure` / `NoEligibleScheme`: yes retries, no declines. A
    ///   value that differs from memory becomes a new `Contradiction`, so a
    ///   correction is confirmed before it overwrites anything.
    /// - missing documents: yes confirms them, no declines, and a request
    ///   for details is flagged for the session to describe the scheme.
    ///
    /// A conflicting value for another field becomes a new `Contradiction`.
    /// Anything else is `InputUnrecognized`.
    pub fn evaluate(&self, memory: &ProfileMemory, input: EvaluationInput<'_>) -> Evaluation {
        match input {
            EvaluationInput::Utterance {
                utterance,
                recovering: None,
            } => self.evaluate_utterance(memory, utterance),
            EvaluationInput::Utterance {
                utterance,
                recovering: Some(cause),
            } => self.evaluate_recovery(memory, utterance, cause),
            EvaluationInput::ToolResult { result, excluded } => {
                self.evaluate_tool_result(memory, result, excluded)
            }
        }
    }

    fn evaluate_utterance(&self, memory: &ProfileMemory, utterance: &Utterance) -> Evaluation {
        if utterance.confidence < self.confidence_threshold {
            return Evaluation::verdict(Verdict::InputUnrecognized);
        }

        let (accepted, conflict) = partition(memory, &utterance.intent.assignments, None);
        if let Some(contradiction) = conflict {
            return Evaluation::verdict(contradiction).with_proposals(accepted);
        }

        // Restating a stored value sets nothing and is not an answer.
        if accepted.is_empty() {
            return Evaluation::verdict(Verdict::InputUnrecognized);
        }

        let missing: Vec<Field> = memory
            .missing(&self.field_order)
            .into_iter()
            .filter(|f| !accepted.iter().any(|a| a.field == *f))
            .collect();

        let verdict = if missing.is_empty() {
            Verdict::Valid
        } else {
            Verdict::MissingFields { fields: missing }
        };
        Evaluation::verdict(verdict).with_proposals(accepted)
    }

    fn evaluate_recovery(
        &self,
        memory: &ProfileMemory,
        utterance: &Utterance,
        cause: &Verdict,
    ) -> Evaluation {
        if utterance.confidence < self.confidence_threshold {
            return Evaluation::verdict(Verdict::InputUnrecognized);
        }

        let intent = &utterance.intent;
        match cause {
            Verdict::Contradiction { field, new, .. } => {
                let (accepted, conflict) = partition(memory, &intent.assignments, Some(*field));
                if let Some(contradiction) = conflict {
                    return Evaluation::verdict(contradiction).with_proposals(accepted);
                }

                let resolution = match (intent.value_for(*field), intent.signal) {
                    (Some(value), _) => Some(Some(value.clone())),
                    (None, Some(Signal::Affirm)) => Some(Some(new.clone())),
                    (None, Some(Signal::Deny)) => Some(None),
                    (None, None) => None,
                };

                match resolution {
                    Some(value) => {
                        let resolutions = value
                            .map(|v| vec![FieldAssignment::new(*field, v)])
                            .unwrap_or_default();
                        Evaluation::verdict(Verdict::Valid)
                            .with_proposals(accepted)
                            .with_resolutions(resolutions)
                    }
                    None => Evaluation::verdict(Verdict::InputUnrecognized).with_proposals(accepted),
                }
            }

            Verdict::ToolFailure(ToolFailure {
                reason: FailureReason::MissingDocument { documents },
                ..
            }) => {
                let (accepted, conflict) = partition(memory, &intent.assignments, None);
                if let Some(contradiction) = conflict {
                    return Evaluation::verdict(contradiction).with_proposals(accepted);
                }
                match intent.signal {
                    Some(Signal::Affirm) => {
                        let mut evaluation =
                            Evaluation::verdict(Verdict::Valid).with_proposals(accepted);
                        evaluation.acknowledged_documents = documents.clone();
                        evaluation
                    }
                    Some(Signal::Deny) => Evaluation::verdict(Verdict::Declined),
                    None if intent.wants_details => Evaluation::details().with_proposals(accepted),
                    None => Evaluation::verdict(Verdict::InputUnrecognized).with_proposals(accepted),
                }
            }

            Verdict::ToolFailure(_) | Verdict::NoEligibleScheme => {
                // A corrected value conflicts with memory and is confirmed
                // like any other contradiction.
                let (accepted, conflict) = partition(memory, &intent.assignments, None);
                if let Some(contradiction) = conflict {
                    return Evaluation::verdict(contradiction).with_proposals(accepted);
                }
                match intent.signal {
                    Some(Signal::Deny) => Evaluation::verdict(Verdict::Declined),
                    Some(Signal::Affirm) => {
                        Evaluation::verdict(Verdict::Valid).with_proposals(accepted)
                    }
                    None if !accepted.is_empty() => {
                        Evaluation::verdict(Verdict::Valid).with_proposals(accepted)
                    }
                    None => Evaluation::verdict(Verdict::InputUnrecognized),
                }
            }

            // Not recovery causes; read the utterance as ordinary input.
            Verdict::Valid
            | Verdict::MissingFields { .. }
            | Verdict::InputUnrecognized
            | Verdict::Declined => self.evaluate_utterance(memory, utterance),
        }
    }

    fn evaluate_tool_result(
        &self,
        memory: &ProfileMemory,
        result: &ToolResult,
        excluded: &BTreeSet<String>,
    ) -> Evaluation {
        let verdict = match result {
            ToolResult::Failure(failure) => Verdict::ToolFailure(failure.clone()),

            ToolResult::Retrieve { schemes } => {
                if schemes.iter().all(|s| excluded.contains(&s.id)) {
                    Verdict::NoEligibleScheme
                } else {
                    Verdict::Valid
                }
            }

            ToolResult::Evaluate(report) => {
                let missing: Vec<Field> = self
                    .field_order
                    .iter()
                    .copied()
                    .filter(|f| report.missing.contains(f) && !memory.is_set(*f))
                    .collect();
                if !missing.is_empty() {
                    Verdict::MissingFields { fields: missing }
                } else if !report.eligible {
                    Verdict::NoEligibleScheme
                } else {
                    Verdict::Valid
                }
            }

            ToolResult::Apply(status) => match status {
                ApplicationStatus::Submitted { .. } => Verdict::Valid,
                ApplicationStatus::MissingDocument { documents } => {
                    Verdict::ToolFailure(ToolFailure {
                        tool: ToolKind::Apply,
                        reason: FailureReason::MissingDocument {
                            documents: documents.clone(),
                        },
                    })
                }
                ApplicationStatus::Rejected { reason } => Verdict::ToolFailure(ToolFailure {
                    tool: ToolKind::Apply,
                    reason: FailureReason::Rejected {
                        reason: reason.clone(),
                    },
                }),
            },
        };
        Evaluation::verdict(verdict)
    }
}

/// Split assignments into those that set an unset field and the first
/// conflict. A value equal to the stored one is dropped: it is neither new
/// nor conflicting. `skip` names a field whose conflict is already being
/// recovered from.
fn partition(
    memory: &ProfileMemory,
    assignments: &[FieldAssignment],
    skip: Option<Field>,
) -> (Vec<FieldAssignment>, Option<Verdict>) {
    let mut accepted = Vec::new();
    let mut conflict = None;
    for assignment in assignments {
        if Some(assignment.field) == skip {
            continue;
        }
        match memory.check(assignment.field, &assignment.value) {
            ProposeOutcome::Accepted if memory.is_set(assignment.field) => {}
            ProposeOutcome::Accepted => accepted.push(assignment.clone()),
            ProposeOutcome::Conflict(old) => {
                if conflict.is_none() {
                    conflict = Some(Verdict::Contradiction {
                        field: assignment.field,
                        old,
                        new: assignment.value.clone(),
                    });
                }
            }
        }
    }
    (accepted, conflict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahayak_core::profile::FieldValue;
    use sahayak_core::tool::{EligibilityReport, Scheme};
    use sahayak_core::utterance::Intent;

    fn evaluator() -> Evaluator {
        Evaluator::new(Field::CANONICAL.to_vec(), 0.6)
    }

    fn said(intent: Intent) -> Utterance {
        Utterance::new("...", 0.9, intent)
    }

    fn age(n: u64) -> Intent {
        Intent::default().with_assignment(Field::Age, FieldValue::Number(n))
    }

    fn scheme(id: &str) -> Scheme {
        Scheme {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            rules: Default::default(),
        }
    }

    fn contradiction() -> Verdict {
        Verdict::Contradiction {
            field: Field::Age,
            old: FieldValue::Number(40),
            new: FieldValue::Number(25),
        }
    }

    fn on_utterance(memory: &ProfileMemory, utterance: &Utterance) -> Evaluation {
        evaluator().evaluate(
            memory,
            EvaluationInput::Utterance {
                utterance,
                recovering: None,
            },
        )
    }

    fn on_recovery(memory: &ProfileMemory, utterance: &Utterance, cause: &Verdict) -> Evaluation {
        evaluator().evaluate(
            memory,
            EvaluationInput::Utterance {
                utterance,
                recovering: Some(cause),
            },
        )
    }

    fn on_result(memory: &ProfileMemory, result: &ToolResult) -> Evaluation {
        evaluator().evaluate(
            memory,
            EvaluationInput::ToolResult {
                result,
                excluded: &BTreeSet::new(),
            },
        )
    }

    #[test]
    fn first_answer_lists_remaining_fields() {
        let memory = ProfileMemory::new();
        let evaluation = on_utterance(&memory, &said(age(40)));
        assert_eq!(
            evaluation.verdict,
            Verdict::MissingFields {
                fields: vec![Field::Income, Field::Region, Field::Category, Field::Occupation]
            }
        );
        assert_eq!(evaluation.proposals.len(), 1);
    }

    #[test]
    fn conflicting_value_is_a_contradiction() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "40");
        let evaluation = on_utterance(&memory, &said(age(25)));
        assert_eq!(evaluation.verdict, contradiction());
        assert!(evaluation.resolutions.is_empty());
    }

    #[test]
    fn contradiction_outranks_low_information() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "40");
        let intent = age(25).with_assignment(Field::Region, FieldValue::text("telangana"));
        let evaluation = on_utterance(&memory, &said(intent));
        assert_eq!(evaluation.verdict, contradiction());
        // The region is still approved for proposal.
        assert_eq!(evaluation.proposals[0].field, Field::Region);
    }

    #[test]
    fn low_confidence_is_unrecognized_even_with_values() {
        let memory = ProfileMemory::new();
        let evaluation = on_utterance(&memory, &Utterance::new("forty", 0.3, age(40)));
        assert_eq!(evaluation.verdict, Verdict::InputUnrecognized);
        assert!(evaluation.proposals.is_empty());
    }

    #[test]
    fn empty_intent_is_unrecognized() {
        let memory = ProfileMemory::new();
        let evaluation = on_utterance(&memory, &said(Intent::default()));
        assert_eq!(evaluation.verdict, Verdict::InputUnrecognized);

        let evaluation = on_utterance(&memory, &said(Intent::default().with_signal(Signal::Affirm)));
        assert_eq!(evaluation.verdict, Verdict::InputUnrecognized);
    }

    #[test]
    fn complete_profile_is_valid() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "");
        memory.propose(Field::Income, FieldValue::Number(80_000), 2, "");
        memory.propose(Field::Region, FieldValue::text("telangana"), 3, "");
        memory.propose(Field::Category, FieldValue::text("bc"), 4, "");
        let intent = Intent::default().with_assignment(Field::Occupation, FieldValue::text("farmer"));
        assert_eq!(on_utterance(&memory, &said(intent)).verdict, Verdict::Valid);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "40");
        let utterance = said(age(25).with_assignment(Field::Income, FieldValue::Number(1)));
        let first = on_utterance(&memory, &utterance);
        for _ in 0..10 {
            assert_eq!(on_utterance(&memory, &utterance), first);
        }
    }

    #[test]
    fn contradiction_recovery() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "40");
        let cause = contradiction();

        let yes = on_recovery(&memory, &said(Intent::default().with_signal(Signal::Affirm)), &cause);
        assert_eq!(yes.verdict, Verdict::Valid);
        assert_eq!(
            yes.resolutions,
            vec![FieldAssignment::new(Field::Age, FieldValue::Number(25))]
        );

        let no = on_recovery(&memory, &said(Intent::default().with_signal(Signal::Deny)), &cause);
        assert_eq!(no.verdict, Verdict::Valid);
        assert!(no.resolutions.is_empty());

        let explicit = on_recovery(&memory, &said(age(26)), &cause);
        assert_eq!(
            explicit.resolutions,
            vec![FieldAssignment::new(Field::Age, FieldValue::Number(26))]
        );

        let garbled = on_recovery(&memory, &said(Intent::default()), &cause);
        assert_eq!(garbled.verdict, Verdict::InputUnrecognized);
    }

    #[test]
    fn new_conflict_while_recovering_replaces_cause() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "40");
        memory.propose(Field::Income, FieldValue::Number(50_000), 2, "50000");
        let utterance = said(Intent::default().with_assignment(Field::Income, FieldValue::Number(90_000)));
        let evaluation = on_recovery(&memory, &utterance, &contradiction());
        assert!(matches!(
            evaluation.verdict,
            Verdict::Contradiction { field: Field::Income, .. }
        ));
    }

    #[test]
    fn tool_failure_recovery() {
        let memory = ProfileMemory::new();
        let cause = Verdict::ToolFailure(ToolFailure {
            tool: ToolKind::Retrieve,
            reason: FailureReason::Timeout { after_secs: 10 },
        });

        let retry = on_recovery(&memory, &said(Intent::default().with_signal(Signal::Affirm)), &cause);
        assert_eq!(retry.verdict, Verdict::Valid);

        let stop = on_recovery(&memory, &said(Intent::default().with_signal(Signal::Deny)), &cause);
        assert_eq!(stop.verdict, Verdict::Declined);

        let filled = on_recovery(&memory, &said(age(61)), &Verdict::NoEligibleScheme);
        assert_eq!(filled.verdict, Verdict::Valid);
        assert_eq!(filled.proposals.len(), 1);
        assert!(filled.resolutions.is_empty());
    }

    #[test]
    fn correction_during_tool_recovery_needs_confirmation() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "40");
        let timeout = Verdict::ToolFailure(ToolFailure {
            tool: ToolKind::Retrieve,
            reason: FailureReason::Timeout { after_secs: 10 },
        });

        for cause in [timeout, Verdict::NoEligibleScheme] {
            let yes_and_value = on_recovery(&memory, &said(age(25).with_signal(Signal::Affirm)), &cause);
            assert_eq!(yes_and_value.verdict, contradiction());
            assert!(yes_and_value.resolutions.is_empty());

            let value_only = on_recovery(&memory, &said(age(25)), &cause);
            assert_eq!(value_only.verdict, contradiction());
            assert!(value_only.resolutions.is_empty());

            let restated = on_recovery(&memory, &said(age(40)), &cause);
            assert_eq!(restated.verdict, Verdict::InputUnrecognized);

            let restated_retry = on_recovery(&memory, &said(age(40).with_signal(Signal::Affirm)), &cause);
            assert_eq!(restated_retry.verdict, Verdict::Valid);
            assert!(restated_retry.proposals.is_empty());
        }
    }

    #[test]
    fn restated_value_is_not_an_answer() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(40), 1, "40");

        let restated = on_utterance(&memory, &said(age(40)));
        assert_eq!(restated.verdict, Verdict::InputUnrecognized);
        assert!(restated.proposals.is_empty());

        let with_new = on_utterance(
            &memory,
            &said(age(40).with_assignment(Field::Income, FieldValue::Number(80_000))),
        );
        assert!(matches!(with_new.verdict, Verdict::MissingFields { .. }));
        assert_eq!(
            with_new.proposals,
            vec![FieldAssignment::new(Field::Income, FieldValue::Number(80_000))]
        );
    }

    #[test]
    fn missing_document_recovery() {
        let memory = ProfileMemory::new();
        let cause = Verdict::ToolFailure(ToolFailure {
            tool: ToolKind::Apply,
            reason: FailureReason::MissingDocument {
                documents: vec!["income certificate".into()],
            },
        });

        let yes = on_recovery(&memory, &said(Intent::default().with_signal(Signal::Affirm)), &cause);
        assert_eq!(yes.verdict, Verdict::Valid);
        assert_eq!(yes.acknowledged_documents, vec!["income certificate".to_string()]);

        let no = on_recovery(&memory, &said(Intent::default().with_signal(Signal::Deny)), &cause);
        assert_eq!(no.verdict, Verdict::Declined);

        let details = on_recovery(&memory, &said(Intent::default().with_details_request()), &cause);
        assert!(details.details_requested);
        assert_eq!(details.verdict, Verdict::InputUnrecognized);
        assert!(details.acknowledged_documents.is_empty());

        // An explicit answer wins over a request for details.
        let answered = on_recovery(
            &memory,
            &said(Intent::default().with_details_request().with_signal(Signal::Affirm)),
            &cause,
        );
        assert!(!answered.details_requested);
        assert_eq!(answered.verdict, Verdict::Valid);
    }

    #[test]
    fn details_are_only_offered_during_document_confirmation() {
        let memory = ProfileMemory::new();
        let evaluation = on_recovery(
            &memory,
            &said(Intent::default().with_details_request()),
            &Verdict::NoEligibleScheme,
        );
        assert!(!evaluation.details_requested);
        assert!(!on_utterance(&memory, &said(Intent::default().with_details_request())).details_requested);
    }

    #[test]
    fn tool_failure_result() {
        let memory = ProfileMemory::new();
        let result = ToolResult::failure(ToolKind::Apply, FailureReason::Timeout { after_secs: 10 });
        assert!(matches!(
            on_result(&memory, &result).verdict,
            Verdict::ToolFailure(ToolFailure { tool: ToolKind::Apply, .. })
        ));
    }

    #[test]
    fn empty_or_excluded_retrieval_is_no_eligible_scheme() {
        let memory = ProfileMemory::new();
        let empty = ToolResult::Retrieve { schemes: vec![] };
        assert_eq!(on_result(&memory, &empty).verdict, Verdict::NoEligibleScheme);

        let excluded: BTreeSet<String> = ["pm-kisan".to_string()].into_iter().collect();
        let only_excluded = ToolResult::Retrieve {
            schemes: vec![scheme("pm-kisan")],
        };
        let evaluation = evaluator().evaluate(
            &memory,
            EvaluationInput::ToolResult {
                result: &only_excluded,
                excluded: &excluded,
            },
        );
        assert_eq!(evaluation.verdict, Verdict::NoEligibleScheme);

        let mixed = ToolResult::Retrieve {
            schemes: vec![scheme("pm-kisan"), scheme("pmay-gramin")],
        };
        let evaluation = evaluator().evaluate(
            &memory,
            EvaluationInput::ToolResult {
                result: &mixed,
                excluded: &excluded,
            },
        );
        assert_eq!(evaluation.verdict, Verdict::Valid);
    }

    #[test]
    fn eligibility_result() {
        let mut memory = ProfileMemory::new();
        memory.propose(Field::Age, FieldValue::Number(19), 1, "19");

        let report = ToolResult::Evaluate(EligibilityReport {
            eligible: false,
            missing: vec![Field::Occupation, Field::Age, Field::Income],
        });
        assert_eq!(
            on_result(&memory, &report).verdict,
            Verdict::MissingFields {
                fields: vec![Field::Income, Field::Occupation]
            }
        );

        let ineligible = ToolResult::Evaluate(EligibilityReport {
            eligible: false,
            missing: vec![],
        });
        assert_eq!(on_result(&memory, &ineligible).verdict, Verdict::NoEligibleScheme);

        let eligible = ToolResult::Evaluate(EligibilityReport {
            eligible: true,
            missing: vec![],
        });
        assert_eq!(on_result(&memory, &eligible).verdict, Verdict::Valid);
    }

    #[test]
    fn application_result() {
        let memory = ProfileMemory::new();
        let missing = ToolResult::Apply(ApplicationStatus::MissingDocument {
            documents: vec!["income certificate".into()],
        });
        match on_result(&memory, &missing).verdict {
            Verdict::ToolFailure(failure) => {
                assert_eq!(failure.tool, ToolKind::Apply);
                assert_eq!(
                    failure.reason,
                    FailureReason::MissingDocument {
                        documents: vec!["income certificate".into()]
                    }
                );
            }
            other => panic!("Expected tool failure, got {other}"),
        }

        let rejected = ToolResult::Apply(ApplicationStatus::Rejected {
            reason: "closed".into(),
        });
        assert_eq!(
            on_result(&memory, &rejected).verdict.error_class(),
            Some(sahayak_core::verdict::ErrorClass::ToolError)
        );

        let submitted = ToolResult::Apply(ApplicationStatus::Submitted {
            application_id: "APP-1".into(),
        });
        assert_eq!(on_result(&memory, &submitted).verdict, Verdict::Valid);
    }
}
