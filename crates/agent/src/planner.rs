//! The planner: phases × verdicts → next action.
//!
//! [`transition`] is the whole decision table as a pure function. The
//! [`Planner`] wraps it with the little state a session needs: the current
//! phase, the phase to return to after recovery, the pending recovery
//! cause, and the recovery streak that bounds how long a session can sit
//! on the same unresolved problem.

use sahayak_core::profile::Field;
use sahayak_core::session::Phase;
use sahayak_core::tool::{
    ApplicationForm, EligibilityRequest, FailureReason, RetrieveQuery, Scheme, ToolFailure,
    ToolKind, ToolRequest,
};
use sahayak_core::verdict::Verdict;
use sahayak_memory::ProfileMemory;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Submitted,
    /// Recovery attempts ran out; carries what was left unresolved.
    Unresolved { verdict: Verdict },
    Declined,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Submitted => "submitted",
            Outcome::Unresolved { .. } => "unresolved",
            Outcome::Declined => "declined",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Unresolved { verdict } => write!(f, "unresolved({verdict})"),
            other => f.write_str(other.label()),
        }
    }
}

/// What the session should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Every missing field in ask order; only the first is asked.
    AskForFields(Vec<Field>),
    InvokeTool(ToolRequest),
    EmitRecoveryPrompt(Verdict),
    Conclude(Outcome),
}

/// Step chosen by the table, before the planner fills in payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask for the fields named by the `MissingFields` verdict.
    Ask,
    Invoke(ToolKind),
    /// Prompt about this verdict; it becomes the recovery cause.
    Recover,
    /// Prompt again about the current problem without changing phase.
    Reprompt,
    /// Recovery succeeded; continue from the phase held before it.
    Resume,
    Conclude(Outcome),
    /// Already concluded; repeat the stored outcome.
    Repeat,
}

/// Where the phase goes after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    To(Phase),
    Stay,
    /// The phase held before recovery.
    Prior,
}

/// The decision table. Total over every phase and verdict.
pub fn transition(phase: Phase, verdict: &Verdict) -> (Step, Target) {
    use Phase::*;

    match (phase, verdict) {
        (Concluded, _) => (Step::Repeat, Target::Stay),
        (_, Verdict::Declined) => (Step::Conclude(Outcome::Declined), Target::To(Concluded)),

        (Recovering, Verdict::Valid) => (Step::Resume, Target::Prior),
        (Recovering, Verdict::Contradiction { .. }) => (Step::Recover, Target::Stay),
        (Recovering, Verdict::MissingFields { .. }) => (Step::Ask, Target::To(Collecting)),
        (Recovering, _) => (Step::Reprompt, Target::Stay),

        (_, Verdict::InputUnrecognized) => (Step::Reprompt, Target::Stay),
        (_, Verdict::MissingFields { .. }) => (Step::Ask, Target::To(Collecting)),

        (Collecting, Verdict::Valid) => (Step::Invoke(ToolKind::Retrieve), Target::To(Retrieving)),
        (Retrieving, Verdict::Valid) => (Step::Invoke(ToolKind::Evaluate), Target::To(Evaluating)),
        (Evaluating, Verdict::Valid) => (Step::Invoke(ToolKind::Apply), Target::To(Applying)),
        (Applying, Verdict::Valid) => (Step::Conclude(Outcome::Submitted), Target::To(Concluded)),

        // The ineligible scheme is excluded; try the next candidate.
        (Evaluating, Verdict::NoEligibleScheme) => {
            (Step::Invoke(ToolKind::Retrieve), Target::To(Retrieving))
        }

        (_, Verdict::Contradiction { .. } | Verdict::NoEligibleScheme | Verdict::ToolFailure(_)) => {
            (Step::Recover, Target::To(Recovering))
        }
    }
}

/// What a recovery streak counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryKey {
    Field(Field),
    Tool(ToolKind),
    Eligibility,
    Documents,
    /// Unrecognised input with no field being asked.
    Input,
}

/// Read-only session state the planner needs to build tool requests.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub memory: &'a ProfileMemory,
    /// The scheme currently being evaluated or applied for.
    pub target: Option<&'a Scheme>,
    /// Documents the user has confirmed holding.
    pub documents: &'a [String],
}

#[derive(Debug, Clone)]
pub struct Planner {
    phase: Phase,
    prior: Phase,
    cause: Option<Verdict>,
    awaiting: Option<Field>,
    streak: Option<(RecoveryKey, u32)>,
    outcome: Option<Outcome>,
    field_order: Vec<Field>,
    max_recovery_attempts: u32,
}

impl Planner {
    pub fn new(field_order: Vec<Field>, max_recovery_attempts: u32) -> Self {
        Self {
            phase: Phase::Collecting,
            prior: Phase::Collecting,
            cause: None,
            awaiting: None,
            streak: None,
            outcome: None,
            field_order,
            max_recovery_attempts,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The field the last question asked for.
    pub fn awaiting(&self) -> Option<Field> {
        self.awaiting
    }

    /// The verdict being recovered from, while in `Recovering`.
    pub fn recovery_cause(&self) -> Option<&Verdict> {
        match self.phase {
            Phase::Recovering => self.cause.as_ref(),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// The first action of a session: ask for whatever is missing.
    pub fn opening(&mut self, ctx: &PlanContext<'_>) -> PlanAction {
        self.continue_collecting(ctx)
    }

    /// Choose the next action for `verdict` and advance the phase.
    pub fn consult(&mut self, verdict: &Verdict, ctx: &PlanContext<'_>) -> PlanAction {
        let progressed = matches!(verdict, Verdict::MissingFields { .. })
            || (verdict.is_valid() && self.phase != Phase::Recovering);
        if progressed {
            self.streak = None;
        }

        let (step, target) = transition(self.phase, verdict);
        debug!(phase = %self.phase, verdict = verdict.label(), step = ?step, "Planner consulted");

        match step {
            Step::Ask => {
                let fields = match verdict {
                    Verdict::MissingFields { fields } => fields.clone(),
                    _ => ctx.memory.missing(&self.field_order),
                };
                self.enter(target);
                self.awaiting = fields.first().copied();
                PlanAction::AskForFields(fields)
            }

            Step::Invoke(kind) => {
                self.enter(target);
                self.invoke(kind, ctx)
            }

            Step::Recover => {
                let key = self.recovery_key(verdict);
                if self.bump(key) {
                    return self.conclude(Outcome::Unresolved {
                        verdict: verdict.clone(),
                    });
                }
                if self.phase != Phase::Recovering {
                    self.prior = self.phase;
                }
                self.phase = Phase::Recovering;
                self.cause = Some(verdict.clone());
                self.awaiting = match verdict {
                    Verdict::Contradiction { field, .. } => Some(*field),
                    _ => None,
                };
                PlanAction::EmitRecoveryPrompt(verdict.clone())
            }

            Step::Reprompt => {
                let pending = self.cause.clone().filter(|_| self.phase == Phase::Recovering);
                let subject = pending.unwrap_or_else(|| verdict.clone());
                let key = self.recovery_key(&subject);
                if self.bump(key) {
                    return self.conclude(Outcome::Unresolved { verdict: subject });
                }
                PlanAction::EmitRecoveryPrompt(subject)
            }

            Step::Resume => {
                self.cause = None;
                self.phase = self.prior;
                match self.prior {
                    Phase::Retrieving => self.invoke(ToolKind::Retrieve, ctx),
                    Phase::Evaluating => self.invoke(ToolKind::Evaluate, ctx),
                    Phase::Applying => self.invoke(ToolKind::Apply, ctx),
                    Phase::Collecting | Phase::Recovering | Phase::Concluded => {
                        self.continue_collecting(ctx)
                    }
                }
            }

            Step::Conclude(outcome) => self.conclude(outcome),

            Step::Repeat => PlanAction::Conclude(self.outcome.clone().unwrap_or(
                Outcome::Unresolved {
                    verdict: verdict.clone(),
                },
            )),
        }
    }

    fn enter(&mut self, target: Target) {
        match target {
            Target::To(phase) => self.phase = phase,
            Target::Prior => self.phase = self.prior,
            Target::Stay => {}
        }
        if self.phase != Phase::Recovering {
            self.cause = None;
        }
    }

    fn continue_collecting(&mut self, ctx: &PlanContext<'_>) -> PlanAction {
        let missing = ctx.memory.missing(&self.field_order);
        if missing.is_empty() {
            self.phase = Phase::Retrieving;
            return self.invoke(ToolKind::Retrieve, ctx);
        }
        self.phase = Phase::Collecting;
        self.awaiting = missing.first().copied();
        PlanAction::AskForFields(missing)
    }

    /// Build the request for `kind`. Evaluate and Apply need a target
    /// scheme; without one the planner falls back to retrieval.
    fn invoke(&mut self, kind: ToolKind, ctx: &PlanContext<'_>) -> PlanAction {
        self.awaiting = None;
        let profile = ctx.memory.snapshot();
        let request = match (kind, ctx.target) {
            (ToolKind::Evaluate, Some(scheme)) => ToolRequest::Evaluate(EligibilityRequest {
                scheme_id: scheme.id.clone(),
                profile,
            }),
            (ToolKind::Apply, Some(scheme)) => ToolRequest::Apply(ApplicationForm {
                scheme_id: scheme.id.clone(),
                profile,
                documents: ctx.documents.to_vec(),
            }),
            (ToolKind::Retrieve, _) | (_, None) => {
                self.phase = Phase::Retrieving;
                ToolRequest::Retrieve(RetrieveQuery::from_snapshot(&profile))
            }
        };
        PlanAction::InvokeTool(request)
    }

    fn conclude(&mut self, outcome: Outcome) -> PlanAction {
        info!(outcome = %outcome, "Session concluded");
        self.phase = Phase::Concluded;
        self.cause = None;
        self.awaiting = None;
        self.outcome = Some(outcome.clone());
        PlanAction::Conclude(outcome)
    }

    fn recovery_key(&self, verdict: &Verdict) -> RecoveryKey {
        match verdict {
            Verdict::Contradiction { field, .. } => RecoveryKey::Field(*field),
            Verdict::ToolFailure(ToolFailure {
                reason: FailureReason::MissingDocument { .. },
                ..
            }) => RecoveryKey::Documents,
            Verdict::ToolFailure(failure) => RecoveryKey::Tool(failure.tool),
            Verdict::NoEligibleScheme => RecoveryKey::Eligibility,
            _ => self.awaiting.map(RecoveryKey::Field).unwrap_or(RecoveryKey::Input),
        }
    }

    /// Count one more prompt against `key`. True once the bound is exceeded.
    fn bump(&mut self, key: RecoveryKey) -> bool {
        let count = match self.streak {
            Some((current, n)) if current == key => n + 1,
            _ => 1,
        };
        self.streak = Some((key, count));
        count > self.max_recovery_attempts
    }
}
