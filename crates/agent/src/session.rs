//! The session loop: one utterance in, one message out.
//!
//! Each turn runs the evaluator on the utterance, applies the memory writes
//! it approved, and consults the planner. While the planner asks for a
//! tool, the session dispatches it, evaluates the result, and consults
//! again. The turn ends on the first action that needs the user.

use chrono::Utc;
use sahayak_core::error::SessionError;
use sahayak_core::event::{DomainEvent, EventBus};
use sahayak_core::profile::Field;
use sahayak_core::session::{Phase, SessionConfig, SessionId};
use sahayak_core::tool::{
    ApplicationStatus, FailureReason, Scheme, ToolFailure, ToolGateway, ToolRequest, ToolResult,
};
use sahayak_core::utterance::{ExtractionContext, IntentExtractor, Utterance};
use sahayak_core::verdict::Verdict;
use sahayak_memory::ProfileMemory;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::evaluator::{Evaluation, EvaluationInput, Evaluator};
use crate::planner::{Outcome, PlanAction, PlanContext, Planner};
use crate::prompts::Prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One line of the conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub speaker: Speaker,
    pub text: String,
    pub turn: u32,
}

pub struct Session {
    id: SessionId,
    config: SessionConfig,
    memory: ProfileMemory,
    evaluator: Evaluator,
    planner: Planner,
    prompts: Prompts,
    gateway: Arc<dyn ToolGateway>,
    extractor: Arc<dyn IntentExtractor>,
    event_bus: Arc<EventBus>,
    turn: u32,
    /// Candidates from the last retrieval, minus excluded schemes.
    candidates: Vec<Scheme>,
    /// Schemes found ineligible in this session.
    excluded: BTreeSet<String>,
    /// Documents the user confirmed holding.
    documents: Vec<String>,
    receipt: Option<String>,
    history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        gateway: Arc<dyn ToolGateway>,
        extractor: Arc<dyn IntentExtractor>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            evaluator: Evaluator::new(config.field_order.clone(), config.asr_confidence_threshold),
            planner: Planner::new(config.field_order.clone(), config.max_recovery_attempts),
            prompts: Prompts::new(config.language),
            config,
            memory: ProfileMemory::new(),
            gateway,
            extractor,
            event_bus: Arc::new(EventBus::default()),
            turn: 0,
            candidates: Vec::new(),
            excluded: BTreeSet::new(),
            documents: Vec::new(),
            receipt: None,
            history: Vec::new(),
        }
    }

    /// Publish domain events on a shared bus.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.planner.phase()
    }

    pub fn is_concluded(&self) -> bool {
        self.planner.phase() == Phase::Concluded
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.planner.outcome()
    }

    pub fn memory(&self) -> &ProfileMemory {
        &self.memory
    }

    /// The application id issued on submission.
    pub fn receipt(&self) -> Option<&str> {
        self.receipt.as_deref()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The opening message: a welcome and the first question.
    pub fn greeting(&mut self) -> String {
        let ctx = plan_context(&self.memory, &self.candidates, &self.excluded, &self.documents);
        let action = self.planner.opening(&ctx);
        let message = format!(
            "{} {}",
            self.prompts.greeting(),
            self.render(&action, false, None)
        );
        self.record(Speaker::Assistant, &message);
        message
    }

    /// Process one user utterance and produce the reply.
    pub async fn handle_turn(
        &mut self,
        text: &str,
        confidence: f32,
    ) -> Result<String, SessionError> {
        if self.is_concluded() {
            return Err(SessionError::Concluded {
                session_id: self.id.to_string(),
            });
        }

        self.turn += 1;
        self.record(Speaker::User, text);
        info!(
            session_id = %self.id,
            turn = self.turn,
            phase = %self.planner.phase(),
            "Processing turn"
        );
        self.event_bus.publish(DomainEvent::TurnReceived {
            session_id: self.id.to_string(),
            turn: self.turn,
            confidence,
            timestamp: Utc::now(),
        });

        let context = ExtractionContext {
            awaiting: self.planner.awaiting(),
        };
        let intent = self.extractor.extract(text, &context).await;
        let utterance = Utterance::new(text, confidence, intent);

        let evaluation = self.evaluator.evaluate(
            &self.memory,
            EvaluationInput::Utterance {
                utterance: &utterance,
                recovering: self.planner.recovery_cause(),
            },
        );

        // Describing the scheme answers the question without touching the
        // planner: the pending confirmation and its streak stay as they are.
        if evaluation.details_requested {
            if let Some(message) = self.describe_target() {
                self.apply(&evaluation, text);
                debug!(session_id = %self.id, turn = self.turn, "Scheme details requested");
                self.record(Speaker::Assistant, &message);
                return Ok(message);
            }
        }
        self.apply(&evaluation, text);

        let unrecognized = evaluation.verdict == Verdict::InputUnrecognized;
        let asked = self.planner.awaiting();
        let mut summary = None;
        let mut steps = 1;
        let mut action = self.consult(&evaluation.verdict);

        let action = loop {
            let request = match action {
                PlanAction::InvokeTool(request) => request,
                other => break other,
            };

            if steps >= self.config.max_steps_per_turn {
                warn!(
                    session_id = %self.id,
                    turn = self.turn,
                    steps,
                    tool = %request.kind(),
                    "Step budget exhausted"
                );
                let exhausted = Verdict::ToolFailure(ToolFailure {
                    tool: request.kind(),
                    reason: FailureReason::StepBudgetExhausted,
                });
                break self.consult(&exhausted);
            }

            let target_id = self.target().map(|s| s.id.clone());
            let result = self.dispatch(request).await;
            if let Some(note) = self.absorb(&result) {
                summary = Some(note);
            }

            let evaluation = self.evaluator.evaluate(
                &self.memory,
                EvaluationInput::ToolResult {
                    result: &result,
                    excluded: &self.excluded,
                },
            );
            if let (ToolResult::Evaluate(_), Verdict::NoEligibleScheme, Some(id)) =
                (&result, &evaluation.verdict, target_id)
            {
                debug!(session_id = %self.id, scheme = %id, "Scheme excluded as ineligible");
                self.excluded.insert(id.clone());
                self.candidates.retain(|s| s.id != id);
            }

            steps += 1;
            action = self.consult(&evaluation.verdict);
        };

        let body = self.render(&action, unrecognized, asked);
        let message = match summary {
            Some(note) => format!("{note} {body}"),
            None => body,
        };

        if let PlanAction::Conclude(outcome) = &action {
            self.event_bus.publish(DomainEvent::SessionConcluded {
                session_id: self.id.to_string(),
                outcome: outcome.label().to_string(),
                turns: self.turn,
                timestamp: Utc::now(),
            });
        }

        self.record(Speaker::Assistant, &message);
        Ok(message)
    }

    /// Apply the memory writes and document confirmations an evaluation approved.
    fn apply(&mut self, evaluation: &Evaluation, source: &str) {
        for assignment in &evaluation.proposals {
            let outcome =
                self.memory
                    .propose(assignment.field, assignment.value.clone(), self.turn, source);
            if outcome.is_conflict() {
                warn!(field = %assignment.field, "Approved proposal conflicted; memory unchanged");
            }
        }

        if !evaluation.resolutions.is_empty() {
            for assignment in &evaluation.resolutions {
                self.memory
                    .resolve(assignment.field, assignment.value.clone(), self.turn, source);
            }
            // Corrected details can change which schemes apply.
            self.excluded.clear();
            self.candidates.clear();
        }

        for document in &evaluation.acknowledged_documents {
            if !self.documents.iter().any(|d| d.eq_ignore_ascii_case(document)) {
                self.documents.push(document.clone());
            }
        }
    }

    fn consult(&mut self, verdict: &Verdict) -> PlanAction {
        self.event_bus.publish(DomainEvent::VerdictIssued {
            session_id: self.id.to_string(),
            turn: self.turn,
            verdict: verdict.to_string(),
            timestamp: Utc::now(),
        });

        let before = self.planner.phase();
        let ctx = plan_context(&self.memory, &self.candidates, &self.excluded, &self.documents);
        let action = self.planner.consult(verdict, &ctx);
        let after = self.planner.phase();

        debug!(
            session_id = %self.id,
            turn = self.turn,
            verdict = %verdict,
            phase = %after,
            "Verdict handled"
        );
        if let Some(class) = verdict.error_class() {
            debug!(session_id = %self.id, error_class = %class, "Recovering from failure");
        }
        if before != after {
            self.event_bus.publish(DomainEvent::PhaseChanged {
                session_id: self.id.to_string(),
                from: before.to_string(),
                to: after.to_string(),
                timestamp: Utc::now(),
            });
        }
        action
    }

    async fn dispatch(&self, request: ToolRequest) -> ToolResult {
        let kind = request.kind();
        let start = Instant::now();
        let result = self.gateway.dispatch(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        self.event_bus.publish(DomainEvent::ToolDispatched {
            session_id: self.id.to_string(),
            tool: kind.to_string(),
            success: !result.is_failure(),
            duration_ms,
            timestamp: Utc::now(),
        });
        result
    }

    /// Keep what the session needs from a tool result; returns a summary
    /// line for successful lookups.
    fn absorb(&mut self, result: &ToolResult) -> Option<String> {
        match result {
            ToolResult::Retrieve { schemes } => {
                self.candidates = schemes
                    .iter()
                    .filter(|s| !self.excluded.contains(&s.id))
                    .cloned()
                    .collect();
                if self.candidates.is_empty() {
                    return None;
                }
                let names: Vec<&str> = self
                    .candidates
                    .iter()
                    .take(3)
                    .map(|s| s.name.as_str())
                    .collect();
                Some(self.prompts.schemes_found(&names))
            }
            ToolResult::Evaluate(report) if report.eligible => self
                .target()
                .map(|scheme| self.prompts.eligible_for(&scheme.name)),
            ToolResult::Apply(ApplicationStatus::Submitted { application_id }) => {
                self.receipt = Some(application_id.clone());
                None
            }
            _ => None,
        }
    }

    fn target(&self) -> Option<&Scheme> {
        self.candidates
            .iter()
            .find(|s| !self.excluded.contains(&s.id))
    }

    /// The target scheme's description followed by the pending recovery prompt.
    fn describe_target(&self) -> Option<String> {
        let scheme = self.target()?;
        let cause = self.planner.recovery_cause()?;
        Some(format!(
            "{} {}",
            self.prompts.scheme_details(&scheme.name, &scheme.description),
            self.prompts.recovery(cause, self.planner.awaiting())
        ))
    }

    fn render(&self, action: &PlanAction, unrecognized: bool, asked: Option<Field>) -> String {
        match action {
            PlanAction::AskForFields(fields) => match fields.first() {
                Some(field) => self.prompts.ask(*field).to_string(),
                None => self.prompts.clarify().to_string(),
            },
            PlanAction::EmitRecoveryPrompt(verdict) => {
                let awaiting = self.planner.awaiting().or(asked);
                let body = self.prompts.recovery(verdict, awaiting);
                if unrecognized && *verdict != Verdict::InputUnrecognized {
                    format!("{} {}", self.prompts.clarify(), body)
                } else {
                    body
                }
            }
            PlanAction::InvokeTool(request) => self.prompts.working(request.kind()),
            PlanAction::Conclude(Outcome::Submitted) => self.prompts.submitted(
                self.target().map(|s| s.name.as_str()),
                self.receipt.as_deref().unwrap_or("-"),
            ),
            PlanAction::Conclude(Outcome::Unresolved { verdict }) => {
                self.prompts.unresolved(verdict, asked)
            }
            PlanAction::Conclude(Outcome::Declined) => self.prompts.declined().to_string(),
        }
    }

    fn record(&mut self, speaker: Speaker, text: &str) {
        self.history.push(HistoryEntry {
            speaker,
            text: text.to_string(),
            turn: self.turn,
        });
    }
}

fn plan_context<'a>(
    memory: &'a ProfileMemory,
    candidates: &'a [Scheme],
    excluded: &'a BTreeSet<String>,
    documents: &'a [String],
) -> PlanContext<'a> {
    PlanContext {
        memory,
        target: candidates.iter().find(|s| !excluded.contains(&s.id)),
        documents,
    }
}
