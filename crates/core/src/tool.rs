//! Tool gateway vocabulary: the typed boundary to external services.
//!
//! Three capabilities sit behind the gateway: scheme retrieval, eligibility
//! evaluation, and application submission. Each request and result is a
//! tagged variant so the evaluator can match on the kind, and every failure
//! is an ordinary value (`ToolResult::Failure`) rather than an error that
//! could unwind the session loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ToolError;
use crate::profile::{Field, ProfileSnapshot};

/// The three gateway capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Retrieve,
    Evaluate,
    Apply,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Retrieve => "retrieve",
            ToolKind::Evaluate => "evaluate",
            ToolKind::Apply => "apply",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Scheme data ───────────────────────────────────────────────────────────

/// A welfare scheme as returned by retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub rules: EligibilityRules,
}

/// Constraints a profile must satisfy. Empty lists mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRules {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occupations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,

    /// Maximum annual household income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_documents: Vec<String>,
}

impl EligibilityRules {
    /// The profile fields these rules constrain, in canonical order.
    pub fn constrained_fields(&self) -> Vec<Field> {
        Field::CANONICAL
            .into_iter()
            .filter(|f| match f {
                Field::Age => self.min_age.is_some() || self.max_age.is_some(),
                Field::Income => self.max_income.is_some(),
                Field::Region => !self.regions.is_empty(),
                Field::Category => !self.categories.is_empty(),
                Field::Occupation => !self.occupations.is_empty(),
            })
            .collect()
    }
}

// ── Requests ──────────────────────────────────────────────────────────────

/// Retrieval input. Every field is optional; partial profiles are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl RetrieveQuery {
    pub fn from_snapshot(profile: &ProfileSnapshot) -> Self {
        Self {
            region: profile.text(Field::Region).map(str::to_string),
            category: profile.text(Field::Category).map(str::to_string),
            age: profile.number(Field::Age),
            income: profile.number(Field::Income),
            occupation: profile.text(Field::Occupation).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub scheme_id: String,
    pub profile: ProfileSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub scheme_id: String,
    pub profile: ProfileSnapshot,

    /// Documents the user has confirmed holding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
}

/// A request to one of the three gateway capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolRequest {
    Retrieve(RetrieveQuery),
    Evaluate(EligibilityRequest),
    Apply(ApplicationForm),
}

impl ToolRequest {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::Retrieve(_) => ToolKind::Retrieve,
            ToolRequest::Evaluate(_) => ToolKind::Evaluate,
            ToolRequest::Apply(_) => ToolKind::Apply,
        }
    }
}

// ── Results ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,

    /// Fields the scheme needs that the profile lacks.
    #[serde(default)]
    pub missing: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted { application_id: String },
    MissingDocument { documents: Vec<String> },
    Rejected { reason: String },
}

/// Why a tool call did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum FailureReason {
    Timeout { after_secs: u64 },
    Malformed { detail: String },
    Unavailable { detail: String },
    MissingDocument { documents: Vec<String> },
    Rejected { reason: String },
    /// The session loop ran out of internal steps for this turn.
    StepBudgetExhausted,
}

impl FailureReason {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::Timeout { .. } => "timeout",
            FailureReason::Malformed { .. } => "malformed",
            FailureReason::Unavailable { .. } => "unavailable",
            FailureReason::MissingDocument { .. } => "missing_document",
            FailureReason::Rejected { .. } => "rejected",
            FailureReason::StepBudgetExhausted => "step_budget_exhausted",
        }
    }
}

impl From<&ToolError> for FailureReason {
    fn from(err: &ToolError) -> Self {
        match err {
            ToolError::Timeout { timeout_secs, .. } => FailureReason::Timeout {
                after_secs: *timeout_secs,
            },
            ToolError::Malformed { reason, .. } => FailureReason::Malformed {
                detail: reason.clone(),
            },
            ToolError::UnknownScheme(id) => FailureReason::Rejected {
                reason: format!("unknown scheme {id}"),
            },
            ToolError::Unavailable(detail) => FailureReason::Unavailable {
                detail: detail.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub tool: ToolKind,
    pub reason: FailureReason,
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({})", self.tool, self.reason.code())
    }
}

/// The outcome of one gateway dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolResult {
    /// Ordered candidates; empty is a valid answer, not a failure.
    Retrieve { schemes: Vec<Scheme> },
    Evaluate(EligibilityReport),
    Apply(ApplicationStatus),
    Failure(ToolFailure),
}

impl ToolResult {
    pub fn failure(tool: ToolKind, reason: FailureReason) -> Self {
        ToolResult::Failure(ToolFailure { tool, reason })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ToolResult::Failure(_))
    }
}

// ── Traits ────────────────────────────────────────────────────────────────

/// The uniform dispatch interface the session loop talks to.
///
/// `dispatch` is infallible by signature: implementations convert every
/// collaborator error and timeout into `ToolResult::Failure`.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    async fn dispatch(&self, request: ToolRequest) -> ToolResult;
}

/// Scheme dataset query layer.
#[async_trait]
pub trait SchemeRetriever: Send + Sync {
    fn name(&self) -> &str;

    async fn retrieve(&self, query: &RetrieveQuery) -> std::result::Result<Vec<Scheme>, ToolError>;
}

/// Eligibility evaluation for one scheme against a profile snapshot.
#[async_trait]
pub trait EligibilityEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn evaluate(
        &self,
        request: &EligibilityRequest,
    ) -> std::result::Result<EligibilityReport, ToolError>;
}

/// Application submission endpoint.
#[async_trait]
pub trait ApplicationEndpoint: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, form: &ApplicationForm)
    -> std::result::Result<ApplicationStatus, ToolError>;
}
