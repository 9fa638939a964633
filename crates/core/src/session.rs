//! Session identity, phases, and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::profile::Field;

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Planner phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collecting,
    Retrieving,
    Evaluating,
    Applying,
    Recovering,
    Concluded,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Collecting,
        Phase::Retrieving,
        Phase::Evaluating,
        Phase::Applying,
        Phase::Recovering,
        Phase::Concluded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Collecting => "collecting",
            Phase::Retrieving => "retrieving",
            Phase::Evaluating => "evaluating",
            Phase::Applying => "applying",
            Phase::Recovering => "recovering",
            Phase::Concluded => "concluded",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of outbound prompts. Informational: it picks templates and
/// never changes control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Telugu => "te",
            Language::English => "en",
        }
    }

    /// Parse a language tag; unknown tags fall back to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "te" | "telugu" => Some(Language::Telugu),
            "en" | "english" => Some(Language::English),
            _ => None,
        }
    }
}

/// Per-session behaviour knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Consecutive recovery prompts allowed for the same key before the
    /// session concludes as unresolved.
    #[serde(default = "default_max_recovery_attempts")]
    pub max_recovery_attempts: u32,

    /// Ask order. Must be a permutation of all profile fields.
    #[serde(default = "default_field_order")]
    pub field_order: Vec<Field>,

    #[serde(default)]
    pub language: Language,

    /// Utterances recognised below this confidence are treated as garbled.
    #[serde(default = "default_asr_confidence_threshold")]
    pub asr_confidence_threshold: f32,

    /// Planner consultations allowed within a single turn.
    #[serde(default = "default_max_steps_per_turn")]
    pub max_steps_per_turn: u32,
}

fn default_max_recovery_attempts() -> u32 {
    3
}
fn default_field_order() -> Vec<Field> {
    Field::CANONICAL.to_vec()
}
fn default_asr_confidence_threshold() -> f32 {
    0.6
}
fn default_max_steps_per_turn() -> u32 {
    8
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_recovery_attempts: default_max_recovery_attempts(),
            field_order: default_field_order(),
            language: Language::default(),
            asr_confidence_threshold: default_asr_confidence_threshold(),
            max_steps_per_turn: default_max_steps_per_turn(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SessionConfig::default();
        assert_eq!(config.max_recovery_attempts, 3);
        assert_eq!(config.field_order, Field::CANONICAL.to_vec());
        assert_eq!(config.language, Language::Telugu);
        assert_eq!(config.max_steps_per_turn, 8);
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("EN"), Some(Language::English));
        assert_eq!(Language::from_code("telugu"), Some(Language::Telugu));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::English.code(), "en");
    }

    #[test]
    fn config_deserializes_partial_json() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"max_recovery_attempts": 5, "language": "en"}"#).unwrap();
        assert_eq!(config.max_recovery_attempts, 5);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.field_order.len(), 5);
    }
}
