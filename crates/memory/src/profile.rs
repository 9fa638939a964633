//! Profile memory with two-phase writes.
//!
//! Writes go through [`ProfileMemory::propose`], which refuses to replace a
//! stored value with a different one and reports the conflict instead.
//! Replacing a value requires [`ProfileMemory::resolve`], called only after
//! the user has explicitly confirmed the change. A field therefore never
//! changes value silently.

use sahayak_core::profile::{Field, FieldValue, ProfileSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A stored value with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    pub value: FieldValue,

    /// Turn number the value was set (or last resolved) on.
    pub set_at_turn: u32,

    /// The raw utterance the value came from.
    pub source: String,
}

/// Result of a [`ProfileMemory::propose`] or [`ProfileMemory::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposeOutcome {
    Accepted,
    /// The field already holds a different value; nothing was written.
    Conflict(FieldValue),
}

impl ProposeOutcome {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ProposeOutcome::Conflict(_))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileMemory {
    entries: BTreeMap<Field, FieldEntry>,
}

impl ProfileMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.entries.get(&field).map(|e| &e.value)
    }

    pub fn provenance(&self, field: Field) -> Option<&FieldEntry> {
        self.entries.get(&field)
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    /// What `propose` would answer, without writing.
    pub fn check(&self, field: Field, value: &FieldValue) -> ProposeOutcome {
        match self.entries.get(&field) {
            Some(existing) if !existing.value.same_as(value) => {
                ProposeOutcome::Conflict(existing.value.clone())
            }
            _ => ProposeOutcome::Accepted,
        }
    }

    /// Set an unset field. Re-proposing the stored value is accepted and
    /// leaves provenance untouched; a different value is a conflict and
    /// leaves memory unchanged.
    pub fn propose(
        &mut self,
        field: Field,
        value: FieldValue,
        turn: u32,
        source: &str,
    ) -> ProposeOutcome {
        let outcome = self.check(field, &value);
        if outcome == ProposeOutcome::Accepted && !self.is_set(field) {
            debug!(field = %field, value = %value, turn, "Profile field set");
            self.entries.insert(
                field,
                FieldEntry {
                    value,
                    set_at_turn: turn,
                    source: source.to_string(),
                },
            );
        }
        outcome
    }

    /// Overwrite unconditionally. Only for explicitly confirmed corrections.
    pub fn resolve(&mut self, field: Field, value: FieldValue, turn: u32, source: &str) {
        debug!(field = %field, value = %value, turn, "Profile field resolved");
        self.entries.insert(
            field,
            FieldEntry {
                value,
                set_at_turn: turn,
                source: source.to_string(),
            },
        );
    }

    /// Unset fields from `order`, keeping that order.
    pub fn missing(&self, order: &[Field]) -> Vec<Field> {
        order.iter().copied().filter(|f| !self.is_set(*f)).collect()
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        self.entries
            .iter()
            .map(|(field, entry)| (*field, entry.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
