//! Profile field vocabulary.
//!
//! The set of facts a session collects about the user is fixed: age, income,
//! region, category, and occupation. Numeric fields hold whole numbers;
//! textual fields are normalised (trimmed, lower-cased) so that "Telangana"
//! and " telangana " compare equal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A profile field. Declaration order is the canonical ask order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Age,
    Income,
    Region,
    Category,
    Occupation,
}

impl Field {
    /// Canonical order: age, income, region, category, occupation.
    pub const CANONICAL: [Field; 5] = [
        Field::Age,
        Field::Income,
        Field::Region,
        Field::Category,
        Field::Occupation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Income => "income",
            Field::Region => "region",
            Field::Category => "category",
            Field::Occupation => "occupation",
        }
    }

    /// Whether values for this field are whole numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Age | Field::Income)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "age" => Ok(Field::Age),
            "income" => Ok(Field::Income),
            "region" | "state" => Ok(Field::Region),
            "category" | "caste" => Ok(Field::Category),
            "occupation" | "job" => Ok(Field::Occupation),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// A value held by a profile field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(u64),
    Text(String),
}

impl FieldValue {
    /// Build a normalised text value.
    pub fn text(s: impl AsRef<str>) -> Self {
        FieldValue::Text(s.as_ref().trim().to_lowercase())
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    /// Equality on normalised forms.
    pub fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                a.trim().eq_ignore_ascii_case(b.trim())
            }
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// A candidate `field = value` pair extracted from an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub field: Field,
    pub value: FieldValue,
}

impl FieldAssignment {
    pub fn new(field: Field, value: FieldValue) -> Self {
        Self { field, value }
    }
}

/// An owned copy of the set profile fields, used as a tool payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot(pub BTreeMap<Field, FieldValue>);

impl ProfileSnapshot {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn number(&self, field: Field) -> Option<u64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Field, FieldValue)> for ProfileSnapshot {
    fn from_iter<I: IntoIterator<Item = (Field, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
