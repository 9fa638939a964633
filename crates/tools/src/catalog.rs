//! In-memory scheme catalog. Stands in for the scheme dataset and the
//! eligibility engine.
//!
//! In production retrieval would hit a search index and eligibility would
//! be a rules service. The catalog evaluates each scheme's
//! [`EligibilityRules`] directly, deterministically, so the session loop
//! can be exercised end to end without network access.

use async_trait::async_trait;
use sahayak_core::error::ToolError;
use sahayak_core::profile::{Field, ProfileSnapshot};
use sahayak_core::tool::{
    EligibilityEngine, EligibilityReport, EligibilityRequest, EligibilityRules, RetrieveQuery,
    Scheme, SchemeRetriever,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read scheme catalog at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse scheme catalog at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Duplicate scheme id in catalog: {0}")]
    DuplicateId(String),
}

pub struct SchemeCatalog {
    schemes: Vec<Scheme>,
}

impl SchemeCatalog {
    pub fn new(schemes: Vec<Scheme>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for scheme in &schemes {
            if !seen.insert(scheme.id.as_str()) {
                return Err(CatalogError::DuplicateId(scheme.id.clone()));
            }
        }
        Ok(Self {
            schemes: schemes.into_iter().map(normalise).collect(),
        })
    }

    /// The built-in catalog of representative schemes.
    pub fn builtin() -> Self {
        Self {
            schemes: builtin_schemes().into_iter().map(normalise).collect(),
        }
    }

    /// Load a catalog from a JSON array of schemes.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let schemes: Vec<Scheme> =
            serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::new(schemes)
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn get(&self, id: &str) -> Option<&Scheme> {
        self.schemes.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Lower-case every textual rule so comparisons match normalised profile values.
fn normalise(mut scheme: Scheme) -> Scheme {
    let lower = |v: &mut Vec<String>| {
        for s in v.iter_mut() {
            *s = s.trim().to_lowercase();
        }
    };
    lower(&mut scheme.rules.regions);
    lower(&mut scheme.rules.categories);
    lower(&mut scheme.rules.occupations);
    scheme
}

/// Outcome of checking one rule against one known value.
enum RuleCheck {
    /// The rule does not constrain this field.
    Unconstrained,
    Satisfied,
    Violated,
}

fn check_text(allowed: &[String], value: Option<&str>) -> Option<RuleCheck> {
    if allowed.is_empty() {
        return Some(RuleCheck::Unconstrained);
    }
    let value = value?;
    Some(if allowed.iter().any(|a| a == value) {
        RuleCheck::Satisfied
    } else {
        RuleCheck::Violated
    })
}

fn check_range(min: Option<u64>, max: Option<u64>, value: Option<u64>) -> Option<RuleCheck> {
    if min.is_none() && max.is_none() {
        return Some(RuleCheck::Unconstrained);
    }
    let value = value?;
    let ok = min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m);
    Some(if ok {
        RuleCheck::Satisfied
    } else {
        RuleCheck::Violated
    })
}

/// Check every rule against the query. `None` entries are unknown values.
fn rule_checks(rules: &EligibilityRules, query: &RetrieveQuery) -> [(Field, Option<RuleCheck>); 5] {
    [
        (Field::Age, check_range(rules.min_age, rules.max_age, query.age)),
        (Field::Income, check_range(None, rules.max_income, query.income)),
        (Field::Region, check_text(&rules.regions, query.region.as_deref())),
        (Field::Category, check_text(&rules.categories, query.category.as_deref())),
        (Field::Occupation, check_text(&rules.occupations, query.occupation.as_deref())),
    ]
}

#[async_trait]
impl SchemeRetriever for SchemeCatalog {
    fn name(&self) -> &str {
        "catalog"
    }

    /// Schemes not contradicted by any known value, most specific match first.
    async fn retrieve(&self, query: &RetrieveQuery) -> Result<Vec<Scheme>, ToolError> {
        let mut scored: Vec<(usize, &Scheme)> = self
            .schemes
            .iter()
            .filter_map(|scheme| {
                let checks = rule_checks(&scheme.rules, query);
                if checks
                    .iter()
                    .any(|(_, c)| matches!(c, Some(RuleCheck::Violated)))
                {
                    return None;
                }
                let matched = checks
                    .iter()
                    .filter(|(_, c)| matches!(c, Some(RuleCheck::Satisfied)))
                    .count();
                Some((matched, scheme))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        debug!(candidates = scored.len(), "Catalog retrieval");
        Ok(scored.into_iter().map(|(_, s)| s.clone()).collect())
    }
}

#[async_trait]
impl EligibilityEngine for SchemeCatalog {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn evaluate(&self, request: &EligibilityRequest) -> Result<EligibilityReport, ToolError> {
        let scheme = self
            .get(&request.scheme_id)
            .ok_or_else(|| ToolError::UnknownScheme(request.scheme_id.clone()))?;
        Ok(evaluate_rules(&scheme.rules, &request.profile))
    }
}

fn evaluate_rules(rules: &EligibilityRules, profile: &ProfileSnapshot) -> EligibilityReport {
    let query = RetrieveQuery::from_snapshot(profile);
    let checks = rule_checks(rules, &query);

    let missing: Vec<Field> = checks
        .iter()
        .filter(|(_, c)| c.is_none())
        .map(|(f, _)| *f)
        .collect();
    let violated = checks
        .iter()
        .any(|(_, c)| matches!(c, Some(RuleCheck::Violated)));

    EligibilityReport {
        eligible: missing.is_empty() && !violated,
        missing,
    }
}

fn scheme(id: &str, name: &str, description: &str, rules: EligibilityRules) -> Scheme {
    Scheme {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        rules,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_schemes() -> Vec<Scheme> {
    vec![
        scheme(
            "pm-kisan",
            "PM-KISAN",
            "Income support of Rs 6,000 a year in three instalments for landholding farmer families.",
            EligibilityRules {
                occupations: strings(&["farmer"]),
                min_age: Some(18),
                required_documents: strings(&["aadhaar card", "land records"]),
                ..Default::default()
            },
        ),
        scheme(
            "rythu-bandhu",
            "Rythu Bandhu",
            "Per-acre investment support for farmers in Telangana each crop season.",
            EligibilityRules {
                regions: strings(&["telangana"]),
                occupations: strings(&["farmer"]),
                min_age: Some(18),
                required_documents: strings(&["aadhaar card", "land records"]),
                ..Default::default()
            },
        ),
        scheme(
            "old-age-pension",
            "Old Age Pension",
            "Monthly pension for senior citizens from low-income households.",
            EligibilityRules {
                min_age: Some(60),
                max_income: Some(120_000),
                required_documents: strings(&["aadhaar card", "age proof"]),
                ..Default::default()
            },
        ),
        scheme(
            "post-matric-scholarship",
            "Post-Matric Scholarship",
            "Tuition and maintenance support for students from reserved categories.",
            EligibilityRules {
                categories: strings(&["sc", "st", "obc", "bc"]),
                occupations: strings(&["student"]),
                min_age: Some(15),
                max_age: Some(35),
                max_income: Some(250_000),
                required_documents: strings(&["caste certificate", "income certificate"]),
                ..Default::default()
            },
        ),
        scheme(
            "nethanna-nestham",
            "Nethanna Nestham",
            "Annual assistance to handloom weaver families owning a loom in Andhra Pradesh.",
            EligibilityRules {
                regions: strings(&["andhra pradesh"]),
                occupations: strings(&["weaver"]),
                min_age: Some(18),
                max_age: Some(60),
                required_documents: strings(&["aadhaar card"]),
                ..Default::default()
            },
        ),
        scheme(
            "matsyakara-bharosa",
            "Matsyakara Bharosa",
            "Relief for fishermen during the annual fishing ban period in Andhra Pradesh.",
            EligibilityRules {
                regions: strings(&["andhra pradesh"]),
                occupations: strings(&["fisherman"]),
                min_age: Some(18),
                max_age: Some(60),
                required_documents: strings(&["aadhaar card", "fisherman id card"]),
                ..Default::default()
            },
        ),
        scheme(
            "pm-svanidhi",
            "PM SVANidhi",
            "Collateral-free working capital loans for street vendors.",
            EligibilityRules {
                occupations: strings(&["street vendor"]),
                min_age: Some(18),
                required_documents: strings(&["aadhaar card", "vending certificate"]),
                ..Default::default()
            },
        ),
        scheme(
            "pmay-gramin",
            "PMAY-Gramin",
            "Assistance for rural households to build a pucca house.",
            EligibilityRules {
                min_age: Some(18),
                max_income: Some(300_000),
                required_documents: strings(&["aadhaar card", "income certificate"]),
                ..Default::default()
            },
        ),
    ]
}
