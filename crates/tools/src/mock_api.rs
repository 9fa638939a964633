//! Mock application endpoint standing in for the scheme submission service.
//!
//! Submission succeeds when the applicant has confirmed every document the
//! scheme requires; otherwise the endpoint answers with the documents still
//! missing. Accepted forms are kept so tests can inspect them.

use async_trait::async_trait;
use sahayak_core::error::ToolError;
use sahayak_core::tool::{ApplicationEndpoint, ApplicationForm, ApplicationStatus};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::catalog::SchemeCatalog;

pub struct MockApplicationEndpoint {
    catalog: Arc<SchemeCatalog>,
    submitted: RwLock<Vec<(String, ApplicationForm)>>,
}

impl MockApplicationEndpoint {
    pub fn new(catalog: Arc<SchemeCatalog>) -> Self {
        Self {
            catalog,
            submitted: RwLock::new(Vec::new()),
        }
    }

    /// Accepted applications as `(application_id, form)` pairs.
    pub async fn submissions(&self) -> Vec<(String, ApplicationForm)> {
        self.submitted.read().await.clone()
    }
}

fn new_application_id() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("APP-{}", raw[..8].to_uppercase())
}

#[async_trait]
impl ApplicationEndpoint for MockApplicationEndpoint {
    fn name(&self) -> &str {
        "mock_api"
    }

    async fn submit(&self, form: &ApplicationForm) -> Result<ApplicationStatus, ToolError> {
        let Some(scheme) = self.catalog.get(&form.scheme_id) else {
            return Ok(ApplicationStatus::Rejected {
                reason: format!("scheme '{}' is not open for applications", form.scheme_id),
            });
        };

        let missing: Vec<String> = scheme
            .rules
            .required_documents
            .iter()
            .filter(|doc| {
                !form
                    .documents
                    .iter()
                    .any(|held| held.trim().eq_ignore_ascii_case(doc.trim()))
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Ok(ApplicationStatus::MissingDocument { documents: missing });
        }

        let application_id = new_application_id();
        info!(scheme = %form.scheme_id, application_id = %application_id, "Application submitted");
        self.submitted
            .write()
            .await
            .push((application_id.clone(), form.clone()));
        Ok(ApplicationStatus::Submitted { application_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahayak_core::profile::ProfileSnapshot;

    fn form(scheme_id: &str, documents: &[&str]) -> ApplicationForm {
        ApplicationForm {
            scheme_id: scheme_id.into(),
            profile: ProfileSnapshot::default(),
            documents: documents.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn missing_documents_are_listed() {
        let endpoint = MockApplicationEndpoint::new(Arc::new(SchemeCatalog::builtin()));
        let status = endpoint
            .submit(&form("old-age-pension", &["Aadhaar Card"]))
            .await
            .unwrap();
        assert_eq!(
            status,
            ApplicationStatus::MissingDocument {
                documents: vec!["age proof".into()]
            }
        );
        assert!(endpoint.submissions().await.is_empty());
    }

    #[tokio::test]
    async fn complete_form_is_submitted() {
        let endpoint = MockApplicationEndpoint::new(Arc::new(SchemeCatalog::builtin()));
        let status = endpoint
            .submit(&form("pm-kisan", &["aadhaar card", "land records"]))
            .await
            .unwrap();
        match status {
            ApplicationStatus::Submitted { application_id } => {
                assert!(application_id.starts_with("APP-"));
                assert_eq!(application_id.len(), 12);
            }
            other => panic!("Expected Submitted, got {other:?}"),
        }
        assert_eq!(endpoint.submissions().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_scheme_is_rejected() {
        let endpoint = MockApplicationEndpoint::new(Arc::new(SchemeCatalog::builtin()));
        let status = endpoint.submit(&form("ghost", &[])).await.unwrap();
        assert!(matches!(status, ApplicationStatus::Rejected { .. }));
    }
}
