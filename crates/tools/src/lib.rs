//! Tool gateway implementation for Sahayak.
//!
//! The gateway fronts three external capabilities: scheme retrieval,
//! eligibility evaluation, and application submission. This crate ships
//! the gateway itself plus deterministic stand-ins for the collaborators:
//! an in-memory scheme catalog (retrieval + eligibility) and a mock
//! application endpoint, so sessions can run end to end offline.

pub mod catalog;
pub mod gateway;
pub mod mock_api;

use std::sync::Arc;
use std::time::Duration;

pub use catalog::{CatalogError, SchemeCatalog};
pub use gateway::ServiceGateway;
pub use mock_api::MockApplicationEndpoint;

/// Create a gateway backed by the given catalog and a mock endpoint.
///
/// The catalog serves both retrieval and eligibility; the endpoint checks
/// documents against the same catalog.
pub fn default_gateway(catalog: Arc<SchemeCatalog>, timeout: Duration) -> ServiceGateway {
    let endpoint = Arc::new(MockApplicationEndpoint::new(catalog.clone()));
    ServiceGateway::new(catalog.clone(), catalog, endpoint).with_timeout(timeout)
}
