//! Application state for the attendance API.

use std::sync::Arc;

use crate::service::WorkforceService;

/// Shared application state.
///
/// Holds the service every handler delegates to.
#[derive(Clone)]
pub struct AppState {
    service: Arc<WorkforceService>,
}

impl AppState {
    /// Creates a new application state around `service`.
    pub fn new(service: WorkforceService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a state sharing an existing service.
    pub fn from_shared(service: Arc<WorkforceService>) -> Self {
        Self { service }
    }

    /// Returns the service.
    pub fn service(&self) -> &WorkforceService {
        &self.service
    }
}
