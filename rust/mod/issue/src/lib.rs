pub mod api;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use issueforge_core::{Module, ServiceError};
use issueforge_sql::SQLStore;

use service::IssueService;

/// The Issue module: CRUD over the issue collection.
///
/// Embed this in a service binary and mount [`Module::routes`] under `/api`.
pub struct IssueModule {
    service: Arc<IssueService>,
}

impl IssueModule {
    /// Create the issue module and initialise storage.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        Ok(Self {
            service: Arc::new(IssueService::new(db)?),
        })
    }

    /// Direct access to the service, bypassing HTTP.
    pub fn service(&self) -> &Arc<IssueService> {
        &self.service
    }
}

impl Module for IssueModule {
    fn name(&self) -> &str {
        "issue"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
