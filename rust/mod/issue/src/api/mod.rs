mod issues;

use std::sync::Arc;

use axum::Router;

use crate::service::IssueService;

/// Build the issue module router.
///
/// Routes (relative to the `/api` mount point):
/// - `GET    /issues`       list issues, newest first
/// - `POST   /issues`       create issue
/// - `PUT    /issues/{id}`  update issue
/// - `DELETE /issues/{id}`  delete issue
pub fn router(service: Arc<IssueService>) -> Router {
    issues::router(service)
}
