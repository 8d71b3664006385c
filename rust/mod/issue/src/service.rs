use std::sync::Arc;

use issueforge_core::ServiceError;
use issueforge_sql::SQLStore;
use tracing::{error, info};

use crate::model::{CreateIssueRequest, Issue, IssueId, UpdateIssueRequest};
use crate::store::IssueStore;

/// Issue operations: request validation in front of [`IssueStore`].
///
/// Validation always completes before the store is touched, so a rejected
/// request never reaches the database.
pub struct IssueService {
    store: IssueStore,
}

impl IssueService {
    /// Create the service and initialise the issue schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        Ok(Self {
            store: IssueStore::new(db)?,
        })
    }

    /// All issues, newest first.
    pub fn list(&self) -> Result<Vec<Issue>, ServiceError> {
        let issues = self.store.list().inspect_err(|e| {
            error!("failed to fetch issues: {e}");
        })?;
        info!("found {} issues", issues.len());
        Ok(issues)
    }

    /// Validate and insert a new issue.
    pub fn create(&self, req: CreateIssueRequest) -> Result<Issue, ServiceError> {
        let issue = Issue::new(req.validate()?);
        self.store.create(&issue).inspect_err(|e| {
            error!("failed to create issue: {e}");
        })?;
        info!(id = %issue.id, "issue created");
        Ok(issue)
    }

    /// Replace the supplied mutable fields of an existing issue.
    ///
    /// Concurrent updates to the same issue are not reconciled: the last
    /// write wins.
    pub fn update(&self, id: &IssueId, req: UpdateIssueRequest) -> Result<Issue, ServiceError> {
        let patch = req.validate()?;

        let mut issue = self.store.get(id)?;
        patch.apply(&mut issue);
        self.store.update(&issue).inspect_err(|e| {
            error!(%id, "failed to update issue: {e}");
        })?;
        info!(%id, "issue updated");
        Ok(issue)
    }

    /// Permanently remove an issue, returning its last state.
    pub fn delete(&self, id: &IssueId) -> Result<Issue, ServiceError> {
        let issue = self.store.delete(id).inspect_err(|e| {
            if !matches!(e, ServiceError::NotFound(_)) {
                error!(%id, "failed to delete issue: {e}");
            }
        })?;
        info!(%id, "issue deleted");
        Ok(issue)
    }
}
