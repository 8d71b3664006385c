//! Client-side state: the loaded issue list, local filters and the edit
//! target.
//!
//! The board never patches its list in place. Every successful mutation is
//! followed by a full reload from the server, and every failure leaves the
//! list exactly as it was. A reload that fails after a successful mutation
//! does not undo the mutation; it is reported next to the result.

use tracing::{info, warn};

use issueforge_issue::model::{Issue, IssueId, IssueStatus};

use crate::api::IssueApi;
use crate::error::ClientError;
use crate::form::IssueForm;

/// Status filter: everything, or a single status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(IssueStatus),
}

impl StatusFilter {
    /// Parse `"All"` or a status name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        IssueStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .map(Self::Only)
    }

    pub fn matches(&self, status: IssueStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// Whether `issue` passes both filters. An empty owner filter matches
/// everyone; otherwise it is a case-insensitive substring match.
pub fn matches_filters(issue: &Issue, status: &StatusFilter, owner: &str) -> bool {
    status.matches(issue.status)
        && (owner.is_empty() || issue.owner.to_lowercase().contains(&owner.to_lowercase()))
}

/// A mutation the server accepted, plus the outcome of the reload that
/// followed it.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    /// Set when the list could not be reloaded; the board still shows the
    /// list from before the mutation.
    pub refresh_error: Option<ClientError>,
}

impl<T> Mutation<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Result of a delete request.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    /// The server removed the issue; the value is its last state.
    Deleted(Mutation<Issue>),
}

/// Issue board state driven through an [`IssueApi`].
pub struct Board<A> {
    api: A,
    issues: Vec<Issue>,
    status_filter: StatusFilter,
    owner_filter: String,
    editing: Option<Issue>,
    loading: bool,
}

impl<A: IssueApi> Board<A> {
    /// An empty board; call [`Board::refresh`] to load issues.
    pub fn new(api: A) -> Self {
        Self {
            api,
            issues: Vec::new(),
            status_filter: StatusFilter::All,
            owner_filter: String::new(),
            editing: None,
            loading: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Every loaded issue, in server order (newest first).
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn owner_filter(&self) -> &str {
        &self.owner_filter
    }

    pub fn editing(&self) -> Option<&Issue> {
        self.editing.as_ref()
    }

    // -----------------------------------------------------------------------
    // Filters (local only)
    // -----------------------------------------------------------------------

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn set_owner_filter(&mut self, owner: impl Into<String>) {
        self.owner_filter = owner.into();
    }

    pub fn clear_filters(&mut self) {
        self.status_filter = StatusFilter::All;
        self.owner_filter.clear();
    }

    /// Loaded issues that pass the current filters.
    pub fn visible(&self) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| matches_filters(issue, &self.status_filter, &self.owner_filter))
            .collect()
    }

    /// `Showing X of Y issues`.
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} issues",
            self.visible().len(),
            self.issues.len()
        )
    }

    /// Find a loaded issue by full id or by unique id prefix.
    pub fn find(&self, id: &str) -> Result<&Issue, ClientError> {
        let needle = id.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ClientError::UnknownIssue(id.to_string()));
        }
        let mut hits = self
            .issues
            .iter()
            .filter(|issue| issue.id.as_str().starts_with(&needle));
        match (hits.next(), hits.next()) {
            (Some(issue), None) => Ok(issue),
            _ => Err(ClientError::UnknownIssue(id.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Server round trips
    // -----------------------------------------------------------------------

    /// Replace the local list with the server's. On failure the previous
    /// list is kept.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        self.refresh_with(|_| {})
    }

    /// Like [`Board::refresh`], calling `on_loading` with the board in its
    /// loading state just before the request goes out.
    pub fn refresh_with<F>(&mut self, on_loading: F) -> Result<(), ClientError>
    where
        F: FnOnce(&Self),
    {
        self.loading = true;
        on_loading(self);
        let result = self.api.list();
        self.loading = false;

        match result {
            Ok(issues) => {
                info!("loaded {} issues", issues.len());
                self.issues = issues;
                if let Some(editing) = &self.editing {
                    if !self.issues.iter().any(|i| i.id == editing.id) {
                        self.editing = None;
                    }
                }
                Ok(())
            }
            Err(e) => {
                warn!("failed to load issues: {e}");
                Err(e)
            }
        }
    }

    /// Submit the create form, then reload.
    pub fn create(&mut self, form: &IssueForm) -> Result<Mutation<Issue>, ClientError> {
        let draft = form.submit()?;
        let created = self.api.create(&draft)?;
        info!(id = %created.id, "issue created");
        Ok(self.reload_after(created))
    }

    /// Select a loaded issue for editing and return its pre-filled form.
    /// Any previous edit target is replaced.
    pub fn begin_edit(&mut self, id: &str) -> Result<IssueForm, ClientError> {
        let issue = self.find(id)?.clone();
        let form = IssueForm::from_issue(&issue);
        self.editing = Some(issue);
        Ok(form)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the edit form for the current edit target, then reload and
    /// close the editor. On failure the editor stays open.
    pub fn save_edit(&mut self, form: &IssueForm) -> Result<Mutation<Issue>, ClientError> {
        let id = self
            .editing
            .as_ref()
            .map(|issue| issue.id.clone())
            .ok_or(ClientError::NotEditing)?;
        let draft = form.submit()?;
        let updated = self.api.update(&id, &draft)?;
        info!(%id, "issue updated");
        self.editing = None;
        Ok(self.reload_after(updated))
    }

    /// Delete a loaded issue after `confirm` accepts the prompt, then reload.
    pub fn delete<F>(&mut self, id: &str, confirm: F) -> Result<DeleteOutcome, ClientError>
    where
        F: FnOnce(&str) -> bool,
    {
        let issue = self.find(id)?;
        let (issue_id, prompt) = (
            issue.id.clone(),
            format!("Are you sure you want to delete issue: \"{}\"?", issue.title),
        );
        if !confirm(&prompt) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let deleted = self.api.delete(&issue_id)?;
        info!(id = %issue_id, "issue deleted");
        if self.editing.as_ref().is_some_and(|e| e.id == issue_id) {
            self.editing = None;
        }
        Ok(DeleteOutcome::Deleted(self.reload_after(deleted)))
    }

    fn reload_after<T>(&mut self, value: T) -> Mutation<T> {
        Mutation {
            value,
            refresh_error: self.refresh().err(),
        }
    }
}
