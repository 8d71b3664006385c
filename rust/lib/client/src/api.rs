//! HTTP access to the issue API.

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use issueforge_issue::model::{Issue, IssueId};

use crate::error::ClientError;
use crate::form::IssueDraft;

/// The four issue operations, as seen from the client.
///
/// [`HttpIssueApi`] talks to a running server; tests substitute an
/// in-memory implementation.
pub trait IssueApi {
    fn list(&self) -> Result<Vec<Issue>, ClientError>;

    fn create(&self, draft: &IssueDraft) -> Result<Issue, ClientError>;

    fn update(&self, id: &IssueId, draft: &IssueDraft) -> Result<Issue, ClientError>;

    fn delete(&self, id: &IssueId) -> Result<Issue, ClientError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    deleted_issue: Issue,
}

/// Blocking HTTP client for `{server}/api/issues`.
pub struct HttpIssueApi {
    client: Client,
    base_url: String,
}

impl HttpIssueApi {
    /// `server` is the server root, e.g. `http://localhost:5000`.
    pub fn new(server: &str) -> Result<Self, ClientError> {
        let server = server.trim().trim_end_matches('/');
        if server.is_empty() {
            return Err(ClientError::Transport("no server URL configured".into()));
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: server.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn issues_url(&self) -> String {
        format!("{}/api/issues", self.base_url)
    }

    fn issue_url(&self, id: &IssueId) -> String {
        format!("{}/api/issues/{}", self.base_url, id)
    }

    /// Fetch the server's root service description.
    pub fn describe(&self) -> Result<serde_json::Value, ClientError> {
        send(self.client.get(&self.base_url), "Failed to reach server")
    }
}

impl IssueApi for HttpIssueApi {
    fn list(&self) -> Result<Vec<Issue>, ClientError> {
        send(self.client.get(self.issues_url()), "Failed to load issues")
    }

    fn create(&self, draft: &IssueDraft) -> Result<Issue, ClientError> {
        send(
            self.client.post(self.issues_url()).json(draft),
            "Failed to create issue",
        )
    }

    fn update(&self, id: &IssueId, draft: &IssueDraft) -> Result<Issue, ClientError> {
        send(
            self.client.put(self.issue_url(id)).json(draft),
            "Failed to update issue",
        )
    }

    fn delete(&self, id: &IssueId) -> Result<Issue, ClientError> {
        let resp: DeleteResponse = send(
            self.client.delete(self.issue_url(id)),
            "Failed to delete issue",
        )?;
        Ok(resp.deleted_issue)
    }
}

/// Send a request and decode the JSON body, turning failure statuses into
/// [`ClientError::Api`] with the server-reported message.
fn send<T: DeserializeOwned>(req: RequestBuilder, fallback: &str) -> Result<T, ClientError> {
    let resp = req.send()?;
    let status = resp.status();
    debug!("{} {}", status.as_u16(), resp.url());

    if !status.is_success() {
        let body: serde_json::Value = resp.json().unwrap_or_default();
        let message = body["message"]
            .as_str()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string();
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    resp.json()
        .map_err(|e| ClientError::Transport(format!("unexpected response body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_normalized() {
        let api = HttpIssueApi::new(" http://localhost:5000/ ").unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.issues_url(), "http://localhost:5000/api/issues");

        let id = IssueId::parse("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(
            api.issue_url(&id),
            "http://localhost:5000/api/issues/0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn empty_server_rejected() {
        assert!(matches!(HttpIssueApi::new("  "), Err(ClientError::Transport(_))));
    }
}
