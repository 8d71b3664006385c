use std::sync::Arc;

use chrono::SecondsFormat;
use issueforge_core::ServiceError;
use issueforge_sql::{Row, SQLError, SQLStore, Value};

use crate::model::{Issue, IssueId};

/// SQL schema for the issues collection.
///
/// Each row holds the full JSON document in `data`; the other columns mirror
/// document fields so the database itself rejects records that break the
/// field rules, whatever path they were written through.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS issues (
    id       TEXT PRIMARY KEY CHECK (length(id) = 32),
    data     TEXT NOT NULL,
    title    TEXT NOT NULL CHECK (length(trim(title)) > 0),
    owner    TEXT NOT NULL CHECK (length(trim(owner)) > 0),
    status   TEXT NOT NULL DEFAULT 'New'
             CHECK (status IN ('New', 'In Progress', 'Fixed', 'Closed')),
    effort   INTEGER NOT NULL DEFAULT 0 CHECK (effort >= 0),
    created  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_issue_created ON issues(created);
";

/// Persistent storage for issues, backed by SQLStore (SQLite).
pub struct IssueStore {
    db: Arc<dyn SQLStore>,
}

impl IssueStore {
    /// Create a new IssueStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::Storage(format!("issue schema init: {e}")))?;
        Ok(Self { db })
    }

    /// Insert a new issue.
    pub fn create(&self, issue: &Issue) -> Result<(), ServiceError> {
        let data = to_json(issue)?;

        self.db
            .exec(
                "INSERT INTO issues (id, data, title, owner, status, effort, created) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                &[
                    Value::Text(issue.id.to_string()),
                    Value::Text(data),
                    Value::Text(issue.title.clone()),
                    Value::Text(issue.owner.clone()),
                    Value::Text(issue.status.as_str().to_string()),
                    Value::Integer(i64::from(issue.effort)),
                    Value::Text(created_key(issue)),
                ],
            )
            .map_err(storage)?;

        Ok(())
    }

    /// Get an issue by ID.
    pub fn get(&self, id: &IssueId) -> Result<Issue, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM issues WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(storage)?;

        let row = rows.first().ok_or_else(|| not_found(id))?;
        row_to_issue(row)
    }

    /// Update an issue (full replacement of the data column + mirrored columns).
    pub fn update(&self, issue: &Issue) -> Result<(), ServiceError> {
        let data = to_json(issue)?;

        let affected = self
            .db
            .exec(
                "UPDATE issues SET data = ?1, title = ?2, owner = ?3, status = ?4, effort = ?5 \
                 WHERE id = ?6",
                &[
                    Value::Text(data),
                    Value::Text(issue.title.clone()),
                    Value::Text(issue.owner.clone()),
                    Value::Text(issue.status.as_str().to_string()),
                    Value::Integer(i64::from(issue.effort)),
                    Value::Text(issue.id.to_string()),
                ],
            )
            .map_err(storage)?;

        if affected == 0 {
            return Err(not_found(&issue.id));
        }
        Ok(())
    }

    /// Delete an issue by ID, returning the removed document.
    pub fn delete(&self, id: &IssueId) -> Result<Issue, ServiceError> {
        let rows = self
            .db
            .query(
                "DELETE FROM issues WHERE id = ?1 RETURNING data",
                &[Value::Text(id.to_string())],
            )
            .map_err(storage)?;

        let row = rows.first().ok_or_else(|| not_found(id))?;
        row_to_issue(row)
    }

    /// All issues, newest first. Ties on `created` fall back to insertion order.
    pub fn list(&self) -> Result<Vec<Issue>, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM issues ORDER BY created DESC, rowid DESC",
                &[],
            )
            .map_err(storage)?;

        rows.iter().map(row_to_issue).collect()
    }
}

/// Fixed-width UTC timestamp so that text order equals time order.
fn created_key(issue: &Issue) -> String {
    issue.created.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn to_json(issue: &Issue) -> Result<String, ServiceError> {
    serde_json::to_string(issue).map_err(|e| ServiceError::Internal(e.to_string()))
}

fn storage(e: SQLError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

fn not_found(id: &IssueId) -> ServiceError {
    ServiceError::NotFound(format!("No issue found with ID: {id}"))
}

/// Deserialize an Issue from a row's `data` JSON column.
fn row_to_issue(row: &Row) -> Result<Issue, ServiceError> {
    let json = row
        .get_str("data")
        .ok_or_else(|| ServiceError::Storage("missing data column".into()))?;
    serde_json::from_str(json).map_err(|e| ServiceError::Storage(format!("bad issue json: {e}")))
}
