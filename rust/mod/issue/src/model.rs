use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use issueforge_core::{new_id, now_utc, ServiceError};

// ---------------------------------------------------------------------------
// IssueStatus
// ---------------------------------------------------------------------------

/// Workflow state of an issue.
///
/// ```text
/// New → In Progress → Fixed → Closed
/// ```
///
/// Any transition is allowed; the order above is only the usual path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    #[default]
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Fixed,
    Closed,
}

impl IssueStatus {
    /// Every status, in workflow order.
    pub const ALL: [IssueStatus; 4] = [Self::New, Self::InProgress, Self::Fixed, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Fixed => "Fixed",
            Self::Closed => "Closed",
        }
    }

    /// Parse the exact wire form (`"New"`, `"In Progress"`, `"Fixed"`, `"Closed"`).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IssueId
// ---------------------------------------------------------------------------

/// Store-assigned identifier: 32 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueId(String);

impl IssueId {
    pub const LEN: usize = 32;

    /// Allocate a fresh id.
    pub fn generate() -> Self {
        Self(new_id())
    }

    /// Accept exactly 32 ASCII hex digits (either case).
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Parse an id taken from a request path.
    pub fn from_param(raw: &str) -> Result<Self, ServiceError> {
        Self::parse(raw).ok_or_else(|| {
            ServiceError::InvalidId(format!(
                "The provided ID {raw:?} is not a valid issue ID ({} hex characters)",
                Self::LEN
            ))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IssueId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid issue id: {value:?}"))
    }
}

impl From<IssueId> for String {
    fn from(id: IssueId) -> Self {
        id.0
    }
}

impl std::fmt::Display for IssueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Issue: the stored document
// ---------------------------------------------------------------------------

/// A trackable unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub owner: String,
    #[serde(default)]
    pub status: IssueStatus,
    /// Set once at creation.
    pub created: DateTime<Utc>,
    /// Refreshed on every update.
    pub updated: DateTime<Utc>,
    /// Estimated effort in days.
    #[serde(default)]
    pub effort: u32,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Issue {
    /// Materialize a validated create request with a fresh id and timestamps.
    pub fn new(input: NewIssue) -> Self {
        let now = now_utc();
        Self {
            id: IssueId::generate(),
            title: input.title,
            owner: input.owner,
            status: input.status,
            created: now,
            updated: now,
            effort: input.effort,
            due_date: input.due_date,
        }
    }
}

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Body for `POST /api/issues`. Everything is optional at the wire level so
/// that missing fields surface as validation errors, not decode errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub effort: Option<i64>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Body for `PUT /api/issues/{id}`.
///
/// Absent fields keep their stored value. `dueDate: null` clears the due
/// date; `null` for any other field is treated as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub effort: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<String>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Validated inputs
// ---------------------------------------------------------------------------

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub owner: String,
    pub status: IssueStatus,
    pub effort: u32,
    pub due_date: Option<NaiveDate>,
}

/// An update request that passed validation. `None` means "keep".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub owner: Option<String>,
    pub status: Option<IssueStatus>,
    pub effort: Option<u32>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl IssuePatch {
    /// Replace the mutable fields of `issue`; id and created are untouched.
    pub fn apply(self, issue: &mut Issue) {
        if let Some(title) = self.title {
            issue.title = title;
        }
        if let Some(owner) = self.owner {
            issue.owner = owner;
        }
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(effort) = self.effort {
            issue.effort = effort;
        }
        if let Some(due_date) = self.due_date {
            issue.due_date = due_date;
        }
        issue.updated = now_utc();
    }
}

impl CreateIssueRequest {
    pub fn validate(self) -> Result<NewIssue, ServiceError> {
        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        let owner = self.owner.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() || owner.is_empty() {
            return Err(ServiceError::Validation(
                "Title and Owner are required fields".into(),
            ));
        }

        let status = match self.status.as_deref() {
            None | Some("") => IssueStatus::New,
            Some(s) => parse_status(s)?,
        };
        let effort = self.effort.map(parse_effort).transpose()?.unwrap_or(0);
        let due_date = self
            .due_date
            .as_deref()
            .map(parse_due_date)
            .transpose()?
            .flatten();

        Ok(NewIssue {
            title: title.to_string(),
            owner: owner.to_string(),
            status,
            effort,
            due_date,
        })
    }
}

impl UpdateIssueRequest {
    pub fn validate(self) -> Result<IssuePatch, ServiceError> {
        let title = self.title.as_deref().map(|t| required("Title", t)).transpose()?;
        let owner = self.owner.as_deref().map(|o| required("Owner", o)).transpose()?;
        let status = self.status.as_deref().map(parse_status).transpose()?;
        let effort = self.effort.map(parse_effort).transpose()?;
        let due_date = match self.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(parse_due_date(&raw)?),
        };

        Ok(IssuePatch {
            title,
            owner,
            status,
            effort,
            due_date,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn parse_status(s: &str) -> Result<IssueStatus, ServiceError> {
    IssueStatus::parse(s).ok_or_else(|| {
        let allowed: Vec<&str> = IssueStatus::ALL.iter().map(IssueStatus::as_str).collect();
        ServiceError::Validation(format!(
            "Invalid status {s:?}; expected one of: {}",
            allowed.join(", ")
        ))
    })
}

fn parse_effort(effort: i64) -> Result<u32, ServiceError> {
    u32::try_from(effort).map_err(|_| {
        ServiceError::Validation(format!(
            "Effort must be a non-negative integer, got {effort}"
        ))
    })
}

/// Parse a due date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// Blank input yields `Some(None)`; unparseable input yields `None`.
pub fn parse_date(raw: &str) -> Option<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
}

fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, ServiceError> {
    parse_date(raw).ok_or_else(|| {
        ServiceError::Validation(format!("Invalid dueDate {raw:?}; expected YYYY-MM-DD"))
    })
}
