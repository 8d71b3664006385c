use chrono::NaiveDate;
use serde::Serialize;

use issueforge_issue::model::{parse_date, Issue, IssueStatus};

use crate::error::ClientError;

/// Raw input of the create and edit forms, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueForm {
    pub title: String,
    pub owner: String,
    pub status: IssueStatus,
    /// Effort in days; free text until submitted.
    pub effort: String,
    /// `YYYY-MM-DD` or empty.
    pub due_date: String,
}

/// Request body produced by a valid form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDraft {
    pub title: String,
    pub owner: String,
    pub status: IssueStatus,
    pub effort: u32,
    /// Serialized as `null` when absent so that an edit clears the date.
    pub due_date: Option<NaiveDate>,
}

impl IssueForm {
    /// Pre-fill an edit form with the current values of `issue`.
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            owner: issue.owner.clone(),
            status: issue.status,
            effort: issue.effort.to_string(),
            due_date: issue
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    /// Apply the client-side rules and build the request body.
    pub fn submit(&self) -> Result<IssueDraft, ClientError> {
        let title = self.title.trim();
        let owner = self.owner.trim();
        if title.is_empty() || owner.is_empty() {
            return Err(ClientError::Form(
                "Please fill in both Title and Owner fields".into(),
            ));
        }

        let due_date = parse_date(&self.due_date).ok_or_else(|| {
            ClientError::Form(format!(
                "Due date {:?} is not a valid date (YYYY-MM-DD)",
                self.due_date.trim()
            ))
        })?;

        Ok(IssueDraft {
            title: title.to_string(),
            owner: owner.to_string(),
            status: self.status,
            effort: coerce_effort(&self.effort),
            due_date,
        })
    }

    /// Back to the blank create form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Read the leading integer of `raw` the way a number input is read:
/// surrounding whitespace is ignored, parsing stops at the first non-digit,
/// and anything empty, non-numeric or negative becomes 0.
pub fn coerce_effort(raw: &str) -> u32 {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use issueforge_issue::model::NewIssue;

    fn filled() -> IssueForm {
        IssueForm {
            title: "  Fix login ".into(),
            owner: " Alice".into(),
            ..Default::default()
        }
    }

    #[test]
    fn effort_coercion() {
        assert_eq!(coerce_effort(""), 0);
        assert_eq!(coerce_effort("   "), 0);
        assert_eq!(coerce_effort("3"), 3);
        assert_eq!(coerce_effort(" 12 "), 12);
        assert_eq!(coerce_effort("3.7"), 3);
        assert_eq!(coerce_effort("5days"), 5);
        assert_eq!(coerce_effort("+4"), 4);
        assert_eq!(coerce_effort("abc"), 0);
        assert_eq!(coerce_effort("-2"), 0);
        assert_eq!(coerce_effort("99999999999"), u32::MAX);
    }

    #[test]
    fn submit_trims_and_defaults() {
        let draft = filled().submit().unwrap();
        assert_eq!(draft.title, "Fix login");
        assert_eq!(draft.owner, "Alice");
        assert_eq!(draft.status, IssueStatus::New);
        assert_eq!(draft.effort, 0);
        assert_eq!(draft.due_date, None);
    }

    #[test]
    fn submit_requires_title_and_owner() {
        let form = IssueForm {
            owner: "   ".into(),
            ..filled()
        };
        assert!(matches!(form.submit(), Err(ClientError::Form(_))));

        let form = IssueForm {
            title: String::new(),
            ..filled()
        };
        assert!(matches!(form.submit(), Err(ClientError::Form(_))));
    }

    #[test]
    fn submit_checks_due_date() {
        let form = IssueForm {
            due_date: "2024-13-45".into(),
            ..filled()
        };
        assert!(matches!(form.submit(), Err(ClientError::Form(_))));

        let form = IssueForm {
            due_date: "2024-06-30".into(),
            ..filled()
        };
        assert_eq!(
            form.submit().unwrap().due_date,
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
    }

    #[test]
    fn draft_json_shape() {
        let json = serde_json::to_value(filled().submit().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Fix login",
                "owner": "Alice",
                "status": "New",
                "effort": 0,
                "dueDate": null,
            })
        );
    }

    #[test]
    fn edit_form_prefill() {
        let issue = Issue::new(NewIssue {
            title: "Crash on save".into(),
            owner: "Bob".into(),
            status: IssueStatus::InProgress,
            effort: 4,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 29),
        });
        let form = IssueForm::from_issue(&issue);
        assert_eq!(form.effort, "4");
        assert_eq!(form.due_date, "2024-02-29");
        assert_eq!(form.status, IssueStatus::InProgress);

        let mut form = form;
        form.reset();
        assert_eq!(form, IssueForm::default());
    }
}
