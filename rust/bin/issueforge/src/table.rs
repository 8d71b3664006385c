//! Table rendering for issue lists.

use colored::{ColoredString, Colorize};
use tabled::settings::object::Rows;
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

use issueforge_client::{Issue, IssueStatus};

/// Leading id characters shown in tables; any unique prefix is accepted back.
pub const SHORT_ID_LEN: usize = 8;

pub const EMPTY_MESSAGE: &str =
    "No issues found. Try adjusting your filters or add a new issue.";

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Effort")]
    effort: String,
    #[tabled(rename = "Due Date")]
    due_date: String,
}

impl IssueRow {
    fn new(issue: &Issue, color: bool) -> Self {
        let status = if color {
            badge(issue.status).to_string()
        } else {
            issue.status.to_string()
        };
        Self {
            id: issue.id.as_str().chars().take(SHORT_ID_LEN).collect(),
            title: issue.title.clone(),
            owner: issue.owner.clone(),
            status,
            created: issue.created.format("%Y-%m-%d").to_string(),
            effort: format!("{} days", issue.effort),
            due_date: issue
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Status text colored per workflow stage.
pub fn badge(status: IssueStatus) -> ColoredString {
    match status {
        IssueStatus::New => status.as_str().blue().bold(),
        IssueStatus::InProgress => status.as_str().yellow().bold(),
        IssueStatus::Fixed => status.as_str().green().bold(),
        IssueStatus::Closed => status.as_str().dimmed(),
    }
}

/// Render `issues` as a table, or the empty-state message.
pub fn render(issues: &[&Issue], color: bool) -> String {
    if issues.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let rows: Vec<IssueRow> = issues.iter().map(|i| IssueRow::new(i, color)).collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    if color {
        table.with(Modify::new(Rows::one(0)).with(Color::FG_BRIGHT_CYAN));
    }
    table.with(Modify::new(Rows::new(1..)).with(Alignment::left()));
    table.to_string()
}
