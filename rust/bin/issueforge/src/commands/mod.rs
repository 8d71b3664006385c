pub mod issues;
pub mod shell;

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use issueforge_client::{IssueForm, IssueStatus, StatusFilter};

/// Form fields given on the command line.
#[derive(Args, Debug, Default, Clone)]
pub struct FormArgs {
    /// Issue title.
    #[arg(long)]
    pub title: Option<String>,
    /// Person responsible.
    #[arg(long)]
    pub owner: Option<String>,
    /// New, "In Progress", Fixed or Closed.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<IssueStatus>,
    /// Estimated effort in days.
    #[arg(long)]
    pub effort: Option<String>,
    /// Due date (YYYY-MM-DD); an empty value clears it.
    #[arg(long = "due")]
    pub due_date: Option<String>,
}

impl FormArgs {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.owner.is_none()
            && self.status.is_none()
            && self.effort.is_none()
            && self.due_date.is_none()
    }

    /// Overwrite the fields of `form` that were given.
    pub fn apply(self, form: &mut IssueForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(owner) = self.owner {
            form.owner = owner;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(effort) = self.effort {
            form.effort = effort;
        }
        if let Some(due_date) = self.due_date {
            form.due_date = due_date;
        }
    }
}

/// Case-insensitive status name.
pub fn parse_status(s: &str) -> Result<IssueStatus, String> {
    match StatusFilter::parse(s) {
        Some(StatusFilter::Only(status)) => Ok(status),
        _ => Err(format!(
            "unknown status {s:?} (expected New, \"In Progress\", Fixed or Closed)"
        )),
    }
}

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask for one line. `None` at end of input.
    pub fn line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut s = String::new();
        if self.input.read_line(&mut s)? == 0 {
            return Ok(None);
        }
        Ok(Some(s.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask for a value; an empty answer keeps `current`.
    pub fn with_default(&mut self, label: &str, current: &str) -> Result<String> {
        let label = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };
        Ok(match self.line(&label)? {
            Some(answer) if !answer.trim().is_empty() => answer,
            _ => current.to_string(),
        })
    }

    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.line(&format!("{question} [y/N]: "))?;
        Ok(answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")))
    }

    /// Walk through every form field, keeping current values on empty input.
    pub fn fill(&mut self, form: &mut IssueForm) -> Result<()> {
        form.title = self.with_default("Title", &form.title)?;
        form.owner = self.with_default("Owner", &form.owner)?;
        loop {
            let raw = self.with_default("Status", form.status.as_str())?;
            match parse_status(&raw) {
                Ok(status) => {
                    form.status = status;
                    break;
                }
                Err(e) => writeln!(self.output, "{}", e.red())?,
            }
        }
        form.effort = self.with_default("Effort (days)", &form.effort)?;
        let due = self.with_default("Due date (YYYY-MM-DD, '-' to clear)", &form.due_date)?;
        form.due_date = if due.trim() == "-" { String::new() } else { due };
        Ok(())
    }
}

/// Print an error the way every command reports failures.
pub fn report_error(out: &mut impl Write, err: &dyn std::fmt::Display) -> std::io::Result<()> {
    writeln!(out, "{} {err}", "Error:".red().bold())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn status_names() {
        assert_eq!(parse_status("in progress"), Ok(IssueStatus::InProgress));
        assert_eq!(parse_status("CLOSED"), Ok(IssueStatus::Closed));
        assert!(parse_status("All").is_err());
        assert!(parse_status("Done").is_err());
    }

    #[test]
    fn confirm_defaults_to_no() {
        assert!(prompt("y\n").confirm("Sure?").unwrap());
        assert!(prompt("Y\n").confirm("Sure?").unwrap());
        assert!(!prompt("\n").confirm("Sure?").unwrap());
        assert!(!prompt("yes please\n").confirm("Sure?").unwrap());
        assert!(!prompt("").confirm("Sure?").unwrap());
    }

    #[test]
    fn fill_keeps_defaults_and_retries_status() {
        let mut form = IssueForm {
            title: "Old".into(),
            owner: "Alice".into(),
            effort: "2".into(),
            due_date: "2024-01-01".into(),
            ..Default::default()
        };
        let mut p = prompt("New title\n\nnope\nfixed\n\n-\n");
        p.fill(&mut form).unwrap();

        assert_eq!(form.title, "New title");
        assert_eq!(form.owner, "Alice");
        assert_eq!(form.status, IssueStatus::Fixed);
        assert_eq!(form.effort, "2");
        assert_eq!(form.due_date, "");

        let shown = String::from_utf8(p.output().clone()).unwrap();
        assert!(shown.contains("Title [Old]: "));
        assert!(shown.contains("unknown status"));
    }

    #[test]
    fn form_args_apply_given_fields() {
        let mut form = IssueForm::default();
        FormArgs {
            owner: Some("Bob".into()),
            due_date: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut form);
        assert_eq!(form.owner, "Bob");
        assert_eq!(form.title, "");
        assert!(!FormArgs {
            effort: Some("1".into()),
            ..Default::default()
        }
        .is_empty());
    }
}
