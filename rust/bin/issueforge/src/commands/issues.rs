//! One-shot issue commands: `list`, `add`, `edit`, `delete`, `status`.
//!
//! Each command works on a freshly loaded [`Board`] and reports success the
//! same way the interactive shell does.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use colored::Colorize;

use issueforge_client::{
    Board, ClientError, DeleteOutcome, HttpIssueApi, IssueApi, IssueForm, Mutation, StatusFilter,
};

use super::{report_error, FormArgs, Prompt};
use crate::table;

pub const ADDED: &str = "Issue added successfully!";
pub const UPDATED: &str = "Issue updated successfully!";
pub const DELETED: &str = "Issue deleted successfully!";

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Prefix server and transport failures with the action that failed. Form
/// and selection errors already read as complete sentences.
fn failed(action: &str, err: ClientError) -> anyhow::Error {
    match err {
        ClientError::Api { .. } | ClientError::Transport(_) => {
            anyhow!("Failed to {action} issue: {err}")
        }
        other => other.into(),
    }
}

/// Report a reload that failed after the change itself went through.
fn report_reload<T>(mutation: &Mutation<T>, out: &mut impl Write) -> Result<()> {
    if let Some(e) = &mutation.refresh_error {
        report_error(out, &format_args!("Failed to load issues: {e}"))?;
    }
    Ok(())
}

/// Print the filtered issue list.
pub fn list<A: IssueApi>(
    board: &Board<A>,
    format: OutputFormat,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    let visible = board.visible();
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&visible)?)?;
        }
        OutputFormat::Table => {
            writeln!(out, "{}", table::render(&visible, color))?;
            writeln!(out, "{}", board.summary())?;
        }
    }
    Ok(())
}

/// Apply `--status`/`--owner` from the command line.
pub fn apply_filters<A: IssueApi>(
    board: &mut Board<A>,
    status: Option<StatusFilter>,
    owner: Option<String>,
) {
    if let Some(status) = status {
        board.set_status_filter(status);
    }
    if let Some(owner) = owner {
        board.set_owner_filter(owner);
    }
}

/// Create an issue from flags, or prompt for every field when none were given.
pub fn add<A: IssueApi, R: BufRead, W: Write>(
    board: &mut Board<A>,
    args: FormArgs,
    prompt: &mut Prompt<R, W>,
    out: &mut impl Write,
) -> Result<()> {
    let mut form = IssueForm::default();
    if args.is_empty() {
        prompt.fill(&mut form)?;
    } else {
        args.apply(&mut form);
    }

    let created = board.create(&form).map_err(|e| failed("add", e))?;
    writeln!(out, "{} {}", ADDED.green(), created.value.id)?;
    report_reload(&created, out)
}

/// Edit a loaded issue from flags, or prompt with the current values.
pub fn edit<A: IssueApi, R: BufRead, W: Write>(
    board: &mut Board<A>,
    id: &str,
    args: FormArgs,
    prompt: &mut Prompt<R, W>,
    out: &mut impl Write,
) -> Result<()> {
    let mut form = board.begin_edit(id)?;
    if args.is_empty() {
        prompt.fill(&mut form)?;
    } else {
        args.apply(&mut form);
    }

    let result = board.save_edit(&form);
    if result.is_err() {
        board.cancel_edit();
    }
    let updated = result.map_err(|e| failed("update", e))?;
    writeln!(out, "{} {}", UPDATED.green(), updated.value.id)?;
    report_reload(&updated, out)
}

/// Delete a loaded issue, asking first unless `yes` is set.
pub fn delete<A: IssueApi, R: BufRead, W: Write>(
    board: &mut Board<A>,
    id: &str,
    yes: bool,
    prompt: &mut Prompt<R, W>,
    out: &mut impl Write,
) -> Result<()> {
    let mut io_error = None;
    let outcome = board.delete(id, |question| {
        if yes {
            return true;
        }
        prompt.confirm(question).unwrap_or_else(|e| {
            io_error = Some(e);
            false
        })
    })
    .map_err(|e| failed("delete", e))?;
    if let Some(e) = io_error {
        return Err(e);
    }

    match outcome {
        DeleteOutcome::Cancelled => {
            writeln!(out, "Cancelled.")?;
            Ok(())
        }
        DeleteOutcome::Deleted(deleted) => {
            writeln!(out, "{} \"{}\"", DELETED.green(), deleted.value.title)?;
            report_reload(&deleted, out)
        }
    }
}

/// Show the server's self-description.
pub fn status(api: &HttpIssueApi, out: &mut impl Write) -> Result<()> {
    let info = api.describe()?;
    writeln!(out, "Server:   {}", api.base_url())?;
    writeln!(
        out,
        "Service:  {} v{}",
        info["message"].as_str().unwrap_or("unknown"),
        info["version"].as_str().unwrap_or("?")
    )?;
    if let Some(db) = info["database"].as_str() {
        writeln!(out, "Database: {db}")?;
    }
    if let Some(endpoints) = info["endpoints"].as_array() {
        writeln!(out, "Endpoints:")?;
        for endpoint in endpoints.iter().filter_map(|e| e.as_str()) {
            writeln!(out, "  {endpoint}")?;
        }
    }
    Ok(())
}
