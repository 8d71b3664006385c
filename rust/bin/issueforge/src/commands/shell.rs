//! Interactive single-screen board.
//!
//! Redraws the filtered table after every command. Failures are printed as
//! an error line and never leave the loop.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use colored::Colorize;

use issueforge_client::{Board, IssueApi, StatusFilter};

use super::{issues, report_error, FormArgs, Prompt};
use crate::table;

const HELP: &str = "\
Commands:
  status <All|New|In Progress|Fixed|Closed>   filter by status
  owner [text]                                filter by owner (empty clears)
  clear                                       clear both filters
  add                                         create an issue
  edit <id>                                   edit an issue (id prefix is fine)
  delete <id>                                 delete an issue
  refresh                                     reload from the server
  help                                        show this help
  quit                                        leave";

enum Flow {
    Redraw,
    Stay,
    Quit,
}

/// Run the shell until `quit` or end of input.
pub fn run<A: IssueApi, R: BufRead, W: Write>(
    board: &mut Board<A>,
    prompt: &mut Prompt<R, W>,
    color: bool,
) -> Result<()> {
    if let Err(e) = reload(board, prompt.output()) {
        report_error(prompt.output(), &e)?;
    }
    draw(board, prompt.output(), color)?;

    loop {
        let Some(line) = prompt.line("issueforge> ")? else {
            writeln!(prompt.output())?;
            return Ok(());
        };

        match handle(board, prompt, line.trim()) {
            Ok(Flow::Quit) => return Ok(()),
            Ok(Flow::Stay) => {}
            Ok(Flow::Redraw) => draw(board, prompt.output(), color)?,
            Err(e) => report_error(prompt.output(), &e)?,
        }
    }
}

/// Refetch the list, announcing the request while it is in flight.
fn reload<A: IssueApi>(board: &mut Board<A>, out: &mut impl Write) -> Result<()> {
    let mut announced = Ok(());
    let fetched = board.refresh_with(|b| {
        if b.is_loading() {
            announced = writeln!(out, "Loading issues...").and_then(|_| out.flush());
        }
    });
    announced?;
    fetched.map_err(|e| anyhow!("Failed to load issues: {e}"))
}

fn draw<A: IssueApi>(board: &Board<A>, out: &mut impl Write, color: bool) -> Result<()> {
    let filter = match (board.status_filter(), board.owner_filter()) {
        (StatusFilter::All, "") => String::new(),
        (status, owner) => format!("  [status: {status}, owner: {owner:?}]"),
    };
    writeln!(out)?;
    writeln!(out, "{}", table::render(&board.visible(), color))?;
    let summary = board.summary();
    if color {
        writeln!(out, "{}{}", summary.bold(), filter)?;
    } else {
        writeln!(out, "{summary}{filter}")?;
    }
    Ok(())
}

fn handle<A: IssueApi, R: BufRead, W: Write>(
    board: &mut Board<A>,
    prompt: &mut Prompt<R, W>,
    line: &str,
) -> Result<Flow> {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };

    let mut msg = Vec::new();
    let flow = match cmd.to_ascii_lowercase().as_str() {
        "" => Flow::Stay,
        "q" | "quit" | "exit" => Flow::Quit,
        "help" | "?" => {
            writeln!(prompt.output(), "{HELP}")?;
            Flow::Stay
        }
        "refresh" => {
            reload(board, prompt.output())?;
            Flow::Redraw
        }
        "status" => {
            let filter = StatusFilter::parse(arg)
                .ok_or_else(|| anyhow!("unknown status {arg:?}"))?;
            board.set_status_filter(filter);
            Flow::Redraw
        }
        "owner" => {
            board.set_owner_filter(arg);
            Flow::Redraw
        }
        "clear" => {
            board.clear_filters();
            Flow::Redraw
        }
        "add" => {
            issues::add(board, FormArgs::default(), prompt, &mut msg)?;
            Flow::Redraw
        }
        "edit" => {
            issues::edit(board, arg, FormArgs::default(), prompt, &mut msg)?;
            Flow::Redraw
        }
        "delete" | "rm" => {
            issues::delete(board, arg, false, prompt, &mut msg)?;
            Flow::Redraw
        }
        other => return Err(anyhow!("unknown command {other:?}; type `help`")),
    };

    prompt.output().write_all(&msg)?;
    Ok(flow)
}
