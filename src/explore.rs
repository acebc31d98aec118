//! Interactive date-range loop.
//!
//! Each input line picks a new range and the dashboard is recomputed from the
//! session. Accepted lines:
//!
//! - `START END` (either side may be `-` for the dataset bound)
//! - `START` alone (end defaults to the last date)
//! - an empty line or `reset` for the full span
//! - `quit` / `exit`

use anyhow::Result;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

use crate::filter::DateRange;
use crate::output::{OutputFormat, render};
use crate::parser::parse_date;
use crate::session::DashboardSession;

/// What one input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Quit,
}

fn parse_bound(token: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match token {
        None | Some("-") => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| format!("'{raw}' is not a date (expected YYYY-MM-DD)")),
    }
}

/// Parses an input line; the error is a message meant for the user.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next();

    match first.map(str::to_ascii_lowercase).as_deref() {
        None | Some("reset") => {
            return Ok(Command::Show {
                start: None,
                end: None,
            });
        }
        Some("quit") | Some("exit") => return Ok(Command::Quit),
        _ => {}
    }

    let start = parse_bound(first)?;
    let end = parse_bound(tokens.next())?;
    if tokens.next().is_some() {
        return Err("expected at most two dates: START END".to_string());
    }

    Ok(Command::Show { start, end })
}

/// Runs the loop until `quit` or end of input.
///
/// Invalid input and invalid ranges are reported on `output` and the loop
/// carries on; nothing is rendered for them.
pub fn run<R: BufRead, W: Write>(
    session: &DashboardSession,
    input: R,
    mut output: W,
    format: OutputFormat,
) -> Result<()> {
    let bounds = session.default_range();
    writeln!(
        output,
        "Dates available: {} .. {}. Enter START END (YYYY-MM-DD), 'reset' or 'quit'.",
        bounds.start(),
        bounds.end()
    )?;
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        debug!(input = %line, "Explore command");

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Show { start, end }) => match session.range(start, end) {
                Ok(range) => show(session, range, &mut output, format)?,
                Err(e) => {
                    warn!(error = %e, "Rejected date range");
                    writeln!(output, "Invalid date range: {e}")?;
                }
            },
            Err(message) => writeln!(output, "{message}")?,
        }

        write!(output, "> ")?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(())
}

fn show<W: Write>(
    session: &DashboardSession,
    range: DateRange,
    output: &mut W,
    format: OutputFormat,
) -> Result<()> {
    let view = session.render(range)?;
    writeln!(output, "{}", render(&view, format)?)?;
    Ok(())
}
