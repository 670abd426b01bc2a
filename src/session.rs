#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! A line-oriented command session over an [`SgpaEngine`], the terminal
//! equivalent of the calculator form.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use itertools::Itertools;
use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};
use tracing::debug;

use crate::{
    config::CalculatorConfig,
    engine::SgpaEngine,
    grade::effective_mark,
    pdf::PdfRenderer,
    report::{export, format_mark},
};

/// A single user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Change the semester
    Semester(u8),
    /// Define a subject that is not in the catalog yet
    New {
        /// Name of the subject
        name:    String,
        /// Credits, the default if omitted
        credits: Option<u32>,
    },
    /// Add a known subject to the selection
    Select(String),
    /// Remove a subject and its mark
    Remove(String),
    /// Enter a mark, kept as typed
    Mark {
        /// Name of the subject
        name:  String,
        /// Raw mark input
        value: String,
    },
    /// Calculate the SGPA
    Calc,
    /// Export the last calculation as a PDF
    Export(Option<PathBuf>),
    /// Show the selection with marks
    Show,
    /// List subjects that can still be selected
    Available,
    /// Print the command reference
    Help,
    /// End the session
    Quit,
}

peg::parser! {
    /// Grammar for session commands.
    pub grammar command() for str {
        /// optional blanks
        rule ws() = quiet!{[' ' | '\t']*}

        /// at least one blank
        rule sp() = quiet!{[' ' | '\t']+}

        /// matches any sequence of 1 or more digits
        rule number() -> u32
            = n:$(['0'..='9']+) {? n.parse().or(Err("u32")) }

        /// a double-quoted name with backslash escapes
        rule quoted() -> String
            = s:$("\"" ("\\" [_] / [^ '"' | '\\'])* "\"")
            {? snailquote::unescape(s).or(Err("quoted name")) }

        /// a name running to the end of the line
        rule name() -> String
            = quoted()
            / s:$([_]+) {? non_empty(s) }

        /// a name running up to `=`
        rule name_before_eq() -> String
            = q:quoted() ws() { q }
            / s:$((!"=" [_])+) {? non_empty(s) }

        /// a name running up to ` credits <n>`
        rule name_before_credits() -> String
            = q:quoted() ws() { q }
            / s:$((!(sp() "credits" sp() number()) [_])+) {? non_empty(s) }

        /// `semester <n>`
        rule semester() -> Command
            = "semester" sp() n:number() {?
                u8::try_from(n).map(Command::Semester).or(Err("semester"))
            }

        /// `new <name> [credits <n>]`
        rule new() -> Command
            = "new" sp() name:name_before_credits()
              credits:(sp() "credits" sp() n:number() { n })? {
                Command::New { name, credits }
            }

        /// `mark <name> = <value>`
        rule mark() -> Command
            = "mark" sp() name:name_before_eq() "=" ws() v:$([_]*) {
                Command::Mark { name, value: v.trim().to_string() }
            }

        /// `export [path]`
        rule export() -> Command
            = "export" path:(sp() p:$([_]+) { PathBuf::from(p.trim()) })? {
                Command::Export(path.filter(|p| !p.as_os_str().is_empty()))
            }

        /// parses one line of input into a command
        pub rule line() -> Command
            = ws() c:(
                semester()
                / new()
                / "select" sp() n:name() { Command::Select(n) }
                / "remove" sp() n:name() { Command::Remove(n) }
                / mark()
                / "calc" { Command::Calc }
                / export()
                / ("show" / "list") { Command::Show }
                / "available" { Command::Available }
                / ("help" / "?") { Command::Help }
                / ("quit" / "exit") { Command::Quit }
            ) ws() { c }
    }
}

/// Trims a bare name, rejecting names that are only whitespace.
fn non_empty(s: &str) -> std::result::Result<String, &'static str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err("name")
    } else {
        Ok(trimmed.to_string())
    }
}

/// Errors produced while reading session input.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The line is not a known command
    #[error("Could not understand `{line}`, type `help` for a list of commands")]
    UnknownCommand {
        /// The offending input
        line:   String,
        /// Parser error
        #[source]
        source: peg::error::ParseError<peg::str::LineCol>,
    },
}

/// Parses one line of session input.
pub fn parse_command(line: &str) -> std::result::Result<Command, SessionError> {
    command::line(line).map_err(|source| SessionError::UnknownCommand {
        line: line.trim().to_string(),
        source,
    })
}

/// Splits `NAME=VALUE` at the last `=`. Without one, the whole input is the
/// name.
pub fn split_assignment(input: &str) -> (&str, Option<&str>) {
    match input.rsplit_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (input.trim(), None),
    }
}

/// Command reference printed by `help`.
pub const HELP: &str = "\
semester <1-8>               choose the semester
new <name> [credits <n>]     define a new subject
available                    list subjects that can be selected
select <name>                add a subject to the semester
remove <name>                remove a subject and its mark
mark <name> = <marks>        enter marks out of 100
show                         show selected subjects
calc                         calculate the SGPA
export [path]                save the last calculation as a PDF
quit                         leave the session";

/// A selected subject as shown by `show`.
#[derive(Tabled)]
struct SelectionLine {
    /// Subject name
    #[tabled(rename = "Subject")]
    subject: String,
    /// Credits
    #[tabled(rename = "Credits")]
    credits: u32,
    /// Entered marks, blank if none
    #[tabled(rename = "Marks")]
    marks:   String,
}

/// Drives an engine from [`Command`]s.
pub struct Session {
    /// Calculator state
    engine:      SgpaEngine,
    /// Where `export` writes when no path is given
    report_path: PathBuf,
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the message and keep reading
    Continue(String),
    /// Stop reading input
    Quit,
}

impl Session {
    /// Starts a session from configuration.
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            engine:      config.engine(),
            report_path: config.report_path().to_path_buf(),
        }
    }

    /// The engine driven by this session.
    pub fn engine(&self) -> &SgpaEngine {
        &self.engine
    }

    /// Applies a command to the engine.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, "Executing command");
        let message = match command {
            Command::Semester(n) => {
                self.engine.set_semester(n)?;
                format!("Semester {n}")
            }
            Command::New { name, credits } => {
                let credits = credits.unwrap_or(crate::constants::DEFAULT_CREDITS);
                if self.engine.add_known_subject_with_credits(&name, credits) {
                    let credits = self.engine.known_subjects().credits(&name);
                    format!("Added `{name}` ({credits} credits)")
                } else {
                    format!("`{name}` is already known")
                }
            }
            Command::Select(name) => {
                if self.engine.select_subject(&name) {
                    format!("Selected `{name}`")
                } else if self.engine.is_selected(&name) {
                    format!("`{name}` is already selected")
                } else {
                    format!("`{name}` is not a known subject, define it with `new {name}`")
                }
            }
            Command::Remove(name) => {
                if self.engine.remove_subject(&name) {
                    format!("Removed `{name}`")
                } else {
                    format!("`{name}` is not selected")
                }
            }
            Command::Mark { name, value } => {
                if !self.engine.is_selected(&name) {
                    format!("`{name}` is not selected")
                } else {
                    self.engine.set_mark(&name, &value);
                    let mark = effective_mark(self.engine.mark(&name));
                    format!("`{name}`: {}", format_mark(mark))
                }
            }
            Command::Calc => format!("SGPA: {}", self.engine.calculate_sgpa()),
            Command::Export(path) => match self.engine.build_report() {
                Some(report) => {
                    let path = path.unwrap_or_else(|| self.report_path.clone());
                    export(&report, &PdfRenderer::default(), &path)?;
                    format!("Wrote {}", path.display())
                }
                None => String::from("Calculate the SGPA before exporting."),
            },
            Command::Show => self.show(),
            Command::Available => self.engine.available_subjects().map(|s| s.name()).join("\n"),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(message))
    }

    /// Renders the current selection.
    fn show(&self) -> String {
        let lines = self
            .engine
            .selection()
            .iter()
            .map(|name| SelectionLine {
                subject: name.clone(),
                credits: self.engine.known_subjects().credits(name),
                marks:   self.engine.mark(name).map(format_mark).unwrap_or_default(),
            })
            .collect::<Vec<_>>();

        let mut table = Table::new(&lines);
        table
            .with(Panel::header(format!("Semester {}", self.engine.semester())))
            .with(Style::modern());
        if let Some(sgpa) = self.engine.sgpa() {
            table.with(Panel::footer(format!("Last SGPA: {sgpa}")));
        }
        table.to_string()
    }

    /// Reads commands from `input` until it ends or `quit` is entered,
    /// writing responses to `output`. Unknown commands and failed commands
    /// are reported and the session continues.
    pub fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for line in input.lines() {
            let line = line.context("Could not read session input")?;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let message = match parse_command(&line) {
                Ok(command) => match self.execute(command) {
                    Ok(Outcome::Continue(message)) => message,
                    Ok(Outcome::Quit) => break,
                    Err(e) => format!("{e:#}"),
                },
                Err(e) => e.to_string(),
            };
            writeln!(output, "{message}").context("Could not write session output")?;
        }
        output.flush().context("Could not write session output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command_form() {
        assert_eq!(parse_command("semester 3").unwrap(), Command::Semester(3));
        assert_eq!(
            parse_command("new Data Structures credits 4").unwrap(),
            Command::New {
                name:    "Data Structures".into(),
                credits: Some(4),
            }
        );
        assert_eq!(
            parse_command("new Data Structures").unwrap(),
            Command::New {
                name:    "Data Structures".into(),
                credits: None,
            }
        );
        assert_eq!(
            parse_command("  select Engineering Physics  ").unwrap(),
            Command::Select("Engineering Physics".into())
        );
        assert_eq!(
            parse_command(r#"remove "Engineering Physics""#).unwrap(),
            Command::Remove("Engineering Physics".into())
        );
        assert_eq!(
            parse_command("mark Engineering Physics = 72.5").unwrap(),
            Command::Mark {
                name:  "Engineering Physics".into(),
                value: "72.5".into(),
            }
        );
        assert_eq!(
            parse_command(r#"mark "A = B" = 10"#).unwrap(),
            Command::Mark {
                name:  "A = B".into(),
                value: "10".into(),
            }
        );
        assert_eq!(parse_command("calc").unwrap(), Command::Calc);
        assert_eq!(parse_command("export").unwrap(), Command::Export(None));
        assert_eq!(
            parse_command("export out/report.pdf").unwrap(),
            Command::Export(Some(PathBuf::from("out/report.pdf")))
        );
        assert_eq!(parse_command("list").unwrap(), Command::Show);
        assert_eq!(parse_command("available").unwrap(), Command::Available);
        assert_eq!(parse_command("?").unwrap(), Command::Help);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn assignments_split_at_the_last_equals_sign() {
        assert_eq!(split_assignment("Physics = 72"), ("Physics", Some("72")));
        assert_eq!(split_assignment("A=B=3"), ("A=B", Some("3")));
        assert_eq!(split_assignment(" Physics "), ("Physics", None));
        assert_eq!(split_assignment("Physics="), ("Physics", Some("")));
    }

    #[test]
    fn empty_mark_is_kept_for_the_engine() {
        assert_eq!(
            parse_command("mark Engineering Physics =").unwrap(),
            Command::Mark {
                name:  "Engineering Physics".into(),
                value: String::new(),
            }
        );
    }

    #[test]
    fn rejects_unknown_and_incomplete_commands() {
        assert!(parse_command("frobnicate").is_err());
        assert!(parse_command("select").is_err());
        assert!(parse_command("select    ").is_err());
        assert!(parse_command("semester 300").is_err());
        assert!(parse_command("mark = 4").is_err());
    }
}
