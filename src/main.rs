#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # sgpa
//! ## Introduction
//!
//! Calculates a semester grade point average from marks out of 100 and
//! exports the result as a table, JSON or a PDF report.
//!
//! Run `sgpa session` for an interactive session, or pass everything on the
//! command line:
//!
//! ```text
//! sgpa calc -s 1 -m "Engineering Mathematics I=95" -m "Communication Skills=60" -f pdf
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use sgpa::{
    CalculatorConfig, GradePoint, ReportFormat, ReportRenderer,
    report::export,
    session::{Command, Outcome, Session, split_assignment},
};
use tabled::{Table, settings::Style};
use tracing::{Level, metadata::LevelFilter, warn};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Arguments of a one-shot calculation.
#[derive(Debug, Clone)]
struct CalcArgs {
    /// Semester to label the report with
    semester: Option<u8>,
    /// Subjects to define first, as `NAME` or `NAME=CREDITS`
    subjects: Vec<String>,
    /// Marks as `SUBJECT=MARK`; every subject given a mark is selected
    marks:    Vec<String>,
    /// Output format
    format:   ReportFormat,
    /// Output file, stdout for table/json if omitted
    output:   Option<PathBuf>,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Calculate from command-line arguments
    Calc(CalcArgs),
    /// Read commands from stdin
    Session,
    /// List the known subjects
    Subjects,
    /// Print the grade point for a mark
    GradePoint(f64),
}

/// Parsed command line.
#[derive(Debug, Clone)]
struct Options {
    /// Log debug events
    verbose: bool,
    /// Command to run
    cmd:     Cmd,
}

/// Parse the command line arguments and return the `Options`
fn options() -> Options {
    /// parses the semester
    fn semester() -> impl Parser<Option<u8>> {
        short('s')
            .long("semester")
            .help("Semester number (1-8), shown on the report")
            .argument::<u8>("N")
            .optional()
    }

    /// parses subjects to define
    fn subjects() -> impl Parser<Vec<String>> {
        short('n')
            .long("new")
            .help("Define a subject, optionally with credits (default 3)")
            .argument::<String>("NAME[=CREDITS]")
            .many()
    }

    /// parses marks
    fn marks() -> impl Parser<Vec<String>> {
        short('m')
            .long("mark")
            .help("Select a subject and enter its marks out of 100")
            .argument::<String>("SUBJECT=MARK")
            .many()
    }

    /// parses the output format
    fn format() -> impl Parser<ReportFormat> {
        short('f')
            .long("format")
            .help("Report format: table, json or pdf")
            .argument::<ReportFormat>("FORMAT")
            .fallback(ReportFormat::Table)
            .display_fallback()
    }

    /// parses the output path
    fn output() -> impl Parser<Option<PathBuf>> {
        short('o')
            .long("output")
            .help("Where to write the report")
            .argument::<PathBuf>("PATH")
            .optional()
    }

    let semester = semester();
    let subjects = subjects();
    let marks = marks();
    let format = format();
    let output = output();
    let calc = construct!(CalcArgs {
        semester,
        subjects,
        marks,
        format,
        output
    })
    .map(Cmd::Calc)
    .to_options()
    .command("calc")
    .help("Calculate an SGPA from marks given as arguments");

    let session = pure(Cmd::Session)
        .to_options()
        .command("session")
        .help("Start an interactive session reading commands from stdin");

    let subjects = pure(Cmd::Subjects)
        .to_options()
        .command("subjects")
        .help("List the known subjects and their credits");

    let grade_point = positional::<f64>("MARK")
        .help("Marks out of 100")
        .map(Cmd::GradePoint)
        .to_options()
        .command("grade-point")
        .help("Print the grade point earned by a mark");

    let verbose = short('v')
        .long("verbose")
        .help("Print debug logs")
        .switch();
    let cmd = construct!([calc, session, subjects, grade_point]);

    construct!(Options { verbose, cmd })
        .to_options()
        .descr("Semester grade point average calculator")
        .run()
}

/// Turns calculation arguments into session commands, in the order a user
/// of the form would issue them.
fn calc_commands(args: &CalcArgs) -> Vec<Command> {
    let mut commands = vec![];
    if let Some(semester) = args.semester {
        commands.push(Command::Semester(semester));
    }
    for subject in &args.subjects {
        let (name, credits) = split_assignment(subject);
        let credits = credits.and_then(|c| c.parse::<u32>().ok());
        commands.push(Command::New {
            name: name.to_string(),
            credits,
        });
    }
    for mark in &args.marks {
        let (name, value) = split_assignment(mark);
        commands.push(Command::Select(name.to_string()));
        commands.push(Command::Mark {
            name:  name.to_string(),
            value: value.unwrap_or_default().to_string(),
        });
    }
    commands.push(Command::Calc);
    commands
}

/// Where `sgpa calc` writes its report, `None` for stdout. PDF always goes
/// to a file, the configured report path unless `--output` names one.
fn output_path(
    format: ReportFormat,
    output: Option<PathBuf>,
    config: &CalculatorConfig,
) -> Option<PathBuf> {
    match (format, output) {
        (ReportFormat::Pdf, None) => Some(config.report_path().to_path_buf()),
        (_, output) => output,
    }
}

/// Runs `sgpa calc`.
fn calc(config: &CalculatorConfig, args: CalcArgs) -> Result<()> {
    let mut session = Session::new(config);
    for command in calc_commands(&args) {
        if let Outcome::Continue(message) = session.execute(command)? {
            tracing::debug!("{message}");
        }
    }
    for mark in &args.marks {
        let (name, _) = split_assignment(mark);
        if !session.engine().is_selected(name) {
            warn!("`{name}` is not a known subject and was skipped, define it with --new");
        }
    }

    let report = session
        .engine()
        .build_report()
        .context("No SGPA was calculated")?;

    match output_path(args.format, args.output, config) {
        Some(path) => {
            export(&report, args.format.renderer().as_ref(), &path)?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => {
            let bytes = args
                .format
                .renderer()
                .render(&report)
                .context("Something went wrong rendering the report.")?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(io::stderr);
    let filter_layer = LevelFilter::from_level(if opts.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    });
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let config = CalculatorConfig::from_env()?;

    match opts.cmd {
        Cmd::Calc(args) => calc(&config, args)?,
        Cmd::Session => {
            eprintln!("{}", "SGPA Calculator, type `help` for commands".bold());
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            Session::new(&config).run(stdin, stdout)?;
        }
        Cmd::Subjects => {
            println!(
                "{}",
                Table::new(config.catalog().iter())
                    .with(Style::modern())
            );
        }
        Cmd::GradePoint(mark) => println!("{}", GradePoint::from_mark(mark)),
    };

    Ok(())
}
