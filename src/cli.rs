//! CLI interface for tdv.
//!
//! `tdv session` runs an interactive planning session on stdin: one command
//! per line, total drift reprinted after every accepted change. Input may be
//! piped from a file, so a plan can be replayed.
//!
//! `tdv profiles` and `tdv leg` are one-shot helpers for looking up leeway
//! coefficients and checking a single leg.

mod format;
mod line;

use std::io::{self, BufRead, Write};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use jiff::{SignedDuration, Timestamp};

use crate::config::Config;
use crate::drift;
use crate::leeway::{LeewayError, LeewayTable};
use crate::model::{Leg, LegKind};
use crate::session::{self, Outcome, Session};

use format::{format_profile, format_profiles, format_resolution, format_session, format_total};
use line::Action;

/// tdv — total drift vector for marine search planning.
#[derive(Debug, Parser)]
#[command(name = "tdv", version, after_long_help = SESSION_HELP)]
pub struct Cli {
    /// Log more: `-v` for info, `-vv` for debug. `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

const SESSION_HELP: &str = r"Session example:
  $ tdv session
  subject Overdue sea kayak
  lat 43 35.2 S
  lon 172 48.6 E
  leeway 6
  add current
  from current 1 2026-10-16 06:00
  to current 1 2026-10-16 12:00
  set current 1 direction 045
  set current 1 speed 0.8
  add wind
  from wind 1 2026-10-16 06:00
  to wind 1 2026-10-16 12:00
  set wind 1 direction 220
  set wind 1 speed 18
  show";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive session. Type `help` for the line commands.
    Session,

    /// List the leeway profiles available for selection.
    Profiles,

    /// Resolve a single leg and print its drift.
    Leg {
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Duration in hours. Negative values are accepted.
        #[arg(long, allow_hyphen_values = true)]
        hours: f64,

        /// Degrees. For wind, the direction it blows from.
        #[arg(long, allow_hyphen_values = true)]
        direction: f64,

        /// Knots.
        #[arg(long)]
        speed: f64,

        /// Leeway profile number (wind only). Defaults to the configured profile.
        #[arg(long)]
        leeway: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// CLI-facing leg kind, mapped to the domain `LegKind`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Water movement; direction is where it flows toward.
    Current,
    /// Wind; direction is where it blows from.
    Wind,
}

impl KindArg {
    fn to_domain(self) -> LegKind {
        match self {
            Self::Current => LegKind::Current,
            Self::Wind => LegKind::Wind,
        }
    }
}

/// Errors that end a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Leeway(#[from] LeewayError),

    #[error("there is no leeway profile {0}")]
    NoSuchProfile(usize),

    #[error("{hours} hours is not a usable duration: {source}")]
    Duration { hours: f64, source: jiff::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run a parsed command line.
pub fn run(cli: Cli, config: &Config) -> Result<(), CliError> {
    let table = LeewayTable::resolve(config.leeway_table.as_deref())?;

    match cli.command {
        Command::Session => cmd_session(table, config),
        Command::Profiles => {
            print!("{}", format_profiles(&table, None));
            Ok(())
        }
        Command::Leg {
            kind,
            hours,
            direction,
            speed,
            leeway,
            json,
        } => {
            let number = leeway.or(config.default_leeway);
            cmd_leg(&table, kind.to_domain(), hours, direction, speed, number, json)
        }
    }
}

fn cmd_session(table: LeewayTable, config: &Config) -> Result<(), CliError> {
    let mut session = Session::new(table);

    if let Some(index) = config.default_leeway_index() {
        let (next, outcome) = session.apply(session::Command::SelectLeeway { index });
        session = next;
        if let Outcome::Ignored(reason) = outcome {
            log::warn!("default-leeway in config ignored: {reason}");
        }
    }

    eprintln!("tdv session. Type `help` for commands, `quit` or end of input to finish.");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let session = drive(session, stdin.lock(), &mut stdout, Timestamp::now)?;

    log::info!(
        "session ended with {} current and {} wind legs",
        session.legs(LegKind::Current).len(),
        session.legs(LegKind::Wind).len()
    );
    Ok(())
}

/// Feeds input lines through the session until `quit` or end of input.
///
/// `clock` supplies the wall-clock instant for each line.
fn drive<R, W, C>(
    mut session: Session,
    input: R,
    out: &mut W,
    clock: C,
) -> Result<Session, CliError>
where
    R: BufRead,
    W: Write,
    C: Fn() -> Timestamp,
{
    for line in input.lines() {
        let line = line?;
        let Some(action) = line::interpret(&line, clock()) else {
            continue;
        };

        match action {
            Action::Mutate(command) => {
                let (next, outcome) = session.apply(command);
                session = next;
                match outcome {
                    Outcome::Applied => writeln!(out, "{}", format_total(&session.total()))?,
                    Outcome::Ignored(reason) => writeln!(out, "Ignored: {reason}")?,
                }
            }
            Action::Show => write!(out, "{}", format_session(&session))?,
            Action::Profiles => write!(
                out,
                "{}",
                format_profiles(session.leeway_table(), Some(session.selected_index()))
            )?,
            Action::Json => writeln!(out, "{}", serde_json::to_string_pretty(&session.report())?)?,
            Action::Notice(text) => writeln!(out, "{text}")?,
            Action::Quit => break,
        }
        out.flush()?;
    }
    Ok(session)
}

fn cmd_leg(
    table: &LeewayTable,
    kind: LegKind,
    hours: f64,
    direction: f64,
    speed: f64,
    leeway: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    let profile = match leeway {
        Some(number) => number
            .checked_sub(1)
            .and_then(|index| table.get(index))
            .ok_or(CliError::NoSuchProfile(number))?,
        None => table.first(),
    };

    let span = SignedDuration::try_from_secs_f64(hours * 3600.0)
        .map_err(|source| CliError::Duration { hours, source })?;
    let start = Timestamp::UNIX_EPOCH;
    let end = start
        .checked_add(span)
        .map_err(|source| CliError::Duration { hours, source })?;

    let mut leg = Leg::new(kind, 1, start, end);
    leg.direction = direction;
    leg.speed = speed;
    let resolved = drift::resolve(&leg, profile);

    if json {
        let value = serde_json::json!({
            "kind": kind,
            "leeway": (kind == LegKind::Wind).then_some(profile),
            "resolved": resolved,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", format_resolution(kind, &resolved));
        if kind == LegKind::Wind {
            print!("{}", format_profile(profile));
        }
    }
    Ok(())
}
