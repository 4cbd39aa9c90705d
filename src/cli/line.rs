//! The interactive session grammar: one input line, one command.
//!
//! Lines are split on whitespace and parsed with clap in multicall mode,
//! so the first word names the command. Free-text fields and times take
//! the rest of the line. Leg and profile numbers are typed from 1.

use clap::{Parser, Subcommand};
use jiff::{Timestamp, civil, tz::TimeZone};

use crate::model::{ScalarField, TimeEnd};
use crate::session::Command;

use super::KindArg;

/// What the session loop should do with one line.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Action {
    Mutate(Command),
    Show,
    Profiles,
    Json,
    Quit,
    /// Text for the user: help, or why the line was not understood.
    Notice(String),
}

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct Line {
    #[command(subcommand)]
    command: LineCommand,
}

#[derive(Debug, Subcommand)]
enum LineCommand {
    /// Append a leg. It starts where the previous leg of that kind ended.
    Add { kind: KindArg },

    /// Set a leg's direction (degrees) or speed (knots).
    Set {
        kind: KindArg,
        /// Leg number, from 1.
        leg: usize,
        /// `direction` or `speed`.
        field: ScalarField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Set when a leg starts: `now`, `2026-10-16T01:45:00Z` or `2026-10-16 13:45`.
    From {
        kind: KindArg,
        leg: usize,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        time: Vec<String>,
    },

    /// Set when a leg ends.
    To {
        kind: KindArg,
        leg: usize,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        time: Vec<String>,
    },

    /// Select the leeway profile applied to all wind legs.
    Leeway {
        /// Profile number as listed by `profiles`.
        number: usize,
    },

    /// What is being searched for.
    Subject {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Describe the last known position.
    Lkp {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Last known latitude, e.g. `43 30.5 S`.
    Lat {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Last known longitude, e.g. `172 37.2 E`.
    Lon {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Describe the search target.
    Target {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Print the legs, selected profile and total drift.
    Show,

    /// List the leeway profiles.
    Profiles,

    /// Print the session as JSON.
    Json,

    /// End the session.
    #[command(alias = "exit")]
    Quit,
}

/// Why a time could not be read.
#[derive(Debug, thiserror::Error)]
pub(super) enum TimeParseError {
    #[error(
        "cannot read '{0}' as a time: use now, an instant like 2026-10-16T01:45:00Z, \
         or a local time like 2026-10-16 13:45"
    )]
    Unrecognized(String),

    #[error("'{text}' does not exist in the local time zone: {source}")]
    Zone { text: String, source: jiff::Error },
}

/// Interprets one line. Blank lines and `#` comments yield `None`.
pub(super) fn interpret(line: &str, now: Timestamp) -> Option<Action> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let parsed = match Line::try_parse_from(line.split_whitespace()) {
        Ok(parsed) => parsed,
        // Help requests and usage errors alike are shown as-is.
        Err(e) => return Some(Action::Notice(e.to_string().trim_end().to_string())),
    };

    Some(match parsed.command {
        LineCommand::Add { kind } => Action::Mutate(Command::AddLeg {
            kind: kind.to_domain(),
            at: now,
        }),
        LineCommand::Set {
            kind,
            leg,
            field,
            value,
        } => match position(leg) {
            Some(index) => Action::Mutate(Command::SetScalar {
                kind: kind.to_domain(),
                index,
                field,
                value,
            }),
            None => numbered_from_one(),
        },
        LineCommand::From { kind, leg, time } => set_time(kind, leg, TimeEnd::From, &time, now),
        LineCommand::To { kind, leg, time } => set_time(kind, leg, TimeEnd::To, &time, now),
        LineCommand::Leeway { number } => match position(number) {
            Some(index) => Action::Mutate(Command::SelectLeeway { index }),
            None => numbered_from_one(),
        },
        LineCommand::Subject { text } => Action::Mutate(Command::SetSubject(text.join(" "))),
        LineCommand::Lkp { text } => Action::Mutate(Command::SetLastKnownPosition(text.join(" "))),
        LineCommand::Lat { text } => Action::Mutate(Command::SetLatitude(text.join(" "))),
        LineCommand::Lon { text } => Action::Mutate(Command::SetLongitude(text.join(" "))),
        LineCommand::Target { text } => {
            Action::Mutate(Command::SetTargetDescription(text.join(" ")))
        }
        LineCommand::Show => Action::Show,
        LineCommand::Profiles => Action::Profiles,
        LineCommand::Json => Action::Json,
        LineCommand::Quit => Action::Quit,
    })
}

fn set_time(kind: KindArg, leg: usize, end: TimeEnd, words: &[String], now: Timestamp) -> Action {
    let Some(index) = position(leg) else {
        return numbered_from_one();
    };
    match parse_time(&words.join(" "), now) {
        Ok(at) => Action::Mutate(Command::SetTime {
            kind: kind.to_domain(),
            index,
            end,
            at,
        }),
        Err(e) => Action::Notice(e.to_string()),
    }
}

/// Converts a number typed from 1 into a 0-based position.
fn position(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

fn numbered_from_one() -> Action {
    Action::Notice("numbering starts at 1".to_string())
}

/// Reads `now`, an RFC 3339 instant, or a civil date-time in the system time zone.
pub(super) fn parse_time(text: &str, now: Timestamp) -> Result<Timestamp, TimeParseError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("now") {
        return Ok(now);
    }
    if let Ok(at) = text.parse::<Timestamp>() {
        return Ok(at);
    }
    let civil: civil::DateTime = text
        .parse()
        .map_err(|_| TimeParseError::Unrecognized(text.to_string()))?;
    let zoned = civil
        .to_zoned(TimeZone::system())
        .map_err(|source| TimeParseError::Zone {
            text: text.to_string(),
            source,
        })?;
    Ok(zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::LegKind;

    fn now() -> Timestamp {
        Timestamp::from_second(1_760_000_000).unwrap()
    }

    fn mutate(line: &str) -> Command {
        match interpret(line, now()) {
            Some(Action::Mutate(command)) => command,
            other => panic!("expected a mutation for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(interpret("", now()), None);
        assert_eq!(interpret("   ", now()), None);
        assert_eq!(interpret("# wind from the sou'west", now()), None);
    }

    #[test]
    fn add_uses_now() {
        assert_eq!(
            mutate("add wind"),
            Command::AddLeg {
                kind: LegKind::Wind,
                at: now()
            }
        );
    }

    #[test]
    fn set_converts_leg_number() {
        assert_eq!(
            mutate("set current 2 direction -45"),
            Command::SetScalar {
                kind: LegKind::Current,
                index: 1,
                field: ScalarField::Direction,
                value: "-45".into(),
            }
        );
    }

    #[test]
    fn unknown_field_is_not_a_command() {
        assert!(matches!(
            interpret("set current 1 index 4", now()),
            Some(Action::Notice(_))
        ));
        assert!(matches!(
            interpret("set wind 1 __proto__ 4", now()),
            Some(Action::Notice(_))
        ));
    }

    #[test]
    fn non_numeric_value_reaches_the_session() {
        // The session owns numeric validation; the grammar passes text through.
        assert!(matches!(
            mutate("set wind 1 speed brisk"),
            Command::SetScalar { value, .. } if value == "brisk"
        ));
    }

    #[test]
    fn leg_zero_is_refused() {
        assert_eq!(
            interpret("set current 0 speed 3", now()),
            Some(numbered_from_one())
        );
        assert_eq!(interpret("leeway 0", now()), Some(numbered_from_one()));
    }

    #[test]
    fn times_take_the_rest_of_the_line() {
        assert_eq!(
            mutate("to current 1 2026-10-16T01:45:00Z"),
            Command::SetTime {
                kind: LegKind::Current,
                index: 0,
                end: TimeEnd::To,
                at: "2026-10-16T01:45:00Z".parse().unwrap(),
            }
        );
        assert!(matches!(
            mutate("from wind 3 now"),
            Command::SetTime { index: 2, end: TimeEnd::From, at, .. } if at == now()
        ));
    }

    #[test]
    fn unreadable_time_is_a_notice() {
        assert!(matches!(
            interpret("from current 1 yesterday", now()),
            Some(Action::Notice(text)) if text.contains("yesterday")
        ));
    }

    #[test]
    fn free_text_is_joined() {
        assert_eq!(
            mutate("subject Overdue  sea kayak"),
            Command::SetSubject("Overdue sea kayak".into())
        );
        assert_eq!(
            mutate("lat -43 30.5"),
            Command::SetLatitude("-43 30.5".into())
        );
        assert_eq!(mutate("target"), Command::SetTargetDescription(String::new()));
    }

    #[test]
    fn views_and_quit() {
        assert_eq!(interpret("show", now()), Some(Action::Show));
        assert_eq!(interpret("profiles", now()), Some(Action::Profiles));
        assert_eq!(interpret("json", now()), Some(Action::Json));
        assert_eq!(interpret("quit", now()), Some(Action::Quit));
        assert_eq!(interpret("exit", now()), Some(Action::Quit));
    }

    #[test]
    fn help_and_typos_are_notices() {
        assert!(matches!(interpret("help", now()), Some(Action::Notice(_))));
        assert!(matches!(interpret("ad wind", now()), Some(Action::Notice(_))));
        assert!(matches!(interpret("add tide", now()), Some(Action::Notice(_))));
    }

    #[test]
    fn parse_time_forms() {
        assert_eq!(parse_time("NOW", now()).unwrap(), now());
        assert_eq!(
            parse_time("2026-10-16T13:45:00+13:00", now()).unwrap(),
            "2026-10-16T00:45:00Z".parse::<Timestamp>().unwrap()
        );

        let local = parse_time("2026-10-16 13:45", now()).unwrap();
        let expected = "2026-10-16T13:45"
            .parse::<civil::DateTime>()
            .unwrap()
            .to_zoned(TimeZone::system())
            .unwrap()
            .timestamp();
        assert_eq!(local, expected);

        assert!(matches!(
            parse_time("16/10/2026", now()),
            Err(TimeParseError::Unrecognized(_))
        ));
    }
}
