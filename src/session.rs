//! Session state: the legs, leeway selection and subject of one planning session.
//!
//! A session is an owned value driven by [`Command`]s. Each command either
//! applies in full or is ignored with a [`Rejection`] that leaves the state
//! exactly as it was. Nothing here fails loudly: a planner mistyping a leg
//! number or a speed should see the previous figures, not an error.
//!
//! Totals are derived on every read. Legs are few and operator-entered, so
//! recomputing over all of them avoids any question of stale partial sums.

use jiff::Timestamp;
use serde::Serialize;

use crate::drift::{self, DriftTotal, Resolution};
use crate::leeway::LeewayTable;
use crate::model::{
    Axis, CoordinateError, LeewayProfile, Leg, LegKind, ScalarField, Subject, TimeEnd, parse_dm,
};

/// A requested change to a session.
///
/// Leg and profile indices are 0-based positions in their collections.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a leg. `at` is the wall-clock instant of the request.
    AddLeg { kind: LegKind, at: Timestamp },

    /// Set a leg's direction or speed from user-entered text.
    SetScalar {
        kind: LegKind,
        index: usize,
        field: ScalarField,
        value: String,
    },

    /// Replace one end of a leg's interval. No ordering check is made.
    SetTime {
        kind: LegKind,
        index: usize,
        end: TimeEnd,
        at: Timestamp,
    },

    /// Select the leeway profile applied to every wind leg.
    SelectLeeway { index: usize },

    SetSubject(String),
    SetLastKnownPosition(String),
    SetLatitude(String),
    SetLongitude(String),
    SetTargetDescription(String),
}

/// What became of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    Ignored(Rejection),
}

/// Why a command was ignored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("there is no {kind} leg {}", index + 1)]
    NoSuchLeg { kind: LegKind, index: usize },

    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("there is no leeway profile {}", index + 1)]
    NoSuchProfile { index: usize },

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

/// One planning session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    table: LeewayTable,
    selected: usize,
    current: Vec<Leg>,
    wind: Vec<Leg>,
    subject: Subject,
}

impl Session {
    /// An empty session with the first profile of `table` selected.
    pub fn new(table: LeewayTable) -> Self {
        Self {
            table,
            selected: 0,
            current: Vec::new(),
            wind: Vec::new(),
            subject: Subject::default(),
        }
    }

    /// Applies a command, returning the next state and what happened.
    ///
    /// When the outcome is [`Outcome::Ignored`] the returned state equals `self`.
    #[must_use]
    pub fn apply(mut self, command: Command) -> (Self, Outcome) {
        log::debug!("applying {command:?}");
        let outcome = match self.update(command) {
            Ok(()) => Outcome::Applied,
            Err(rejection) => {
                log::debug!("ignored: {rejection}");
                Outcome::Ignored(rejection)
            }
        };
        (self, outcome)
    }

    /// Validates fully before writing, so an `Err` leaves `self` untouched.
    fn update(&mut self, command: Command) -> Result<(), Rejection> {
        match command {
            Command::AddLeg { kind, at } => {
                let legs = self.legs_mut(kind);
                // Chain onto the previous leg so intervals run end to start.
                let time_from = legs.last().map_or(at, |prev| prev.time_to);
                let leg = Leg::new(kind, legs.len() + 1, time_from, at);
                legs.push(leg);
            }
            Command::SetScalar {
                kind,
                index,
                field,
                value,
            } => {
                let number = parse_number(&value)?;
                self.leg_mut(kind, index)?.set_scalar(field, number);
            }
            Command::SetTime {
                kind,
                index,
                end,
                at,
            } => {
                self.leg_mut(kind, index)?.set_time(end, at);
            }
            Command::SelectLeeway { index } => {
                if self.table.get(index).is_none() {
                    return Err(Rejection::NoSuchProfile { index });
                }
                self.selected = index;
            }
            Command::SetSubject(name) => self.subject.name = name,
            Command::SetLastKnownPosition(text) => self.subject.last_known_position = text,
            Command::SetLatitude(text) => {
                self.subject.latitude = parse_dm(&text, Axis::Latitude)?;
            }
            Command::SetLongitude(text) => {
                self.subject.longitude = parse_dm(&text, Axis::Longitude)?;
            }
            Command::SetTargetDescription(text) => self.subject.target_description = text,
        }
        Ok(())
    }

    fn legs_mut(&mut self, kind: LegKind) -> &mut Vec<Leg> {
        match kind {
            LegKind::Current => &mut self.current,
            LegKind::Wind => &mut self.wind,
        }
    }

    fn leg_mut(&mut self, kind: LegKind, index: usize) -> Result<&mut Leg, Rejection> {
        self.legs_mut(kind)
            .get_mut(index)
            .ok_or(Rejection::NoSuchLeg { kind, index })
    }

    // ── Reads ──

    pub fn legs(&self, kind: LegKind) -> &[Leg] {
        match kind {
            LegKind::Current => &self.current,
            LegKind::Wind => &self.wind,
        }
    }

    pub fn leeway_table(&self) -> &LeewayTable {
        &self.table
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The profile applied to every wind leg at resolve time.
    pub fn selected_leeway(&self) -> &LeewayProfile {
        // `selected` only ever holds an index the table accepted.
        self.table.get(self.selected).unwrap_or(self.table.first())
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Per-leg resolutions for one collection, in display order.
    pub fn resolutions(&self, kind: LegKind) -> Vec<Resolution> {
        let leeway = self.selected_leeway();
        self.legs(kind)
            .iter()
            .map(|leg| drift::resolve(leg, leeway))
            .collect()
    }

    /// Total drift over every current and wind leg.
    pub fn total(&self) -> DriftTotal {
        drift::accumulate(self.current.iter().chain(&self.wind), self.selected_leeway())
    }

    /// A serializable snapshot of the session and its derived figures.
    pub fn report(&self) -> Report<'_> {
        Report {
            subject: &self.subject,
            leeway: self.selected_leeway(),
            current: self.leg_reports(LegKind::Current),
            wind: self.leg_reports(LegKind::Wind),
            total: self.total(),
        }
    }

    fn leg_reports(&self, kind: LegKind) -> Vec<LegReport<'_>> {
        self.legs(kind)
            .iter()
            .zip(self.resolutions(kind))
            .map(|(leg, resolved)| LegReport { leg, resolved })
            .collect()
    }
}

/// Parses user-entered numeric text. Only finite values are accepted.
fn parse_number(text: &str) -> Result<f64, Rejection> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Rejection::NotNumeric(text.to_string()))
}

/// Snapshot of a session for display or export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub subject: &'a Subject,
    pub leeway: &'a LeewayProfile,
    pub current: Vec<LegReport<'a>>,
    pub wind: Vec<LegReport<'a>>,
    pub total: DriftTotal,
}

/// A leg alongside its resolution under the selected profile.
#[derive(Debug, Serialize)]
pub struct LegReport<'a> {
    pub leg: &'a Leg,
    pub resolved: Resolution,
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::leeway::tests::sample_table;

    const T0: i64 = 1_700_000_000;

    fn at(hours: i64) -> Timestamp {
        Timestamp::from_second(T0 + hours * 3600).unwrap()
    }

    fn run(session: Session, commands: impl IntoIterator<Item = Command>) -> Session {
        commands.into_iter().fold(session, |s, c| {
            let (s, outcome) = s.apply(c);
            assert_eq!(outcome, Outcome::Applied);
            s
        })
    }

    fn set(kind: LegKind, index: usize, field: ScalarField, value: &str) -> Command {
        Command::SetScalar {
            kind,
            index,
            field,
            value: value.into(),
        }
    }

    /// One current leg: 2 h at 10 kn toward 090.
    fn with_current_leg() -> Session {
        run(
            Session::new(sample_table()),
            [
                Command::AddLeg {
                    kind: LegKind::Current,
                    at: at(0),
                },
                Command::SetTime {
                    kind: LegKind::Current,
                    index: 0,
                    end: TimeEnd::To,
                    at: at(2),
                },
                set(LegKind::Current, 0, ScalarField::Direction, "90"),
                set(LegKind::Current, 0, ScalarField::Speed, "10"),
            ],
        )
    }

    #[test]
    fn new_session_is_empty_with_first_profile() {
        let session = Session::new(sample_table());

        assert!(session.legs(LegKind::Current).is_empty());
        assert!(session.legs(LegKind::Wind).is_empty());
        assert_eq!(session.selected_index(), 0);
        assert_eq!(session.selected_leeway().description, "Plain");
        assert_eq!(session.total().distance, 0.0);
        assert_eq!(session.total().bearing, 0.0);
    }

    #[test]
    fn first_leg_starts_and_ends_now() {
        let session = run(
            Session::new(sample_table()),
            [Command::AddLeg {
                kind: LegKind::Wind,
                at: at(5),
            }],
        );

        let leg = &session.legs(LegKind::Wind)[0];
        assert_eq!(leg.index, 1);
        assert_eq!(leg.time_from, at(5));
        assert_eq!(leg.time_to, at(5));
        assert_eq!(leg.direction, 0.0);
        assert_eq!(leg.speed, 0.0);
    }

    #[test]
    fn appended_leg_chains_from_previous_end() {
        let session = run(
            with_current_leg(),
            [Command::AddLeg {
                kind: LegKind::Current,
                at: at(7),
            }],
        );

        let legs = session.legs(LegKind::Current);
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[1].index, 2);
        assert_eq!(legs[1].time_from, at(2));
        assert_eq!(legs[1].time_to, at(7));
    }

    #[test]
    fn chaining_is_per_collection() {
        let session = run(
            with_current_leg(),
            [Command::AddLeg {
                kind: LegKind::Wind,
                at: at(9),
            }],
        );

        let wind = &session.legs(LegKind::Wind)[0];
        assert_eq!(wind.index, 1);
        assert_eq!(wind.time_from, at(9));
    }

    #[test]
    fn total_follows_edits() {
        let session = with_current_leg();

        let total = session.total();
        assert_relative_eq!(total.distance, 20.0, epsilon = 1e-9);
        assert_relative_eq!(total.bearing, 90.0, epsilon = 1e-9);

        let resolved = session.resolutions(LegKind::Current);
        assert_relative_eq!(resolved[0].distance, 20.0);
        assert_relative_eq!(resolved[0].direction, 90.0);
    }

    #[test]
    fn scalar_values_accept_decimals_and_whitespace() {
        let session = run(
            with_current_leg(),
            [set(LegKind::Current, 0, ScalarField::Speed, " 2.75 ")],
        );
        assert_relative_eq!(session.legs(LegKind::Current)[0].speed, 2.75);
    }

    #[test]
    fn out_of_range_leg_edit_is_ignored() {
        let before = with_current_leg();

        let (after, outcome) = before
            .clone()
            .apply(set(LegKind::Current, 1, ScalarField::Speed, "5"));
        assert_eq!(
            outcome,
            Outcome::Ignored(Rejection::NoSuchLeg {
                kind: LegKind::Current,
                index: 1
            })
        );
        assert_eq!(after, before);

        let (after, outcome) = before.clone().apply(Command::SetTime {
            kind: LegKind::Wind,
            index: 0,
            end: TimeEnd::From,
            at: at(1),
        });
        assert!(matches!(outcome, Outcome::Ignored(_)));
        assert_eq!(after, before);
    }

    #[test]
    fn non_numeric_value_is_ignored() {
        let before = with_current_leg();

        for text in ["fast", "", "12kn", "NaN", "inf"] {
            let (after, outcome) = before
                .clone()
                .apply(set(LegKind::Current, 0, ScalarField::Direction, text));
            assert!(
                matches!(outcome, Outcome::Ignored(Rejection::NotNumeric(_))),
                "{text:?} should be rejected"
            );
            assert_eq!(after, before);
        }
    }

    #[test]
    fn inverted_interval_is_kept() {
        let session = run(
            with_current_leg(),
            [Command::SetTime {
                kind: LegKind::Current,
                index: 0,
                end: TimeEnd::From,
                at: at(4),
            }],
        );

        let resolved = session.resolutions(LegKind::Current);
        assert_relative_eq!(resolved[0].hours, -2.0);
        assert_relative_eq!(resolved[0].distance, -20.0);
        // A negative distance toward 090 is a displacement toward 270.
        assert_relative_eq!(session.total().bearing, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn wind_leg_uses_selected_profile() {
        let session = run(
            Session::new(sample_table()),
            [
                Command::SelectLeeway { index: 1 },
                Command::AddLeg {
                    kind: LegKind::Wind,
                    at: at(0),
                },
                Command::SetTime {
                    kind: LegKind::Wind,
                    index: 0,
                    end: TimeEnd::To,
                    at: at(1),
                },
                set(LegKind::Wind, 0, ScalarField::Speed, "10"),
            ],
        );

        let resolved = session.resolutions(LegKind::Wind);
        assert_relative_eq!(resolved[0].speed, 13.0, epsilon = 1e-12);
        assert_relative_eq!(resolved[0].direction, 180.0);
        assert_relative_eq!(session.total().bearing, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn reselecting_profile_updates_existing_wind_legs() {
        let session = run(
            Session::new(sample_table()),
            [
                Command::AddLeg {
                    kind: LegKind::Wind,
                    at: at(0),
                },
                Command::SetTime {
                    kind: LegKind::Wind,
                    index: 0,
                    end: TimeEnd::To,
                    at: at(2),
                },
                set(LegKind::Wind, 0, ScalarField::Speed, "20"),
                set(LegKind::Wind, 0, ScalarField::Direction, "270"),
            ],
        );
        assert_relative_eq!(session.total().distance, 40.0, epsilon = 1e-9);

        let session = run(session, [Command::SelectLeeway { index: 2 }]);

        assert_eq!(session.selected_leeway().description, "Tenth");
        assert_relative_eq!(session.resolutions(LegKind::Wind)[0].speed, 2.0, epsilon = 1e-12);
        assert_relative_eq!(session.total().distance, 4.0, epsilon = 1e-9);
        assert_relative_eq!(session.total().bearing, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn unknown_profile_is_ignored() {
        let before = Session::new(sample_table());
        let (after, outcome) = before.clone().apply(Command::SelectLeeway { index: 3 });

        assert_eq!(
            outcome,
            Outcome::Ignored(Rejection::NoSuchProfile { index: 3 })
        );
        assert_eq!(after, before);
    }

    #[test]
    fn opposite_current_legs_cancel() {
        let session = run(
            with_current_leg(),
            [
                Command::AddLeg {
                    kind: LegKind::Current,
                    at: at(4),
                },
                set(LegKind::Current, 1, ScalarField::Direction, "270"),
                set(LegKind::Current, 1, ScalarField::Speed, "10"),
            ],
        );
        assert_abs_diff_eq!(session.total().distance, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn subject_fields_are_stored() {
        let session = run(
            Session::new(sample_table()),
            [
                Command::SetSubject("Overdue kayaker".into()),
                Command::SetLastKnownPosition("Off Godley Head".into()),
                Command::SetLatitude("43 35.2 S".into()),
                Command::SetLongitude("172 48.6 E".into()),
                Command::SetTargetDescription("Yellow sea kayak".into()),
            ],
        );

        let subject = session.subject();
        assert_eq!(subject.name, "Overdue kayaker");
        assert_eq!(subject.last_known_position, "Off Godley Head");
        assert_relative_eq!(subject.latitude, -(43.0 + 35.2 / 60.0), epsilon = 1e-9);
        assert_relative_eq!(subject.longitude, 172.0 + 48.6 / 60.0, epsilon = 1e-9);
        assert_eq!(subject.target_description, "Yellow sea kayak");
    }

    #[test]
    fn bad_coordinate_is_ignored() {
        let before = run(
            Session::new(sample_table()),
            [Command::SetLatitude("10 00 N".into())],
        );
        let (after, outcome) = before.clone().apply(Command::SetLatitude("95 00 N".into()));

        assert!(matches!(
            outcome,
            Outcome::Ignored(Rejection::Coordinate(CoordinateError::OutOfRange { .. }))
        ));
        assert_eq!(after, before);
    }

    #[test]
    fn report_pairs_legs_with_resolutions() {
        let session = with_current_leg();
        let report = session.report();

        assert_eq!(report.current.len(), 1);
        assert!(report.wind.is_empty());
        assert_eq!(report.current[0].leg.index, 1);
        assert_relative_eq!(report.current[0].resolved.distance, 20.0);
        assert_eq!(report.leeway.description, "Plain");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["current"][0]["leg"]["kind"], "current");
        assert!(json["total"]["distance"].as_f64().is_some());
    }
}
