//! Output formatting for CLI display.

use std::fmt::Write;

use jiff::{Timestamp, tz::TimeZone};

use crate::drift::{DriftTotal, Resolution};
use crate::leeway::LeewayTable;
use crate::model::{Axis, LeewayProfile, Leg, LegKind, Subject, format_dm};
use crate::session::Session;

/// One-line summary of total drift.
pub(super) fn format_total(total: &DriftTotal) -> String {
    format!(
        "Total drift: {:.2} NM bearing {:05.1}°",
        total.distance, total.bearing
    )
}

/// The full session view: subject, leeway, both leg tables, total.
pub(super) fn format_session(session: &Session) -> String {
    let mut out = String::new();
    out.push_str(&format_subject(session.subject()));
    out.push('\n');

    let _ = writeln!(out, "Leeway:");
    out.push_str(&format_profile(session.selected_leeway()));
    out.push('\n');

    for kind in [LegKind::Current, LegKind::Wind] {
        let heading = match kind {
            LegKind::Current => "Current legs:",
            LegKind::Wind => "Wind legs:",
        };
        let _ = writeln!(out, "{heading}");
        out.push_str(&format_legs(session.legs(kind), &session.resolutions(kind)));
        out.push('\n');
    }

    out.push_str(&format_total(&session.total()));
    out.push('\n');
    out
}

pub(super) fn format_subject(subject: &Subject) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Subject:             {}", or_dash(&subject.name));
    let _ = writeln!(
        out,
        "Last known position: {}",
        or_dash(&subject.last_known_position)
    );
    let _ = writeln!(
        out,
        "LKP:                 {}  {}",
        format_dm(subject.latitude, Axis::Latitude),
        format_dm(subject.longitude, Axis::Longitude)
    );
    let _ = writeln!(
        out,
        "Target:              {}",
        or_dash(&subject.target_description)
    );
    out
}

pub(super) fn format_profile(profile: &LeewayProfile) -> String {
    format!(
        "  {}\n  multiplier {}  modifier {} kn  divergence {}°\n",
        profile.description, profile.multiplier, profile.modifier, profile.divergence
    )
}

/// Numbered list of the table, marking the selected profile when given.
pub(super) fn format_profiles(table: &LeewayTable, selected: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "     {:>4}  {:>10}  {:>8}  {:>10}  Description",
        "#", "Multiplier", "Modifier", "Divergence"
    );
    for (i, profile) in table.iter().enumerate() {
        let marker = if selected == Some(i) { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "  {marker}  {:>4}  {:>10}  {:>8}  {:>10}  {}",
            i + 1,
            profile.multiplier,
            profile.modifier,
            profile.divergence,
            profile.description
        );
    }
    out
}

/// Table of legs with their per-leg interval, vector direction and distance.
pub(super) fn format_legs(legs: &[Leg], resolutions: &[Resolution]) -> String {
    if legs.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>3}  {:<19}  {:<19}  {:>7}  {:>6}  {:>7}  {:>7}  {:>8}",
        "#", "From", "To", "Dir °", "Kn", "Hours", "Vec °", "NM"
    );
    for (leg, r) in legs.iter().zip(resolutions) {
        let _ = writeln!(
            out,
            "  {:>3}  {:<19}  {:<19}  {:>7.1}  {:>6.2}  {:>7.2}  {:>7.1}  {:>8.2}",
            leg.index,
            format_time(leg.time_from),
            format_time(leg.time_to),
            leg.direction,
            r.speed,
            r.hours,
            r.direction,
            r.distance
        );
    }
    out
}

/// A single resolved leg, for the one-shot `leg` command.
pub(super) fn format_resolution(kind: LegKind, r: &Resolution) -> String {
    format!(
        "{kind} leg: {:.2} h at {:.2} kn toward {:05.1}° = {:.2} NM ({:+.2} E, {:+.2} N)",
        r.hours, r.speed, r.direction, r.distance, r.east, r.north
    )
}

fn format_time(at: Timestamp) -> String {
    at.to_zoned(TimeZone::system())
        .strftime("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}
