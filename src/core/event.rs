// src/core/event.rs
//! Candidate events and the cell → event extractor.
//!
//! Cell lines have positional roles:
//!
//! | line | role            |
//! |------|-----------------|
//! | 0    | time range      |
//! | 1    | session type    |
//! | 2    | module / group  |
//! | 3    | location        |
//! | 4..  | free-text extras|
//!
//! The roles are purely positional. A source that drops a field without leaving
//! a line in its place shifts every later field; that is not corrected here.
use std::{fmt, sync::{Arc, LazyLock}};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::trace;
use regex::Regex;

use crate::config::consts::{ALT_LOCATION_PREFIXES, DEFAULT_TZID, FALLBACK_SUMMARY, RESERVED_MARKER};

static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}:[0-9]{2})\s*-\s*([0-9]{1,2}:[0-9]{2})").expect("valid time range regex")
});

/// Named time zone every event is anchored to. No conversion happens.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ZoneId(Arc<str>);

impl ZoneId {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new(DEFAULT_TZID)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub course: String,
    pub summary: String,
    /// Empty when no location could be determined.
    pub location: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub zone: ZoneId,
}

impl Event {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Two events with equal keys are the same occurrence.
    pub fn identity(&self) -> EventKey<'_> {
        EventKey {
            start: self.start,
            end: self.end,
            summary: &self.summary,
            location: &self.location,
            description: &self.description,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventKey<'a> {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub summary: &'a str,
    pub location: &'a str,
    pub description: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// First `H:MM-H:MM` in `text`. An out-of-range half (hour > 23, minute > 59)
    /// rejects the whole range; nothing wraps or clamps.
    pub fn find(text: &str) -> Option<Self> {
        let caps = TIME_RANGE_RE.captures(text)?;
        let start = parse_clock(&caps[1])?;
        let end = parse_clock(&caps[2])?;
        Some(Self { start, end })
    }
}

/// `9:05` / `09:05` → 09:05. Anything outside 0:00–23:59 is `None`.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let (h, m) = s.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}

/// Positional fields of one cell; blank lines count as absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFields<'a> {
    pub time: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub module: Option<&'a str>,
    pub location: Option<&'a str>,
    pub extras: &'a [String],
}

impl<'a> CellFields<'a> {
    pub fn from_lines(lines: &'a [String]) -> Self {
        let at = |i: usize| lines.get(i).map(String::as_str).filter(|s| !s.is_empty());
        Self {
            time: at(0),
            kind: at(1),
            module: at(2),
            location: at(3),
            extras: lines.get(4..).unwrap_or(&[]),
        }
    }

    /// `Reserviert` in the type slot marks a blocked slot, not a session.
    pub fn is_reserved(&self) -> bool {
        self.kind.is_some_and(|k| k.trim().eq_ignore_ascii_case(RESERVED_MARKER))
    }

    pub fn summary(&self) -> String {
        match (self.module, self.kind) {
            (Some(module), Some(kind)) if !module.to_lowercase().contains(&kind.to_lowercase()) => {
                format!("{module} ({kind})")
            }
            (Some(module), _) => s!(module),
            (None, Some(kind)) => s!(kind),
            (None, None) => s!(FALLBACK_SUMMARY),
        }
    }

    /// The location line, else the first type/module/extra line naming an
    /// external or alternate location (`NK:` / `EXT:`).
    pub fn resolved_location(&self) -> Option<&'a str> {
        if self.location.is_some() {
            return self.location;
        }
        self.kind
            .into_iter()
            .chain(self.module)
            .chain(self.extras.iter().map(String::as_str))
            .find(|l| ALT_LOCATION_PREFIXES.iter().any(|p| l.starts_with(p)))
    }

    pub fn description(&self, course: &str, location: Option<&str>) -> String {
        let mut parts = vec![join!("Course: ", course)];
        if let Some(kind) = self.kind {
            parts.push(join!("Type: ", kind));
        }
        if let Some(module) = self.module {
            parts.push(join!("Module/Group: ", module));
        }
        if let Some(location) = location {
            parts.push(join!("Location: ", location));
        }
        parts.extend(self.extras.iter().filter(|l| !l.is_empty()).cloned());
        parts.join("\n")
    }
}

/// Normalized cell lines + column date → at most one event.
pub fn extract_event(lines: &[String], date: NaiveDate, course: &str, zone: &ZoneId) -> Option<Event> {
    if lines.is_empty() {
        return None;
    }

    let Some(range) = TimeRange::find(&lines.join(" ")) else {
        trace!("{course}: no valid time range in {lines:?}");
        return None;
    };

    let fields = CellFields::from_lines(lines);
    if fields.is_reserved() {
        trace!("{course}: reserved slot on {date}");
        return None;
    }
    if range.end <= range.start {
        trace!("{course}: empty or inverted range {}-{} on {date}", range.start, range.end);
        return None;
    }

    let location = fields.resolved_location();
    Some(Event {
        course: s!(course),
        summary: fields.summary(),
        location: location.map(String::from).unwrap_or_default(),
        description: fields.description(course, location),
        start: date.and_time(range.start),
        end: date.and_time(range.end),
        zone: zone.clone(),
    })
}
