// src/ics.rs
use std::io::{self, Write};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::config::consts::{CALENDAR_NAME_PREFIX, PRODID};
use crate::core::{event::Event, sanitize::sanitize_stem, ZoneId};

/// Content lines longer than this (in octets, without CRLF) are folded.
const FOLD_AT: usize = 75;

/// One output calendar: a course document or an aggregated series.
#[derive(Clone, Copy, Debug)]
pub struct Calendar<'a> {
    /// Course name or series key; shown as `ASW Schedule <name>`.
    pub name: &'a str,
    pub zone: &'a ZoneId,
    pub events: &'a [Event],
}

impl Calendar<'_> {
    pub fn display_name(&self) -> String {
        join!(CALENDAR_NAME_PREFIX, " ", self.name)
    }

    /// `<stem>-<start>-<index>`; stable for the same input.
    pub fn uid(&self, index: usize, ev: &Event) -> String {
        format!("{}-{}-{index}", sanitize_stem(self.name), local_stamp(ev.start))
    }
}

/* ---------------- Text values ---------------- */

/// RFC 5545 TEXT escaping: `\`, `;`, `,` and line breaks.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') { chars.next(); }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn local_stamp(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

fn utc_stamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/* ---------------- Writing ---------------- */

/// Write one content line, folded at 75 octets without splitting a UTF-8
/// sequence; continuation lines start with a single space.
pub fn write_line<W: Write>(mut w: W, line: &str) -> io::Result<()> {
    let mut rest = line;
    let mut limit = FOLD_AT;
    loop {
        if rest.len() <= limit {
            w.write_all(rest.as_bytes())?;
            return w.write_all(b"\r\n");
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        w.write_all(rest[..cut].as_bytes())?;
        w.write_all(b"\r\n ")?;
        rest = &rest[cut..];
        // the leading space counts towards the next line
        limit = FOLD_AT - 1;
    }
}

/// Whole `VCALENDAR`. `stamp` becomes every event's `DTSTAMP`.
pub fn write_calendar<W: Write>(mut w: W, cal: &Calendar<'_>, stamp: DateTime<Utc>) -> io::Result<()> {
    let tz = cal.zone.as_str();
    let dtstamp = utc_stamp(stamp);

    write_line(&mut w, "BEGIN:VCALENDAR")?;
    write_line(&mut w, "VERSION:2.0")?;
    write_line(&mut w, &join!("PRODID:", PRODID))?;
    write_line(&mut w, "CALSCALE:GREGORIAN")?;
    write_line(&mut w, &join!("X-WR-CALNAME:", &escape_text(&cal.display_name())))?;
    write_line(&mut w, &join!("X-WR-TIMEZONE:", tz))?;

    for (i, ev) in cal.events.iter().enumerate() {
        write_line(&mut w, "BEGIN:VEVENT")?;
        write_line(&mut w, &join!("UID:", &cal.uid(i, ev)))?;
        write_line(&mut w, &join!("DTSTAMP:", &dtstamp))?;
        write_line(&mut w, &format!("DTSTART;TZID={tz}:{}", local_stamp(ev.start)))?;
        write_line(&mut w, &format!("DTEND;TZID={tz}:{}", local_stamp(ev.end)))?;
        write_line(&mut w, &join!("SUMMARY:", &escape_text(&ev.summary)))?;
        if !ev.location.is_empty() {
            write_line(&mut w, &join!("LOCATION:", &escape_text(&ev.location)))?;
        }
        if !ev.description.is_empty() {
            write_line(&mut w, &join!("DESCRIPTION:", &escape_text(&ev.description)))?;
        }
        write_line(&mut w, "END:VEVENT")?;
    }

    write_line(&mut w, "END:VCALENDAR")
}

/// Render to a string (tests, previews).
pub fn to_ics_string(cal: &Calendar<'_>, stamp: DateTime<Utc>) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let _ = write_calendar(&mut buf, cal, stamp);

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
