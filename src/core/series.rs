// src/core/series.rs
//! Series keys and the cross-document aggregator.
//!
//! Several schedule documents (block phases) of one class are merged into one
//! series. The key comes from the course name through an ordered rule list;
//! the first rule that matches wins.
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::event::Event;
use super::sanitize::{hyphenate, normalize_dashes};
use crate::config::consts::FALLBACK_SERIES_KEY;

struct SeriesRule {
    pattern: Regex,
    build: fn(&Captures<'_>) -> String,
}

impl SeriesRule {
    fn new(pattern: &str, build: fn(&Captures<'_>) -> String) -> Self {
        Self { pattern: Regex::new(pattern).expect("valid series key regex"), build }
    }

    fn apply(&self, s: &str) -> Option<String> {
        self.pattern.captures(s).map(|c| (self.build)(&c))
    }
}

fn program_and_code(c: &Captures<'_>) -> String {
    join!(&c[1], "-", &c[2])
}

fn program_only(c: &Captures<'_>) -> String {
    s!(&c[1])
}

static RULES: LazyLock<[SeriesRule; 3]> = LazyLock::new(|| {
    [
        // letter-coded class: DBWINFO-A04, DBBWL-B03
        SeriesRule::new(r"\b(DB[A-Z]+)-([A-Z][0-9]{2,3})\b", program_and_code),
        // numeric cohort: DBING-01, DBWI-05
        SeriesRule::new(r"\b(DB[A-Z]+)-([0-9]{2})\b", program_and_code),
        // bare program
        SeriesRule::new(r"\b(DB[A-Z]+)\b", program_only),
    ]
});

/// Course name in the form the key rules match against.
pub fn key_form(course: &str) -> String {
    hyphenate(&normalize_dashes(course))
}

pub fn series_key(course: &str) -> String {
    let s = key_form(course);
    RULES
        .iter()
        .find_map(|rule| rule.apply(&s))
        .unwrap_or_else(|| s!(FALLBACK_SERIES_KEY))
}

/// Drop repeated occurrences; the first one wins, order is kept.
pub fn dedup_events(events: Vec<Event>) -> Vec<Event> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(events.len());
        events.iter().map(|e| seen.insert(e.identity())).collect()
    };
    events
        .into_iter()
        .zip(keep)
        .filter_map(|(e, k)| k.then_some(e))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Series {
    pub key: String,
    pub events: Vec<Event>,
}

/// Buckets events by series key. Feed documents in a fixed order: the first
/// occurrence of a duplicate is the one that survives.
#[derive(Clone, Debug, Default)]
pub struct SeriesAggregator {
    buckets: BTreeMap<String, Vec<Event>>,
}

impl SeriesAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one document's events; returns the bucket key used.
    pub fn add<I>(&mut self, course: &str, events: I) -> String
    where
        I: IntoIterator<Item = Event>,
    {
        let key = series_key(course);
        self.buckets.entry(key.clone()).or_default().extend(events);
        key
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Deduplicated series in ascending key order; empty buckets are left out.
    pub fn into_series(self) -> Vec<Series> {
        self.buckets
            .into_iter()
            .filter(|(_, events)| !events.is_empty())
            .map(|(key, events)| Series { key, events: dedup_events(events) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::ZoneId;
    use chrono::NaiveDate;

    fn ev(day: u32, h: u32, summary: &str, course: &str) -> Event {
        let d = NaiveDate::from_ymd_opt(2025, 12, day).unwrap();
        Event {
            course: s!(course),
            summary: s!(summary),
            location: s!("Raum 204"),
            description: join!("Course: ", "DBWINFO-A04"),
            start: d.and_hms_opt(h, 0, 0).unwrap(),
            end: d.and_hms_opt(h + 1, 30, 0).unwrap(),
            zone: ZoneId::default(),
        }
    }

    #[test]
    fn key_rules_in_order() {
        assert_eq!(series_key("DBWINFO-A04 - 3. Blockphase"), "DBWINFO-A04");
        assert_eq!(series_key("DBWINFO-A04-2 - 5. Blockphase"), "DBWINFO-A04");
        assert_eq!(series_key("DBBWL-B103 - 1. Block"), "DBBWL-B103");
        assert_eq!(series_key("DBING-01-2024 - 4. Blockphase"), "DBING-01");
        assert_eq!(series_key("DBMAB_04 2. Block"), "DBMAB-04");
        assert_eq!(series_key("DBWI\u{2013}05 \u{2013} 2. Blockphase"), "DBWI-05");
        assert_eq!(series_key("DBINF - Sonderblock"), "DBINF");
        assert_eq!(series_key("Wahlpflicht 2025"), "Other");
        assert_eq!(series_key(""), "Other");
    }

    #[test]
    fn letter_code_beats_cohort() {
        // both a letter class and a numeric cohort are present
        assert_eq!(series_key("DBWI-05 DBWINFO-A04"), "DBWINFO-A04");
    }

    #[test]
    fn cohort_needs_ascii_digits() {
        assert_eq!(series_key("DBWI-٠٥ - 2. Blockphase"), "DBWI");
        assert_eq!(series_key("DBWINFO-A٠٤ - 3. Blockphase"), "DBWINFO");
    }

    #[test]
    fn key_form_only_for_matching() {
        assert_eq!(key_form(" DBWINFO\u{2014}A04 _ 3. Blockphase "), "DBWINFO-A04-3-Blockphase");
    }

    #[test]
    fn blocks_of_one_class_merge() {
        let mut agg = SeriesAggregator::new();
        let a = "DBWINFO-A04 - 3. Blockphase";
        let b = "DBWINFO-A04-2 - 5. Blockphase";

        assert_eq!(agg.add(a, vec![ev(8, 9, "Mathe 1", a), ev(9, 9, "BWL", a)]), "DBWINFO-A04");
        // second block repeats one session identically
        assert_eq!(agg.add(b, vec![ev(9, 9, "BWL", b), ev(10, 13, "Recht", b)]), "DBWINFO-A04");
        agg.add("DBING-01 - 1. Block", vec![ev(8, 9, "Physik", "DBING-01")]);

        assert_eq!(agg.len(), 2);
        assert_eq!(agg.keys().collect::<Vec<_>>(), vec!["DBING-01", "DBWINFO-A04"]);

        let series = agg.into_series();
        assert_eq!(series[0].key, "DBING-01");
        let merged = &series[1];
        assert_eq!(merged.key, "DBWINFO-A04");
        let summaries: Vec<_> = merged.events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["Mathe 1", "BWL", "Recht"]);
        // first occurrence kept: the duplicate came from block a
        assert_eq!(merged.events[1].course, a);
    }

    #[test]
    fn dedup_compares_all_identity_fields() {
        let base = ev(8, 9, "Mathe 1", "x");
        let mut other_room = base.clone();
        other_room.location = s!("Raum 12");
        let mut other_end = base.clone();
        other_end.end = base.end + chrono::Duration::minutes(15);
        let mut other_course = base.clone();
        other_course.course = s!("y");

        let out = dedup_events(vec![base.clone(), other_room, other_end, other_course, base.clone()]);
        // course is not part of the identity
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn dedup_is_idempotent() {
        let events = vec![
            ev(8, 9, "A", "x"),
            ev(8, 9, "A", "x"),
            ev(8, 11, "B", "x"),
            ev(8, 9, "A", "x"),
            ev(9, 9, "A", "x"),
            ev(8, 11, "B", "x"),
        ];
        let once = dedup_events(events);
        let twice = dedup_events(once.clone());
        let thrice = dedup_events(dedup_events(once.clone()));
        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
        assert_eq!(once, thrice);
    }

    #[test]
    fn empty_buckets_are_not_emitted() {
        let mut agg = SeriesAggregator::new();
        agg.add("DBWINFO-A04", Vec::new());
        assert_eq!(agg.len(), 1);
        assert!(agg.into_series().is_empty());
    }
}
