// src/core/sanitize.rs
use std::sync::LazyLock;

use regex::Regex;

static FOOTNOTE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*\[[0-9]+\])+\s*$").expect("valid footnote regex"));
static NON_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("valid filename regex"));
static DASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("valid dash regex"));

/// Minus sign, en/em dash, hyphen, non-breaking hyphen, figure dash.
const DASH_LIKE: [char; 6] = ['\u{2212}', '\u{2013}', '\u{2014}', '\u{2010}', '\u{2011}', '\u{2012}'];

/// Trim and drop trailing footnote markers: `Raum 204 [1][2]` → `Raum 204`.
pub fn strip_footnotes(line: &str) -> &str {
    let line = line.trim();
    match FOOTNOTE_TAIL.find(line) {
        Some(m) => line[..m.start()].trim_end(),
        None => line,
    }
}

/// Fold every dash-like character to an ASCII hyphen and trim.
pub fn normalize_dashes(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if DASH_LIKE.contains(&c) { '-' } else { c })
        .collect()
}

/// `_`, space and `.` become `-`, then runs of `-` collapse to one.
pub fn hyphenate(s: &str) -> String {
    let s: String = s
        .chars()
        .map(|c| if matches!(c, '_' | ' ' | '.') { '-' } else { c })
        .collect();
    DASH_RUN.replace_all(&s, "-").into_owned()
}

/// File-name and UID stem: every run outside `[A-Za-z0-9_-]` becomes `_`.
pub fn sanitize_stem(name: &str) -> String {
    let out = NON_STEM.replace_all(name, "_").into_owned();
    if out.is_empty() { s!("calendar") } else { out }
}
