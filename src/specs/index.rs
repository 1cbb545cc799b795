// src/specs/index.rs
//! Overview page: anchors pointing at schedule detail pages.
//!
//! A link qualifies when its text looks like a course title
//! (`DBWINFO-A04 - 3. Blockphase`) or its target looks like a block page
//! (`.../blockphase_3.html`). Course names are dash-normalized.
use std::{collections::HashSet, sync::LazyLock};

use log::{debug, trace};
use regex::Regex;
use scraper::Html;

use crate::core::{html::elements_named, sanitize::normalize_dashes};
use crate::source::{resolve_href, Location};

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^DB[A-Z]+[-–]\s*.*(Blockphase|Block)\s*$").expect("valid link title regex")
});

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(block|blockphase).*\.html?$").expect("valid link target regex")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleLink {
    pub course: String,
    pub location: Location,
}

/// Qualifying links in document order, deduplicated by location. Relative
/// targets resolve against `page`, the overview's own location.
pub fn harvest_links(html_doc: &str, page: &Location) -> Vec<ScheduleLink> {
    let doc = Html::parse_document(html_doc);
    let mut links = Vec::new();

    for a in elements_named(&doc, "a") {
        let Some(href) = a.value().attr("href").map(str::trim).filter(|h| !h.is_empty()) else {
            continue;
        };
        let text = a.text().collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if !is_schedule_link(&text, href) {
            continue;
        }
        let course = if text.is_empty() { s!(href) } else { normalize_dashes(&text) };
        trace!("schedule link: {course} -> {href}");
        links.push(ScheduleLink { course, location: resolve_href(href, page) });
    }

    let found = links.len();
    let links = dedup_links(links);
    debug!("overview: {found} matching anchors, {} unique schedules", links.len());
    links
}

pub fn is_schedule_link(text: &str, href: &str) -> bool {
    TITLE_RE.is_match(text) || HREF_RE.is_match(href)
}

/// First occurrence of every location wins.
pub fn dedup_links(links: Vec<ScheduleLink>) -> Vec<ScheduleLink> {
    let mut seen = HashSet::new();
    links.into_iter().filter(|l| seen.insert(l.location.clone())).collect()
}
