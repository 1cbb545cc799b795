// tests/schedule_pages.rs
use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use sked_ics::core::ZoneId;
use sked_ics::source::{DocumentSource, FsSource, Location};
use sked_ics::specs::schedule::parse_doc;

const COURSE: &str = "DBWINFO-A04 - 3. Blockphase";

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, d).unwrap().and_hms_opt(h, m, 0).unwrap()
}

/// Two weeks in the layout sked exports: a leading time column, Monday split
/// into two parallel groups, a double session spanning three rows, footnotes and
/// a legend table without dates.
const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>DBWINFO-A04</title></head>
<body>
<h2>DBWINFO-A04 - 3. Blockphase</h2>
<table class="week">
  <thead>
    <tr><td class="h"></td><td class="h" colspan="2">Mo, 08.12.2025</td><td class="h">Di, 09.12.2025</td></tr>
  </thead>
  <tbody>
    <tr>
      <td class="t">08:00</td>
      <td class="v" rowspan="3">08:00-10:30<br>Vorlesung<br>Wirtschaftsinformatik 1<br>H&ouml;rsaal 1 [1]</td>
      <td class="v">08:00-09:00<br>&Uuml;bung<br>Gruppe B<br>Raum 7</td>
      <td class="x"></td>
    </tr>
    <tr>
      <td class="t">09:00</td>
      <td class="x"></td>
      <td class="v">09:00-12:00<br>Reserviert</td>
    </tr>
    <tr>
      <td class="t">10:00</td>
      <td class="v">10:00-11:00<br>Tutorium<br>Gruppe B</td>
      <td class="v">10:00-11:00<br>Seminar<br>Projekt<br><br>NK: Bibliothek<br>Bitte Laptop mitbringen</td>
    </tr>
  </tbody>
</table>
<table class="week">
  <tr><td></td><td>Mo, 15.12.2025</td><td>Di, 16.12.2025</td><td>Mi, 17.12.2025</td></tr>
  <tr><td>08:00</td><td></td><td class="v" colspan="2">09:00-17:00<br>Pr&uuml;fung<br>Klausur WI 1<br>Audimax</td></tr>
  <tr><td>09:00</td><td class="v">25:00-26:00<br>Vorlesung<br>Kaputt</td></tr>
</table>
<table class="legend"><tr><td>[1] Raum&auml;nderung</td></tr></table>
</body>
</html>"#;

#[test]
fn realistic_page() {
    let events = parse_doc(PAGE, COURSE, &ZoneId::default());
    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(
        summaries,
        [
            "Wirtschaftsinformatik 1 (Vorlesung)",
            "Gruppe B (Übung)",
            "Gruppe B (Tutorium)",
            "Projekt (Seminar)",
            "Klausur WI 1 (Prüfung)",
        ]
    );

    assert_eq!(events[0].location, "Hörsaal 1");
    assert_eq!((events[0].start, events[0].end), (at(8, 8, 0), at(8, 10, 30)));

    // column 1 still covered: the Tutorium lands in Monday's second column
    assert_eq!(events[2].date(), NaiveDate::from_ymd_opt(2025, 12, 8).unwrap());
    // and the Seminar on Tuesday
    assert_eq!(events[3].start, at(9, 10, 0));
    assert_eq!(events[3].location, "NK: Bibliothek");
    assert!(events[3].description.ends_with("Location: NK: Bibliothek\nBitte Laptop mitbringen"));

    // colspan 2 starting on Tuesday takes Tuesday's date
    assert_eq!(events[4].start, at(16, 9, 0));
    assert_eq!(events[4].location, "Audimax");
    assert!(events.iter().all(|e| e.course == COURSE && e.start < e.end));
}

#[test]
fn parsing_is_repeatable() {
    let a = parse_doc(PAGE, COURSE, &ZoneId::default());
    let b = parse_doc(PAGE, COURSE, &ZoneId::default());
    assert_eq!(a, b);
}

#[test]
fn custom_zone_is_carried() {
    let zone = ZoneId::new("Europe/Vienna");
    let events = parse_doc(PAGE, COURSE, &zone);
    assert!(events.iter().all(|e| e.zone.as_str() == "Europe/Vienna"));
}

#[test]
fn latin1_snapshot_through_fs_source() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("plan.html");

    let mut bytes = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=iso-8859-1\"></head><body><table><tr><td>Mo, 08.12.2025</td></tr><tr><td class=\"v\">08:00-09:00<br>".to_vec();
    bytes.extend_from_slice(b"\xDCbung<br>Stra\xDFenbau<br>Raum 1</td></tr></table></body></html>");
    fs::write(&path, bytes).unwrap();

    let html_doc = FsSource.load(&Location::File(path)).unwrap();
    let events = parse_doc(&html_doc, COURSE, &ZoneId::default());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].summary, "Straßenbau (Übung)");
}

#[test]
fn page_without_tables() {
    assert!(parse_doc("<html><body><p>Kein Plan</p></body></html>", COURSE, &ZoneId::default()).is_empty());
    assert!(parse_doc("", COURSE, &ZoneId::default()).is_empty());
}
