// benches/schedule.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use sked_ics::{
    core::{series::SeriesAggregator, ZoneId},
    specs::schedule::parse_doc,
};

const WEEKDAYS: [&str; 5] = ["Mo", "Di", "Mi", "Do", "Fr"];

/// `weeks` week tables, five days, two parallel groups per day, 08:00-18:00.
fn synthetic_doc(weeks: usize) -> String {
    let mut doc = String::from("<html><head><meta charset=\"utf-8\"></head><body>");
    for w in 0..weeks {
        doc.push_str("<table><tr><td></td>");
        for (d, wd) in WEEKDAYS.iter().enumerate() {
            let day = 1 + (w * 7 + d) % 28;
            doc.push_str(&format!("<td colspan=\"2\">{wd}, {day:02}.03.2026</td>"));
        }
        doc.push_str("</tr>");

        for h in 8..18 {
            doc.push_str(&format!("<tr><td>{h:02}:00</td>"));
            for d in 0..WEEKDAYS.len() {
                for g in 0..2 {
                    if (h + d + g) % 3 == 0 {
                        doc.push_str(&format!(
                            "<td class=\"v\">{h:02}:00-{h:02}:30<br>Vorlesung<br>Modul {d}{g}<br>Raum {h}{d} [1]</td>"
                        ));
                    } else {
                        doc.push_str("<td></td>");
                    }
                }
            }
            doc.push_str("</tr>");
        }
        doc.push_str("</table>");
    }
    doc.push_str("</body></html>");
    doc
}

fn bench_schedule(c: &mut Criterion) {
    let zone = ZoneId::default();
    let doc = synthetic_doc(12);

    c.bench_function("parse_doc_12_weeks", |b| {
        b.iter(|| {
            let events = parse_doc(black_box(&doc), "DBWINFO-A04 - 3. Blockphase", &zone);
            black_box(events.len())
        })
    });

    let courses = [
        "DBWINFO-A04 - 3. Blockphase",
        "DBWINFO-A04-2 - 5. Blockphase",
        "DBBWL-B103 - 1. Block",
        "DBMAB_04 2. Block",
    ];
    let parsed: Vec<_> = courses.iter().map(|c| (*c, parse_doc(&doc, c, &zone))).collect();

    c.bench_function("aggregate_series", |b| {
        b.iter(|| {
            let mut agg = SeriesAggregator::new();
            for (course, events) in &parsed {
                agg.add(course, events.iter().cloned());
            }
            black_box(agg.into_series().len())
        })
    });
}

criterion_group!(benches, bench_schedule);
criterion_main!(benches);
