// src/specs/schedule.rs
//! Schedule detail page (sked campus export).
//!
//! Every week is a standalone `<table>`. Row 0 holds the day headers
//! (`Mo, 08.12.2025`, possibly spanning several columns); body rows hold time
//! labels, fillers and `td.v` event cells, merged with `rowspan`/`colspan`.
use std::time::Instant;

use log::{debug, trace};
use scraper::Html;

use crate::core::{
    cell_text::lines_from_markup,
    dates::ColumnDates,
    event::{extract_event, Event, ZoneId},
    grid::Occupancy,
    html::read_tables,
    table::Table,
};

/// All events of one schedule document, in table/row/cell order.
pub fn parse_doc(html_doc: &str, course: &str, zone: &ZoneId) -> Vec<Event> {
    let t = Instant::now();
    let doc = Html::parse_document(html_doc);
    let tables = read_tables(&doc);

    let events: Vec<Event> = tables
        .iter()
        .flat_map(|table| parse_week_table(table, course, zone))
        .collect();

    debug!("{course}: {} tables, {} events, parsed in {:?}", tables.len(), events.len(), t.elapsed());
    events
}

/// Events of one week table. Tables without a dated header yield nothing.
pub fn parse_week_table(table: &Table, course: &str, zone: &ZoneId) -> Vec<Event> {
    let mut events = Vec::new();

    let Some(header) = table.header() else {
        return events;
    };
    let dates = ColumnDates::from_header(header);
    if dates.total_columns() == 0 || dates.is_unmapped() {
        trace!("{course}: table without dated header skipped");
        return events;
    }

    let mut grid = Occupancy::new(dates.total_columns());
    for (r, row) in table.body().iter().enumerate() {
        let mut cursor = grid.next_row();

        for cell in row {
            let Some(cols) = cursor.place(cell.colspan, cell.rowspan) else {
                trace!("{course}: row {} has no free column left", r + 1);
                continue;
            };
            if !cell.is_event() {
                continue;
            }
            let Some(date) = dates.date_for(cols.start) else {
                trace!("{course}: event cell at column {} has no date", cols.start);
                continue;
            };

            let lines = lines_from_markup(&cell.markup);
            if let Some(ev) = extract_event(&lines, date, course, zone) {
                events.push(ev);
            }
        }
    }

    events
}
