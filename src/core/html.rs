// src/core/html.rs
//! DOM helpers: read `<table>` elements into [`Table`]s.
//!
//! Rows are taken from the table itself and from its `thead`/`tbody`/`tfoot`
//! sections, never from nested tables (those are read as tables of their own).
//! Only `<td>` children count as cells, matching how sked exports lay out weeks.

use scraper::{ElementRef, Html};

use super::table::{parse_span, CellKind, RawCell, Table, MAX_COLSPAN, MAX_ROWSPAN};
use crate::config::consts::EVENT_CELL_CLASS;

/// All tables of the document, in document order.
pub fn read_tables(doc: &Html) -> Vec<Table> {
    elements_named(doc, "table").map(read_table).collect()
}

/// Every element called `name`, in document order.
pub fn elements_named<'a>(doc: &'a Html, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

pub fn read_table(table: ElementRef<'_>) -> Table {
    let rows = table_rows(table)
        .into_iter()
        .map(|tr| child_elements(tr).filter(|el| el.value().name() == "td").map(read_cell).collect())
        .collect();
    Table::new(rows)
}

fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(child).filter(|el| el.value().name() == "tr"));
            }
            _ => {}
        }
    }
    rows
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

fn read_cell(td: ElementRef<'_>) -> RawCell {
    let kind = if has_class(td, EVENT_CELL_CLASS) { CellKind::Event } else { CellKind::Filler };
    RawCell {
        colspan: parse_span(td.value().attr("colspan"), MAX_COLSPAN),
        rowspan: parse_span(td.value().attr("rowspan"), MAX_ROWSPAN),
        kind,
        markup: td.inner_html(),
        text: td.text().collect(),
    }
}

/// Whitespace-separated class list contains exactly `class`.
pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}
