// src/core/dates.rs
//! Header row → date per logical column.
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::grid::Occupancy;
use super::table::{RawCell, MAX_COLSPAN};

/// `Mo, 08.12.2025`: German weekday abbreviation, comma, `DD.MM.YYYY`.
static DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Mo|Di|Mi|Do|Fr|Sa|So),\s*([0-9]{2}\.[0-9]{2}\.[0-9]{4})\b").expect("valid weekday regex")
});

/// Date of each logical column. Columns without a date stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnDates {
    dates: Vec<Option<NaiveDate>>,
}

impl ColumnDates {
    /// Width = sum of header colspans, each capped at [`MAX_COLSPAN`]. Header
    /// rowspans are ignored.
    pub fn from_header(header: &[RawCell]) -> Self {
        let total = header
            .iter()
            .map(|c| c.colspan.clamp(1, MAX_COLSPAN))
            .fold(0usize, usize::saturating_add);
        let mut dates = vec![None; total];

        let mut grid = Occupancy::new(total);
        let mut row = grid.next_row();
        for cell in header {
            let Some(cols) = row.place(cell.colspan.clamp(1, MAX_COLSPAN), 1) else { break };
            if let Some(date) = header_date(&cell.text) {
                for c in cols {
                    dates[c] = Some(date);
                }
            }
        }

        Self { dates }
    }

    pub fn total_columns(&self) -> usize {
        self.dates.len()
    }

    pub fn date_for(&self, col: usize) -> Option<NaiveDate> {
        self.dates.get(col).copied().flatten()
    }

    pub fn mapped_columns(&self) -> usize {
        self.dates.iter().filter(|d| d.is_some()).count()
    }

    /// No usable date at all: the table cannot yield events.
    pub fn is_unmapped(&self) -> bool {
        self.mapped_columns() == 0
    }
}

/// First weekday/date token in a header cell's text. Invalid dates count as absent.
pub fn header_date(text: &str) -> Option<NaiveDate> {
    let caps = DAY_RE.captures(text.trim())?;
    NaiveDate::parse_from_str(&caps[2], "%d.%m.%Y").ok()
}
