// src/core/table.rs
//! Abstract table as read from the DOM: rows of cells with spans and a kind marker.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// `<td class="v">`: carries one schedulable session.
    Event,
    /// Time labels, spacers, empty slots.
    Filler,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCell {
    pub colspan: usize,
    pub rowspan: usize,
    pub kind: CellKind,
    /// Inner HTML, untouched.
    pub markup: String,
    /// Concatenated text content (entities decoded).
    pub text: String,
}

impl RawCell {
    pub fn filler(text: &str) -> Self {
        Self { colspan: 1, rowspan: 1, kind: CellKind::Filler, markup: s!(text), text: s!(text) }
    }

    /// Event cell from inner markup. `text` is left empty; extraction reads `markup`.
    pub fn event(markup: &str) -> Self {
        Self { colspan: 1, rowspan: 1, kind: CellKind::Event, markup: s!(markup), text: s!() }
    }

    pub fn span(mut self, colspan: usize, rowspan: usize) -> Self {
        self.colspan = colspan.clamp(1, MAX_COLSPAN);
        self.rowspan = rowspan.clamp(1, MAX_ROWSPAN);
        self
    }

    pub fn is_event(&self) -> bool {
        self.kind == CellKind::Event
    }
}

/// First row is the header (dates), the rest are body rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<RawCell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<RawCell>>) -> Self {
        Self { rows }
    }

    pub fn header(&self) -> Option<&[RawCell]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn body(&self) -> &[Vec<RawCell>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Largest `colspan` a browser honors; bigger values are clamped.
pub const MAX_COLSPAN: usize = 1000;
/// Largest `rowspan` a browser honors.
pub const MAX_ROWSPAN: usize = 65534;

/// `colspan="3"` → 3. Missing, blank, non-numeric or < 1 → 1; anything above
/// `max` (including digit strings too long for an integer) → `max`.
pub fn parse_span(value: Option<&str>, max: usize) -> usize {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 1;
    };
    match v.parse::<usize>() {
        Ok(0) => 1,
        Ok(n) => n.min(max),
        Err(_) if v.bytes().all(|b| b.is_ascii_digit()) => max,
        Err(_) => 1,
    }
}
