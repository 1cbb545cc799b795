// src/core/grid.rs
//! Span grid resolver.
//!
//! Assigns each cell of a row a half-open range of logical columns, skipping
//! columns still covered by a `rowspan` from an earlier row. The grid is a plain
//! counter per logical column, allocated per table.
//!
//! A counter holds how many rows, counting the row being resolved, the column is
//! still covered. Declaring `rowspan = n` stores `n`; the decrement at the start of
//! each following row leaves `n - 1`, `n - 2`, … so exactly the `n - 1` rows below
//! the declaring row are skipped.

use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupancy {
    cols: Vec<usize>,
}

impl Occupancy {
    pub fn new(total_columns: usize) -> Self {
        Self { cols: vec![0; total_columns] }
    }

    pub fn total_columns(&self) -> usize {
        self.cols.len()
    }

    pub fn is_occupied(&self, col: usize) -> bool {
        self.cols.get(col).is_some_and(|&n| n > 0)
    }

    /// Start resolving the next row: consume one row of every active rowspan.
    pub fn next_row(&mut self) -> RowCursor<'_> {
        for n in &mut self.cols {
            *n = n.saturating_sub(1);
        }
        RowCursor { grid: self, pos: 0 }
    }
}

/// Placement state for one row.
#[derive(Debug)]
pub struct RowCursor<'g> {
    grid: &'g mut Occupancy,
    pos: usize,
}

impl RowCursor<'_> {
    /// Place the next cell of the row.
    ///
    /// Returns `None` when no free column is left; the cell is then dropped.
    /// The range is clamped to the table width and never runs into a column that
    /// is still covered from above.
    pub fn place(&mut self, colspan: usize, rowspan: usize) -> Option<Range<usize>> {
        let cols = &mut self.grid.cols;
        let total = cols.len();

        while self.pos < total && cols[self.pos] > 0 {
            self.pos += 1;
        }
        if self.pos >= total {
            return None;
        }

        let start = self.pos;
        let mut end = start.saturating_add(colspan.max(1)).min(total);
        if let Some(off) = cols[start..end].iter().position(|&n| n > 0) {
            end = start + off;
        }

        if rowspan > 1 {
            for n in &mut cols[start..end] {
                *n = rowspan;
            }
        }

        self.pos = end;
        Some(start..end)
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_row(grid: &mut Occupancy, spans: &[(usize, usize)]) -> Vec<Option<Range<usize>>> {
        let mut row = grid.next_row();
        spans.iter().map(|&(cs, rs)| row.place(cs, rs)).collect()
    }

    #[test]
    fn plain_row_is_sequential() {
        let mut g = Occupancy::new(4);
        let got = place_row(&mut g, &[(1, 1), (2, 1), (1, 1)]);
        assert_eq!(got, vec![Some(0..1), Some(1..3), Some(3..4)]);
    }

    #[test]
    fn rowspan_blocks_following_rows_only() {
        let mut g = Occupancy::new(5);
        // column 3 carries a two-row event
        let r0 = place_row(&mut g, &[(1, 1), (1, 1), (1, 1), (1, 2), (1, 1)]);
        assert_eq!(r0[3], Some(3..4));

        // next row: four cells, the cursor must jump over column 3
        let r1 = place_row(&mut g, &[(1, 1), (1, 1), (1, 1), (1, 1)]);
        assert_eq!(r1, vec![Some(0..1), Some(1..2), Some(2..3), Some(4..5)]);

        // third row: column 3 is free again
        let r2 = place_row(&mut g, &[(1, 1), (1, 1), (1, 1), (1, 1), (1, 1)]);
        assert_eq!(r2[3], Some(3..4));
    }

    #[test]
    fn long_rowspan_counts_down() {
        let mut g = Occupancy::new(2);
        place_row(&mut g, &[(1, 3), (1, 1)]);
        assert_eq!(place_row(&mut g, &[(1, 1)]), vec![Some(1..2)]);
        assert_eq!(place_row(&mut g, &[(1, 1)]), vec![Some(1..2)]);
        assert_eq!(place_row(&mut g, &[(1, 1)]), vec![Some(0..1)]);
    }

    #[test]
    fn overflow_drops_cell() {
        let mut g = Occupancy::new(2);
        let got = place_row(&mut g, &[(1, 1), (1, 1), (1, 1)]);
        assert_eq!(got, vec![Some(0..1), Some(1..2), None]);
    }

    #[test]
    fn colspan_clamped_to_width() {
        let mut g = Occupancy::new(3);
        let got = place_row(&mut g, &[(2, 1), (5, 1)]);
        assert_eq!(got, vec![Some(0..2), Some(2..3)]);
    }

    #[test]
    fn wide_cell_stops_before_covered_column() {
        let mut g = Occupancy::new(4);
        place_row(&mut g, &[(1, 1), (1, 1), (1, 2), (1, 1)]);
        // colspan 3 from column 0 would run into column 2
        let got = place_row(&mut g, &[(3, 1), (1, 1)]);
        assert_eq!(got, vec![Some(0..2), Some(3..4)]);
    }

    #[test]
    fn active_cells_never_overlap() {
        // irregular layout with several overlapping spans
        let rows: &[&[(usize, usize)]] = &[
            &[(1, 3), (2, 2), (1, 1), (1, 4)],
            &[(1, 1), (2, 1)],
            &[(3, 2), (1, 1)],
            &[(1, 1), (1, 1), (1, 1), (1, 1), (1, 1)],
            &[(5, 1)],
        ];
        let mut g = Occupancy::new(5);
        // rows still covered from above: (range, remaining rows after this one)
        let mut carried: Vec<(Range<usize>, usize)> = Vec::new();

        for spans in rows {
            let placed = place_row(&mut g, spans);
            let mut taken = vec![false; 5];
            for (r, _) in &carried {
                for c in r.clone() {
                    taken[c] = true;
                }
            }
            let mut next = Vec::new();
            for (range, &(_, rs)) in placed.iter().zip(spans.iter()) {
                let Some(range) = range else { continue };
                for c in range.clone() {
                    assert!(!taken[c], "column {c} claimed twice");
                    taken[c] = true;
                }
                if rs > 1 {
                    next.push((range.clone(), rs - 1));
                }
            }
            carried = carried
                .into_iter()
                .filter_map(|(r, n)| (n > 1).then(|| (r, n - 1)))
                .chain(next)
                .collect();
        }
    }

    #[test]
    fn absurd_spans_stay_in_bounds() {
        let mut g = Occupancy::new(3);
        let got = place_row(&mut g, &[(1, 1), (usize::MAX, usize::MAX)]);
        assert_eq!(got, vec![Some(0..1), Some(1..3)]);
        assert!(g.is_occupied(2));
    }

    #[test]
    fn empty_grid_places_nothing() {
        let mut g = Occupancy::new(0);
        assert_eq!(place_row(&mut g, &[(1, 1)]), vec![None]);
        assert!(!g.is_occupied(0));
    }
}
