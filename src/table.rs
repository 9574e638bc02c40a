//! Table grid integrity: incremental placement of cells on an implicit column
//! grid, with overlap detection, span clamping, and row-group boundary
//! checks.
//!
//! One `TableGrid` lives for the lifetime of one `table` element; nested
//! tables each get their own grid on a stack kept by the checker.

use std::collections::HashSet;

use crate::diagnostic::Diagnostic;
use crate::diagnostic::{CheckError, CheckResult};
use crate::locator::Locator;

/// Largest honored `colspan`; larger declared values clamp here.
pub const MAX_COLSPAN: u32 = 1000;

/// Largest honored `rowspan`. Doubles as the bottom-edge sentinel for
/// `rowspan=0` ("spans to the end of the row group"), so a declared span
/// this large is indistinguishable from an indefinite one by design.
pub const MAX_ROWSPAN: u32 = 65534;

/// One placed cell, tracked while any row it covers is still open.
#[derive(Debug, Clone)]
pub struct Cell {
    left: u32,
    right: u32,
    bottom: u32,
    rowspan: u32,
    /// Tokens of the cell's `headers` attribute, resolved at table close.
    headers: Vec<String>,
    /// `th` as opposed to `td`.
    is_header: bool,
    locator: Locator,
}

impl Cell {
    /// Builds a cell from its declared spans, clamping out-of-range values
    /// and reporting each clamp as a non-fatal diagnostic.
    fn new(
        colspan: u32,
        rowspan: u32,
        headers: Vec<String>,
        is_header: bool,
        locator: Locator,
        out: &mut Vec<Diagnostic>,
    ) -> Self {
        let colspan = if colspan > MAX_COLSPAN {
            out.push(Diagnostic::warning(
                format!(
                    "A table cell \u{201c}colspan\u{201d} value greater than {MAX_COLSPAN} \
                     was treated as {MAX_COLSPAN}."
                ),
                locator.clone(),
            ));
            MAX_COLSPAN
        } else {
            colspan.max(1)
        };
        let rowspan = if rowspan > MAX_ROWSPAN {
            out.push(Diagnostic::warning(
                format!(
                    "A table cell \u{201c}rowspan\u{201d} value greater than {MAX_ROWSPAN} \
                     was treated as {MAX_ROWSPAN}."
                ),
                locator.clone(),
            ));
            MAX_ROWSPAN
        } else {
            rowspan
        };
        Cell {
            left: 0,
            right: colspan,
            bottom: 0,
            rowspan,
            headers,
            is_header,
            locator,
        }
    }

    /// Pins the cell to its grid position. `rowspan=0` and spans at the clamp
    /// ceiling both yield the sentinel bottom edge, which never gets the row
    /// offset added; the coordinate contract violations here indicate broken
    /// bookkeeping upstream, not bad markup, hence hard errors.
    fn position(&mut self, top: u32, left: u32) -> CheckResult {
        let width = self.right - self.left;
        self.left = left;
        self.right = left.checked_add(width).ok_or(CheckError::TableContract(
            "column index overflow",
        ))?;
        if self.right <= self.left {
            return Err(CheckError::TableContract("non-positive column span"));
        }
        if self.rowspan == 0 || self.rowspan == MAX_ROWSPAN {
            self.bottom = MAX_ROWSPAN;
        } else {
            self.bottom = top
                .checked_add(self.rowspan)
                .ok_or(CheckError::TableContract("row index overflow"))?;
            if self.bottom <= top {
                return Err(CheckError::TableContract("non-positive row span"));
            }
        }
        Ok(())
    }

    fn covers_column(&self, column: u32) -> bool {
        self.left <= column && column < self.right
    }

    fn overlaps_horizontally(&self, other: &Cell) -> bool {
        !(self.right <= other.left || other.right <= self.left)
    }

    fn spans_indefinitely(&self) -> bool {
        self.bottom == MAX_ROWSPAN
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

/// Which construct a row-group boundary belongs to, for diagnostic wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Thead,
    Tbody,
    Tfoot,
    /// Rows placed directly under `table`, outside any row-group element.
    Implicit,
}

impl GroupKind {
    fn from_name(name: &str) -> GroupKind {
        match name {
            "thead" => GroupKind::Thead,
            "tfoot" => GroupKind::Tfoot,
            _ => GroupKind::Tbody,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            GroupKind::Thead => "its row group established by the \u{201c}thead\u{201d} element",
            GroupKind::Tbody => "its row group established by the \u{201c}tbody\u{201d} element",
            GroupKind::Tfoot => "its row group established by the \u{201c}tfoot\u{201d} element",
            GroupKind::Implicit => "the table",
        }
    }
}

/// Grid state for one open `table`.
#[derive(Debug)]
pub struct TableGrid {
    /// Index of the row currently open (or last closed), zero-based within
    /// the current row group. `None` until the first row starts.
    row: Option<u32>,
    rows_total: u32,
    group: GroupKind,
    /// Cells still reaching into the current or a future row.
    active: Vec<Cell>,
    /// Next candidate column for placement within the current row.
    cursor: u32,
    /// Ids carried by header cells anywhere in this table.
    header_ids: HashSet<String>,
    /// `headers` tokens awaiting resolution, with the referencing cell's
    /// locator. Outlives culling; drained at table close.
    header_refs: Vec<(String, Locator)>,
}

impl Default for TableGrid {
    fn default() -> Self {
        TableGrid {
            row: None,
            rows_total: 0,
            group: GroupKind::Implicit,
            active: Vec::new(),
            cursor: 0,
            header_ids: HashSet::new(),
            header_refs: Vec::new(),
        }
    }
}

impl TableGrid {
    pub fn new() -> TableGrid {
        TableGrid::default()
    }

    /// Enters a `thead`/`tbody`/`tfoot`. Cells never span row groups, so the
    /// row counter restarts for the new group.
    pub fn start_row_group(&mut self, name: &str) {
        self.group = GroupKind::from_name(name);
        self.row = None;
    }

    /// Leaves the current row-group element. Any cell whose declared span
    /// still reaches past the last row of the group is reported, then
    /// dropped; indefinite (`rowspan=0`) cells end here legally.
    pub fn end_row_group(&mut self, out: &mut Vec<Diagnostic>) {
        self.flush_boundary(out);
        self.group = GroupKind::Implicit;
        self.row = None;
    }

    /// Starts a table row. Returns `TableRowLimit` once the document-supplied
    /// cap is exceeded.
    pub fn start_row(&mut self, max_rows: usize) -> CheckResult {
        self.rows_total += 1;
        if self.rows_total as usize > max_rows {
            return Err(CheckError::TableRowLimit(max_rows));
        }
        let row = match self.row {
            None => 0,
            Some(previous) => previous + 1,
        };
        self.row = Some(row);
        self.active.retain(|cell| cell.bottom > row);
        self.cursor = 0;
        Ok(())
    }

    pub fn end_row(&mut self) {
        // Placement state is reset at the next start_row; nothing to do here.
    }

    /// Places one `td`/`th`. The left edge is the first column at or after
    /// the cursor whose starting position no active cell covers; a wide cell
    /// may still extend over a column a hanging cell occupies, which is
    /// exactly the overlap the pairwise check reports.
    pub fn cell(
        &mut self,
        colspan: u32,
        rowspan: u32,
        headers: Vec<String>,
        is_header: bool,
        id: Option<&str>,
        locator: Locator,
        out: &mut Vec<Diagnostic>,
    ) -> CheckResult {
        let row = self
            .row
            .ok_or(CheckError::TableContract("cell outside any row"))?;
        let mut cell = Cell::new(colspan, rowspan, headers, is_header, locator, out);
        if cell.is_header && let Some(id) = id {
            self.header_ids.insert(id.to_owned());
        }
        for token in &cell.headers {
            self.header_refs.push((token.clone(), cell.locator.clone()));
        }
        let mut left = self.cursor;
        while let Some(occupant) = self.active.iter().find(|c| c.covers_column(left)) {
            left = occupant.right;
        }
        cell.position(row, left)?;
        for other in &self.active {
            if cell.overlaps_horizontally(other) {
                out.push(Diagnostic::error(
                    "Table cell overlaps a cell from an earlier row.",
                    cell.locator.clone(),
                ));
                out.push(Diagnostic::error(
                    "Table cell is overlapped by a cell from a later row.",
                    other.locator.clone(),
                ));
            }
        }
        self.cursor = cell.right;
        self.active.push(cell);
        Ok(())
    }

    /// Closes the table. Rows outside any row-group element form an implicit
    /// group that ends with the table itself, and `headers` references are
    /// resolved against the full set of header-cell ids.
    pub fn end_table(&mut self, out: &mut Vec<Diagnostic>) {
        self.flush_boundary(out);
        for (token, locator) in self.header_refs.drain(..) {
            if !self.header_ids.contains(&token) {
                out.push(Diagnostic::error(
                    "The \u{201c}headers\u{201d} attribute must refer to a \
                     \u{201c}th\u{201d} element in the same table.",
                    locator,
                ));
            }
        }
    }

    fn flush_boundary(&mut self, out: &mut Vec<Diagnostic>) {
        let last_row_bottom = match self.row {
            Some(row) => row + 1,
            None => 0,
        };
        for cell in &self.active {
            if !cell.spans_indefinitely() && cell.bottom > last_row_bottom {
                out.push(Diagnostic::error(
                    format!(
                        "Table cell spans past the end of {}; clipped to the end.",
                        self.group.describe()
                    ),
                    cell.locator.clone(),
                ));
            }
        }
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(line: usize, column: usize) -> Locator {
        Locator::new(line, column)
    }

    #[test]
    fn plain_rows_place_without_diagnostics() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.cell(1, 1, vec![], false, None, at(1, 10), &mut out).unwrap();
        grid.end_row();
        grid.start_row(100).unwrap();
        grid.cell(2, 1, vec![], false, None, at(2, 1), &mut out).unwrap();
        grid.end_row();
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn hanging_cell_shifts_placement() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 2, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.cell(1, 1, vec![], false, None, at(1, 10), &mut out).unwrap();
        grid.start_row(100).unwrap();
        // column 0 still held by the rowspan=2 cell, so this lands at column 1
        grid.cell(1, 1, vec![], false, None, at(2, 1), &mut out).unwrap();
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn wide_cell_overlapping_hanging_cell_reports_both_sides() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.cell(1, 2, vec![], false, None, at(1, 10), &mut out).unwrap();
        grid.start_row(100).unwrap();
        // starts at the free column 0 but extends over the hanging cell at 1
        grid.cell(2, 1, vec![], false, None, at(2, 1), &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].locator, at(2, 1));
        assert_eq!(out[1].locator, at(1, 10));
        assert!(out[0].message.contains("overlaps"));
        assert!(out[1].message.contains("overlapped by"));
    }

    #[test]
    fn adjacent_hanging_cell_does_not_overlap() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 2, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], false, None, at(2, 1), &mut out).unwrap();
        grid.cell(1, 1, vec![], false, None, at(2, 10), &mut out).unwrap();
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn expired_cell_is_culled_before_the_next_row() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 2, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], false, None, at(2, 1), &mut out).unwrap();
        grid.start_row(100).unwrap();
        // third row: the rowspan=2 cell is gone, column 0 is free again
        grid.cell(2, 1, vec![], false, None, at(3, 1), &mut out).unwrap();
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn colspan_clamp_warns_and_places() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(MAX_COLSPAN + 5, 1, vec![], false, None, at(1, 1), &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("colspan"));
        out.clear();
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn rowspan_clamped_to_sentinel_acts_indefinite() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, MAX_ROWSPAN + 1, vec![], false, None, at(1, 1), &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("rowspan"));
        out.clear();
        // clamped value equals the sentinel, so no spans-past-end error
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn clamped_rowspan_below_the_first_row_is_still_indefinite() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.start_row(100).unwrap();
        // the sentinel never gets the row offset added on top
        grid.cell(1, 99999, vec![], false, None, at(2, 1), &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("rowspan"));
        out.clear();
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn finite_span_past_row_group_end_is_reported() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row_group("tbody");
        grid.start_row(100).unwrap();
        grid.cell(1, 3, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.end_row_group(&mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("tbody"));
        assert_eq!(out[0].locator, at(1, 1));
    }

    #[test]
    fn rowspan_zero_at_group_end_is_legal() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row_group("thead");
        grid.start_row(100).unwrap();
        grid.cell(1, 0, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.end_row_group(&mut out);
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }

    #[test]
    fn span_past_table_end_outside_groups() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 2, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.end_table(&mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("the table"));
    }

    #[test]
    fn headers_tokens_resolve_against_th_ids() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], true, Some("year"), at(1, 1), &mut out)
            .unwrap();
        grid.start_row(100).unwrap();
        // forward reference within the same table is fine
        grid.cell(
            1,
            1,
            vec!["year".into(), "missing".into()],
            false,
            None,
            at(2, 1),
            &mut out,
        )
        .unwrap();
        grid.end_table(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].locator, at(2, 1));
        assert!(out[0].message.contains("\u{201c}headers\u{201d}"));
    }

    #[test]
    fn td_id_does_not_satisfy_headers() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], false, Some("k"), at(1, 1), &mut out)
            .unwrap();
        grid.cell(1, 1, vec!["k".into()], false, None, at(1, 10), &mut out)
            .unwrap();
        grid.end_table(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].locator, at(1, 10));
    }

    #[test]
    fn row_limit_is_enforced() {
        let mut grid = TableGrid::new();
        grid.start_row(2).unwrap();
        grid.start_row(2).unwrap();
        assert!(matches!(
            grid.start_row(2),
            Err(CheckError::TableRowLimit(2))
        ));
    }

    #[test]
    fn row_counter_restarts_per_group() {
        let mut grid = TableGrid::new();
        let mut out = Vec::new();
        grid.start_row_group("thead");
        grid.start_row(100).unwrap();
        grid.cell(1, 1, vec![], false, None, at(1, 1), &mut out).unwrap();
        grid.end_row_group(&mut out);
        grid.start_row_group("tbody");
        grid.start_row(100).unwrap();
        // rowspan=2 within a fresh two-row group is fine
        grid.cell(1, 2, vec![], false, None, at(2, 1), &mut out).unwrap();
        grid.start_row(100).unwrap();
        grid.end_row_group(&mut out);
        grid.end_table(&mut out);
        assert_eq!(out, vec![]);
    }
}
