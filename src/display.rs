//! Registry of what is currently shown on screen.
//!
//! Handles are positionally aligned with the model: header handle `i` shows
//! column `i`, row handle `r` shows table row `r`. The registry is cleared and
//! rebuilt from the model on every render pass, and written to directly by
//! column swaps in between.

use ratatui::layout::{Position, Rect};
use tracing::warn;

use crate::reorder::ReorderSelection;
use crate::table::{HeaderLabels, ProjectedTable};

/// Cells reserved for the swap icon and its leading space.
pub const ICON_WIDTH: u16 = 2;
pub const SWAP_ICON: &str = "⟳";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderHandle {
    pub text: String,
    /// Origin of a pending swap.
    pub selected: bool,
    /// Icon emphasised as a valid swap target.
    pub target: bool,
    pub focused: bool,
    pub label_area: Rect,
    pub icon_area: Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowHandle {
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    Label(usize),
    Icon(usize),
}

#[derive(Debug, Default)]
pub struct DisplayRegistry {
    headers: Vec<HeaderHandle>,
    rows: Vec<RowHandle>,
}

impl DisplayRegistry {
    pub fn rebuild(
        &mut self,
        table: &ProjectedTable,
        labels: &HeaderLabels,
        selection: &ReorderSelection,
        focus: Option<usize>,
    ) {
        self.headers.clear();
        self.rows.clear();

        let origin = selection.origin();
        self.headers.extend(labels.iter().enumerate().map(|(i, label)| HeaderHandle {
            text: label.to_string(),
            selected: origin == Some(i),
            target: origin.is_some_and(|o| o != i),
            focused: focus == Some(i),
            ..HeaderHandle::default()
        }));
        self.rows.extend(table.rows().iter().map(|r| RowHandle { cells: r.clone() }));
    }

    /// Record where each header cell landed on screen.
    pub fn place_headers(&mut self, areas: &[Rect]) {
        for (handle, area) in self.headers.iter_mut().zip(areas) {
            let icon_width = ICON_WIDTH.min(area.width);
            handle.label_area = Rect {
                width: area.width - icon_width,
                ..*area
            };
            handle.icon_area = Rect {
                x: area.x + area.width - icon_width,
                width: icon_width,
                ..*area
            };
        }
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<HeaderHit> {
        let pos = Position::new(x, y);
        self.headers.iter().enumerate().find_map(|(i, h)| {
            if h.icon_area.contains(pos) {
                Some(HeaderHit::Icon(i))
            } else if h.label_area.contains(pos) {
                Some(HeaderHit::Label(i))
            } else {
                None
            }
        })
    }

    pub fn set_cell_text(&mut self, row: usize, column: usize, text: &str) {
        let rows_empty = self.rows.is_empty();
        match self.rows.get_mut(row).and_then(|r| r.cells.get_mut(column)) {
            Some(cell) => {
                cell.clear();
                cell.push_str(text);
            }
            // Nothing rendered yet, the next render pass picks the value up.
            None if rows_empty => {}
            None => warn!("No display cell at {row}:{column}"),
        }
    }

    pub fn set_header_text(&mut self, column: usize, text: &str) {
        if let Some(handle) = self.headers.get_mut(column) {
            handle.text.clear();
            handle.text.push_str(text);
        }
    }

    /// Highlight `origin` and emphasise every other header's icon.
    pub fn mark_origin(&mut self, origin: usize) {
        for (i, handle) in self.headers.iter_mut().enumerate() {
            handle.selected = i == origin;
            handle.target = i != origin;
        }
    }

    /// Undo `mark_origin`.
    pub fn restore_origin(&mut self, origin: usize) {
        if let Some(handle) = self.headers.get_mut(origin) {
            handle.selected = false;
        }
        for (i, handle) in self.headers.iter_mut().enumerate() {
            if i != origin {
                handle.target = false;
            }
        }
    }

    pub fn set_focus(&mut self, focus: Option<usize>) {
        for (i, handle) in self.headers.iter_mut().enumerate() {
            handle.focused = focus == Some(i);
        }
    }

    pub fn headers(&self) -> &[HeaderHandle] {
        &self.headers
    }

    pub fn header(&self, idx: usize) -> Option<&HeaderHandle> {
        self.headers.get(idx)
    }

    pub fn rows(&self) -> &[RowHandle] {
        &self.rows
    }

    pub fn header_texts(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.text.clone()).collect()
    }

    pub fn cell_texts(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|r| r.cells.clone()).collect()
    }

    /// Render width per column: widest of header (plus icon) and cells, capped.
    pub fn column_widths(&self, max_column_width: usize) -> Vec<u16> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let cells = self
                    .rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0);
                let header = h.text.chars().count() + ICON_WIDTH as usize;
                let width = header.max(cells).max(ICON_WIDTH as usize + 1);
                width.min(max_column_width.max(ICON_WIDTH as usize + 1)) as u16
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Record;

    fn registry() -> (ProjectedTable, HeaderLabels, DisplayRegistry) {
        let table = ProjectedTable::project(&[
            Record::new("Aruba", "ABW", "10", "2020"),
            Record::new("Chile", "CHL", "19116", "2021"),
        ]);
        let labels = HeaderLabels::default();
        let mut reg = DisplayRegistry::default();
        reg.rebuild(&table, &labels, &ReorderSelection::Idle, None);
        (table, labels, reg)
    }

    #[test]
    fn rebuild_mirrors_model() {
        let (table, labels, reg) = registry();
        assert_eq!(reg.header_texts(), labels.to_vec());
        assert_eq!(reg.cell_texts(), table.rows());
    }

    #[test]
    fn rebuild_does_not_accumulate() {
        let (table, labels, mut reg) = registry();
        reg.rebuild(&table, &labels, &ReorderSelection::Idle, None);
        reg.rebuild(&table, &labels, &ReorderSelection::Idle, None);
        assert_eq!(reg.headers().len(), 4);
        assert_eq!(reg.rows().len(), 2);
    }

    #[test]
    fn rebuild_derives_styles_from_selection() {
        let (table, labels, mut reg) = registry();
        reg.rebuild(&table, &labels, &ReorderSelection::PendingSwap(1), Some(3));
        let flags: Vec<_> = reg.headers().iter().map(|h| (h.selected, h.target)).collect();
        assert_eq!(flags, vec![(false, true), (true, false), (false, true), (false, true)]);
        assert!(reg.header(3).unwrap().focused);
    }

    #[test]
    fn mark_and_restore_origin() {
        let (_, _, mut reg) = registry();
        let before = reg.headers().to_vec();
        reg.mark_origin(2);
        assert!(reg.header(2).unwrap().selected);
        assert!(!reg.header(2).unwrap().target);
        assert!(reg.header(0).unwrap().target);
        reg.restore_origin(2);
        assert_eq!(reg.headers(), before.as_slice());
    }

    #[test]
    fn hit_test_finds_icon_and_label() {
        let (_, _, mut reg) = registry();
        reg.place_headers(&[
            Rect::new(0, 1, 10, 1),
            Rect::new(11, 1, 10, 1),
            Rect::new(22, 1, 10, 1),
            Rect::new(33, 1, 10, 1),
        ]);
        assert_eq!(reg.hit_test(2, 1), Some(HeaderHit::Label(0)));
        assert_eq!(reg.hit_test(9, 1), Some(HeaderHit::Icon(0)));
        assert_eq!(reg.hit_test(19, 1), Some(HeaderHit::Icon(1)));
        assert_eq!(reg.hit_test(10, 1), None);
        assert_eq!(reg.hit_test(2, 2), None);
    }

    #[test]
    fn column_widths_fit_header_and_icon() {
        let (_, _, reg) = registry();
        let widths = reg.column_widths(40);
        assert_eq!(widths[0], ("Region name".len() + 2) as u16);
        assert_eq!(reg.column_widths(8)[1], 8);
    }
}
