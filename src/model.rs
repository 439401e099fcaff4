use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use tracing::{debug, info, trace, warn};

use crate::display::DisplayRegistry;
use crate::domain::{Message, TVConfig, TVError};
use crate::inputter::{EditOutcome, HeaderEditor};
use crate::loader::{Record, RecordSource};
use crate::reorder::{ReorderSelection, ReorderStep};
use crate::table::{HeaderLabels, ProjectedTable};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modus {
    TABLE,
    /// A header field holds input focus.
    EDIT,
    POPUP,
}

/// The table view: projected data, editable headers and the column swap state.
pub struct Model {
    name: String,
    config: TVConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    table: ProjectedTable,
    headers: HeaderLabels,
    selection: ReorderSelection,
    editor: HeaderEditor,
    registry: DisplayRegistry,
    curser_column: usize,
    offset_row: usize,
    page_height: usize,
    status_message: String,
}

impl Model {
    pub fn init(source: &dyn RecordSource, config: &TVConfig) -> Result<Self, TVError> {
        let records = source.load()?;
        info!("Loaded {} records from {}", records.len(), source.name());
        Ok(Self::from_records(source.name(), &records, config))
    }

    pub fn from_records(name: impl Into<String>, records: &[Record], config: &TVConfig) -> Self {
        let table = ProjectedTable::project(records);
        debug!("Projected {} rows x {} columns", table.nrows(), table.ncolumns());
        Self {
            name: name.into(),
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            table,
            headers: HeaderLabels::default(),
            selection: ReorderSelection::default(),
            editor: HeaderEditor::default(),
            registry: DisplayRegistry::default(),
            curser_column: 0,
            offset_row: 0,
            page_height: 0,
            status_message: "Press ? for help".to_string(),
        }
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TVError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);

        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::MoveLeft => self.move_column_selection(-1),
                Message::MoveRight => self.move_column_selection(1),
                Message::MoveUp => self.scroll_up(1),
                Message::MoveDown => self.scroll_down(1),
                Message::MovePageUp => self.scroll_up(self.page_height.max(1)),
                Message::MovePageDown => self.scroll_down(self.page_height.max(1)),
                Message::MoveBeginning => self.offset_row = 0,
                Message::MoveEnd => self.scroll_down(self.table.nrows()),
                Message::ClickSwapIcon(column) => self.click_swap_icon(column),
                Message::FocusHeader(column) => self.focus_header(column),
                Message::Help => self.show_help(),
                Message::Blur | Message::Exit | Message::RawKey(_) => (),
            },
            Modus::EDIT => match msg {
                Message::Quit => self.quit(),
                Message::RawKey(key) => self.raw_input(key),
                Message::Blur => self.blur_header(),
                Message::FocusHeader(column) => self.focus_header(column),
                Message::ClickSwapIcon(column) => {
                    self.blur_header();
                    self.click_swap_icon(column);
                }
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                _ => (),
            },
        }
        Ok(())
    }

    /// Render pass: clear the registry and repopulate it from the model.
    pub fn render_pass(&mut self) {
        self.registry
            .rebuild(&self.table, &self.headers, &self.selection, self.editor.focused());
    }

    /// Where the last render put the header cells and how many rows fit.
    pub fn set_layout(&mut self, header_areas: &[Rect], page_height: usize) {
        self.registry.place_headers(header_areas);
        if page_height != self.page_height {
            trace!("Page height {} -> {}", self.page_height, page_height);
            self.page_height = page_height;
            self.offset_row = self.offset_row.min(self.max_offset());
        }
    }

    // -------------------- Column swap ---------------------- //

    fn click_swap_icon(&mut self, column: usize) {
        if column >= self.headers.len() {
            warn!("Ignoring swap click on unknown column {column}");
            return;
        }
        self.curser_column = column;
        match self.selection.click(column) {
            ReorderStep::Select(origin) => {
                self.registry.mark_origin(origin);
                self.set_status_message(format!(
                    "Pick a column to swap with '{}'",
                    &self.headers[origin]
                ));
            }
            ReorderStep::Swap {
                origin,
                destination,
            } => {
                self.swap_columns(origin, destination);
                self.registry.restore_origin(origin);
                if origin == destination {
                    self.set_status_message("Swap cancelled");
                } else {
                    self.set_status_message(format!(
                        "Swapped '{}' <-> '{}'",
                        &self.headers[destination], &self.headers[origin]
                    ));
                }
            }
        }
    }

    /// Exchange two columns in the table, the labels and the shown cells.
    /// Runs every write even when `pos_a == pos_b`.
    fn swap_columns(&mut self, pos_a: usize, pos_b: usize) {
        let col_a = self.table.column(pos_a);
        let col_b = self.table.column(pos_b);

        for (row, (a, b)) in col_a.into_iter().zip(col_b).enumerate() {
            self.registry.set_cell_text(row, pos_a, &b);
            self.registry.set_cell_text(row, pos_b, &a);
            self.table.set_cell(row, pos_a, b);
            self.table.set_cell(row, pos_b, a);
        }

        self.headers.swap(pos_a, pos_b);
        self.registry.set_header_text(pos_a, &self.headers[pos_a]);
        self.registry.set_header_text(pos_b, &self.headers[pos_b]);
        debug!("Swapped columns {pos_a} and {pos_b}");
    }

    // -------------------- Header rename ---------------------- //

    fn focus_header(&mut self, column: usize) {
        let Some(label) = self.headers.get(column) else {
            warn!("Ignoring focus on unknown header {column}");
            return;
        };
        self.editor.focus(column, label);
        self.registry.set_focus(Some(column));
        self.curser_column = column;
        self.modus = Modus::EDIT;
        self.set_status_message("Renaming, press Enter to finish");
    }

    fn raw_input(&mut self, key: KeyEvent) {
        let Some(column) = self.editor.focused() else {
            self.modus = Modus::TABLE;
            return;
        };
        let Some(label) = self.headers.get_mut(column) else {
            return;
        };
        let outcome = self.editor.read(key, label);
        self.registry.set_header_text(column, label);
        if outcome == EditOutcome::Blurred {
            info!("Header {column} renamed to '{}'", &self.headers[column]);
            self.leave_edit();
        }
    }

    fn blur_header(&mut self) {
        self.editor.blur();
        self.leave_edit();
    }

    fn leave_edit(&mut self) {
        self.registry.set_focus(None);
        self.modus = Modus::TABLE;
        self.set_status_message("");
    }

    // -------------------- Navigation ---------------------- //

    fn move_column_selection(&mut self, step: isize) {
        let last = self.headers.len().saturating_sub(1);
        self.curser_column = self.curser_column.saturating_add_signed(step).min(last);
    }

    fn max_offset(&self) -> usize {
        self.table.nrows().saturating_sub(self.page_height.max(1))
    }

    fn scroll_up(&mut self, size: usize) {
        self.offset_row = self.offset_row.saturating_sub(size);
    }

    fn scroll_down(&mut self, size: usize) {
        self.offset_row = (self.offset_row + size).min(self.max_offset());
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    // -------------------- Accessors ---------------------- //

    /// Key presses go to the focused header field instead of being mapped.
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::EDIT
    }

    pub fn modus(&self) -> Modus {
        self.modus
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TVConfig {
        &self.config
    }

    pub fn table(&self) -> &ProjectedTable {
        &self.table
    }

    pub fn headers(&self) -> &HeaderLabels {
        &self.headers
    }

    pub fn selection(&self) -> ReorderSelection {
        self.selection
    }

    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    pub fn focused_header(&self) -> Option<usize> {
        self.editor.focused()
    }

    pub fn curser_pos(&self) -> usize {
        self.editor.curser_pos()
    }

    pub fn curser_column(&self) -> usize {
        self.curser_column
    }

    pub fn offset_row(&self) -> usize {
        self.offset_row
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn model() -> Model {
        let records = vec![
            Record::new("Aruba", "ABW", "10", "2020"),
            Record::new("Austria", "AUT", "9006", "2020"),
            Record::new("Chile", "CHL", "19116", "2021"),
        ];
        let mut model = Model::from_records("test", &records, &TVConfig::default());
        model.render_pass();
        model
    }

    fn send(model: &mut Model, msg: Message) {
        model.update(Some(msg)).unwrap();
    }

    fn key(code: KeyCode) -> Message {
        Message::RawKey(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn swap_moves_cells_and_labels() {
        let mut model = model();
        send(&mut model, Message::ClickSwapIcon(0));
        send(&mut model, Message::ClickSwapIcon(2));
        assert_eq!(model.table().row(0).unwrap(), ["10", "ABW", "Aruba", "2020"]);
        assert_eq!(
            model.headers().to_vec(),
            vec!["Value", "Region alpha code", "Region name", "Reference date"]
        );
        assert_eq!(model.selection(), ReorderSelection::Idle);
    }

    #[test]
    fn swap_writes_registry_directly() {
        let mut model = model();
        send(&mut model, Message::ClickSwapIcon(1));
        send(&mut model, Message::ClickSwapIcon(3));
        // No render pass in between: the registry was written by the swap.
        assert_eq!(model.registry().cell_texts(), model.table().rows());
        assert_eq!(model.registry().header_texts(), model.headers().to_vec());
    }

    #[test]
    fn first_click_styles_headers() {
        let mut model = model();
        send(&mut model, Message::ClickSwapIcon(1));
        let reg = model.registry();
        assert!(reg.header(1).unwrap().selected);
        assert!(reg.headers().iter().enumerate().all(|(i, h)| h.target == (i != 1)));
        assert_eq!(model.status_message(), "Pick a column to swap with 'Region alpha code'");
    }

    #[test]
    fn unknown_column_click_is_ignored() {
        let mut model = model();
        send(&mut model, Message::ClickSwapIcon(7));
        assert_eq!(model.selection(), ReorderSelection::Idle);
    }

    #[test]
    fn rename_edits_label_live_and_enter_blurs() {
        let mut model = model();
        send(&mut model, Message::FocusHeader(2));
        assert!(model.raw_keyevents());
        send(&mut model, key(KeyCode::Char('s')));
        assert_eq!(&model.headers()[2], "Values");
        assert_eq!(model.registry().header(2).unwrap().text, "Values");
        send(&mut model, key(KeyCode::Enter));
        assert_eq!(model.focused_header(), None);
        assert_eq!(model.modus(), Modus::TABLE);
        assert!(!model.registry().header(2).unwrap().focused);
    }

    #[test]
    fn swap_click_while_editing_blurs_first() {
        let mut model = model();
        send(&mut model, Message::FocusHeader(0));
        send(&mut model, Message::ClickSwapIcon(0));
        assert_eq!(model.focused_header(), None);
        assert_eq!(model.selection(), ReorderSelection::PendingSwap(0));
    }

    #[test]
    fn blur_keeps_edits() {
        let mut model = model();
        send(&mut model, Message::FocusHeader(3));
        send(&mut model, key(KeyCode::Backspace));
        send(&mut model, Message::Blur);
        assert_eq!(&model.headers()[3], "Reference dat");
        assert_eq!(model.modus(), Modus::TABLE);
    }

    #[test]
    fn column_cursor_is_clamped() {
        let mut model = model();
        send(&mut model, Message::MoveLeft);
        assert_eq!(model.curser_column(), 0);
        for _ in 0..10 {
            send(&mut model, Message::MoveRight);
        }
        assert_eq!(model.curser_column(), 3);
    }

    #[test]
    fn scrolling_is_clamped_to_page() {
        let mut model = model();
        model.set_layout(&[], 2);
        send(&mut model, Message::MoveEnd);
        assert_eq!(model.offset_row(), 1);
        send(&mut model, Message::MovePageDown);
        assert_eq!(model.offset_row(), 1);
        send(&mut model, Message::MoveBeginning);
        assert_eq!(model.offset_row(), 0);
        send(&mut model, Message::MoveUp);
        assert_eq!(model.offset_row(), 0);
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut model = model();
        send(&mut model, Message::Help);
        assert_eq!(model.modus(), Modus::POPUP);
        send(&mut model, Message::ClickSwapIcon(0));
        assert_eq!(model.selection(), ReorderSelection::Idle);
        send(&mut model, Message::Exit);
        assert_eq!(model.modus(), Modus::TABLE);
    }

    #[test]
    fn quit_from_any_modus() {
        let mut model = model();
        send(&mut model, Message::FocusHeader(0));
        send(&mut model, Message::Quit);
        assert_eq!(model.status, Status::QUITTING);
    }
}
