use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

use crate::display::{DisplayRegistry, SWAP_ICON};
use crate::domain::{HELP_TEXT, TVConfig};
use crate::model::{Model, Modus};

pub const TABLE_HEADER_HEIGHT: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const COLUMN_SPACING: u16 = 1;

#[derive(Debug)]
pub struct TableUI {
    max_column_width: usize,
}

impl TableUI {
    pub fn new(config: &TVConfig) -> Self {
        Self {
            max_column_width: config.max_column_width,
        }
    }

    pub fn draw(&self, model: &mut Model, frame: &mut Frame) {
        // The registry is rebuilt from the model on every pass.
        model.render_pass();

        let title = Line::from(Span::styled(
            format!(" {} ", model.name()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let instructions = Line::from(vec![
            " Swap ".into(),
            "<s>".blue().bold(),
            " Rename ".into(),
            "<e>".blue().bold(),
            " Help ".into(),
            "<?>".blue().bold(),
            " Quit ".into(),
            "<q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);
        let inner = block.inner(frame.area());
        frame.render_widget(block, frame.area());

        let [header_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(TABLE_HEADER_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(inner);

        let widths = model.registry().column_widths(self.max_column_width);
        let columns = Layout::horizontal(widths.iter().map(|&w| Constraint::Length(w)))
            .spacing(COLUMN_SPACING)
            .flex(Flex::Start)
            .split(header_area);
        model.set_layout(&columns, body_area.height as usize);

        let buf = frame.buffer_mut();
        render_headers(model, buf);
        render_rows(model.registry(), &columns, model.offset_row(), body_area, buf);
        render_statusline(model, status_area, buf);

        if model.modus() == Modus::POPUP {
            render_help(frame.area(), frame.buffer_mut());
        }

        if let Some(column) = model.focused_header()
            && let Some(handle) = model.registry().header(column)
            && handle.label_area.width > 0
        {
            let offset = (model.curser_pos() as u16).min(handle.label_area.width - 1);
            frame.set_cursor_position(Position::new(
                handle.label_area.x + offset,
                handle.label_area.y,
            ));
        }
    }
}

fn render_headers(model: &Model, buf: &mut Buffer) {
    for (idx, handle) in model.registry().headers().iter().enumerate() {
        let mut label_style = Style::default().add_modifier(Modifier::BOLD);
        if idx == model.curser_column() {
            label_style = label_style.fg(Color::Cyan);
        }
        if handle.focused {
            label_style = label_style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
        }
        if handle.selected {
            label_style = label_style.add_modifier(Modifier::REVERSED);
        }

        let icon_style = if handle.target {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if handle.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let label = handle.label_area;
        if label.width > 0 {
            buf.set_style(label, label_style);
            buf.set_stringn(label.x, label.y, &handle.text, label.width as usize, label_style);
        }
        let icon = handle.icon_area;
        if icon.width > 0 {
            buf.set_stringn(icon.x + icon.width - 1, icon.y, SWAP_ICON, 1, icon_style);
        }
    }
}

fn render_rows(
    registry: &DisplayRegistry,
    columns: &[Rect],
    offset_row: usize,
    area: Rect,
    buf: &mut Buffer,
) {
    let visible = registry
        .rows()
        .iter()
        .skip(offset_row)
        .take(area.height as usize);
    for (line, row) in visible.enumerate() {
        let y = area.y + line as u16;
        for (cell, column) in row.cells.iter().zip(columns) {
            buf.set_stringn(column.x, y, cell, column.width as usize, Style::default());
        }
    }
}

fn render_statusline(model: &Model, area: Rect, buf: &mut Buffer) {
    let nrows = model.table().nrows();
    let first = if nrows == 0 { 0 } else { model.offset_row() + 1 };
    let position = format!("{}/{} ", first, nrows);
    let position_width = position.len() as u16;
    let [message_area, position_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(position_width)]).areas(area);

    Paragraph::new(model.status_message().italic()).render(message_area, buf);
    Paragraph::new(Span::styled(position, Style::default().fg(Color::DarkGray)))
        .right_aligned()
        .render(position_area, buf);
}

fn render_help(area: Rect, buf: &mut Buffer) {
    let popup = popup_area(area, 50, 70);
    Clear.render(popup, buf);
    Paragraph::new(HELP_TEXT)
        .block(
            Block::bordered()
                .title(Line::from(" Help ".bold()).centered())
                .border_set(border::ROUNDED),
        )
        .render(popup, buf);
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
