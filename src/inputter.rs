use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Edit session on a header field. The label itself is the field content,
/// so every keystroke writes straight into it.
#[derive(Debug, Default)]
pub struct HeaderEditor {
    focus: Option<usize>,
    curser_pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Editing,
    /// The field lost input focus.
    Blurred,
}

impl HeaderEditor {
    pub fn focus(&mut self, column: usize, label: &str) {
        self.focus = Some(column);
        self.curser_pos = label.chars().count();
        trace!("Header {column} focused");
    }

    pub fn blur(&mut self) {
        if let Some(column) = self.focus.take() {
            trace!("Header {column} blurred");
        }
        self.curser_pos = 0;
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    /// Caret position in chars.
    pub fn curser_pos(&self) -> usize {
        self.curser_pos
    }

    pub fn read(&mut self, key: KeyEvent, label: &mut String) -> EditOutcome {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => {
                self.blur();
                return EditOutcome::Blurred;
            }
            (KeyCode::Backspace, _) => self.backspace(label),
            (KeyCode::Delete, _) => self.delete(label),
            (KeyCode::Left, _) => self.curser_pos = self.curser_pos.saturating_sub(1),
            (KeyCode::Right, _) => {
                if self.curser_pos < label.chars().count() {
                    self.curser_pos += 1;
                }
            }
            (KeyCode::Home, _) => self.curser_pos = 0,
            (KeyCode::End, _) => self.curser_pos = label.chars().count(),
            (kc, km) => self.key(kc, km, label),
        }
        EditOutcome::Editing
    }

    fn backspace(&mut self, label: &mut String) {
        if self.curser_pos > 0 {
            self.curser_pos -= 1;
            let idx = Self::bytepos(label, self.curser_pos);
            label.remove(idx);
        }
    }

    fn delete(&mut self, label: &mut String) {
        if self.curser_pos < label.chars().count() {
            let idx = Self::bytepos(label, self.curser_pos);
            label.remove(idx);
        }
    }

    fn key(&mut self, code: KeyCode, modifier: KeyModifiers, label: &mut String) {
        if modifier.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return;
        }
        if let Some(chr) = code.as_char() {
            label.insert(Self::bytepos(label, self.curser_pos), chr);
            self.curser_pos += 1;
        }
    }

    fn bytepos(s: &str, char_pos: usize) -> usize {
        s.char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(s.len())
    }
}
