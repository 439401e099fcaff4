use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::display::HeaderHit;
use crate::domain::{Message, TVConfig, TVError};
use crate::model::{Model, Modus};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, TVError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(self.map_event(model, event::read()?));
        }
        Ok(None)
    }

    pub fn map_event(&self, model: &Model, event: Event) -> Option<Message> {
        match event {
            // crossterm also emits release and repeat events on Windows.
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                self.handle_key(model, key)
            }
            Event::Mouse(mouse) => self.handle_mouse(model, mouse),
            _ => None,
        }
    }

    fn handle_key(&self, model: &Model, key: KeyEvent) -> Option<Message> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Message::Quit);
        }
        if model.raw_keyevents() {
            return Some(Message::RawKey(key));
        }

        let message = match key.code {
            KeyCode::Char('q') if model.modus() == Modus::TABLE => Some(Message::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Exit),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::PageUp => Some(Message::MovePageUp),
            KeyCode::PageDown => Some(Message::MovePageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::MoveBeginning),
            KeyCode::End | KeyCode::Char('G') => Some(Message::MoveEnd),
            KeyCode::Char('s') | KeyCode::Char(' ') => {
                Some(Message::ClickSwapIcon(model.curser_column()))
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                Some(Message::FocusHeader(model.curser_column()))
            }
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }

    fn handle_mouse(&self, model: &Model, mouse: MouseEvent) -> Option<Message> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let hit = model.registry().hit_test(mouse.column, mouse.row);
        let message = match hit {
            Some(HeaderHit::Icon(column)) => Some(Message::ClickSwapIcon(column)),
            Some(HeaderHit::Label(column)) if model.focused_header() == Some(column) => None,
            Some(HeaderHit::Label(column)) => Some(Message::FocusHeader(column)),
            None if model.focused_header().is_some() => Some(Message::Blur),
            None => None,
        };
        trace!("Mapped: click at {}:{} => {message:?}", mouse.column, mouse.row);
        message
    }
}
