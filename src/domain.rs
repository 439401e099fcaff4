use std::fmt;
use std::io::Error;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

/// Initial column titles, in projection order.
pub const HEADERSTEXT: [&str; 4] = ["Region name", "Region alpha code", "Value", "Reference date"];

pub const HELP_TEXT: &str = "\
Navigation
  ←/→ h/l      select column
  ↑/↓ j/k      scroll rows
  PgUp/PgDn    scroll a page
  g/G          first/last row

Columns
  s, Space     swap icon of selected column
               (pick a second column to swap with)
  e, Enter     rename selected header
  Enter        finish renaming

Mouse
  click ⟳      swap icon
  click title  rename header

  ?            this help
  Esc          close popup
  q, Ctrl-c    quit";

#[derive(Debug)]
pub enum TVError {
    IoError(Error),
    PolarsError(PolarsError),
    JsonError(serde_json::Error),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    LoggingFailed(String),
}

impl fmt::Display for TVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TVError::IoError(e) => write!(f, "io error: {e}"),
            TVError::PolarsError(e) => write!(f, "could not read data: {e}"),
            TVError::JsonError(e) => write!(f, "invalid json: {e}"),
            TVError::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            TVError::FileNotFound => write!(f, "file not found"),
            TVError::PermissionDenied => write!(f, "permission denied"),
            TVError::UnknownFileType => write!(f, "unknown file type"),
            TVError::LoggingFailed(msg) => write!(f, "could not set up logging: {msg}"),
        }
    }
}

impl std::error::Error for TVError {}

impl From<Error> for TVError {
    fn from(err: Error) -> Self {
        TVError::IoError(err)
    }
}

impl From<PolarsError> for TVError {
    fn from(err: PolarsError) -> Self {
        TVError::PolarsError(err)
    }
}

impl From<serde_json::Error> for TVError {
    fn from(err: serde_json::Error) -> Self {
        TVError::JsonError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TVConfig {
    /// Milliseconds to wait for an input event before redrawing.
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub mouse: bool,
}

impl Default for TVConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            max_column_width: 40,
            mouse: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    /// Activate the swap icon of a column.
    ClickSwapIcon(usize),
    /// Give input focus to a header field.
    FocusHeader(usize),
    /// Click somewhere that is not the focused header field.
    Blur,
    Help,
    Exit,
    /// Key press routed to the focused header field.
    RawKey(KeyEvent),
}
