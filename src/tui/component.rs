//! Modal components drawn over the board.
//!
//! A component owns its own input state. While it is open, every key press
//! goes to it instead of the shortcut registry, and it reports back to
//! [`super::AppState`] only through its event type.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::tui::Theme;

/// A modal that takes over keyboard input while open.
pub trait Component {
    /// What the modal reports to the board when it is done
    type Event;

    /// Handles one key press. `None` means the key was consumed internally.
    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event>;

    /// Draws the modal inside `area` (usually the whole frame).
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme);
}
