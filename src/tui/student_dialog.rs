//! Student name entry dialog
//!
//! Shown on first launch (setup, cannot be dismissed without a name) and
//! when switching students from the header chip.

use crate::tui::theme::Theme;
use crate::tui::Component;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;

/// Longest name the dialog accepts.
pub const MAX_NAME_LEN: usize = 40;

/// Why the dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentDialogMode {
    /// No student yet; the board stays inert until one is named
    Setup,
    /// Replace the current student
    Switch,
}

/// Events emitted by the student dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentDialogEvent {
    /// User confirmed a name
    Confirmed(String),
    /// User cancelled the switch
    Cancelled,
    /// User asked to forget the current student entirely
    Forget,
}

/// Student dialog component state
#[derive(Debug, Clone)]
pub struct StudentDialog {
    mode: StudentDialogMode,
    /// Current input buffer
    input: String,
    /// Error message (if validation fails)
    error: Option<String>,
}

impl StudentDialog {
    /// First-run setup dialog.
    pub fn setup() -> Self {
        Self {
            mode: StudentDialogMode::Setup,
            input: String::new(),
            error: None,
        }
    }

    /// Switch dialog, prefilled with the current name.
    pub fn switch(current: &str) -> Self {
        Self {
            mode: StudentDialogMode::Switch,
            input: current.to_string(),
            error: None,
        }
    }

    /// Dialog mode.
    pub const fn mode(&self) -> StudentDialogMode {
        self.mode
    }

    /// Current input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Validation error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn validate(&self) -> Result<String, String> {
        let name = self.input.trim();
        if name.is_empty() {
            return Err("Please enter a name".to_string());
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(format!("Names are limited to {MAX_NAME_LEN} characters"));
        }
        Ok(name.to_string())
    }
}

impl Component for StudentDialog {
    type Event = StudentDialogEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.error = None;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
            }
            KeyCode::Enter => match self.validate() {
                Ok(name) => return Some(StudentDialogEvent::Confirmed(name)),
                Err(e) => self.error = Some(e),
            },
            KeyCode::Esc if self.mode == StudentDialogMode::Switch => {
                return Some(StudentDialogEvent::Cancelled);
            }
            KeyCode::Delete if self.mode == StudentDialogMode::Switch => {
                return Some(StudentDialogEvent::Forget);
            }
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, dialog_area);

        let background = Block::default().style(Style::default().bg(theme.background));
        frame.render_widget(background, dialog_area);

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Input field
                Constraint::Min(2),    // Error message (if any)
                Constraint::Length(2), // Help text
            ])
            .split(dialog_area);

        let title_text = match self.mode {
            StudentDialogMode::Setup => "Who is using the board today?",
            StudentDialogMode::Switch => "Switch student",
        };
        let title = Paragraph::new(title_text)
            .style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().bg(theme.background)),
            );
        frame.render_widget(title, chunks[0]);

        let input = Paragraph::new(format!("{}█", self.input))
            .style(Style::default().fg(theme.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Student name ")
                    .style(Style::default().bg(theme.background)),
            );
        frame.render_widget(input, chunks[1]);

        if let Some(ref error) = self.error {
            let error_widget = Paragraph::new(error.as_str())
                .style(Style::default().fg(theme.error))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Error ")
                        .style(Style::default().bg(theme.background)),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(error_widget, chunks[2]);
        }

        let key_style = Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD);
        let mut help = vec![Span::styled("Enter", key_style), Span::raw(" Confirm")];
        if self.mode == StudentDialogMode::Switch {
            help.extend([
                Span::raw("  "),
                Span::styled("Esc", key_style),
                Span::raw(" Cancel  "),
                Span::styled("Del", key_style),
                Span::raw(" Forget student"),
            ]);
        }
        let help = Paragraph::new(Line::from(help))
            .style(Style::default().fg(theme.text).bg(theme.background));
        frame.render_widget(help, chunks[3]);
    }
}
