//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and all UI widgets using Ratatui. All board logic lives in
//! [`crate::board::Board`]; this layer only maps keys to board operations
//! and draws the result.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]

pub mod board_widget;
pub mod component;
pub mod reward_overlay;
pub mod status_bar;
pub mod student_dialog;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::{info, warn};

pub use board_widget::BoardWidget;
pub use component::Component;
pub use reward_overlay::RewardOverlay;
pub use status_bar::StatusBar;
pub use student_dialog::{StudentDialog, StudentDialogEvent, StudentDialogMode};
pub use theme::Theme;

use crate::board::{Board, NoticeKind, TapOutcome, View};
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::shortcuts::{contexts, Action, ShortcutRegistry};

/// Application state
pub struct AppState {
    /// The board being driven
    pub board: Board,
    /// Persisted settings
    pub config: Config,
    /// Write settings changes back to the config file
    pub persist_config: bool,
    /// Active colours
    pub theme: Theme,
    /// Key map
    pub shortcuts: ShortcutRegistry,
    /// Highlighted card in the grid
    pub cursor: usize,
    /// Student setup/switch dialog, when open
    pub student_dialog: Option<StudentDialog>,
    /// Blocking error overlay text
    pub error_message: Option<String>,
    /// Leave the event loop
    pub should_quit: bool,
}

impl AppState {
    /// Creates the UI state around a board.
    ///
    /// The setup dialog opens immediately when the board has no student.
    pub fn new(board: Board, config: Config, persist_config: bool) -> Self {
        let theme = Theme::from_preferences(config.ui.theme_mode, config.ui.high_contrast);
        let student_dialog = (!board.student().is_set()).then(StudentDialog::setup);
        Self {
            board,
            config,
            persist_config,
            theme,
            shortcuts: ShortcutRegistry::new(),
            cursor: 0,
            student_dialog,
            error_message: None,
            should_quit: false,
        }
    }

    /// Shortcut context for the current screen.
    pub fn shortcut_context(&self) -> &'static str {
        if self.board.reward().is_open() {
            contexts::REWARD
        } else if self.board.view() == View::InCategory {
            contexts::IN_CATEGORY
        } else {
            contexts::CATEGORIES
        }
    }

    /// Number of cards in the grid.
    fn card_count(&self) -> usize {
        match self.board.view() {
            View::Categories => self.board.catalog().len(),
            View::InCategory => self.board.current_items().len(),
        }
    }

    /// Routes one key press. Returns `Ok(true)` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // If error overlay is shown, allow dismissing with Enter or Esc
        if self.error_message.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.error_message = None;
            }
            return Ok(false);
        }

        if let Some(dialog) = self.student_dialog.as_mut() {
            if let Some(event) = dialog.handle_input(key) {
                self.handle_dialog_event(event);
            }
            return Ok(false);
        }

        if let Some(action) = self.shortcuts.lookup(self.shortcut_context(), key) {
            self.apply_action(action);
        }
        Ok(self.should_quit)
    }

    /// Performs a board action.
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::NavigateUp
            | Action::NavigateDown
            | Action::NavigateLeft
            | Action::NavigateRight => {
                self.cursor = board_widget::step_cursor(self.cursor, self.card_count(), action);
            }
            Action::Activate => self.activate(),
            Action::QuickChoice(slot) => {
                let label = self.board.predictions().get(slot).map(|p| p.label.clone());
                if let Some(label) = label {
                    let outcome = self.board.select_quick_choice(&label);
                    self.report_tap(&outcome);
                }
            }
            Action::GoBack => {
                let left = self.board.active_category().map(|c| c.id.clone());
                if self.board.go_back() {
                    self.cursor = left
                        .and_then(|id| {
                            self.board.catalog().categories.iter().position(|c| c.id == id)
                        })
                        .unwrap_or(0);
                }
            }
            Action::Reset => {
                self.board.full_reset();
                self.cursor = 0;
            }
            Action::DismissReward => {
                self.board.dismiss_reward();
            }
            Action::DismissNotice => {
                self.board.dismiss_notice();
            }
            Action::SaveSymbol => {
                let label = self
                    .board
                    .current_items()
                    .get(self.cursor)
                    .map(|item| item.label.clone());
                if let Some(label) = label {
                    if !self.board.save_symbol(&label) {
                        self.board.push_notice(
                            NoticeKind::Info,
                            format!("\"{label}\" already uses a saved symbol"),
                        );
                    }
                }
            }
            Action::ToggleContrast => {
                let enabled = self.config.toggle_high_contrast();
                self.theme =
                    Theme::from_preferences(self.config.ui.theme_mode, self.config.ui.high_contrast);
                info!(enabled, "High contrast toggled");
                self.save_config();
            }
            Action::SwitchStudent => {
                self.student_dialog = Some(StudentDialog::switch(self.board.student().name()));
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn activate(&mut self) {
        match self.board.view() {
            View::Categories => {
                let id = self
                    .board
                    .catalog()
                    .categories
                    .get(self.cursor)
                    .map(|c| c.id.clone());
                if let Some(id) = id {
                    if self.board.select_category(&id) {
                        self.cursor = 0;
                    }
                }
            }
            View::InCategory => {
                let id = self
                    .board
                    .current_items()
                    .get(self.cursor)
                    .map(|item| item.id.clone());
                if let Some(id) = id {
                    let outcome = self.board.select_sub_item(&id);
                    self.report_tap(&outcome);
                }
            }
        }
    }

    fn report_tap(&mut self, outcome: &TapOutcome) {
        if let TapOutcome::Locked = outcome {
            self.board
                .push_notice(NoticeKind::Info, "One moment, still sending the last choice");
        }
    }

    fn handle_dialog_event(&mut self, event: StudentDialogEvent) {
        match event {
            StudentDialogEvent::Confirmed(name) => {
                self.board.set_student(&name);
                self.config.set_student(&name);
                self.student_dialog = None;
                self.save_config();
            }
            StudentDialogEvent::Cancelled => self.student_dialog = None,
            StudentDialogEvent::Forget => {
                self.board.clear_student();
                self.config.clear_student();
                self.cursor = 0;
                self.student_dialog = Some(StudentDialog::setup());
                self.save_config();
            }
        }
    }

    fn save_config(&mut self) {
        if !self.persist_config {
            return;
        }
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save configuration");
            self.error_message = Some(format!("Failed to save settings: {e:#}"));
        }
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Apply finished service calls before drawing
        state.board.pump();

        // Keep the cursor on a card after the item list changes
        state.cursor = state.cursor.min(state.card_count().saturating_sub(1));

        terminal.draw(|f| render(f, state))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && state.handle_key(key)? {
                    break; // User quit
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state
pub fn render(f: &mut Frame, state: &AppState) {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar with student chip
            Constraint::Length(3), // Greeting
            Constraint::Length(5), // Quick choices
            Constraint::Min(8),    // Card grid
            Constraint::Length(5), // Status bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], state);
    render_greeting(f, chunks[1], state);
    render_quick_choices(f, chunks[2], state);
    BoardWidget::render(f, chunks[3], state);
    StatusBar::render(f, chunks[4], state, &state.theme);

    RewardOverlay::render(f, f.area(), state.board.reward(), &state.theme);

    if let Some(dialog) = &state.student_dialog {
        dialog.render(f, f.area(), &state.theme);
    }

    // Render error overlay on top of everything if error is present
    if let Some(ref error) = state.error_message {
        render_error_overlay(f, error, &state.theme);
    }
}

/// Render title bar with the student chip
fn render_title_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let student = state.board.student();

    let chip = match student.initial() {
        Some(initial) => Span::styled(
            format!(" ({initial}) {student} "),
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(" no student ", Style::default().fg(theme.text_muted)),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        chip,
        Span::styled(
            if theme.high_contrast { "  high contrast" } else { "" },
            Style::default().fg(theme.text_muted),
        ),
    ]);

    let title_widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(title_widget, area);
}

fn render_greeting(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let text = match (state.board.greeting(), state.board.active_category()) {
        (Some(greeting), _) => Line::from(Span::styled(
            greeting.text.clone(),
            Style::default().fg(theme.text),
        )),
        (None, Some(category)) => Line::from(Span::styled(
            format!("What would you like from {}?", category.label),
            Style::default().fg(theme.text_muted),
        )),
        (None, None) => Line::from(Span::styled(
            "Pick a category to start",
            Style::default().fg(theme.text_muted),
        )),
    };
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(theme.background)),
        );
    f.render_widget(widget, area);
}

fn render_quick_choices(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let heading = state
        .board
        .quick_choice_heading()
        .unwrap_or_else(|| "Quick choices".to_string());
    let block = Block::default()
        .title(format!(" {heading} "))
        .borders(Borders::ALL)
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let predictions = state.board.predictions();
    if predictions.is_empty() {
        let empty = Paragraph::new("No suggestions right now")
            .style(Style::default().fg(theme.text_muted));
        f.render_widget(empty, inner);
        return;
    }

    let slots = RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(inner);

    for (index, prediction) in predictions.iter().take(3).enumerate() {
        let border_type = if theme.high_contrast {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };
        let chip = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", index + 1),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(prediction.label.clone(), Style::default().fg(theme.text)),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(border_type)
                .style(Style::default().bg(theme.tag_color("quick"))),
        );
        f.render_widget(chip, slots[index]);
    }
}

/// Render error overlay
fn render_error_overlay(f: &mut Frame, error: &str, theme: &Theme) {
    let area = centered_rect(70, 40, f.area());

    // Clear the background area first
    f.render_widget(Clear, area);

    let background = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(background, area);

    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Error message
            Constraint::Length(2), // Help text
        ])
        .split(area);

    let title = Paragraph::new("ERROR")
        .style(
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(theme.error).bg(theme.background)),
        );
    f.render_widget(title, chunks[0]);

    let error_text = Paragraph::new(error)
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Details ")
                .style(Style::default().bg(theme.background)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(error_text, chunks[1]);

    let help = Paragraph::new("Press Enter or Esc to dismiss")
        .style(Style::default().fg(theme.text_muted).bg(theme.background));
    f.render_widget(help, chunks[2]);
}

/// Helper to create a centered rectangle
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardServices, BoardSettings};
    use crate::models::{Catalog, StudentProfile};
    use crate::services::{MockBackend, MockProbe};
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(student: &str) -> AppState {
        let services = BoardServices {
            backend: Arc::new(MockBackend::new()),
            probe: Arc::new(MockProbe::all()),
        };
        let board = Board::new(
            tokio::runtime::Handle::current(),
            Catalog::builtin(),
            StudentProfile::new(student),
            services,
            BoardSettings::default(),
        );
        let mut config = Config::new();
        config.set_student(student);
        AppState::new(board, config, false)
    }

    fn screen_text(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[tokio::test]
    async fn test_setup_dialog_opens_without_student() {
        let mut state = app("");
        assert!(state.student_dialog.is_some());

        // Board keys are swallowed by the dialog
        state.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(!state.should_quit);

        state.handle_key(key(KeyCode::Backspace)).unwrap();
        for c in "Ada".chars() {
            state.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        state.handle_key(key(KeyCode::Enter)).unwrap();

        assert!(state.student_dialog.is_none());
        assert_eq!(state.board.student().name(), "Ada");
        assert_eq!(state.config.student.name, "Ada");
    }

    #[tokio::test]
    async fn test_enter_category_and_choose() {
        let mut state = app("Sam");
        assert!(state.student_dialog.is_none());

        state.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(state.board.view(), View::InCategory);
        assert_eq!(state.shortcut_context(), contexts::IN_CATEGORY);

        state.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(state.cursor, 1);
        state.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(state.board.selection_count(), 1);
        assert_eq!(state.board.history(), ["Biscuit"]);

        state.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(state.board.view(), View::Categories);
        assert_eq!(state.cursor, 0);
    }

    #[tokio::test]
    async fn test_toggle_contrast() {
        let mut state = app("Sam");
        state.handle_key(key(KeyCode::Char('c'))).unwrap();
        assert!(state.config.ui.high_contrast);
        assert!(state.theme.high_contrast);
    }

    #[tokio::test]
    async fn test_forget_student_returns_to_setup() {
        let mut state = app("Sam");
        state.handle_key(key(KeyCode::Char('s'))).unwrap();
        assert_eq!(
            state.student_dialog.as_ref().map(StudentDialog::mode),
            Some(StudentDialogMode::Switch)
        );

        state.handle_key(key(KeyCode::Delete)).unwrap();
        assert!(!state.board.student().is_set());
        assert_eq!(
            state.student_dialog.as_ref().map(StudentDialog::mode),
            Some(StudentDialogMode::Setup)
        );
    }

    #[tokio::test]
    async fn test_quit() {
        let mut state = app("Sam");
        assert!(state.handle_key(key(KeyCode::Char('q'))).unwrap());
    }

    #[tokio::test]
    async fn test_render_shows_header_and_categories() {
        let state = app("Sam");
        let text = screen_text(&state);
        assert!(text.contains(APP_NAME));
        assert!(text.contains("(S) Sam"));
        assert!(text.contains("Food"));
        assert!(text.contains("Toilet"));
    }
}
