//! Status bar widget for displaying notices and help

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Theme};
use crate::board::notice::NoticeKind;

/// Notice lines shown above the help line.
const MAX_CONTENT_LINES: usize = 2;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar with notices and contextual help
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let board = &state.board;
        let mut content_lines: Vec<Line> = board
            .notices()
            .iter()
            .rev()
            .take(MAX_CONTENT_LINES)
            .map(|notice| {
                let (tag, color) = Self::notice_style(notice.kind, theme);
                Line::from(vec![
                    Span::styled(tag, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::styled(notice.text.clone(), Style::default().fg(theme.text)),
                ])
            })
            .collect();

        if content_lines.is_empty() {
            content_lines.push(Self::counter_line(state, theme));
        }

        // Pad with empty lines to push help to the bottom
        while content_lines.len() < MAX_CONTENT_LINES {
            content_lines.push(Line::from(""));
        }
        content_lines.push(Self::help_line(state, theme));

        let status = Paragraph::new(content_lines)
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Status ")
                    .style(Style::default().bg(theme.background)),
            );

        f.render_widget(status, area);
    }

    fn notice_style(kind: NoticeKind, theme: &Theme) -> (&'static str, ratatui::style::Color) {
        match kind {
            NoticeKind::Info => ("INFO: ", theme.primary),
            NoticeKind::Success => ("SENT: ", theme.success),
            NoticeKind::Warning => ("NOTE: ", theme.warning),
            NoticeKind::RateLimited => ("SLOW DOWN: ", theme.warning),
            NoticeKind::Error => ("ERROR: ", theme.error),
        }
    }

    /// Selection count and lock state when nothing else is showing.
    fn counter_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let board = &state.board;
        let mut spans = vec![
            Span::styled("Choices: ", Style::default().fg(theme.primary)),
            Span::styled(
                board.selection_count().to_string(),
                Style::default().fg(theme.accent),
            ),
        ];
        if let Some(last) = board.history().last() {
            spans.push(Span::styled("  Last: ", Style::default().fg(theme.primary)));
            spans.push(Span::styled(last.clone(), Style::default().fg(theme.text)));
        }
        if board.is_locked() {
            spans.push(Span::styled(
                "  sending…",
                Style::default().fg(theme.text_muted),
            ));
        }
        Line::from(spans)
    }

    /// Contextual help line from the shortcut registry
    fn help_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let hints = state.shortcuts.hints(state.shortcut_context());

        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, (key, action)) in hints.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                key,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(action, Style::default().fg(theme.text_muted)));
        }

        Line::from(spans)
    }
}
