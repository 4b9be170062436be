//! Celebration overlay shown on every third choice

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, Theme};
use crate::board::RewardFlow;

/// Reward overlay widget
pub struct RewardOverlay;

impl RewardOverlay {
    /// Render the overlay for an open reward flow. Does nothing when closed.
    pub fn render(f: &mut Frame, area: Rect, reward: &RewardFlow, theme: &Theme) {
        let body = match reward {
            RewardFlow::Closed => return,
            RewardFlow::Loading { .. } => vec![
                Line::from(Span::styled(
                    "Great choosing!",
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Making your reward picture…",
                    Style::default().fg(theme.text_muted),
                )),
            ],
            RewardFlow::Showing { image_url } => vec![
                Line::from(Span::styled(
                    "★  Well done!  ★",
                    Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Your reward picture is ready:",
                    Style::default().fg(theme.text),
                )),
                Line::from(Span::styled(
                    image_url.clone(),
                    Style::default()
                        .fg(theme.primary)
                        .add_modifier(Modifier::UNDERLINED),
                )),
            ],
        };

        let overlay_area = centered_rect(60, 40, area);
        f.render_widget(Clear, overlay_area);

        let mut lines = body;
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                "Enter",
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Close", Style::default().fg(theme.text_muted)),
        ]));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Reward ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(theme.accent))
                    .style(Style::default().bg(theme.background)),
            );
        f.render_widget(paragraph, overlay_area);
    }
}
