//! Card grid widget for categories and their signs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::{AppState, Theme};
use crate::board::View;
use crate::services::images::placeholder_glyph;
use crate::shortcuts::Action;

/// Cards per row.
pub const GRID_COLUMNS: usize = 2;

/// Tallest a card is allowed to grow.
const MAX_CARD_HEIGHT: u16 = 7;

/// Everything the grid needs to draw one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Caption
    pub label: String,
    /// Stand-in picture
    pub glyph: char,
    /// Second line: image location, item count, or loading state
    pub detail: String,
    /// Colour tag for the tint
    pub color_tag: String,
    /// Image came from a remote generator and can be saved
    pub generated: bool,
}

/// Cards for the current view.
pub fn cards(state: &AppState) -> Vec<Card> {
    let board = &state.board;
    match board.view() {
        View::Categories => board
            .catalog()
            .categories
            .iter()
            .map(|category| Card {
                label: category.label.clone(),
                glyph: placeholder_glyph(&category.label),
                detail: format!("{} signs", category.items.len()),
                color_tag: category.color_tag.clone(),
                generated: false,
            })
            .collect(),
        View::InCategory => {
            let resolver = board.image_resolver();
            board
                .current_items()
                .iter()
                .map(|item| Card {
                    label: item.label.clone(),
                    glyph: placeholder_glyph(&item.label),
                    detail: if board.items_loading() {
                        "loading…".to_string()
                    } else {
                        resolver.primary_url(&item.label, item.image_source.as_deref())
                    },
                    color_tag: item.color_tag.clone(),
                    generated: item.has_remote_image(),
                })
                .collect()
        }
    }
}

/// Moves a grid cursor one step, clamped to `len` cards.
#[must_use]
pub fn step_cursor(cursor: usize, len: usize, action: Action) -> usize {
    if len == 0 {
        return 0;
    }
    let cursor = cursor.min(len - 1);
    let next = match action {
        Action::NavigateLeft if cursor % GRID_COLUMNS > 0 => cursor - 1,
        Action::NavigateRight if cursor % GRID_COLUMNS + 1 < GRID_COLUMNS => cursor + 1,
        Action::NavigateUp if cursor >= GRID_COLUMNS => cursor - GRID_COLUMNS,
        Action::NavigateDown => cursor + GRID_COLUMNS,
        _ => cursor,
    };
    if next < len {
        next
    } else {
        cursor
    }
}

/// Board widget renders the card grid
pub struct BoardWidget;

impl BoardWidget {
    /// Render the card grid
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let cards = cards(state);

        let title = match state.board.active_category() {
            Some(category) => format!(" {} ", category.label),
            None => " Choose a category ".to_string(),
        };
        let outer = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.background));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        if cards.is_empty() {
            let empty = Paragraph::new("Nothing to show here")
                .style(Style::default().fg(theme.text_muted))
                .alignment(Alignment::Center);
            f.render_widget(empty, inner);
            return;
        }

        let rows = cards.len().div_ceil(GRID_COLUMNS);
        let card_height = (inner.height / rows as u16).clamp(3, MAX_CARD_HEIGHT);
        let mut row_constraints = vec![Constraint::Length(card_height); rows];
        row_constraints.push(Constraint::Min(0));

        let row_areas = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints(row_constraints)
            .split(inner);

        for (index, card) in cards.iter().enumerate() {
            let row = index / GRID_COLUMNS;
            let col = index % GRID_COLUMNS;
            let columns = RatatuiLayout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(row_areas[row]);
            Self::render_card(f, columns[col], card, index == state.cursor, theme);
        }
    }

    fn render_card(f: &mut Frame, area: Rect, card: &Card, selected: bool, theme: &Theme) {
        let tint = theme.tag_color(&card.color_tag);
        let border_type = if theme.high_contrast || selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };
        let border_color = if selected { theme.accent } else { theme.primary };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(tint));

        let mut label_style = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
        if selected {
            label_style = label_style.add_modifier(Modifier::UNDERLINED);
        }

        let mut lines = vec![
            Line::from(Span::styled(
                format!("[{}]", card.glyph),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(card.label.clone(), label_style)),
        ];
        if area.height > 4 {
            let mut detail = vec![Span::styled(
                card.detail.clone(),
                Style::default().fg(theme.text_muted),
            )];
            if card.generated {
                detail.push(Span::styled(" ✦", Style::default().fg(theme.success)));
            }
            lines.push(Line::from(detail));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_cursor_grid() {
        // 0 1
        // 2 3
        assert_eq!(step_cursor(0, 4, Action::NavigateRight), 1);
        assert_eq!(step_cursor(1, 4, Action::NavigateRight), 1);
        assert_eq!(step_cursor(1, 4, Action::NavigateLeft), 0);
        assert_eq!(step_cursor(0, 4, Action::NavigateDown), 2);
        assert_eq!(step_cursor(3, 4, Action::NavigateUp), 1);
        assert_eq!(step_cursor(2, 4, Action::NavigateDown), 2);
    }

    #[test]
    fn test_step_cursor_ragged_last_row() {
        // 0 1
        // 2
        assert_eq!(step_cursor(1, 3, Action::NavigateDown), 1);
        assert_eq!(step_cursor(0, 3, Action::NavigateDown), 2);
        assert_eq!(step_cursor(2, 3, Action::NavigateRight), 2);
    }

    #[test]
    fn test_step_cursor_clamps() {
        assert_eq!(step_cursor(5, 0, Action::NavigateDown), 0);
        assert_eq!(step_cursor(9, 4, Action::Activate), 3);
    }
}
