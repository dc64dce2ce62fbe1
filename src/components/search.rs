use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::materials::search::SearchState;
use crate::theme::ThemeColors;

/// Fuzzy finder overlay over every material's path.
pub struct SearchWidget<'a> {
    state: &'a SearchState,
    theme: &'a ThemeColors,
}

impl<'a> SearchWidget<'a> {
    pub fn new(state: &'a SearchState, theme: &'a ThemeColors) -> Self {
        Self { state, theme }
    }

    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    fn input_line(&self) -> Line<'a> {
        let state: &'a SearchState = self.state;
        let query = state.query.as_str();
        let cursor = state.cursor_position.min(query.len());
        let (before, rest) = query.split_at(cursor);
        let mut rest_chars = rest.chars();
        let under_cursor = rest_chars
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after = rest_chars.as_str();

        let input_style = Style::default().fg(self.theme.tree_fg);
        Line::from(vec![
            Span::styled(
                "> ",
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(before, input_style),
            Span::styled(
                under_cursor,
                Style::default()
                    .bg(self.theme.tree_fg)
                    .fg(self.theme.dialog_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(after, input_style),
        ])
    }

    /// Path spans with matched chars highlighted, clipped to `max_chars`.
    fn highlighted(
        &self,
        display: &str,
        indices: &[usize],
        selected: bool,
        max_chars: usize,
    ) -> Vec<Span<'static>> {
        let matched: HashSet<usize> = indices.iter().copied().collect();
        let base = if selected {
            Style::default().fg(self.theme.tree_selected_fg)
        } else {
            Style::default().fg(self.theme.tree_file_fg)
        };
        let highlight = Style::default()
            .fg(self.theme.warning_fg)
            .add_modifier(Modifier::BOLD);

        let mut spans = Vec::new();
        let mut run = String::new();
        let mut run_matched = false;
        for (i, ch) in display.chars().take(max_chars).enumerate() {
            let is_match = matched.contains(&i);
            if is_match != run_matched && !run.is_empty() {
                spans.push(Span::styled(
                    std::mem::take(&mut run),
                    if run_matched { highlight } else { base },
                ));
            }
            run_matched = is_match;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, if run_matched { highlight } else { base }));
        }
        spans
    }
}

impl<'a> Widget for SearchWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 5 || area.width < 20 {
            return;
        }

        let dialog_width = (area.width * 60 / 100).clamp(30, 80);
        let dialog_height = (area.height * 60 / 100).clamp(8, 30);
        let rect = Self::centered_rect(dialog_width, dialog_height, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Find material ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        buf.set_line(inner.x, inner.y, &self.input_line(), inner.width);

        if inner.height > 1 {
            let n = self.state.results.len();
            let summary = if self.state.query.is_empty() {
                "Type to search...".to_string()
            } else {
                format!("{} result{}", n, if n == 1 { "" } else { "s" })
            };
            let sep = Line::from(Span::styled(
                format!("─── {} ", summary),
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y + 1, &sep, inner.width);
        }

        // Rows 2.. hold results; the last row holds the hint when there is room.
        let results_start = 2u16;
        let hint_rows = if inner.height > 3 { 1 } else { 0 };
        let visible = inner.height.saturating_sub(results_start + hint_rows) as usize;
        let scroll = (self.state.selected_index + 1).saturating_sub(visible);
        let max_chars = (inner.width as usize).saturating_sub(2);

        for (i, hit) in self
            .state
            .results
            .iter()
            .skip(scroll)
            .take(visible)
            .enumerate()
        {
            let selected = i + scroll == self.state.selected_index;
            let mut spans = vec![if selected {
                Span::styled(
                    "▸ ",
                    Style::default()
                        .fg(self.theme.accent_fg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw("  ")
            }];
            spans.extend(self.highlighted(&hit.display, &hit.match_indices, selected, max_chars));
            buf.set_line(
                inner.x,
                inner.y + results_start + i as u16,
                &Line::from(spans),
                inner.width,
            );
        }

        if hint_rows == 1 {
            let hint = Line::from(Span::styled(
                "[Enter] Reveal  [Esc] Close  [↑↓] Navigate",
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ));
            buf.set_line(inner.x, inner.y + inner.height - 1, &hint, inner.width);
        }
    }
}
