use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use crate::materials::path::split_segments;
use crate::materials::record::{resolve_payload_resource, Record};
use crate::theme::ThemeColors;

/// Centered modal describing one material.
pub struct DetailWidget<'a> {
    record: &'a Record,
    theme: &'a ThemeColors,
}

impl<'a> DetailWidget<'a> {
    pub fn new(record: &'a Record, theme: &'a ThemeColors) -> Self {
        Self { record, theme }
    }

    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    fn field(&self, label: &'static str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{:<8}", label),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(value, Style::default().fg(self.theme.tree_fg)),
        ])
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let payload = resolve_payload_resource(self.record);
        let dash = || "-".to_string();

        let mut lines = vec![
            self.field("Path", self.record.path.clone()),
            self.field("Kind", payload.media_kind.label().to_string()),
            self.field("Size", payload.size_label.clone().unwrap_or_else(dash)),
            self.field(
                "Pages",
                payload
                    .page_count
                    .map(|p| p.to_string())
                    .unwrap_or_else(dash),
            ),
            self.field(
                "URL",
                if payload.url.is_empty() {
                    dash()
                } else {
                    payload.url.clone()
                },
            ),
        ];
        if let Some(description) = &payload.description {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                description.clone(),
                Style::default().fg(self.theme.dim_fg),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Esc] Close",
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        )));
        lines
    }
}

impl<'a> Widget for DetailWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 6 {
            return;
        }

        let width = (area.width * 70 / 100).clamp(20, 90);
        let height = (area.height * 60 / 100).clamp(6, 20);
        let rect = Self::centered_rect(width, height, area);

        Clear.render(rect, buf);

        // The file name is the last segment; empty paths fall back to the id.
        let name = split_segments(&self.record.path)
            .last()
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.record.id.to_string());

        let block = Block::default()
            .title(format!(" {} ", name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(rect, buf);
    }
}
