use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " ⏎:open  ⌫:back  v:view  /:find  ?:help ";

/// Bottom bar: selection position, record totals, view mode, key hints.
///
/// A pending status message replaces the bar until it expires.
pub struct StatusBarWidget<'a> {
    position: Option<(usize, usize)>,
    total_records: usize,
    view_label: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(view_label: &'a str, total_records: usize, theme: &'a ThemeColors) -> Self {
        Self {
            position: None,
            total_records,
            view_label,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    /// One-based selection position out of the visible row count.
    pub fn position(mut self, selected: usize, rows: usize) -> Self {
        if rows > 0 {
            self.position = Some((selected + 1, rows));
        }
        self
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let bar_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                bar_style.fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let pad = width.saturating_sub(display.chars().count());
            let line = Line::from(vec![
                Span::styled(display, style),
                Span::styled(" ".repeat(pad), style),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let position = match self.position {
            Some((at, of)) => format!(" {}/{} ", at, of),
            None => " 0/0 ".to_string(),
        };
        let noun = if self.total_records == 1 {
            "material"
        } else {
            "materials"
        };
        let info = format!("{} {} | {} ", self.total_records, noun, self.view_label);

        let mut spans = vec![
            Span::styled(position, bar_style.add_modifier(Modifier::BOLD)),
            Span::styled(info, bar_style.fg(self.theme.info_fg)),
        ];

        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let hints_len = KEY_HINTS.chars().count();
        if used + hints_len <= width {
            spans.push(Span::styled(
                " ".repeat(width - used - hints_len),
                bar_style,
            ));
            spans.push(Span::styled(
                KEY_HINTS,
                bar_style.fg(self.theme.dim_fg),
            ));
        } else {
            spans.push(Span::styled(" ".repeat(width.saturating_sub(used)), bar_style));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
