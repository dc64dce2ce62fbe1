use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::theme::ThemeColors;

enum HelpRow {
    Section(&'static str),
    Key(&'static str, &'static str),
}

use HelpRow::{Key, Section};

const BINDINGS: &[HelpRow] = &[
    Section("Moving"),
    Key("j / ↓", "Next row"),
    Key("k / ↑", "Previous row"),
    Key("g / Home", "First row"),
    Key("G / End", "Last row"),
    Key("Scroll wheel", "Move selection (when mouse is enabled)"),
    Section("Folders"),
    Key("Enter / l / →", "Open folder, or show material details"),
    Key("Backspace / h / ←", "Up one folder (outline: collapse)"),
    Key("0", "Back to the module root"),
    Key("1 - 9", "Jump to that breadcrumb"),
    Key("Space", "Expand or collapse (outline view)"),
    Section("Views"),
    Key("v", "Cycle folders → flat → outline"),
    Key("/ or Ctrl+P", "Find a material by path"),
    Key("Ctrl+N / Ctrl+P", "Next / previous match (in finder)"),
    Section("General"),
    Key("?", "Toggle this help"),
    Key("Esc", "Close the open overlay"),
    Key("q / Ctrl+C", "Quit"),
];

/// Scrolling keybinding reference, centered over the listing.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll: usize) -> Self {
        Self { theme, scroll }
    }

    fn body(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let key = Style::default()
            .fg(self.theme.warning_fg)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(self.theme.tree_file_fg);
        let dim = Style::default().fg(self.theme.dim_fg);

        let key_width = BINDINGS
            .iter()
            .filter_map(|row| match row {
                Key(k, _) => Some(k.chars().count()),
                Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 2;

        let mut lines = vec![Line::from(Span::styled("Keybinding Reference", heading))];
        for row in BINDINGS {
            match row {
                Section(name) => {
                    lines.push(Line::default());
                    lines.push(Line::from(Span::styled(
                        *name,
                        heading.add_modifier(Modifier::UNDERLINED),
                    )));
                }
                Key(k, what) => lines.push(Line::from(vec![
                    Span::styled(format!("  {:<width$}", k, width = key_width), key),
                    Span::styled(*what, text),
                ])),
            }
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("? or Esc closes this", dim)));
        lines
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width * 7 / 10).min(72);
        let height = (area.height * 8 / 10).min(40);
        if width < 3 || height < 3 {
            return;
        }
        let rect = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        let body = self.body();
        let visible = rect.height.saturating_sub(2) as usize;
        let scroll = self.scroll.min(body.len().saturating_sub(visible));

        let mut block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        if body.len() > visible {
            block = block.title_bottom(
                Line::from(Span::styled(
                    format!(
                        " {}-{}/{} ",
                        scroll + 1,
                        (scroll + visible).min(body.len()),
                        body.len()
                    ),
                    Style::default().fg(self.theme.dim_fg),
                ))
                .alignment(Alignment::Right),
            );
        }

        Clear.render(rect, buf);
        Paragraph::new(body)
            .block(block)
            .scroll((scroll as u16, 0))
            .render(rect, buf);
    }
}
