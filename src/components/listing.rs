use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::{DisplaySettings, LoadState};
use crate::materials::record::MediaKind;
use crate::materials::tree::{Entry, OutlineRow};
use crate::theme::ThemeColors;

/// Renders the rows of the active view, or the loading/empty/failed state.
pub struct ListingWidget<'a> {
    rows: &'a [OutlineRow<'a>],
    selected: usize,
    scroll: usize,
    load_state: &'a LoadState,
    theme: &'a ThemeColors,
    settings: DisplaySettings,
    /// Draw box-drawing connectors for nested rows.
    connectors: bool,
    block: Option<Block<'a>>,
}

impl<'a> ListingWidget<'a> {
    pub fn new(
        rows: &'a [OutlineRow<'a>],
        load_state: &'a LoadState,
        theme: &'a ThemeColors,
        settings: DisplaySettings,
    ) -> Self {
        Self {
            rows,
            selected: 0,
            scroll: 0,
            load_state,
            theme,
            settings,
            connectors: false,
            block: None,
        }
    }

    pub fn selection(mut self, selected: usize, scroll: usize) -> Self {
        self.selected = selected;
        self.scroll = scroll;
        self
    }

    pub fn connectors(mut self, on: bool) -> Self {
        self.connectors = on;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Whether no later row sits at `depth` before the tree climbs above it.
    fn is_last_at_depth(rows: &[OutlineRow<'_>], index: usize, depth: usize) -> bool {
        for row in &rows[index + 1..] {
            if row.depth < depth {
                return true;
            }
            if row.depth == depth {
                return false;
            }
        }
        true
    }

    /// Build the indentation prefix for an outline row.
    fn build_prefix(rows: &[OutlineRow<'_>], index: usize) -> String {
        let depth = rows[index].depth;
        if depth == 0 {
            return String::new();
        }
        let mut parts: Vec<&str> = Vec::new();
        for d in 1..depth {
            // Find the ancestor row at depth d.
            let ancestor = rows[..index].iter().rposition(|r| r.depth == d);
            let ancestor_is_last = ancestor
                .map(|a| Self::is_last_at_depth(rows, a, d))
                .unwrap_or(true);
            parts.push(if ancestor_is_last { "   " } else { "│  " });
        }
        parts.push(if Self::is_last_at_depth(rows, index, depth) {
            "└──"
        } else {
            "├──"
        });
        parts.join("")
    }

    fn indicator(&self, row: &OutlineRow<'_>) -> &'static str {
        match (&row.entry, self.settings.use_icons) {
            (Entry::Folder(_), true) if row.expanded => " ",
            (Entry::Folder(_), true) => " ",
            (Entry::Folder(_), false) if row.expanded => "[-] ",
            (Entry::Folder(_), false) => "[+] ",
            (Entry::File(f), icons) => media_icon(f.record.payload.media_kind, icons),
        }
    }

    fn meta(&self, row: &OutlineRow<'_>) -> String {
        match &row.entry {
            Entry::Folder(f) if self.settings.show_counts => {
                let noun = if f.child_count == 1 { "item" } else { "items" };
                format!("{} {}", f.child_count, noun)
            }
            Entry::Folder(_) => String::new(),
            Entry::File(f) => {
                let payload = &f.record.payload;
                let mut parts = Vec::new();
                if let Some(size) = &payload.size_label {
                    parts.push(size.clone());
                }
                if let Some(pages) = payload.page_count {
                    parts.push(format!("{} pp", pages));
                }
                parts.join(" · ")
            }
        }
    }

    fn placeholder(&self) -> Option<(String, Style)> {
        match self.load_state {
            LoadState::Loading => Some((
                "Loading materials...".into(),
                Style::default().fg(self.theme.info_fg),
            )),
            LoadState::Failed(msg) => Some((
                format!("No materials available ({})", msg),
                Style::default().fg(self.theme.error_fg),
            )),
            LoadState::Ready if self.rows.is_empty() => Some((
                "No materials available in this folder".into(),
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoadState::Ready => None,
        }
    }
}

/// Icon for a material kind.
pub fn media_icon(kind: MediaKind, use_icons: bool) -> &'static str {
    match (kind, use_icons) {
        (MediaKind::Pdf, true) => " ",
        (MediaKind::Video, true) => " ",
        (MediaKind::Text, true) => " ",
        (MediaKind::Other, true) => " ",
        (MediaKind::Pdf, false) => "[P] ",
        (MediaKind::Video, false) => "[V] ",
        (MediaKind::Text, false) => "[T] ",
        (MediaKind::Other, false) => "[F] ",
    }
}

impl<'a> Widget for ListingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if visible_height == 0 || inner_area.width == 0 {
            return;
        }

        if let Some((text, style)) = self.placeholder() {
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner_area.x + 1, inner_area.y, &line, inner_area.width.saturating_sub(1));
            return;
        }

        let width = inner_area.width as usize;
        let visible = self.rows.iter().enumerate().skip(self.scroll).take(visible_height);

        for (i, (idx, row)) in visible.enumerate() {
            let y = inner_area.y + i as u16;

            let prefix = if self.connectors {
                Self::build_prefix(self.rows, idx)
            } else {
                String::new()
            };
            let indicator = self.indicator(row);
            let meta = self.meta(row);

            let style = if idx == self.selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                match row.entry {
                    Entry::Folder(_) => Style::default()
                        .fg(self.theme.tree_dir_fg)
                        .add_modifier(Modifier::BOLD),
                    Entry::File(_) => Style::default().fg(self.theme.tree_file_fg),
                }
            };
            let meta_style = if idx == self.selected {
                style
            } else {
                Style::default().fg(self.theme.dim_fg)
            };

            let label = format!("{}{}{}", prefix, indicator, row.entry.name());
            let label_width = label.chars().count();
            let meta_width = meta.chars().count();
            let gap = width.saturating_sub(label_width + meta_width + 1);

            let mut spans = vec![Span::styled(label, style)];
            if !meta.is_empty() && label_width + meta_width + 2 <= width {
                spans.push(Span::styled(" ".repeat(gap), style));
                spans.push(Span::styled(meta, meta_style));
                spans.push(Span::styled(" ", style));
            } else if idx == self.selected {
                spans.push(Span::styled(
                    " ".repeat(width.saturating_sub(label_width)),
                    style,
                ));
            }

            buf.set_line(inner_area.x, y, &Line::from(spans), inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::record::{Payload, Record};
    use crate::materials::tree::PathTree;
    use crate::theme::dark_theme;
    use std::collections::HashSet;

    fn render_to_string(widget: ListingWidget<'_>, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn ascii() -> DisplaySettings {
        DisplaySettings {
            use_icons: false,
            show_counts: true,
        }
    }

    fn tree() -> PathTree {
        PathTree::build(vec![
            Record::new("1", "Unit1/Lesson1.pdf").with_payload(Payload {
                media_kind: MediaKind::Pdf,
                size_label: Some("1.2 MB".into()),
                page_count: Some(10),
                ..Default::default()
            }),
            Record::new("2", "Unit1/Sub/Deep.pdf"),
            Record::new("3", "Intro.pdf"),
        ])
    }

    #[test]
    fn renders_folder_counts_and_file_meta() {
        let tree = tree();
        let listing = tree.list_children::<&str>(&[]);
        let rows: Vec<OutlineRow<'_>> = listing
            .entries()
            .into_iter()
            .map(|entry| OutlineRow {
                depth: 0,
                expanded: false,
                entry,
            })
            .collect();
        let theme = dark_theme();
        let ready = LoadState::Ready;
        let lines = render_to_string(ListingWidget::new(&rows, &ready, &theme, ascii()), 40, 3);
        assert!(lines[0].starts_with("[+] Unit1"));
        assert!(lines[0].contains("2 items"));
        assert!(lines[1].starts_with("[F] Intro.pdf"));

        let unit1 = tree.list_children(&["Unit1"]);
        let rows: Vec<OutlineRow<'_>> = unit1
            .entries()
            .into_iter()
            .map(|entry| OutlineRow {
                depth: 0,
                expanded: false,
                entry,
            })
            .collect();
        let lines = render_to_string(ListingWidget::new(&rows, &ready, &theme, ascii()), 40, 2);
        assert!(lines[0].contains("1 item"));
        assert!(lines[1].starts_with("[P] Lesson1.pdf"));
        assert!(lines[1].contains("1.2 MB · 10 pp"));
    }

    #[test]
    fn outline_connectors() {
        let tree = tree();
        let expanded: HashSet<String> = ["Unit1".to_string(), "Unit1/Sub".to_string()].into();
        let rows = tree.outline(&expanded);
        assert_eq!(ListingWidget::build_prefix(&rows, 0), "");
        assert_eq!(ListingWidget::build_prefix(&rows, 1), "├──"); // Sub
        assert_eq!(ListingWidget::build_prefix(&rows, 2), "│  └──"); // Deep.pdf
        assert_eq!(ListingWidget::build_prefix(&rows, 3), "└──"); // Lesson1.pdf
    }

    #[test]
    fn placeholders_for_each_state() {
        let theme = dark_theme();
        let rows: Vec<OutlineRow<'_>> = Vec::new();

        let loading = LoadState::Loading;
        let lines = render_to_string(ListingWidget::new(&rows, &loading, &theme, ascii()), 40, 1);
        assert!(lines[0].contains("Loading materials"));

        let failed = LoadState::Failed("I/O error: gone".into());
        let lines = render_to_string(ListingWidget::new(&rows, &failed, &theme, ascii()), 60, 1);
        assert!(lines[0].contains("No materials available"));

        let ready = LoadState::Ready;
        let lines = render_to_string(ListingWidget::new(&rows, &ready, &theme, ascii()), 40, 1);
        assert!(lines[0].contains("No materials available in this folder"));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let theme = dark_theme();
        let rows: Vec<OutlineRow<'_>> = Vec::new();
        let ready = LoadState::Ready;
        let widget = ListingWidget::new(&rows, &ready, &theme, ascii());
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
