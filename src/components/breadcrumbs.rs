use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::materials::navigator::Breadcrumb;
use crate::theme::ThemeColors;

const SEPARATOR: &str = " › ";

/// One-line trail from the module root to the current folder.
///
/// Each crumb carries the digit that jumps to it (`0` for root).
pub struct BreadcrumbWidget<'a> {
    crumbs: &'a [Breadcrumb],
    theme: &'a ThemeColors,
    /// Flat and Outline views have no current folder; show a mode label instead.
    mode_label: Option<&'a str>,
}

impl<'a> BreadcrumbWidget<'a> {
    pub fn new(crumbs: &'a [Breadcrumb], theme: &'a ThemeColors) -> Self {
        Self {
            crumbs,
            theme,
            mode_label: None,
        }
    }

    pub fn mode_label(mut self, label: &'a str) -> Self {
        self.mode_label = Some(label);
        self
    }
}

/// Digit hint for a crumb, if it is reachable by a single key.
fn hint(index: isize) -> Option<char> {
    match index {
        -1 => Some('0'),
        0..=8 => char::from_digit(index as u32 + 1, 10),
        _ => None,
    }
}

impl<'a> Widget for BreadcrumbWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let hint_style = Style::default().fg(self.theme.dim_fg);
        let crumb_style = Style::default().fg(self.theme.breadcrumb_fg);
        let current_style = crumb_style.add_modifier(Modifier::BOLD);
        let sep_style = Style::default().fg(self.theme.border_fg);

        let mut spans = Vec::new();
        let last = self.crumbs.len().saturating_sub(1);
        for (i, crumb) in self.crumbs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(SEPARATOR, sep_style));
            }
            if let Some(c) = hint(crumb.index) {
                spans.push(Span::styled(format!("{}:", c), hint_style));
            }
            let style = if i == last { current_style } else { crumb_style };
            spans.push(Span::styled(crumb.label.clone(), style));
        }

        if let Some(label) = self.mode_label {
            spans.push(Span::styled(
                format!("  [{}]", label),
                Style::default().fg(self.theme.accent_fg),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::navigator::NavigatorState;
    use crate::theme::dark_theme;

    fn line(widget: BreadcrumbWidget<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn hints_follow_crumb_index() {
        assert_eq!(hint(-1), Some('0'));
        assert_eq!(hint(0), Some('1'));
        assert_eq!(hint(8), Some('9'));
        assert_eq!(hint(9), None);
    }

    #[test]
    fn renders_trail_with_hints() {
        let mut nav = NavigatorState::new();
        nav.current_path = vec!["Unit1".into(), "Week2".into()];
        let crumbs = nav.breadcrumbs("Anatomy");
        let theme = dark_theme();
        let text = line(BreadcrumbWidget::new(&crumbs, &theme), 60);
        assert!(text.starts_with("0:Anatomy › 1:Unit1 › 2:Week2"));
    }

    #[test]
    fn mode_label_is_appended() {
        let crumbs = NavigatorState::new().breadcrumbs("Anatomy");
        let theme = dark_theme();
        let text = line(BreadcrumbWidget::new(&crumbs, &theme).mode_label("Flat"), 40);
        assert!(text.contains("[Flat]"));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        BreadcrumbWidget::new(&[], &theme).render(area, &mut buf);
    }
}
