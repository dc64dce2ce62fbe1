use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode, LoadState};
use crate::components::breadcrumbs::BreadcrumbWidget;
use crate::components::detail::DetailWidget;
use crate::components::help::HelpOverlay;
use crate::components::listing::ListingWidget;
use crate::components::search::SearchWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::materials::navigator::ViewMode;
use crate::theme::ThemeColors;

/// Split the frame into breadcrumb bar, listing, and status bar.
fn layout(area: Rect) -> (Rect, Rect, Rect) {
    let [crumbs, listing, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);
    (crumbs, listing, status)
}

/// Render the application UI.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let (crumb_area, listing_area, status_area) = layout(frame.area());

    // Keep the selection visible inside the bordered listing.
    app.update_scroll(listing_area.height.saturating_sub(2) as usize);

    let app = &*app;

    let crumbs = app.nav.breadcrumbs(&app.module.title);
    let mut crumb_widget = BreadcrumbWidget::new(&crumbs, theme);
    if app.nav.view_mode != ViewMode::Hierarchical {
        crumb_widget = crumb_widget.mode_label(app.nav.view_mode.label());
    }
    frame.render_widget(crumb_widget, crumb_area);

    let title = match &app.module.icon {
        Some(icon) => format!(" {} {} ", icon, app.module.title),
        None => format!(" {} ", app.module.title),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg));

    let rows = app.rows();
    let listing = ListingWidget::new(&rows, &app.load_state, theme, app.settings)
        .selection(app.selected_index, app.scroll_offset)
        .connectors(app.nav.view_mode == ViewMode::Outline)
        .block(block);
    frame.render_widget(listing, listing_area);

    // Folder view counts what sits under the current folder.
    let in_scope = match app.nav.view_mode {
        ViewMode::Hierarchical => app.tree.count_under(&app.nav.current_path),
        ViewMode::Flat | ViewMode::Outline => app.tree.len(),
    };
    let mut status = StatusBarWidget::new(app.nav.view_mode.label(), in_scope, theme)
        .position(app.selected_index, rows.len());
    if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg, false);
    } else if let LoadState::Failed(msg) = &app.load_state {
        status = status.status_message(msg, true);
    }
    frame.render_widget(status, status_area);

    let area = frame.area();
    match &app.mode {
        AppMode::Normal => {}
        AppMode::Detail(_) => {
            if let Some(record) = app.detail_record() {
                frame.render_widget(DetailWidget::new(record, theme), area);
            }
        }
        AppMode::Search => frame.render_widget(SearchWidget::new(&app.search, theme), area),
        AppMode::Help => frame.render_widget(HelpOverlay::new(theme, app.help_scroll), area),
    }
}
