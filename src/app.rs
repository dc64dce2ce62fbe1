use std::time::Instant;

use crate::error::Result;
use crate::materials::navigator::{NavigatorState, ViewMode};
use crate::materials::record::{Record, RecordId};
use crate::materials::search::SearchState;
use crate::materials::source::ModuleInfo;
use crate::materials::tree::{Entry, FileView, OutlineRow, PathTree};

/// Where the module's records are in their one-shot fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The fetch failed; shown as "no materials available".
    Failed(String),
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Detail overlay for one material.
    Detail(RecordId),
    /// Fuzzy finder overlay.
    Search,
    /// Keybinding reference overlay.
    Help,
}

/// Presentation settings resolved from config.
#[derive(Debug, Clone, Copy)]
pub struct DisplaySettings {
    pub use_icons: bool,
    pub show_counts: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            use_icons: true,
            show_counts: true,
        }
    }
}

/// What the selected row would do if activated.
enum Target {
    Folder { name: String, full_path: String },
    File(RecordId),
}

/// Main application state.
pub struct App {
    pub module: ModuleInfo,
    pub load_state: LoadState,
    pub tree: PathTree,
    pub nav: NavigatorState,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pub mode: AppMode,
    pub search: SearchState,
    pub help_scroll: usize,
    pub settings: DisplaySettings,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create an App for `module`, waiting for its records.
    pub fn new(module: ModuleInfo, view_mode: ViewMode, settings: DisplaySettings) -> Self {
        Self {
            module,
            load_state: LoadState::Loading,
            tree: PathTree::build(Vec::new()),
            nav: NavigatorState::with_view_mode(view_mode),
            selected_index: 0,
            scroll_offset: 0,
            should_quit: false,
            mode: AppMode::Normal,
            search: SearchState::default(),
            help_scroll: 0,
            settings,
            status_message: None,
        }
    }

    /// Install the fetched snapshot, or record the failure.
    pub fn handle_records_loaded(&mut self, result: Result<Vec<Record>>) {
        match result {
            Ok(records) => {
                self.tree = PathTree::build(records);
                let ambiguous = self.tree.ambiguous_paths();
                if !ambiguous.is_empty() {
                    tracing::warn!(
                        paths = ?ambiguous,
                        "paths name both a file and a folder; listing both"
                    );
                }
                tracing::info!(
                    module = %self.module.title,
                    records = self.tree.len(),
                    "materials ready"
                );
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    /// Rows of the active view, top to bottom.
    pub fn rows(&self) -> Vec<OutlineRow<'_>> {
        match self.nav.view_mode {
            ViewMode::Hierarchical => self
                .tree
                .list_children(&self.nav.current_path)
                .entries()
                .into_iter()
                .map(|entry| OutlineRow {
                    depth: 0,
                    expanded: false,
                    entry,
                })
                .collect(),
            ViewMode::Flat => self
                .tree
                .records()
                .iter()
                .map(|record| OutlineRow {
                    depth: 0,
                    expanded: false,
                    entry: Entry::File(FileView {
                        name: &record.path,
                        full_path: &record.path,
                        record,
                    }),
                })
                .collect(),
            ViewMode::Outline => self.tree.outline(&self.nav.expanded),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    fn selected_target(&self) -> Option<Target> {
        let rows = self.rows();
        let row = rows.get(self.selected_index)?;
        Some(match &row.entry {
            Entry::Folder(f) => Target::Folder {
                name: f.name.to_string(),
                full_path: f.full_path.to_string(),
            },
            Entry::File(f) => Target::File(f.record.id.clone()),
        })
    }

    /// The record shown by the detail overlay, if any.
    pub fn detail_record(&self) -> Option<&Record> {
        match &self.mode {
            AppMode::Detail(id) => self.tree.record(id),
            _ => None,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.row_count();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Selection ───────────────────────────────────────────────────────────

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.row_count();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        self.selected_index = self.row_count().saturating_sub(1);
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    fn select_where(&mut self, pred: impl Fn(&OutlineRow<'_>) -> bool) {
        let found = self.rows().iter().position(|row| pred(row));
        if let Some(i) = found {
            self.selected_index = i;
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    /// Enter the selected folder, toggle it in outline view, or open a file's details.
    pub fn activate_selected(&mut self) {
        match self.selected_target() {
            Some(Target::Folder { name, full_path }) => {
                if self.nav.view_mode == ViewMode::Outline {
                    self.nav.toggle_expand(&full_path);
                    self.clamp_selection();
                    return;
                }
                match self.nav.descend(&self.tree, &name) {
                    Ok(()) => self.reset_selection(),
                    Err(e) => self.set_status_message(e.to_string()),
                }
            }
            Some(Target::File(id)) => self.mode = AppMode::Detail(id),
            None => {}
        }
    }

    /// Go up one folder, keeping the folder just left selected.
    ///
    /// In outline view, collapse the selected folder or move to its parent row.
    pub fn go_back(&mut self) {
        match self.nav.view_mode {
            ViewMode::Hierarchical => {
                let Some(left) = self.nav.current_path.last().cloned() else {
                    return;
                };
                if self.nav.ascend().is_ok() {
                    self.reset_selection();
                    self.select_where(|row| {
                        matches!(&row.entry, Entry::Folder(f) if f.name == left)
                    });
                }
            }
            ViewMode::Outline => self.collapse_or_parent(),
            ViewMode::Flat => {}
        }
    }

    fn collapse_or_parent(&mut self) {
        let rows = self.rows();
        let Some(row) = rows.get(self.selected_index) else {
            return;
        };
        if let Entry::Folder(f) = &row.entry {
            if row.expanded {
                let path = f.full_path.to_string();
                drop(rows);
                self.nav.toggle_expand(&path);
                self.clamp_selection();
                return;
            }
        }
        if row.depth == 0 {
            return;
        }
        let parent = rows[..self.selected_index]
            .iter()
            .rposition(|r| r.depth + 1 == row.depth);
        if let Some(i) = parent {
            self.selected_index = i;
        }
    }

    /// Expand or collapse the selected folder in outline view.
    pub fn toggle_expand_selected(&mut self) {
        if self.nav.view_mode != ViewMode::Outline {
            return;
        }
        if let Some(Target::Folder { full_path, .. }) = self.selected_target() {
            self.nav.toggle_expand(&full_path);
            self.clamp_selection();
        }
    }

    /// Jump to the breadcrumb at `index` (`-1` = root) in folder view.
    pub fn jump_to_breadcrumb(&mut self, index: isize) {
        if self.nav.view_mode != ViewMode::Hierarchical {
            return;
        }
        match self.nav.jump_to_breadcrumb(index) {
            Ok(()) => self.reset_selection(),
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    /// Cycle folders → flat → outline.
    pub fn cycle_view_mode(&mut self) {
        self.nav.cycle_view_mode();
        self.reset_selection();
        self.set_status_message(format!("View: {}", self.nav.view_mode.label()));
    }

    // ── Overlays ────────────────────────────────────────────────────────────

    pub fn close_overlay(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == AppMode::Help {
            AppMode::Normal
        } else {
            self.help_scroll = 0;
            AppMode::Help
        };
    }

    pub fn open_search(&mut self) {
        self.search = SearchState::default();
        self.mode = AppMode::Search;
    }

    pub fn search_input(&mut self, c: char) {
        self.search.insert_char(c, self.tree.records());
    }

    pub fn search_backspace(&mut self) {
        self.search.delete_char(self.tree.records());
    }

    /// Reveal the chosen hit in folder view and select it.
    pub fn accept_search(&mut self) {
        let Some(hit) = self.search.selected().cloned() else {
            self.close_overlay();
            return;
        };
        self.nav.reveal(&self.tree, &hit.display);
        self.reset_selection();
        self.select_where(|row| matches!(&row.entry, Entry::File(f) if f.record.id == hit.id));
        self.mode = AppMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn module() -> ModuleInfo {
        ModuleInfo {
            id: "mod-1".into(),
            slug: "educacao".into(),
            title: "Educação".into(),
            icon: None,
        }
    }

    fn setup_app() -> App {
        let mut app = App::new(module(), ViewMode::Hierarchical, DisplaySettings::default());
        app.handle_records_loaded(Ok(vec![
            Record::new("1", "Intro.pdf"),
            Record::new("2", "Unit1/Lesson1.pdf"),
            Record::new("3", "Unit1/Lesson2.pdf"),
            Record::new("4", "Unit2/Lesson1.pdf"),
            Record::new("5", "Unit2/Deep/Extra.pdf"),
        ]));
        app
    }

    fn row_names(app: &App) -> Vec<String> {
        app.rows().iter().map(|r| r.entry.name().to_string()).collect()
    }

    #[test]
    fn starts_loading() {
        let app = App::new(module(), ViewMode::Hierarchical, DisplaySettings::default());
        assert_eq!(app.load_state, LoadState::Loading);
        assert_eq!(app.row_count(), 0);
    }

    #[test]
    fn failed_fetch_is_recorded() {
        let mut app = App::new(module(), ViewMode::Hierarchical, DisplaySettings::default());
        app.handle_records_loaded(Err(AppError::UnknownModule("x".into())));
        assert!(matches!(app.load_state, LoadState::Failed(ref m) if m.contains("Unknown module")));
        assert!(!app.is_ready());
    }

    #[test]
    fn root_rows_folders_first() {
        let app = setup_app();
        assert!(app.is_ready());
        assert_eq!(row_names(&app), vec!["Unit1", "Unit2", "Intro.pdf"]);
    }

    #[test]
    fn select_next_clamps_at_end() {
        let mut app = setup_app();
        app.select_last();
        assert_eq!(app.selected_index, 2);
        app.select_next();
        assert_eq!(app.selected_index, 2);
        app.select_first();
        app.select_previous();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn activate_folder_descends() {
        let mut app = setup_app();
        app.activate_selected();
        assert_eq!(app.nav.current_path, vec!["Unit1"]);
        assert_eq!(row_names(&app), vec!["Lesson1.pdf", "Lesson2.pdf"]);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn activate_file_opens_detail() {
        let mut app = setup_app();
        app.select_last();
        app.activate_selected();
        assert_eq!(app.mode, AppMode::Detail(RecordId::from("1")));
        assert_eq!(app.detail_record().map(|r| r.path.as_str()), Some("Intro.pdf"));
        app.close_overlay();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn go_back_selects_folder_left() {
        let mut app = setup_app();
        app.select_next();
        app.activate_selected();
        assert_eq!(app.nav.current_path, vec!["Unit2"]);
        app.go_back();
        assert!(app.nav.is_at_root());
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn go_back_at_root_is_noop() {
        let mut app = setup_app();
        app.select_next();
        app.go_back();
        assert!(app.nav.is_at_root());
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn breadcrumb_jump_and_bad_index() {
        let mut app = setup_app();
        app.select_next();
        app.activate_selected();
        app.activate_selected();
        assert_eq!(app.nav.current_path, vec!["Unit2", "Deep"]);
        app.jump_to_breadcrumb(0);
        assert_eq!(app.nav.current_path, vec!["Unit2"]);
        app.jump_to_breadcrumb(5);
        assert_eq!(app.nav.current_path, vec!["Unit2"]);
        assert!(app.status_message.is_some());
        app.jump_to_breadcrumb(-1);
        assert!(app.nav.is_at_root());
    }

    #[test]
    fn flat_view_lists_every_record_in_catalog_order() {
        let mut app = setup_app();
        app.cycle_view_mode();
        assert_eq!(app.nav.view_mode, ViewMode::Flat);
        assert_eq!(
            row_names(&app),
            vec![
                "Intro.pdf",
                "Unit1/Lesson1.pdf",
                "Unit1/Lesson2.pdf",
                "Unit2/Lesson1.pdf",
                "Unit2/Deep/Extra.pdf"
            ]
        );
    }

    #[test]
    fn outline_view_toggles_and_collapses() {
        let mut app = setup_app();
        app.cycle_view_mode();
        app.cycle_view_mode();
        assert_eq!(app.nav.view_mode, ViewMode::Outline);
        assert_eq!(row_names(&app), vec!["Unit1", "Unit2", "Intro.pdf"]);

        app.select_next();
        app.activate_selected();
        assert_eq!(
            row_names(&app),
            vec!["Unit1", "Unit2", "Deep", "Lesson1.pdf", "Intro.pdf"]
        );
        assert!(app.nav.is_at_root());

        app.select_next();
        app.select_next();
        app.go_back();
        assert_eq!(app.selected_index, 1);
        app.go_back();
        assert_eq!(row_names(&app), vec!["Unit1", "Unit2", "Intro.pdf"]);
    }

    #[test]
    fn toggle_expand_only_in_outline() {
        let mut app = setup_app();
        app.toggle_expand_selected();
        assert!(app.nav.expanded.is_empty());
        app.nav.set_view_mode(ViewMode::Outline);
        app.toggle_expand_selected();
        assert!(app.nav.expanded.contains("Unit1"));
    }

    #[test]
    fn returning_to_folder_view_starts_at_root() {
        let mut app = setup_app();
        app.activate_selected();
        assert_eq!(app.nav.depth(), 1);
        app.cycle_view_mode();
        app.cycle_view_mode();
        app.cycle_view_mode();
        assert_eq!(app.nav.view_mode, ViewMode::Hierarchical);
        assert!(app.nav.is_at_root());
    }

    #[test]
    fn search_reveals_record() {
        let mut app = setup_app();
        app.nav.set_view_mode(ViewMode::Flat);
        app.open_search();
        for c in "extra".chars() {
            app.search_input(c);
        }
        app.accept_search();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.nav.view_mode, ViewMode::Hierarchical);
        assert_eq!(app.nav.current_path, vec!["Unit2", "Deep"]);
        assert_eq!(row_names(&app)[app.selected_index], "Extra.pdf");
    }

    #[test]
    fn search_with_no_hits_just_closes() {
        let mut app = setup_app();
        app.open_search();
        app.search_input('#');
        app.accept_search();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.nav.is_at_root());
    }

    #[test]
    fn help_toggles() {
        let mut app = setup_app();
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Help);
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn update_scroll_follows_selection() {
        let mut app = setup_app();
        app.nav.set_view_mode(ViewMode::Flat);
        app.select_last();
        app.update_scroll(2);
        assert_eq!(app.scroll_offset, 3);
        app.select_first();
        app.update_scroll(2);
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn status_message_expiry() {
        let mut app = setup_app();
        app.set_status_message("fresh".into());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
        app.status_message = Some((
            "old".into(),
            Instant::now() - std::time::Duration::from_secs(5),
        ));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }
}
