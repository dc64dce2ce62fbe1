//! Navigation cursor over a `PathTree`: the current folder stack, the set of
//! expanded folders for the outline view, and the active view mode.

use std::collections::HashSet;

use thiserror::Error;

use crate::materials::path::{split_segments, starts_with_segments};
use crate::materials::tree::{parent_segments, PathTree};

/// Errors from programmatic navigation requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("no folder named '{0}' in the current directory")]
    InvalidFolder(String),

    #[error("breadcrumb index {index} is out of range at depth {depth}")]
    OutOfRange { index: isize, depth: usize },
}

/// How the material list is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Drill down one folder at a time.
    #[default]
    Hierarchical,
    /// Every record in catalog order, no folders.
    Flat,
    /// The whole tree as an indented list with expandable folders.
    Outline,
}

impl ViewMode {
    /// Parse a view mode from config. Unknown values fall back to hierarchical.
    pub fn from_str(s: &str) -> Self {
        match s {
            "flat" => ViewMode::Flat,
            "outline" => ViewMode::Outline,
            _ => ViewMode::Hierarchical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Hierarchical => "Folders",
            ViewMode::Flat => "Flat",
            ViewMode::Outline => "Outline",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ViewMode::Hierarchical => ViewMode::Flat,
            ViewMode::Flat => ViewMode::Outline,
            ViewMode::Outline => ViewMode::Hierarchical,
        }
    }
}

/// One breadcrumb entry. `index == -1` is the root entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub index: isize,
}

/// View-local navigation state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigatorState {
    pub current_path: Vec<String>,
    pub expanded: HashSet<String>,
    pub view_mode: ViewMode,
}

impl NavigatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view_mode(mode: ViewMode) -> Self {
        Self {
            view_mode: mode,
            ..Self::default()
        }
    }

    pub fn depth(&self) -> usize {
        self.current_path.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.depth() == 0
    }

    /// Enter the folder `name` below the current path.
    pub fn descend(&mut self, tree: &PathTree, name: &str) -> Result<(), NavError> {
        let mut target = self.current_path.clone();
        target.push(name.to_string());
        if !tree.folder_exists(&target) {
            return Err(NavError::InvalidFolder(name.to_string()));
        }
        tracing::debug!(folder = name, depth = target.len(), "descend");
        self.current_path = target;
        Ok(())
    }

    /// Pop the last segment. Fails at root.
    pub fn ascend(&mut self) -> Result<(), NavError> {
        if self.current_path.pop().is_none() {
            return Err(NavError::OutOfRange {
                index: -1,
                depth: 0,
            });
        }
        tracing::debug!(depth = self.current_path.len(), "ascend");
        Ok(())
    }

    /// Keep segments `0..=index`; `-1` jumps to root.
    pub fn jump_to_breadcrumb(&mut self, index: isize) -> Result<(), NavError> {
        let depth = self.current_path.len();
        if index < -1 || index >= depth as isize {
            return Err(NavError::OutOfRange { index, depth });
        }
        self.current_path.truncate((index + 1) as usize);
        tracing::debug!(index, depth = self.current_path.len(), "jump to breadcrumb");
        Ok(())
    }

    /// Flip a folder's membership in the expanded set. Collapsing a folder
    /// also collapses every folder below it.
    pub fn toggle_expand(&mut self, full_path: &str) {
        if self.expanded.remove(full_path) {
            let prefix = split_segments(full_path);
            self.expanded.retain(|open| {
                !starts_with_segments(split_segments(open).as_slice(), prefix.as_slice())
            });
        } else {
            self.expanded.insert(full_path.to_string());
        }
    }

    /// Switch presentation. Entering hierarchical mode starts over at root.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == ViewMode::Hierarchical {
            self.current_path.clear();
        }
        self.view_mode = mode;
    }

    pub fn cycle_view_mode(&mut self) {
        self.set_view_mode(self.view_mode.next());
    }

    /// Root entry first, then one entry per segment of the current path.
    pub fn breadcrumbs(&self, root_label: &str) -> Vec<Breadcrumb> {
        std::iter::once(Breadcrumb {
            label: root_label.to_string(),
            index: -1,
        })
        .chain(
            self.current_path
                .iter()
                .enumerate()
                .map(|(i, seg)| Breadcrumb {
                    label: seg.clone(),
                    index: i as isize,
                }),
        )
        .collect()
    }

    /// Show the folder containing the record at `record_path` in hierarchical mode.
    ///
    /// Folders the tree does not know (a stray path) leave the state at root.
    pub fn reveal(&mut self, tree: &PathTree, record_path: &str) {
        let parent = parent_segments(record_path);
        self.view_mode = ViewMode::Hierarchical;
        self.current_path = if tree.folder_exists(&parent) {
            parent
        } else {
            Vec::new()
        };
    }
}
