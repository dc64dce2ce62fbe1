use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::materials::path::{join_segments, split_segments};
use crate::materials::record::{Record, RecordId};

/// Index of a node in the tree arena.
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
enum NodeKind {
    Folder {
        /// Child folders, sorted by name.
        folders: Vec<NodeId>,
        /// Child folders by exact segment name.
        folder_index: HashMap<String, NodeId>,
        /// Child files, sorted by name then catalog order.
        files: Vec<NodeId>,
        /// Records anywhere below this folder.
        record_count: usize,
    },
    File {
        /// Position of the record in catalog order.
        record: usize,
    },
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    full_path: String,
    kind: NodeKind,
}

impl Node {
    fn folder(name: String, full_path: String) -> Self {
        Self {
            name,
            full_path,
            kind: NodeKind::Folder {
                folders: Vec::new(),
                folder_index: HashMap::new(),
                files: Vec::new(),
                record_count: 0,
            },
        }
    }
}

/// A folder entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderView<'a> {
    pub name: &'a str,
    pub full_path: &'a str,
    /// Records at any depth below this folder.
    pub child_count: usize,
}

/// A file entry in a directory listing. Always identify it by `record.id`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileView<'a> {
    pub name: &'a str,
    pub full_path: &'a str,
    pub record: &'a Record,
}

/// Either kind of listing entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<'a> {
    Folder(FolderView<'a>),
    File(FileView<'a>),
}

impl<'a> Entry<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Entry::Folder(f) => f.name,
            Entry::File(f) => f.name,
        }
    }

    pub fn full_path(&self) -> &'a str {
        match self {
            Entry::Folder(f) => f.full_path,
            Entry::File(f) => f.full_path,
        }
    }
}

/// Immediate children of one directory: folders first, then files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing<'a> {
    pub folders: Vec<FolderView<'a>>,
    pub files: Vec<FileView<'a>>,
}

impl<'a> Listing<'a> {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    /// Folders followed by files, in display order.
    pub fn entries(&self) -> Vec<Entry<'a>> {
        self.folders
            .iter()
            .cloned()
            .map(Entry::Folder)
            .chain(self.files.iter().cloned().map(Entry::File))
            .collect()
    }
}

/// One row of the whole-tree outline presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow<'a> {
    pub depth: usize,
    pub expanded: bool,
    pub entry: Entry<'a>,
}

/// Folder hierarchy materialized from a flat list of records.
///
/// Built once per fetch into an arena of nodes; every query walks the arena
/// instead of rescanning the records.
#[derive(Debug, Clone)]
pub struct PathTree {
    nodes: Vec<Node>,
    records: Vec<Record>,
}

impl PathTree {
    /// Build the tree. Never fails: empty segments are skipped, and a record
    /// with no segments at all becomes a root-level file named by its id.
    pub fn build(records: Vec<Record>) -> Self {
        let mut tree = Self {
            nodes: vec![Node::folder(String::new(), String::new())],
            records: Vec::new(),
        };

        for (idx, record) in records.iter().enumerate() {
            let segments = split_segments(&record.path);
            let (dirs, leaf) = match segments.split_last() {
                Some((leaf, dirs)) => (dirs, leaf.to_string()),
                None => (&[][..], record.id.to_string()),
            };

            let mut cur = ROOT;
            tree.bump_count(cur);
            for dir in dirs {
                cur = tree.folder_child(cur, dir);
                tree.bump_count(cur);
            }

            let id = tree.nodes.len();
            tree.nodes.push(Node {
                name: leaf,
                full_path: record.path.clone(),
                kind: NodeKind::File { record: idx },
            });
            if let NodeKind::Folder { files, .. } = &mut tree.nodes[cur].kind {
                files.push(id);
            }
        }

        tree.records = records;
        tree.sort_children();
        tracing::debug!(
            records = tree.records.len(),
            nodes = tree.nodes.len(),
            "materialized path tree"
        );
        tree
    }

    fn bump_count(&mut self, id: NodeId) {
        if let NodeKind::Folder { record_count, .. } = &mut self.nodes[id].kind {
            *record_count += 1;
        }
    }

    /// Find or create the folder named `name` directly under `parent`.
    fn folder_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let NodeKind::Folder { folder_index, .. } = &self.nodes[parent].kind {
            if let Some(&id) = folder_index.get(name) {
                return id;
            }
        }

        let full_path = if parent == ROOT {
            name.to_string()
        } else {
            join_segments(&[self.nodes[parent].full_path.as_str(), name])
        };
        let id = self.nodes.len();
        self.nodes.push(Node::folder(name.to_string(), full_path));
        if let NodeKind::Folder {
            folders,
            folder_index,
            ..
        } = &mut self.nodes[parent].kind
        {
            folders.push(id);
            folder_index.insert(name.to_string(), id);
        }
        id
    }

    fn sort_children(&mut self) {
        let names: Vec<String> = self.nodes.iter().map(|n| n.name.clone()).collect();
        // `sort_by` is stable, so equal names keep catalog order.
        let by_name = |a: &NodeId, b: &NodeId| compare_names(&names[*a], &names[*b]);
        for node in &mut self.nodes {
            if let NodeKind::Folder { folders, files, .. } = &mut node.kind {
                folders.sort_by(by_name);
                files.sort_by(by_name);
            }
        }
    }

    /// Resolve a segment stack to its folder node.
    fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let mut cur = ROOT;
        for seg in path {
            match &self.nodes[cur].kind {
                NodeKind::Folder { folder_index, .. } => {
                    cur = *folder_index.get(seg.as_ref())?;
                }
                NodeKind::File { .. } => return None,
            }
        }
        Some(cur)
    }

    fn folder_view(&self, id: NodeId) -> FolderView<'_> {
        let node = &self.nodes[id];
        let child_count = match &node.kind {
            NodeKind::Folder { record_count, .. } => *record_count,
            NodeKind::File { .. } => 0,
        };
        FolderView {
            name: &node.name,
            full_path: &node.full_path,
            child_count,
        }
    }

    fn file_view(&self, id: NodeId) -> Option<FileView<'_>> {
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::File { record } => Some(FileView {
                name: &node.name,
                full_path: &node.full_path,
                record: &self.records[record],
            }),
            NodeKind::Folder { .. } => None,
        }
    }

    /// Immediate children of `current_path`. An unknown path lists as empty.
    pub fn list_children<S: AsRef<str>>(&self, current_path: &[S]) -> Listing<'_> {
        let Some(dir) = self.resolve(current_path) else {
            return Listing::default();
        };
        match &self.nodes[dir].kind {
            NodeKind::Folder { folders, files, .. } => Listing {
                folders: folders.iter().map(|&id| self.folder_view(id)).collect(),
                files: files.iter().filter_map(|&id| self.file_view(id)).collect(),
            },
            NodeKind::File { .. } => Listing::default(),
        }
    }

    /// Whether `path` names a folder inferred from at least one record.
    pub fn folder_exists<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.resolve(path).is_some()
    }

    /// Number of records at any depth below `path`.
    pub fn count_under<S: AsRef<str>>(&self, path: &[S]) -> usize {
        self.resolve(path)
            .map(|id| self.folder_view(id).child_count)
            .unwrap_or(0)
    }

    /// Depth-first rows of the whole tree. Folders listed in `expanded`
    /// (by full path) have their contents included.
    pub fn outline(&self, expanded: &HashSet<String>) -> Vec<OutlineRow<'_>> {
        let mut rows = Vec::new();
        self.outline_into(ROOT, 0, expanded, &mut rows);
        rows
    }

    fn outline_into<'a>(
        &'a self,
        dir: NodeId,
        depth: usize,
        expanded: &HashSet<String>,
        rows: &mut Vec<OutlineRow<'a>>,
    ) {
        let NodeKind::Folder { folders, files, .. } = &self.nodes[dir].kind else {
            return;
        };
        for &id in folders {
            let view = self.folder_view(id);
            let is_open = expanded.contains(view.full_path);
            rows.push(OutlineRow {
                depth,
                expanded: is_open,
                entry: Entry::Folder(view),
            });
            if is_open {
                self.outline_into(id, depth + 1, expanded, rows);
            }
        }
        for &id in files {
            if let Some(view) = self.file_view(id) {
                rows.push(OutlineRow {
                    depth,
                    expanded: false,
                    entry: Entry::File(view),
                });
            }
        }
    }

    /// Full paths that name both a file and a folder in the same directory.
    ///
    /// Both interpretations stay in listings; this only reports them.
    pub fn ambiguous_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for node in &self.nodes {
            let NodeKind::Folder {
                folder_index,
                files,
                ..
            } = &node.kind
            else {
                continue;
            };
            for &fid in files {
                if let Some(&dir) = folder_index.get(&self.nodes[fid].name) {
                    let path = self.nodes[dir].full_path.as_str();
                    if !out.contains(&path) {
                        out.push(path);
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Records in catalog order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Case-insensitive name order with an exact-name tie-break.
///
/// Uses Unicode lowercasing, not locale collation: `"Ábaco"` sorts after `"zebra"`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Segment stack of the folder holding the record at `record_path`.
pub fn parent_segments(record_path: &str) -> Vec<String> {
    let mut segments: Vec<String> = split_segments(record_path)
        .into_iter()
        .map(str::to_string)
        .collect();
    segments.pop();
    segments
}
