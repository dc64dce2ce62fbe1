use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::materials::record::{Record, RecordId};

/// Maximum number of results kept per query.
pub const MAX_RESULTS: usize = 200;

/// A fuzzy match against a record's full path.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: RecordId,
    pub display: String,
    pub score: i64,
    /// Char indices of `display` that matched the query.
    pub match_indices: Vec<usize>,
}

/// Rank records by fuzzy score against `query`, best first, ties by path.
pub fn search(records: &[Record], query: &str) -> Vec<SearchHit> {
    if query.is_empty() {
        return Vec::new();
    }
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits: Vec<SearchHit> = records
        .iter()
        .filter_map(|record| {
            let (score, indices) = matcher.fuzzy_indices(&record.path, query)?;
            Some(SearchHit {
                id: record.id.clone(),
                display: record.path.clone(),
                score,
                match_indices: indices,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.display.cmp(&b.display)));
    hits.truncate(MAX_RESULTS);
    hits
}

/// State of the fuzzy finder overlay.
#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub cursor_position: usize,
    pub results: Vec<SearchHit>,
    pub selected_index: usize,
}

impl SearchState {
    pub fn insert_char(&mut self, c: char, records: &[Record]) {
        self.query.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
        self.refresh(records);
    }

    pub fn delete_char(&mut self, records: &[Record]) {
        if let Some(prev) = self.query[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
            self.query.remove(self.cursor_position);
            self.refresh(records);
        }
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.results.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&SearchHit> {
        self.results.get(self.selected_index)
    }

    fn refresh(&mut self, records: &[Record]) {
        self.results = search(records, &self.query);
        self.selected_index = 0;
    }
}
