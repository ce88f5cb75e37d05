use std::collections::HashSet;
use tracing::debug;

use crate::core::{Commit, GraphLayout};
use crate::layout::compute_layout;
use crate::session::Page;

/// Accumulated commits for one repository view and the layout over them.
///
/// Commits are append-only and unique by hash. The layout is recomputed over
/// the whole list after every page.
#[derive(Debug, Clone)]
pub struct Session {
    commits: Vec<Commit>,
    seen: HashSet<String>,
    cursor: usize,
    has_more: bool,
    layout: GraphLayout,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            commits: Vec::new(),
            seen: HashSet::new(),
            cursor: 0,
            has_more: true,
            layout: GraphLayout::default(),
            generation: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fetched page and relayout. Returns the number of commits that
    /// were not already present.
    ///
    /// With `append == false` the page replaces everything accumulated so far.
    pub fn load_page(&mut self, page: Page, append: bool) -> usize {
        if !append {
            self.commits.clear();
            self.seen.clear();
            self.cursor = 0;
        }

        let before = self.commits.len();
        for commit in page.commits {
            if self.seen.insert(commit.hash.clone()) {
                self.commits.push(commit);
            }
        }
        let added = self.commits.len() - before;

        self.cursor += added;
        self.has_more = page.has_more;
        self.layout = compute_layout(&self.commits);

        debug!(
            added,
            total = self.commits.len(),
            cursor = self.cursor,
            has_more = self.has_more,
            append,
            "applied commit page"
        );
        added
    }

    /// Mark pages already in flight as stale without touching the
    /// accumulated commits. The next `load_page(.., false)` replaces them.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Drop all accumulated state. Pages fetched before the reset are stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    /// Offset of the next page
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Bumped by every reset and invalidation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.seen.contains(hash)
    }
}
