use anyhow::Result;
use async_trait::async_trait;

use crate::core::Commit;

/// One paginated query against a commit source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

/// A page of commits, children before parents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub commits: Vec<Commit>,
    pub has_more: bool,
}

/// Supplies topologically sorted commits page by page.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Identifier of the repository this source reads
    fn repository(&self) -> &str;

    async fn fetch_page(&self, request: PageRequest) -> Result<Page>;
}

/// Serves pages out of a fixed, already ordered commit list
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    commits: Vec<Commit>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, commits: Vec<Commit>) -> Self {
        Self {
            name: name.into(),
            commits,
        }
    }

    pub fn page(&self, request: PageRequest) -> Page {
        let start = request.offset.min(self.commits.len());
        let end = start.saturating_add(request.limit).min(self.commits.len());

        Page {
            commits: self.commits[start..end].to_vec(),
            has_more: end < self.commits.len(),
        }
    }
}

#[async_trait]
impl CommitSource for MemorySource {
    fn repository(&self) -> &str {
        &self.name
    }

    async fn fetch_page(&self, request: PageRequest) -> Result<Page> {
        Ok(self.page(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn source(n: usize) -> MemorySource {
        let commits = (0..n)
            .map(|i| {
                Commit::new(format!("c{}", i), vec![], Utc::now(), String::new(), String::new())
            })
            .collect();
        MemorySource::new("mem", commits)
    }

    #[test]
    fn pages_slice_the_list() {
        let src = source(5);
        let first = src.page(PageRequest { limit: 2, offset: 0 });
        assert_eq!(first.commits.len(), 2);
        assert!(first.has_more);

        let last = src.page(PageRequest { limit: 2, offset: 4 });
        assert_eq!(last.commits.len(), 1);
        assert_eq!(last.commits[0].hash, "c4");
        assert!(!last.has_more);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = source(3).page(PageRequest { limit: 10, offset: 7 });
        assert!(page.commits.is_empty());
        assert!(!page.has_more);
    }
}
