use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SHORT_HASH_LEN: usize = 7;

/// A commit as supplied by the commit source. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Abbreviated hash for display
    pub short_hash: String,
    /// Commit message (summary line)
    pub message: String,
    /// Author name
    pub author: String,
    /// Commit timestamp
    pub date: DateTime<Utc>,
    /// Parent hashes, first parent first
    pub parents: Vec<String>,
    /// Branch, tag and HEAD labels pointing at this commit
    #[serde(default)]
    pub refs: Vec<String>,
}

impl Commit {
    pub fn new(
        hash: String,
        parents: Vec<String>,
        date: DateTime<Utc>,
        author: String,
        message: String,
    ) -> Self {
        let short_hash = hash
            .get(..SHORT_HASH_LEN)
            .unwrap_or(&hash)
            .to_string();

        Self {
            hash,
            short_hash,
            message,
            author,
            date,
            parents,
            refs: Vec::new(),
        }
    }

    pub fn with_refs(mut self, refs: Vec<String>) -> Self {
        self.refs = refs;
        self
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// The parent this commit continues on, if any
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

/// A commit positioned in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    #[serde(flatten)]
    pub commit: Commit,
    /// Column index
    pub rail: usize,
    /// Position in the display list
    pub row: usize,
}

impl GraphNode {
    pub fn hash(&self) -> &str {
        &self.commit.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_is_prefix() {
        let c = Commit::new(
            "0123456789abcdef".to_string(),
            vec![],
            Utc::now(),
            "Alice".to_string(),
            "Initial".to_string(),
        );
        assert_eq!(c.short_hash, "0123456");
        assert!(c.is_root());
        assert!(!c.is_merge());
    }

    #[test]
    fn short_hash_of_short_id() {
        let c = Commit::new(
            "c1".to_string(),
            vec!["c0".to_string()],
            Utc::now(),
            String::new(),
            String::new(),
        );
        assert_eq!(c.short_hash, "c1");
        assert_eq!(c.first_parent(), Some("c0"));
    }
}
