use serde::Serialize;

/// Which way the renderer should bend a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    /// Both ends on the same rail
    Straight,
    /// Child is right of its parent
    MergeLeft,
    /// Child is left of its parent
    MergeRight,
}

impl ConnectionKind {
    pub fn between(from_rail: usize, to_rail: usize) -> Self {
        use std::cmp::Ordering;

        match from_rail.cmp(&to_rail) {
            Ordering::Equal => ConnectionKind::Straight,
            Ordering::Greater => ConnectionKind::MergeLeft,
            Ordering::Less => ConnectionKind::MergeRight,
        }
    }
}

/// An edge from a child commit to one of its parents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConnection {
    /// Child commit hash
    pub from_hash: String,
    /// Parent commit hash
    pub to_hash: String,
    pub from_rail: usize,
    pub to_rail: usize,
    pub from_row: usize,
    pub to_row: usize,
    pub kind: ConnectionKind,
}

impl GraphConnection {
    pub fn new(
        from_hash: String,
        to_hash: String,
        (from_rail, from_row): (usize, usize),
        (to_rail, to_row): (usize, usize),
    ) -> Self {
        Self {
            from_hash,
            to_hash,
            from_rail,
            to_rail,
            from_row,
            to_row,
            kind: ConnectionKind::between(from_rail, to_rail),
        }
    }

    /// The rail the edge travels down between its two rows
    pub fn carrier_rail(&self) -> usize {
        self.from_rail.max(self.to_rail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_rails() {
        assert_eq!(ConnectionKind::between(1, 1), ConnectionKind::Straight);
        assert_eq!(ConnectionKind::between(2, 0), ConnectionKind::MergeLeft);
        assert_eq!(ConnectionKind::between(0, 3), ConnectionKind::MergeRight);
    }

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ConnectionKind::MergeLeft).unwrap();
        assert_eq!(json, "\"merge-left\"");
    }
}
