use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The page request failed; accumulated state is untouched
    #[error("failed to fetch commits from {repository} at offset {offset}")]
    Fetch {
        repository: String,
        offset: usize,
        #[source]
        source: anyhow::Error,
    },
}
