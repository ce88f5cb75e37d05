pub mod error;
pub mod paginator;
pub mod source;
pub mod state;

pub use error::SessionError;
pub use paginator::{LoadOutcome, Paginator};
pub use source::{CommitSource, MemorySource, Page, PageRequest};
pub use state::Session;
