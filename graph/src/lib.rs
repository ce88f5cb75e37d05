pub mod core;
pub mod git_backend;
pub mod layout;
pub mod render;
pub mod session;

pub use self::core::{
    Commit, ConnectionKind, GraphConnection, GraphLayout, GraphNode, LayoutStats,
};
pub use git_backend::GitWalker;
pub use layout::{compute_layout, Rail, RailAllocator};
pub use render::{Charset, Connector, Geometry, Point, TextRenderer};
pub use session::{
    CommitSource, LoadOutcome, MemorySource, Page, PageRequest, Paginator, Session, SessionError,
};
