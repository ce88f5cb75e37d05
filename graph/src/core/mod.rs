pub mod node;
pub mod edge;
pub mod layout;

pub use node::{Commit, GraphNode};
pub use edge::{ConnectionKind, GraphConnection};
pub use layout::{GraphLayout, LayoutStats};
