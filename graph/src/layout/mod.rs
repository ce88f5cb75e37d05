pub mod rails;
pub mod engine;

pub use rails::{Rail, RailAllocator};
pub use engine::compute_layout;
