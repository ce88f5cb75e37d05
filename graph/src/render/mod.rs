pub mod geometry;
pub mod renderer;
pub mod text;

pub use geometry::{Connector, Geometry, Point};
pub use renderer::{Charset, TextRenderer};
