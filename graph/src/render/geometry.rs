use crate::core::{ConnectionKind, GraphConnection};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RAIL_WIDTH: f32 = 20.0;
pub const DEFAULT_ROW_HEIGHT: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Drawing primitive for one connection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Connector {
    Line { from: Point, to: Point },
    /// Quadratic curve through `control`
    Curve { from: Point, control: Point, to: Point },
}

/// Projects (rail, row) into drawing coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub row_height: f32,
    pub rail_width: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            rail_width: DEFAULT_RAIL_WIDTH,
        }
    }
}

impl Geometry {
    pub fn new(row_height: f32, rail_width: f32) -> Self {
        Self { row_height, rail_width }
    }

    /// Center of the node circle
    pub fn node_center(&self, rail: usize, row: usize) -> Point {
        Point {
            x: (rail as f32 + 0.5) * self.rail_width,
            y: row as f32 * self.row_height + self.row_height / 2.0,
        }
    }

    /// Width reserved for `rail_count` rails
    pub fn width(&self, rail_count: usize) -> f32 {
        rail_count as f32 * self.rail_width
    }

    /// Height of `rows` rows
    pub fn height(&self, rows: usize) -> f32 {
        rows as f32 * self.row_height
    }

    pub fn connector(&self, connection: &GraphConnection) -> Connector {
        let from = self.node_center(connection.from_rail, connection.from_row);
        let to = self.node_center(connection.to_rail, connection.to_row);

        match connection.kind {
            ConnectionKind::Straight => Connector::Line { from, to },
            // Child sits right of the parent: drop down the child's rail, bend in at the parent
            ConnectionKind::MergeLeft => Connector::Curve {
                from,
                control: Point { x: from.x, y: to.y },
                to,
            },
            // Child sits left of the parent: bend out at the child, drop down the parent's rail
            ConnectionKind::MergeRight => Connector::Curve {
                from,
                control: Point { x: to.x, y: from.y },
                to,
            },
        }
    }
}
