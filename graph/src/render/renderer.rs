use crate::core::{ConnectionKind, GraphLayout, GraphNode};
use crate::render::text::truncate_to_width;

/// Glyph set for the rail cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Unicode,
    Ascii,
}

struct Glyphs {
    commit: char,
    pass: char,
    fan_out: char,
    join: char,
    horizontal: char,
}

impl Charset {
    fn glyphs(self) -> Glyphs {
        match self {
            Charset::Unicode => Glyphs {
                commit: '●',
                pass: '│',
                fan_out: '╮',
                join: '╯',
                horizontal: '─',
            },
            Charset::Ascii => Glyphs {
                commit: '*',
                pass: '|',
                fan_out: '\\',
                join: '/',
                horizontal: '-',
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Pass,
    FanOut,
    Join,
    Horizontal,
    Commit,
}

/// Draws a layout as text, one line per row
pub struct TextRenderer {
    charset: Charset,
    /// Maximum display width of the message column
    message_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(Charset::default(), 72)
    }
}

impl TextRenderer {
    pub fn new(charset: Charset, message_width: usize) -> Self {
        Self { charset, message_width }
    }

    /// Render every row of the layout
    pub fn render(&self, layout: &GraphLayout) -> String {
        self.render_lines(layout, None).join("\n")
    }

    /// Render at most `max_rows` rows
    pub fn render_lines(&self, layout: &GraphLayout, max_rows: Option<usize>) -> Vec<String> {
        let (cells, spans) = self.grid(layout);
        let glyphs = self.charset.glyphs();
        let limit = max_rows.unwrap_or(layout.nodes.len()).min(layout.nodes.len());

        layout.nodes[..limit]
            .iter()
            .map(|node| {
                let row = node.row;
                let mut line = String::new();
                for rail in 0..layout.rail_count {
                    line.push(match cells[row][rail] {
                        Cell::Empty => ' ',
                        Cell::Pass => glyphs.pass,
                        Cell::FanOut => glyphs.fan_out,
                        Cell::Join => glyphs.join,
                        Cell::Horizontal => glyphs.horizontal,
                        Cell::Commit => glyphs.commit,
                    });
                    if rail + 1 < layout.rail_count {
                        line.push(if spans[row][rail] { glyphs.horizontal } else { ' ' });
                    }
                }
                line.push(' ');
                line.push_str(&self.describe(node));
                line
            })
            .collect()
    }

    fn describe(&self, node: &GraphNode) -> String {
        let commit = &node.commit;
        let mut text = commit.short_hash.clone();
        if !commit.refs.is_empty() {
            text.push_str(&format!(" ({})", commit.refs.join(", ")));
        }
        if !commit.message.is_empty() {
            text.push(' ');
            text.push_str(&truncate_to_width(&commit.message, self.message_width));
        }
        text
    }

    /// Per-row rail cells plus, per row, whether the gap right of each rail
    /// carries a horizontal segment.
    fn grid(&self, layout: &GraphLayout) -> (Vec<Vec<Cell>>, Vec<Vec<bool>>) {
        let rows = layout.nodes.len();
        let rails = layout.rail_count;
        let mut cells = vec![vec![Cell::Empty; rails]; rows];
        let mut spans = vec![vec![false; rails.saturating_sub(1)]; rows];

        let mut horizontal = |cells: &mut Vec<Vec<Cell>>, row: usize, left: usize, right: usize| {
            for gap in left..right {
                spans[row][gap] = true;
            }
            for rail in left + 1..right {
                if cells[row][rail] == Cell::Empty {
                    cells[row][rail] = Cell::Horizontal;
                }
            }
        };

        for connection in &layout.connections {
            let carrier = connection.carrier_rail();
            for row in connection.from_row + 1..connection.to_row {
                if cells[row][carrier] != Cell::Commit {
                    cells[row][carrier] = Cell::Pass;
                }
            }

            match connection.kind {
                ConnectionKind::Straight => {}
                ConnectionKind::MergeRight => {
                    let row = connection.from_row;
                    cells[row][connection.to_rail] = Cell::FanOut;
                    horizontal(&mut cells, row, connection.from_rail, connection.to_rail);
                }
                ConnectionKind::MergeLeft => {
                    let row = connection.to_row;
                    cells[row][connection.from_rail] = Cell::Join;
                    horizontal(&mut cells, row, connection.to_rail, connection.from_rail);
                }
            }
        }

        for node in &layout.nodes {
            cells[node.row][node.rail] = Cell::Commit;
        }

        (cells, spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Commit;
    use crate::layout::compute_layout;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn commit(hash: &str, parents: &[&str]) -> Commit {
        Commit::new(
            hash.to_string(),
            parents.iter().map(|p| p.to_string()).collect(),
            Utc::now(),
            "Test".to_string(),
            String::new(),
        )
    }

    #[test]
    fn renders_merge_shape() {
        let layout = compute_layout(&[
            commit("M", &["C2", "C1b"]),
            commit("C2", &["C0"]),
            commit("C1b", &["C0"]),
            commit("C0", &[]),
        ]);
        let lines = TextRenderer::default().render_lines(&layout, None);
        assert_eq!(
            lines,
            vec![
                "●─╮ M".to_string(),
                "● │ C2".to_string(),
                "│ ● C1b".to_string(),
                "●─╯ C0".to_string(),
            ]
        );
    }

    #[test]
    fn ascii_linear_with_refs() {
        let layout = compute_layout(&[
            commit("b", &["a"]).with_refs(vec!["HEAD".into(), "main".into()]),
            commit("a", &[]),
        ]);
        let out = TextRenderer::new(Charset::Ascii, 10).render(&layout);
        assert_eq!(out, "* b (HEAD, main)\n* a");
    }

    #[test]
    fn max_rows_limits_output() {
        let layout = compute_layout(&[commit("b", &["a"]), commit("a", &[])]);
        let lines = TextRenderer::default().render_lines(&layout, Some(1));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn empty_layout_renders_nothing() {
        assert_eq!(TextRenderer::default().render(&GraphLayout::default()), "");
    }
}
