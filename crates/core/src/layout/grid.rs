//! Dense row-major layout handed to room builders.

use std::fmt;

use serde::Serialize;

use crate::mission::NodeId;

use super::cell::{Cell, GridPos};

const EMPTY_TILE: [&str; 5] = ["     "; 5];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
}

impl CellGrid {
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<Option<Cell>>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    /// One-room grid with the room moved to the origin.
    pub fn single(mut cell: Cell) -> Self {
        cell.pos = GridPos::ORIGIN;
        cell.parent = None;
        Self { width: 1, height: 1, cells: vec![Some(cell)] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[pos.y as usize * self.width + pos.x as usize].as_ref()
    }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn cell_of(&self, id: NodeId) -> Option<&Cell> {
        self.cells().find(|cell| cell.node_id() == Some(id))
    }

    /// Text picture of the layout, one 5x5 tile per cell.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            let mut rows: [String; 5] = Default::default();
            for x in 0..self.width {
                let tile = self.cells[y * self.width + x].as_ref().map(Cell::render_tile);
                for (line, row) in rows.iter_mut().enumerate() {
                    match &tile {
                        Some(tile) => row.push_str(&tile[line]),
                        None => row.push_str(EMPTY_TILE[line]),
                    }
                }
            }
            for row in rows {
                out.push_str(&row);
                out.push('\n');
            }
        }
        out
    }
}

impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cell::{Direction, DoorType};
    use crate::mission::{MissionNode, NodeType};

    fn room(x: i32, y: i32, id: u32, node_type: NodeType) -> Cell {
        Cell::room(GridPos::new(x, y), &MissionNode::new(NodeId(id), 0, node_type))
    }

    #[test]
    fn out_of_bounds_lookups_are_empty() {
        let grid = CellGrid::single(room(4, 4, 0, NodeType::Basement));
        assert!(grid.get(GridPos::ORIGIN).is_some());
        assert!(grid.get(GridPos::new(-1, 0)).is_none());
        assert!(grid.get(GridPos::new(1, 0)).is_none());
    }

    #[test]
    fn ascii_render_places_tiles_side_by_side() {
        let mut start = room(0, 0, 0, NodeType::Start);
        start.set_door(Direction::East, DoorType::Open);
        let mut end = room(1, 0, 1, NodeType::End);
        end.set_door(Direction::West, DoorType::Open);
        let grid = CellGrid::from_cells(2, 1, vec![Some(start), Some(end)]);

        let rendered = grid.render_ascii();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "+---++---+");
        assert_eq!(lines[2], "| S    E |");
    }

    #[test]
    fn empty_cells_render_as_blank_tiles() {
        let grid = CellGrid::from_cells(2, 1, vec![None, Some(room(1, 0, 0, NodeType::Key))]);
        let lines: Vec<String> = grid.to_string().lines().map(str::to_string).collect();
        assert_eq!(lines[2], "     | K |");
        assert_eq!(grid.cells().count(), 1);
        assert_eq!(grid.cell_of(NodeId(0)).map(|cell| cell.pos), Some(GridPos::new(1, 0)));
    }
}
