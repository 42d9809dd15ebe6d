//! Best-first searches over the grid, ordered by Manhattan distance to the
//! target. Equal priorities pop in insertion order.

use std::collections::BTreeSet;

use super::cell::{CellType, Direction, GridPos};
use super::map::Map;

struct TreeNode {
    pos: GridPos,
    parent: Option<usize>,
}

/// Arena of search nodes plus the open frontier.
struct SearchTree {
    target: GridPos,
    nodes: Vec<TreeNode>,
    frontier: BTreeSet<(u32, usize)>,
}

impl SearchTree {
    fn new(target: GridPos) -> Self {
        Self { target, nodes: Vec::new(), frontier: BTreeSet::new() }
    }

    /// Records a node without queueing it.
    fn record(&mut self, pos: GridPos, parent: Option<usize>) -> usize {
        self.nodes.push(TreeNode { pos, parent });
        self.nodes.len() - 1
    }

    fn push(&mut self, pos: GridPos, parent: Option<usize>) {
        let index = self.record(pos, parent);
        self.frontier.insert((pos.manhattan(self.target), index));
    }

    fn pop(&mut self) -> Option<(usize, GridPos)> {
        let (_, index) = self.frontier.pop_first()?;
        Some((index, self.nodes[index].pos))
    }

    /// Positions from the search root to `index`, inclusive.
    fn path(&self, index: usize) -> Vec<GridPos> {
        let mut path = Vec::new();
        let mut current = Some(index);
        while let Some(node_index) = current {
            let node = &self.nodes[node_index];
            path.push(node.pos);
            current = node.parent;
        }
        path.reverse();
        path
    }
}

impl Map {
    /// Existing route from `from` to `to` through rooms at exactly
    /// `access_level`, following only placed doors.
    ///
    /// The cell `from` was grown from is never entered.
    pub fn dungeon_path(
        &self,
        from: GridPos,
        to: GridPos,
        access_level: i32,
    ) -> Option<Vec<GridPos>> {
        let from_parent = self.cell(from).and_then(|cell| cell.parent);
        let mut tree = SearchTree::new(to);
        let mut visited = BTreeSet::new();
        tree.push(from, None);

        while let Some((index, pos)) = tree.pop() {
            if pos == to {
                return Some(tree.path(index));
            }
            if Some(pos) == from_parent || visited.contains(&pos) {
                continue;
            }
            let Some(cell) = self.cell(pos) else {
                continue;
            };
            if cell.cell_type == CellType::Connection || cell.access_level() != Some(access_level) {
                continue;
            }

            visited.insert(pos);
            for direction in Direction::ALL {
                if cell.door(direction).is_some() {
                    tree.push(pos.step(direction), Some(index));
                }
            }
        }
        None
    }

    /// Coordinates a corridor from `from` must cover to reach `to`, either
    /// directly or by joining a room that already has a route to `to`.
    ///
    /// Gives up once more than `max_iterations` positions were expanded.
    pub(crate) fn connection_points(
        &self,
        from: GridPos,
        to: GridPos,
        max_iterations: usize,
    ) -> Option<Vec<GridPos>> {
        let from_cell = self.cell(from)?;
        let to_cell = self.cell(to)?;
        let access_level = from_cell.access_level()?.min(to_cell.access_level()?);

        let mut tree = SearchTree::new(to);
        let root = tree.record(from, None);
        for neighbor in from.neighbors() {
            tree.push(neighbor, Some(root));
        }
        let mut visited = BTreeSet::from([from]);

        while let Some((index, pos)) = tree.pop() {
            if pos == to {
                return Some(tree.path(index));
            }
            if let Some(cell) = self.cell(pos)
                && cell.cell_type == CellType::Normal
            {
                if cell.access_level().is_some_and(|level| level > access_level) {
                    continue;
                }
                if self.dungeon_path(pos, to, access_level).is_some() {
                    return Some(tree.path(index));
                }
            }
            if Some(pos) == from_cell.parent || visited.contains(&pos) {
                continue;
            }
            if visited.len() > max_iterations {
                return None;
            }

            visited.insert(pos);
            for neighbor in pos.neighbors() {
                tree.push(neighbor, Some(index));
            }
        }
        None
    }
}
