//! Deadlock check for mission graphs and their grid embeddings.
//!
//! A floor is solvable when, from the start, the end is reachable without
//! opening any lock, or when strictly more keys are reachable than there are
//! reachable locks that lead nowhere on their own. Spending a key on such a
//! lock can then never strand the player.

use std::collections::{BTreeSet, VecDeque};

use crate::layout::{CellGrid, CellType, Direction, GridPos};
use crate::mission::{MissionGraph, NodeId, NodeType};

/// Anything the key/lock walk can run over.
trait ProgressionSpace {
    type Id: Copy + Ord;

    fn node_type(&self, id: Self::Id) -> Option<NodeType>;

    /// Whether the walk continues past `id`.
    fn expands(&self, id: Self::Id) -> bool;

    fn successors(&self, id: Self::Id) -> Vec<Self::Id>;
}

impl ProgressionSpace for MissionGraph {
    type Id = NodeId;

    fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.node(id).map(|node| node.node_type)
    }

    fn expands(&self, _id: NodeId) -> bool {
        true
    }

    fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| node.children.iter().copied().filter(|&child| self.node(child).is_some()))
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Levers are one-way gates and corridors are dead ends for this walk; a
/// move needs a door on the side being left.
impl ProgressionSpace for CellGrid {
    type Id = GridPos;

    fn node_type(&self, pos: GridPos) -> Option<NodeType> {
        self.get(pos).map(|cell| cell.node_type())
    }

    fn expands(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|cell| {
            cell.cell_type == CellType::Normal && cell.node_type() != NodeType::Lever
        })
    }

    fn successors(&self, pos: GridPos) -> Vec<GridPos> {
        let Some(cell) = self.get(pos) else {
            return Vec::new();
        };
        Direction::ALL
            .into_iter()
            .filter(|&direction| cell.door(direction).is_some())
            .map(|direction| pos.step(direction))
            .filter(|&next| self.get(next).is_some())
            .collect()
    }
}

pub fn is_graph_solvable(graph: &MissionGraph, start: NodeId) -> bool {
    graph.node(start).is_some() && check(graph, start, &mut BTreeSet::new())
}

pub fn is_grid_solvable(grid: &CellGrid, start: GridPos) -> bool {
    grid.get(start).is_some() && check(grid, start, &mut BTreeSet::new())
}

fn check<S: ProgressionSpace>(space: &S, start: S::Id, visited: &mut BTreeSet<S::Id>) -> bool {
    visited.insert(start);
    let mut queue: VecDeque<S::Id> = if space.expands(start) {
        space.successors(start).into()
    } else {
        VecDeque::new()
    };
    let mut locks = Vec::new();
    let mut keys = 0_usize;

    while let Some(current) = queue.pop_front() {
        if visited.contains(&current) {
            continue;
        }
        match space.node_type(current) {
            Some(NodeType::Lock) => {
                locks.push(current);
                continue;
            }
            Some(NodeType::End) => return true,
            Some(NodeType::Key) => keys += 1,
            _ => {}
        }
        visited.insert(current);
        if space.expands(current) {
            queue.extend(space.successors(current));
        }
    }

    let required_keys = locks
        .into_iter()
        .filter(|&lock| !check(space, lock, &mut visited.clone()))
        .count();
    required_keys < keys
}
