use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::trace;

use crate::mission::{MissionGraph, NodeId, NodeType};
use crate::rng::GenRng;

use super::map::Map;

/// Embeds a mission graph into a [`Map`].
pub struct LayoutGenerator<'a> {
    graph: &'a MissionGraph,
}

impl<'a> LayoutGenerator<'a> {
    pub fn new(graph: &'a MissionGraph) -> Self {
        Self { graph }
    }

    /// One embedding attempt. `None` means some node found no free slot or
    /// some lever could not be wired to its target.
    pub fn generate(&self, rng: &mut GenRng) -> Option<Map> {
        let root = self.graph.root()?;
        let mut map = Map::new();
        map.initialize_cell(root, rng);

        if !self.place_nodes(&mut map, rng) {
            trace!("layout attempt failed while placing rooms");
            return None;
        }
        if !self.connect_levers(&mut map) {
            trace!("layout attempt failed while wiring levers");
            return None;
        }
        Some(map)
    }

    /// Breadth-first placement. Children of locks and puzzles hang off that
    /// node's slots; every other child inherits its parent's anchor.
    fn place_nodes(&self, map: &mut Map, rng: &mut GenRng) -> bool {
        let Some(root) = self.graph.root() else {
            return false;
        };
        let mut anchors: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        let mut open = VecDeque::new();
        for &child in &root.children {
            anchors.entry(child).or_insert(root.id);
            open.push_back(child);
        }
        let mut placed = BTreeSet::from([root.id]);

        while let Some(current_id) = open.pop_front() {
            if !placed.insert(current_id) {
                continue;
            }
            let (Some(current), Some(&anchor)) =
                (self.graph.node(current_id), anchors.get(&current_id))
            else {
                return false;
            };
            if !map.add_cell(current, anchor, rng) {
                return false;
            }

            let child_anchor = match current.node_type {
                NodeType::Lock | NodeType::Puzzle => current.id,
                _ => anchor,
            };
            for &child in &current.children {
                anchors.entry(child).or_insert(child_anchor);
                open.push_back(child);
            }
        }
        true
    }

    /// Adds corridors from every lever to each of its children, with a
    /// search budget of the square of the nodes walked so far.
    fn connect_levers(&self, map: &mut Map) -> bool {
        let Some(root) = self.graph.root() else {
            return false;
        };
        let mut open = VecDeque::from([root.id]);
        let mut visited = BTreeSet::new();

        while let Some(current_id) = open.pop_front() {
            if !visited.insert(current_id) {
                continue;
            }
            let Some(current) = self.graph.node(current_id) else {
                continue;
            };
            for &child in &current.children {
                if current.node_type == NodeType::Lever {
                    let budget = visited.len() * visited.len();
                    if !map.make_connection(current.id, child, budget) {
                        return false;
                    }
                }
                open.push_back(child);
            }
        }
        true
    }
}
