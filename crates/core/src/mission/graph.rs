//! Insertion-ordered directed graph of mission nodes.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::Serialize;

use super::node::{MissionNode, NodeId, NodeType};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MissionGraph {
    nodes: Vec<MissionNode>,
    #[serde(skip)]
    index: BTreeMap<NodeId, usize>,
    /// Set once a level propagation hit its step cap.
    #[serde(skip)]
    unsettled_levels: bool,
}

impl MissionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[MissionNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first inserted node; generation always starts from it.
    pub fn root(&self) -> Option<&MissionNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: NodeId) -> Option<&MissionNode> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut MissionNode> {
        self.index.get(&id).map(|&position| &mut self.nodes[position])
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Inserts a node with an explicit id. Returns `false` (and leaves the
    /// graph untouched) when the id is taken.
    pub fn insert_node(&mut self, node: MissionNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Appends a node under a fresh id one past the largest in use.
    pub fn add_node(&mut self, access_level: i32, node_type: NodeType) -> NodeId {
        let id = self.index.keys().next_back().map_or(NodeId(0), |last| NodeId(last.0 + 1));
        self.insert_node(MissionNode::new(id, access_level, node_type));
        id
    }

    /// Adds the directed edge `from -> to`. Both endpoints must exist.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.index.contains_key(&to) {
            return false;
        }
        match self.node_mut(from) {
            Some(node) => {
                node.children.push(to);
                true
            }
            None => false,
        }
    }

    /// Removes every edge between `a` and `b`, in both directions.
    pub fn remove_links(&mut self, a: NodeId, b: NodeId) {
        if let Some(node) = self.node_mut(a) {
            node.children.retain(|&child| child != b);
        }
        if let Some(node) = self.node_mut(b) {
            node.children.retain(|&child| child != a);
        }
    }

    /// Incident edge count (outgoing plus incoming).
    pub fn connection_count(&self, id: NodeId) -> usize {
        let outgoing = self.node(id).map_or(0, |node| node.children.len());
        let incoming: usize = self
            .nodes
            .iter()
            .map(|node| node.children.iter().filter(|&&child| child == id).count())
            .sum();
        outgoing + incoming
    }

    pub fn highest_access_level(&self) -> i32 {
        self.nodes.iter().map(|node| node.access_level).max().unwrap_or(0).max(0)
    }

    /// False once any propagation stopped at its step cap; levels may then
    /// be half updated and the graph should be discarded.
    pub fn levels_settled(&self) -> bool {
        !self.unsettled_levels
    }

    /// Sets `id` to `level` and pushes the change down to its descendants.
    /// Returns `false` when the walk hit its step cap before settling.
    ///
    /// Levers stop propagation. A child that is a lock, or any child of a
    /// puzzle, lands one level higher than its parent.
    pub fn adjust_access_level(&mut self, id: NodeId, level: i32) -> bool {
        // cycles through a lock or puzzle never settle; cap the walk
        let mut budget = (self.nodes.len() + 1).pow(2) * 4;
        let mut stack = vec![(id, level)];

        while let Some((current_id, new_level)) = stack.pop() {
            if budget == 0 {
                warn!("access level propagation from node {id} hit its step cap");
                self.unsettled_levels = true;
                return false;
            }
            budget -= 1;

            let Some(node) = self.node_mut(current_id) else {
                continue;
            };
            if node.access_level == new_level {
                continue;
            }
            node.access_level = new_level;
            if node.node_type == NodeType::Lever {
                continue;
            }

            let raises_children = node.node_type == NodeType::Puzzle;
            let children = node.children.clone();
            for &child in children.iter().rev() {
                let child_is_lock =
                    self.node(child).is_some_and(|child| child.node_type == NodeType::Lock);
                let child_level =
                    if raises_children || child_is_lock { new_level + 1 } else { new_level };
                stack.push((child, child_level));
            }
        }
        true
    }

    /// Every ordered selection of `size` distinct node positions.
    pub fn permutations(&self, size: usize) -> Vec<Vec<usize>> {
        let mut result = Vec::new();
        if size == 0 || size > self.nodes.len() {
            return result;
        }
        let mut current = Vec::with_capacity(size);
        let mut used = vec![false; self.nodes.len()];
        collect_permutations(size, &mut current, &mut used, &mut result);
        result
    }

    /// Positional comparison of this (pattern) graph against the nodes of
    /// `graph` at positions `candidate`.
    ///
    /// Node `i` of the pattern must match `candidate[i]` after shifting by
    /// `relative_access`, and the children each node has inside its own
    /// selection must line up index for index.
    pub fn check_similarity(
        &self,
        graph: &MissionGraph,
        candidate: &[usize],
        relative_access: i32,
    ) -> bool {
        if candidate.len() != self.nodes.len() {
            return false;
        }
        for (pattern_node, &position) in self.nodes.iter().zip(candidate) {
            let Some(target) = graph.nodes.get(position) else {
                return false;
            };
            if !pattern_node.matches(target, relative_access) {
                return false;
            }

            let pattern_children: Vec<usize> = (0..self.nodes.len())
                .filter(|&j| pattern_node.has_child(self.nodes[j].id))
                .collect();
            let target_children: Vec<usize> = candidate
                .iter()
                .enumerate()
                .filter(|&(_, &other)| {
                    graph.nodes.get(other).is_some_and(|node| target.has_child(node.id))
                })
                .map(|(j, _)| j)
                .collect();
            if pattern_children != target_children {
                return false;
            }
        }
        true
    }
}

fn collect_permutations(
    size: usize,
    current: &mut Vec<usize>,
    used: &mut [bool],
    result: &mut Vec<Vec<usize>>,
) {
    if current.len() == size {
        result.push(current.clone());
        return;
    }
    for position in 0..used.len() {
        if used[position] {
            continue;
        }
        used[position] = true;
        current.push(position);
        collect_permutations(size, current, used, result);
        current.pop();
        used[position] = false;
    }
}

/// Writes the graph in the same line format the parser reads.
impl fmt::Display for MissionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes")?;
        for node in &self.nodes {
            writeln!(f, "{},{},{}", node.id, node.access_level, node.node_type)?;
        }
        writeln!(f, "edges")?;
        for node in &self.nodes {
            for child in &node.children {
                writeln!(f, "{},{}", node.id, child)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(types: &[NodeType]) -> MissionGraph {
        let mut graph = MissionGraph::new();
        let ids: Vec<NodeId> = types.iter().map(|&t| graph.add_node(0, t)).collect();
        for pair in ids.windows(2) {
            assert!(graph.connect(pair[0], pair[1]));
        }
        graph
    }

    #[test]
    fn add_node_uses_fresh_ids_after_gaps() {
        let mut graph = MissionGraph::new();
        assert!(graph.insert_node(MissionNode::new(NodeId(4), 0, NodeType::Start)));
        assert!(!graph.insert_node(MissionNode::new(NodeId(4), 0, NodeType::End)));
        assert_eq!(graph.add_node(0, NodeType::End), NodeId(5));
        assert_eq!(graph.root().map(|node| node.id), Some(NodeId(4)));
    }

    #[test]
    fn connect_rejects_missing_endpoints() {
        let mut graph = chain(&[NodeType::Start, NodeType::End]);
        assert!(!graph.connect(NodeId(0), NodeId(9)));
        assert!(!graph.connect(NodeId(9), NodeId(0)));
    }

    #[test]
    fn connection_count_includes_incoming_edges() {
        let graph = chain(&[NodeType::Start, NodeType::Normal, NodeType::End]);
        assert_eq!(graph.connection_count(NodeId(0)), 1);
        assert_eq!(graph.connection_count(NodeId(1)), 2);
        assert_eq!(graph.connection_count(NodeId(2)), 1);
    }

    #[test]
    fn remove_links_clears_both_directions() {
        let mut graph = chain(&[NodeType::Normal, NodeType::Normal]);
        assert!(graph.connect(NodeId(1), NodeId(0)));
        graph.remove_links(NodeId(1), NodeId(0));
        assert!(graph.nodes().iter().all(|node| node.children.is_empty()));
    }

    #[test]
    fn access_level_raises_through_locks_and_puzzles() {
        let mut graph = chain(&[
            NodeType::Start,
            NodeType::Lock,
            NodeType::Normal,
            NodeType::Puzzle,
            NodeType::End,
        ]);
        graph.adjust_access_level(NodeId(1), 1);
        let levels: Vec<i32> = graph.nodes().iter().map(|node| node.access_level).collect();
        assert_eq!(levels, vec![0, 1, 1, 1, 2]);
    }

    #[test]
    fn lever_stops_access_level_propagation() {
        let mut graph = chain(&[NodeType::Normal, NodeType::Lever, NodeType::End]);
        graph.adjust_access_level(NodeId(0), 3);
        let levels: Vec<i32> = graph.nodes().iter().map(|node| node.access_level).collect();
        assert_eq!(levels, vec![3, 3, 0]);
    }

    #[test]
    fn adjust_access_level_is_idempotent() {
        let mut once = chain(&[NodeType::Start, NodeType::Lock, NodeType::Puzzle, NodeType::End]);
        once.adjust_access_level(NodeId(1), 2);
        let mut twice = once.clone();
        twice.adjust_access_level(NodeId(1), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn adjust_access_level_terminates_on_lock_cycles() {
        let mut graph = chain(&[NodeType::Lock, NodeType::Lock]);
        assert!(graph.connect(NodeId(1), NodeId(0)));
        assert!(graph.levels_settled());
        assert!(!graph.adjust_access_level(NodeId(0), 1));
        assert!(graph.nodes().iter().all(|node| node.access_level >= 1));
        assert!(!graph.levels_settled());
    }

    #[test]
    fn settled_propagation_reports_success() {
        let mut graph = chain(&[NodeType::Start, NodeType::Lock, NodeType::End]);
        assert!(graph.adjust_access_level(NodeId(1), 1));
        assert!(graph.levels_settled());
    }

    #[test]
    fn permutations_enumerate_ordered_selections() {
        let graph = chain(&[NodeType::Normal, NodeType::Normal, NodeType::Normal]);
        let permutations = graph.permutations(2);
        assert_eq!(permutations.len(), 6);
        assert!(permutations.contains(&vec![2, 0]));
        assert!(graph.permutations(0).is_empty());
        assert!(graph.permutations(4).is_empty());
    }

    #[test]
    fn similarity_requires_matching_internal_edges() {
        let pattern = chain(&[NodeType::Any, NodeType::Any]);
        let graph = chain(&[NodeType::Start, NodeType::Normal, NodeType::End]);

        assert!(pattern.check_similarity(&graph, &[0, 1], 0));
        assert!(pattern.check_similarity(&graph, &[1, 2], 0));
        assert!(!pattern.check_similarity(&graph, &[1, 0], 0));
        assert!(!pattern.check_similarity(&graph, &[0, 2], 0));
        assert!(!pattern.check_similarity(&graph, &[0, 1], 1));
    }

    #[test]
    fn highest_access_level_defaults_to_zero() {
        assert_eq!(MissionGraph::new().highest_access_level(), 0);
        let mut graph = chain(&[NodeType::Start, NodeType::Lock]);
        graph.adjust_access_level(NodeId(1), 3);
        assert_eq!(graph.highest_access_level(), 3);
    }
}
