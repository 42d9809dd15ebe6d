//! Grammar rules: a matcher subgraph and the subgraphs that may replace it.

use log::trace;

use crate::error::PatternError;
use crate::rng::GenRng;

use super::graph::MissionGraph;
use super::node::NodeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    matcher: MissionGraph,
    replacements: Vec<MissionGraph>,
}

/// Graph nodes selected for substitution, in matcher order.
struct PatternMatch {
    nodes: Vec<NodeId>,
    relative_access: i32,
}

impl Pattern {
    pub fn new(
        matcher: MissionGraph,
        replacements: Vec<MissionGraph>,
    ) -> Result<Self, PatternError> {
        if matcher.is_empty() {
            return Err(PatternError::EmptyMatcher);
        }
        if replacements.is_empty() {
            return Err(PatternError::NoReplacement);
        }
        for (index, replacement) in replacements.iter().enumerate() {
            if replacement.len() < matcher.len() {
                return Err(PatternError::ReplacementTooSmall {
                    index,
                    found: replacement.len(),
                    required: matcher.len(),
                });
            }
        }
        Ok(Self { matcher, replacements })
    }

    pub fn matcher(&self) -> &MissionGraph {
        &self.matcher
    }

    pub fn replacements(&self) -> &[MissionGraph] {
        &self.replacements
    }

    /// Rewrites one random occurrence of the matcher inside `graph`.
    ///
    /// Returns `false` and leaves `graph` untouched when no occurrence fits
    /// the connection budget.
    pub fn apply(
        &self,
        graph: &mut MissionGraph,
        max_connections: usize,
        rng: &mut GenRng,
    ) -> bool {
        let Some(found) = self.find_match(graph, max_connections, rng) else {
            return false;
        };
        self.substitute(graph, found, rng);
        true
    }

    fn find_match(
        &self,
        graph: &MissionGraph,
        max_connections: usize,
        rng: &mut GenRng,
    ) -> Option<PatternMatch> {
        let mut permutations = graph.permutations(self.matcher.len());
        rng.shuffle(&mut permutations);
        let mut levels: Vec<i32> = (0..=graph.highest_access_level()).collect();
        rng.shuffle(&mut levels);

        for candidate in &permutations {
            for &level in &levels {
                if self.matcher.check_similarity(graph, candidate, level)
                    && self.fits_connection_budget(graph, candidate, max_connections)
                {
                    let nodes = candidate.iter().map(|&position| graph.nodes()[position].id);
                    return Some(PatternMatch { nodes: nodes.collect(), relative_access: level });
                }
            }
        }
        None
    }

    /// Every replacement must keep each touched node within
    /// `max_connections`, unless the node was already over and does not grow.
    fn fits_connection_budget(
        &self,
        graph: &MissionGraph,
        candidate: &[usize],
        max_connections: usize,
    ) -> bool {
        let matched: Vec<NodeId> =
            candidate.iter().map(|&position| graph.nodes()[position].id).collect();

        for replacement in &self.replacements {
            for (index, &id) in matched.iter().enumerate() {
                let current = graph.connection_count(id);
                let internal = internal_edge_count(graph, &matched, id);
                let added = replacement.connection_count(replacement.nodes()[index].id);
                let projected = current - internal + added;
                if projected > max_connections && projected > current {
                    return false;
                }
            }
            let grows_past_budget = replacement.nodes()[matched.len()..]
                .iter()
                .any(|node| replacement.connection_count(node.id) > max_connections);
            if grows_past_budget {
                return false;
            }
        }
        true
    }

    fn substitute(&self, graph: &mut MissionGraph, found: PatternMatch, rng: &mut GenRng) {
        for &a in &found.nodes {
            for &b in &found.nodes {
                graph.remove_links(a, b);
            }
        }

        let choice = rng.below(self.replacements.len());
        let replacement = &self.replacements[choice];

        let mut ids = found.nodes;
        for node in &replacement.nodes()[ids.len()..] {
            ids.push(graph.add_node(-1, node.node_type));
        }

        for (index, node) in replacement.nodes().iter().enumerate() {
            graph.adjust_access_level(ids[index], node.access_level + found.relative_access);
            for child in &node.children {
                if let Some(child_index) = replacement.position(*child) {
                    graph.connect(ids[index], ids[child_index]);
                }
            }
        }
        trace!(
            "substituted replacement {choice} at level {} over nodes {:?}",
            found.relative_access,
            &ids
        );
    }
}

/// Edges between `id` and the other matched nodes, counted from both ends.
fn internal_edge_count(graph: &MissionGraph, matched: &[NodeId], id: NodeId) -> usize {
    let mut count = 0;
    for &other in matched {
        if let Some(node) = graph.node(id) {
            count += node.children.iter().filter(|&&child| child == other).count();
        }
        if other != id
            && let Some(node) = graph.node(other)
        {
            count += node.children.iter().filter(|&&child| child == id).count();
        }
    }
    count
}
