use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NodeType {
    None,
    Normal,
    Lock,
    Key,
    Lever,
    Puzzle,
    Any,
    Start,
    End,
    Basement,
    Connection,
}

impl NodeType {
    pub const ALL: [NodeType; 11] = [
        NodeType::None,
        NodeType::Normal,
        NodeType::Lock,
        NodeType::Key,
        NodeType::Lever,
        NodeType::Puzzle,
        NodeType::Any,
        NodeType::Start,
        NodeType::End,
        NodeType::Basement,
        NodeType::Connection,
    ];

    /// Name used by the graph text format.
    pub fn name(self) -> &'static str {
        match self {
            NodeType::None => "None",
            NodeType::Normal => "Normal",
            NodeType::Lock => "Lock",
            NodeType::Key => "Key",
            NodeType::Lever => "Lever",
            NodeType::Puzzle => "Puzzle",
            NodeType::Any => "Any",
            NodeType::Start => "Start",
            NodeType::End => "End",
            NodeType::Basement => "Basement",
            NodeType::Connection => "Connection",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NodeType::ALL.into_iter().find(|node_type| node_type.name() == name)
    }

    /// Single-character room code consumed by room builders.
    pub fn symbol(self) -> char {
        match self {
            NodeType::None => ' ',
            NodeType::Normal => 'N',
            NodeType::Lock => 'L',
            NodeType::Key => 'K',
            NodeType::Lever => 'V',
            NodeType::Puzzle => 'P',
            NodeType::Any => '*',
            NodeType::Start => 'S',
            NodeType::End => 'E',
            NodeType::Basement => 'B',
            NodeType::Connection => 'C',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        NodeType::ALL.into_iter().find(|node_type| node_type.symbol() == symbol)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissionNode {
    pub id: NodeId,
    pub access_level: i32,
    pub node_type: NodeType,
    pub children: Vec<NodeId>,
}

impl MissionNode {
    pub fn new(id: NodeId, access_level: i32, node_type: NodeType) -> Self {
        Self { id, access_level, node_type, children: Vec::new() }
    }

    /// Matcher comparison: `self` is the pattern side, shifted by `shift`
    /// levels before comparing against `other`. `Any` on either side
    /// matches every type.
    pub fn matches(&self, other: &MissionNode, shift: i32) -> bool {
        self.access_level + shift == other.access_level
            && (self.node_type == NodeType::Any
                || other.node_type == NodeType::Any
                || self.node_type == other.node_type)
    }

    pub fn has_child(&self, id: NodeId) -> bool {
        self.children.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_for_every_type() {
        for node_type in NodeType::ALL {
            assert_eq!(NodeType::from_name(node_type.name()), Some(node_type));
            assert_eq!(NodeType::from_symbol(node_type.symbol()), Some(node_type));
        }
        assert_eq!(NodeType::from_name("normal"), None);
        assert_eq!(NodeType::from_symbol('?'), None);
    }

    #[test]
    fn symbols_are_unique() {
        let mut symbols: Vec<char> = NodeType::ALL.iter().map(|t| t.symbol()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), NodeType::ALL.len());
    }

    #[test]
    fn matching_applies_shift_and_wildcard() {
        let pattern = MissionNode::new(NodeId(0), 0, NodeType::Normal);
        let wildcard = MissionNode::new(NodeId(1), 0, NodeType::Any);
        let target = MissionNode::new(NodeId(7), 2, NodeType::Normal);
        let key = MissionNode::new(NodeId(8), 2, NodeType::Key);

        assert!(pattern.matches(&target, 2));
        assert!(!pattern.matches(&target, 1));
        assert!(!pattern.matches(&key, 2));
        assert!(wildcard.matches(&key, 2));
        assert!(key.matches(&wildcard, -2));
    }
}
