//! Line-oriented graph text format.
//!
//! ```text
//! nodes
//! 0,0,Start
//! 1,0,End
//! edges
//! 0,1
//! ```
//!
//! A `roots` section is accepted and ignored. Blank lines and lines starting
//! with `#` are skipped everywhere. Lines before the first header are read as
//! nodes.

use std::str::FromStr;

use crate::error::ParseError;

use super::graph::MissionGraph;
use super::node::{MissionNode, NodeId, NodeType};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Nodes,
    Edges,
    Roots,
}

pub(crate) fn parse_graph(text: &str) -> Result<MissionGraph, ParseError> {
    let mut graph = MissionGraph::new();
    let mut edges = Vec::new();
    let mut section = Section::Nodes;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line {
            "nodes" => {
                section = Section::Nodes;
                continue;
            }
            "edges" => {
                section = Section::Edges;
                continue;
            }
            "roots" => {
                section = Section::Roots;
                continue;
            }
            _ => {}
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match section {
            Section::Nodes => {
                let [id, access_level, type_name] = fields.as_slice() else {
                    return Err(ParseError::FieldCount {
                        line: line_number,
                        expected: "3",
                        found: fields.len(),
                    });
                };
                let id = parse_int::<u32>(id, line_number)?;
                let access_level = parse_int::<i32>(access_level, line_number)?;
                let node_type = NodeType::from_name(type_name).ok_or_else(|| {
                    ParseError::UnknownNodeType { line: line_number, name: type_name.to_string() }
                })?;
                if !graph.insert_node(MissionNode::new(NodeId(id), access_level, node_type)) {
                    return Err(ParseError::DuplicateNode { line: line_number, id });
                }
            }
            Section::Edges => {
                let [from, to] = fields.as_slice() else {
                    return Err(ParseError::FieldCount {
                        line: line_number,
                        expected: "2",
                        found: fields.len(),
                    });
                };
                let from = parse_int::<u32>(from, line_number)?;
                let to = parse_int::<u32>(to, line_number)?;
                edges.push((line_number, NodeId(from), NodeId(to)));
            }
            Section::Roots => {}
        }
    }

    for (line_number, from, to) in edges {
        for endpoint in [from, to] {
            if graph.node(endpoint).is_none() {
                return Err(ParseError::UnknownEdgeEndpoint { line: line_number, id: endpoint.0 });
            }
        }
        graph.connect(from, to);
    }

    Ok(graph)
}

pub(crate) fn parse_int<T: FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger { line, value: value.to_string() })
}

impl FromStr for MissionGraph {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_graph(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nodes_edges_and_ignores_roots() {
        let text = "# start graph\nnodes\n0,0,Start\n\n1,2,End\nedges\n0,1\nroots\n0\n";
        let graph: MissionGraph = text.parse().expect("valid graph");
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes()[1].access_level, 2);
        assert_eq!(graph.nodes()[0].children, vec![NodeId(1)]);
    }

    #[test]
    fn edges_may_precede_nodes() {
        let graph = parse_graph("edges\n3,1\nnodes\n3,0,Normal\n1,0,Key\n").expect("valid graph");
        assert_eq!(graph.root().map(|node| node.id), Some(NodeId(3)));
        assert_eq!(graph.node(NodeId(3)).map(|node| node.children.len()), Some(1));
    }

    #[test]
    fn display_output_parses_back_to_the_same_graph() {
        let graph = parse_graph("nodes\n0,0,Start\n1,1,Lock\n2,1,End\nedges\n0,1\n1,2\n")
            .expect("valid graph");
        let reparsed = parse_graph(&graph.to_string()).expect("display output parses");
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn reports_malformed_lines_with_line_numbers() {
        assert_eq!(
            parse_graph("nodes\n0,0\n"),
            Err(ParseError::FieldCount { line: 2, expected: "3", found: 2 })
        );
        assert_eq!(
            parse_graph("nodes\nx,0,Start\n"),
            Err(ParseError::InvalidInteger { line: 2, value: "x".to_string() })
        );
        assert_eq!(
            parse_graph("nodes\n0,0,Dragon\n"),
            Err(ParseError::UnknownNodeType { line: 2, name: "Dragon".to_string() })
        );
        assert_eq!(
            parse_graph("nodes\n0,0,Start\n0,0,End\n"),
            Err(ParseError::DuplicateNode { line: 3, id: 0 })
        );
        assert_eq!(
            parse_graph("nodes\n0,0,Start\nedges\n0,5\n"),
            Err(ParseError::UnknownEdgeEndpoint { line: 4, id: 5 })
        );
    }
}
