//! Mission graphs and the grammar that rewrites them.

pub mod generator;
pub mod graph;
pub mod node;
pub mod pattern;
pub mod recipe;

mod text;

pub use generator::MissionGraphGenerator;
pub use graph::MissionGraph;
pub use node::{MissionNode, NodeId, NodeType};
pub use pattern::Pattern;
pub use recipe::{ANY_ACTION, Recipe};
