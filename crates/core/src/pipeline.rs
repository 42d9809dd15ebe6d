//! Nested retry loop that turns a recipe into a solvable floor.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::GenerationError;
use crate::grammar::Grammar;
use crate::layout::{Cell, CellGrid, LayoutGenerator};
use crate::mission::{MissionGraph, Recipe};
use crate::rng::GenRng;
use crate::solvability::{is_graph_solvable, is_grid_solvable};

/// Trial budgets and the per-node connection cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Whole-floor attempts.
    pub total_trials: u32,
    /// Mission graph attempts per floor attempt.
    pub graph_trials: u32,
    /// Layout attempts per accepted graph.
    pub map_trials: u32,
    pub max_connections: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { total_trials: 100, graph_trials: 100, map_trials: 100, max_connections: 4 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedFloor {
    pub graph: MissionGraph,
    pub grid: CellGrid,
}

impl GeneratedFloor {
    /// Room hosting the graph root.
    pub fn start_cell(&self) -> Option<&Cell> {
        self.graph.root().and_then(|root| self.grid.cell_of(root.id))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.graph.len() as u32).to_le_bytes());
        for node in self.graph.nodes() {
            bytes.extend(node.id.0.to_le_bytes());
            bytes.extend(node.access_level.to_le_bytes());
            bytes.push(node.node_type.symbol() as u8);
            bytes.extend((node.children.len() as u32).to_le_bytes());
            for child in &node.children {
                bytes.extend(child.0.to_le_bytes());
            }
        }

        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        for cell in self.grid.cells() {
            bytes.extend(cell.pos.x.to_le_bytes());
            bytes.extend(cell.pos.y.to_le_bytes());
            bytes.push(cell.node_type().symbol() as u8);
            bytes.extend(cell.node_id().map_or(u32::MAX, |id| id.0).to_le_bytes());
            for door in cell.doors {
                bytes.push(door.map_or(b'#', |door| door.symbol() as u8));
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

/// Runs grammar, layout and both solvability checks under the trial budgets
/// of a [`GenerationConfig`].
pub struct FloorGenerator<'a> {
    grammar: &'a Grammar,
    config: GenerationConfig,
}

impl<'a> FloorGenerator<'a> {
    pub fn new(grammar: &'a Grammar, config: GenerationConfig) -> Self {
        Self { grammar, config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates one floor from the first `recipe_length` rules of
    /// `recipe_name`.
    pub fn generate(
        &self,
        recipe_name: &str,
        recipe_length: usize,
        rng: &mut GenRng,
    ) -> Result<GeneratedFloor, GenerationError> {
        let recipes = self.grammar.recipe(recipe_name, recipe_length)?;

        for trial in 0..self.config.total_trials {
            let Some(graph) = self.solvable_graph(recipes, rng) else {
                debug!("floor trial {trial}: no solvable mission graph");
                continue;
            };
            let Some(grid) = self.solvable_layout(&graph, rng) else {
                debug!("floor trial {trial}: no solvable layout for {} nodes", graph.len());
                continue;
            };
            info!(
                "generated `{recipe_name}` floor with {} nodes on a {}x{} grid after {} trials",
                graph.len(),
                grid.width(),
                grid.height(),
                trial + 1
            );
            return Ok(GeneratedFloor { graph, grid });
        }

        Err(GenerationError::TrialsExhausted { total_trials: self.config.total_trials })
    }

    fn solvable_graph(&self, recipes: &[Recipe], rng: &mut GenRng) -> Option<MissionGraph> {
        let generator = self.grammar.mission_generator();
        for attempt in 0..self.config.graph_trials {
            let mut graph = self.grammar.start_graph().clone();
            generator.generate(&mut graph, recipes, self.config.max_connections, rng);
            let root = graph.root().map(|node| node.id)?;
            if !graph.levels_settled() {
                debug!("mission graph attempt {attempt} left access levels unsettled");
                continue;
            }
            if is_graph_solvable(&graph, root) {
                return Some(graph);
            }
            debug!("mission graph attempt {attempt} is not solvable");
        }
        None
    }

    fn solvable_layout(&self, graph: &MissionGraph, rng: &mut GenRng) -> Option<CellGrid> {
        let root = graph.root()?.id;
        let layout = LayoutGenerator::new(graph);
        for attempt in 0..self.config.map_trials {
            let Some(map) = layout.generate(rng) else {
                debug!("layout attempt {attempt} could not place every room");
                continue;
            };
            let grid = map.to_grid();
            let solvable = grid
                .cell_of(root)
                .is_some_and(|start| is_grid_solvable(&grid, start.pos));
            if solvable {
                return Some(grid);
            }
            debug!("layout attempt {attempt} is not solvable");
        }
        None
    }
}
