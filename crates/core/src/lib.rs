pub mod error;
pub mod grammar;
pub mod layout;
pub mod mission;
pub mod pipeline;
pub mod rng;
pub mod solvability;
pub mod tower;

pub use error::{GenerationError, GrammarError, ParseError, PatternError, RecipeError};
pub use grammar::{Grammar, GrammarBuilder};
pub use layout::{Cell, CellGrid, CellType, Direction, DoorType, GridPos, LayoutGenerator, Map};
pub use mission::{
    MissionGraph, MissionGraphGenerator, MissionNode, NodeId, NodeType, Pattern, Recipe,
};
pub use pipeline::{FloorGenerator, GeneratedFloor, GenerationConfig};
pub use rng::{GenRng, derive_floor_seed};
pub use solvability::{is_graph_solvable, is_grid_solvable};
pub use tower::{AllowedFloorLayouts, AllowedRoomTypes, TowerConfig, generate_tower};

/// One floor from the bundled grammar with default budgets.
pub fn generate_floor(
    seed: u64,
    recipe_name: &str,
    recipe_length: usize,
) -> Result<GeneratedFloor, GenerationError> {
    let grammar = Grammar::bundled();
    FloorGenerator::new(&grammar, GenerationConfig::default()).generate(
        recipe_name,
        recipe_length,
        &mut GenRng::from_seed(seed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_floor_matches_floor_generator_output() {
        let seed = 123_u64;
        let from_helper = generate_floor(seed, "graphRecipeSimple", 3);

        let grammar = Grammar::bundled();
        let from_generator = FloorGenerator::new(&grammar, GenerationConfig::default()).generate(
            "graphRecipeSimple",
            3,
            &mut GenRng::from_seed(seed),
        );

        assert_eq!(from_helper, from_generator);
        assert!(from_helper.is_ok());
    }
}
