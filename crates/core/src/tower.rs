//! Multi-floor towers: a basement followed by floors of rising complexity.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::grammar::Grammar;
use crate::layout::{Cell, CellGrid, Direction, DoorType, GridPos};
use crate::mission::{MissionGraph, MissionNode, NodeId, NodeType};
use crate::pipeline::{FloorGenerator, GeneratedFloor, GenerationConfig};
use crate::rng::GenRng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedRoomTypes {
    Normal,
    PlusKey,
    #[default]
    PlusPuzzle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedFloorLayouts {
    Linear,
    PlusBranching,
    #[default]
    PlusCircling,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Floor count including the basement.
    pub floors: u32,
    pub room_types: AllowedRoomTypes,
    pub floor_layouts: AllowedFloorLayouts,
    pub generation: GenerationConfig,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            floors: 10,
            room_types: AllowedRoomTypes::default(),
            floor_layouts: AllowedFloorLayouts::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Number of recipe rules used on `floor`.
pub fn recipe_length_for_floor(floor: u32) -> usize {
    match floor {
        0..2 => 1,
        2..5 => 2,
        5..10 => 3,
        10..20 => 4,
        20..30 => 5,
        30..40 => 7,
        40..50 => 9,
        50..60 => 11,
        60..80 => 13,
        80..90 => 15,
        _ => 17,
    }
}

pub fn recipe_name(
    room_types: AllowedRoomTypes,
    floor_layouts: AllowedFloorLayouts,
) -> &'static str {
    match (room_types, floor_layouts) {
        (AllowedRoomTypes::Normal, _) => "graphRecipeNormal",
        (AllowedRoomTypes::PlusKey, _) => "graphRecipeKey",
        (AllowedRoomTypes::PlusPuzzle, AllowedFloorLayouts::Linear) => "graphRecipeSimple",
        (AllowedRoomTypes::PlusPuzzle, AllowedFloorLayouts::PlusBranching) => {
            "graphRecipeBranching"
        }
        (AllowedRoomTypes::PlusPuzzle, AllowedFloorLayouts::PlusCircling) => "graphRecipe",
    }
}

/// Single basement room with an entry and an exit door on different sides.
pub fn generate_basement(rng: &mut GenRng) -> GeneratedFloor {
    let mut graph = MissionGraph::new();
    let node = MissionNode::new(NodeId(0), 0, NodeType::Basement);
    let mut cell = Cell::room(GridPos::ORIGIN, &node);
    graph.insert_node(node);

    let mut sides = Direction::ALL.to_vec();
    let entry = sides.remove(rng.below(sides.len()));
    let exit = sides[rng.below(sides.len())];
    cell.set_door(entry, DoorType::Start);
    cell.set_door(exit, DoorType::Exit);

    GeneratedFloor { graph, grid: CellGrid::single(cell) }
}

/// Floor `floor_index` of the tower seeded with `tower_seed`. Each floor
/// draws from its own stream, so floors can be regenerated independently.
pub fn generate_tower_floor(
    tower_seed: u64,
    floor_index: u32,
    config: &TowerConfig,
    grammar: &Grammar,
) -> Result<GeneratedFloor, GenerationError> {
    let mut rng = GenRng::for_floor(tower_seed, floor_index);
    if floor_index == 0 {
        return Ok(generate_basement(&mut rng));
    }

    let recipe = recipe_name(config.room_types, config.floor_layouts);
    FloorGenerator::new(grammar, config.generation)
        .generate(recipe, recipe_length_for_floor(floor_index), &mut rng)
        .map_err(|source| GenerationError::Floor { floor: floor_index, source: Box::new(source) })
}

pub fn generate_tower(
    tower_seed: u64,
    config: &TowerConfig,
    grammar: &Grammar,
) -> Result<Vec<GeneratedFloor>, GenerationError> {
    let floors = (0..config.floors)
        .map(|floor_index| generate_tower_floor(tower_seed, floor_index, config, grammar))
        .collect::<Result<Vec<_>, _>>()?;
    info!("generated tower {tower_seed} with {} floors", floors.len());
    Ok(floors)
}
