use floorgen::{
    CellType, Direction, DoorType, GenerationError, Grammar, MissionGraph, NodeId, NodeType,
    generate_floor, is_graph_solvable, is_grid_solvable,
};

#[test]
fn test_lock_without_key_is_rejected() {
    let graph: MissionGraph = "nodes\n0,0,Start\n1,1,Lock\n2,1,End\nedges\n0,1\n1,2\n"
        .parse()
        .expect("valid graph");
    assert!(!is_graph_solvable(&graph, NodeId(0)));
}

#[test]
fn test_key_before_lock_is_accepted() {
    let graph: MissionGraph =
        "nodes\n0,0,Start\n1,0,Key\n2,1,Lock\n3,1,End\nedges\n0,1\n1,2\n2,3\n"
            .parse()
            .expect("valid graph");
    assert!(is_graph_solvable(&graph, NodeId(0)));
}

#[test]
fn test_zero_length_recipe_yields_the_start_graph() {
    let floor = generate_floor(3, "graphRecipeNormal", 0).expect("floor generates");
    let types: Vec<NodeType> = floor.graph.nodes().iter().map(|node| node.node_type).collect();
    assert_eq!(types, vec![NodeType::Start, NodeType::End]);

    let start = floor.start_cell().expect("start room");
    let end = floor.grid.cell_of(NodeId(1)).expect("end room");
    let direction = start.pos.direction_to(end.pos).expect("rooms are adjacent");
    assert_eq!(start.door(direction), Some(DoorType::Open));
    assert_eq!(end.door(direction.opposite()), Some(DoorType::Open));
}

#[test]
fn test_generated_floors_are_solvable() {
    let grammar = Grammar::bundled();
    for recipe in grammar.recipe_names() {
        for seed in 0..3_u64 {
            let floor = generate_floor(seed, recipe, 8).expect("floor generates");
            let root = floor.graph.root().expect("graph has a root").id;
            assert!(is_graph_solvable(&floor.graph, root), "{recipe} seed {seed}: graph");

            let start = floor.start_cell().expect("start room");
            assert!(is_grid_solvable(&floor.grid, start.pos), "{recipe} seed {seed}: grid");
        }
    }
}

#[test]
fn test_doors_are_paired_across_neighbors() {
    let floor = generate_floor(17, "graphRecipe", 12).expect("floor generates");
    for cell in floor.grid.cells() {
        for direction in Direction::ALL {
            if cell.door(direction).is_none() {
                continue;
            }
            let neighbor = floor
                .grid
                .get(cell.pos.step(direction))
                .unwrap_or_else(|| panic!("door at {} leads off the grid", cell.pos));
            assert!(
                neighbor.door(direction.opposite()).is_some(),
                "door from {} into {} has no partner",
                cell.pos,
                neighbor.pos
            );
        }
    }
}

#[test]
fn test_corridors_never_host_nodes() {
    let floor = generate_floor(5, "graphRecipe", 17).expect("floor generates");
    for cell in floor.grid.cells().filter(|cell| cell.cell_type == CellType::Connection) {
        assert_eq!(cell.node_id(), None);
        assert_eq!(cell.node_type(), NodeType::Connection);
    }
}

#[test]
fn test_unknown_recipe_fails_before_any_trial() {
    let result = generate_floor(1, "graphRecipeUnknown", 4);
    assert!(matches!(result, Err(GenerationError::Grammar(_))));
}
