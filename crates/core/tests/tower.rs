use floorgen::tower::{generate_tower_floor, recipe_length_for_floor};
use floorgen::{
    AllowedFloorLayouts, AllowedRoomTypes, DoorType, Grammar, NodeType, TowerConfig,
    generate_tower,
};

#[test]
fn test_basement_opens_the_tower() {
    let grammar = Grammar::bundled();
    let config = TowerConfig { floors: 3, ..TowerConfig::default() };
    let tower = generate_tower(11, &config, &grammar).expect("tower generates");

    let basement = &tower[0];
    assert_eq!(basement.graph.len(), 1);
    let room = basement.start_cell().expect("basement room");
    assert_eq!(room.node_type(), NodeType::Basement);
    assert!(room.doors.contains(&Some(DoorType::Start)));
    assert!(room.doors.contains(&Some(DoorType::Exit)));

    for floor in &tower[1..] {
        let root = floor.graph.root().expect("floor has a root");
        assert_eq!(root.node_type, NodeType::Start);
    }
}

#[test]
fn test_normal_towers_only_grow_normal_rooms() {
    let grammar = Grammar::bundled();
    let config = TowerConfig {
        floors: 12,
        room_types: AllowedRoomTypes::Normal,
        floor_layouts: AllowedFloorLayouts::Linear,
        ..TowerConfig::default()
    };
    for floor_index in [1_u32, 6, 11] {
        let floor =
            generate_tower_floor(8, floor_index, &config, &grammar).expect("floor generates");
        for node in floor.graph.nodes() {
            assert!(
                matches!(node.node_type, NodeType::Start | NodeType::End | NodeType::Normal),
                "floor {floor_index} grew a {} room",
                node.node_type
            );
        }
    }
}

#[test]
fn test_later_floors_apply_more_rules() {
    assert!(recipe_length_for_floor(1) < recipe_length_for_floor(12));
    assert!(recipe_length_for_floor(12) < recipe_length_for_floor(95));

    let grammar = Grammar::bundled();
    let config = TowerConfig::default();
    let early = generate_tower_floor(3, 1, &config, &grammar).expect("floor generates");
    let late = generate_tower_floor(3, 95, &config, &grammar).expect("floor generates");
    assert!(
        late.graph.len() > early.graph.len(),
        "floor 95 has {} nodes, floor 1 has {}",
        late.graph.len(),
        early.graph.len()
    );
}

#[test]
fn test_tower_config_reads_from_toml_shaped_json() {
    let config: TowerConfig = serde_json::from_str(
        r#"{"floors": 4, "floor_layouts": "plus_branching", "generation": {"max_connections": 3}}"#,
    )
    .expect("valid config");
    assert_eq!(config.floors, 4);
    assert_eq!(config.room_types, AllowedRoomTypes::PlusPuzzle);
    assert_eq!(config.floor_layouts, AllowedFloorLayouts::PlusBranching);
    assert_eq!(config.generation.max_connections, 3);
    assert_eq!(config.generation.total_trials, 100);
}

#[test]
fn test_tower_config_round_trips_through_toml() {
    let text = r#"
floors = 5
room_types = "plus_key"

[generation]
map_trials = 40
"#;
    let config: TowerConfig = toml::from_str(text).expect("valid toml config");
    assert_eq!(config.floors, 5);
    assert_eq!(config.room_types, AllowedRoomTypes::PlusKey);
    assert_eq!(config.floor_layouts, AllowedFloorLayouts::PlusCircling);
    assert_eq!(config.generation.map_trials, 40);
    assert_eq!(config.generation.graph_trials, 100);

    let written = toml::to_string(&config).expect("config serializes");
    let reread: TowerConfig = toml::from_str(&written).expect("written config parses");
    assert_eq!(reread, config);
}
