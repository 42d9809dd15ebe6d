use anyhow::{Context, Result};
use clap::Parser;
use floorgen::{
    FloorGenerator, GenRng, GenerationConfig, Grammar, NodeType, derive_floor_seed,
    is_graph_solvable, is_grid_solvable,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} floors...", args.seed, args.runs);
    let grammar = Grammar::bundled();
    let config = GenerationConfig::default();
    let generator = FloorGenerator::new(&grammar, config);
    let recipes: Vec<&str> = grammar.recipe_names().collect();
    let lengths: Vec<usize> = (0..=17).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for run in 0..args.runs {
        let recipe = choose(&mut rng, &recipes);
        let length = choose(&mut rng, &lengths);
        let floor_seed = derive_floor_seed(args.seed, run);
        let floor = generator
            .generate(recipe, length, &mut GenRng::from_seed(floor_seed))
            .with_context(|| format!("run {run}: `{recipe}` x{length} seed {floor_seed}"))?;

        // Assert invariants
        let root = floor.graph.root().expect("Invariant failed: empty mission graph");
        assert_eq!(root.node_type, NodeType::Start, "Invariant failed: root is not Start");
        assert!(is_graph_solvable(&floor.graph, root.id), "Invariant failed: graph unsolvable");
        let start = floor.start_cell().expect("Invariant failed: start has no room");
        assert!(is_grid_solvable(&floor.grid, start.pos), "Invariant failed: layout unsolvable");
        for node in floor.graph.nodes() {
            assert!(
                floor.graph.connection_count(node.id) <= config.max_connections,
                "Invariant failed: node {} exceeds the connection cap",
                node.id
            );
            let cell = floor.grid.cell_of(node.id).expect("Invariant failed: node without room");
            assert_eq!(cell.node_type(), node.node_type, "Invariant failed: room type mismatch");
        }
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
