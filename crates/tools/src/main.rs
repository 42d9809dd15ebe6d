mod grammar_dir;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use floorgen::{FloorGenerator, GenRng, GeneratedFloor, Grammar, TowerConfig, generate_tower};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tower seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Floor count including the basement; overrides the config file
    #[arg(short, long)]
    floors: Option<u32>,
    /// Grammar folder to use instead of the bundled grammar
    #[arg(short, long)]
    grammar: Option<PathBuf>,
    /// TOML tower configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Generate a single floor from this recipe instead of a tower
    #[arg(short, long)]
    recipe: Option<String>,
    /// Number of recipe rules used with --recipe
    #[arg(long, default_value_t = 17)]
    recipe_length: usize,
    /// Print floors as JSON
    #[arg(long)]
    json: bool,
    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let grammar = match &args.grammar {
        Some(dir) => grammar_dir::load_grammar(dir)?,
        None => Grammar::bundled(),
    };
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str::<TowerConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => TowerConfig::default(),
    };
    if let Some(floors) = args.floors {
        config.floors = floors;
    }

    let floors = match &args.recipe {
        Some(recipe) => {
            let floor = FloorGenerator::new(&grammar, config.generation)
                .generate(recipe, args.recipe_length, &mut GenRng::from_seed(args.seed))
                .with_context(|| format!("recipe `{recipe}` with seed {}", args.seed))?;
            vec![floor]
        }
        None => generate_tower(args.seed, &config, &grammar)
            .with_context(|| format!("tower with seed {}", args.seed))?,
    };
    info!("generated {} floors", floors.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&floors).context("failed to encode floors")?);
    } else {
        for (index, floor) in floors.iter().enumerate() {
            print_floor(index, floor);
        }
    }
    Ok(())
}

fn print_floor(index: usize, floor: &GeneratedFloor) {
    println!("Floor {index}");
    println!("Fingerprint: {:016x}", floor.fingerprint());
    println!("Grid: {}x{}", floor.grid.width(), floor.grid.height());
    print!("{}", floor.grid);
    println!("Graph:");
    print!("{}", floor.graph);
    println!();
}
