//! Grammar folders on disk.
//!
//! ```text
//! graphStart.txt
//! grammarList.txt          one pattern name per line
//! grammar/<name>/input.txt
//! grammar/<name>/output*.txt
//! <recipeName>.txt         every other top-level text file
//! ```

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use floorgen::Grammar;
use log::debug;

const START_GRAPH_FILE: &str = "graphStart.txt";
const PATTERN_LIST_FILE: &str = "grammarList.txt";

pub fn load_grammar(dir: &Path) -> Result<Grammar> {
    let start = read(&dir.join(START_GRAPH_FILE))?;
    let mut builder = Grammar::builder().start_graph(&start);

    let list = read(&dir.join(PATTERN_LIST_FILE))?;
    for name in list.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let pattern_dir = dir.join("grammar").join(name);
        let input = read(&pattern_dir.join("input.txt"))?;
        let outputs = output_files(&pattern_dir)?
            .iter()
            .map(|path| read(path))
            .collect::<Result<Vec<_>>>()?;
        if outputs.is_empty() {
            bail!("pattern `{name}` has no output files in {}", pattern_dir.display());
        }
        debug!("loaded pattern `{name}` with {} outputs", outputs.len());
        builder = builder.pattern(name, &input, outputs.iter().map(String::as_str));
    }

    for path in text_files(dir)? {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if path.file_name().is_some_and(is_reserved) {
            continue;
        }
        builder = builder.recipe(name, &read(&path)?);
    }

    builder
        .build()
        .with_context(|| format!("invalid grammar in {}", dir.display()))
}

fn is_reserved(file: &OsStr) -> bool {
    file == START_GRAPH_FILE || file == PATTERN_LIST_FILE
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Top-level `*.txt` files, sorted by name.
fn text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn output_files(pattern_dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(text_files(pattern_dir)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("output"))
        })
        .collect())
}
