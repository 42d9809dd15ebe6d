use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::rng::GenRng;

use super::graph::MissionGraph;
use super::pattern::Pattern;
use super::recipe::Recipe;

/// Probability that a later pattern displaces the current pick when a
/// recipe step asks for any pattern.
const ANY_PATTERN_SWAP_CHANCE: f64 = 0.3;

/// Grows a mission graph by running recipe steps against a pattern table.
pub struct MissionGraphGenerator<'a> {
    patterns: &'a BTreeMap<String, Pattern>,
}

impl<'a> MissionGraphGenerator<'a> {
    pub fn new(patterns: &'a BTreeMap<String, Pattern>) -> Self {
        Self { patterns }
    }

    /// Applies every recipe step to `graph` in order.
    ///
    /// A step whose pattern finds no match is skipped and the remaining steps
    /// still run.
    pub fn generate(
        &self,
        graph: &mut MissionGraph,
        recipes: &[Recipe],
        max_connections: usize,
        rng: &mut GenRng,
    ) {
        for recipe in recipes {
            match self.patterns.get(recipe.action()) {
                Some(pattern) if !recipe.is_any() => {
                    let times = rng.range_inclusive(recipe.min_times(), recipe.max_times());
                    for _ in 0..times {
                        if !pattern.apply(graph, max_connections, rng) {
                            debug!("pattern `{}` found no match; step skipped", recipe.action());
                        }
                    }
                }
                _ => {
                    let Some((name, pattern)) = self.pick_any(rng) else {
                        warn!("recipe step `{}` has no patterns to choose from", recipe.action());
                        continue;
                    };
                    trace!("recipe step `{}` picked pattern `{name}`", recipe.action());
                    if !pattern.apply(graph, max_connections, rng) {
                        debug!("pattern `{name}` found no match; step skipped");
                    }
                }
            }
        }
    }

    fn pick_any(&self, rng: &mut GenRng) -> Option<(&'a str, &'a Pattern)> {
        let mut selected = None;
        for (name, pattern) in self.patterns {
            if selected.is_none() || rng.chance(ANY_PATTERN_SWAP_CHANCE) {
                selected = Some((name.as_str(), pattern));
            }
        }
        selected
    }
}
