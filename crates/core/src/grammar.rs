//! Grammar content: the start graph, the pattern table and named recipes.

use std::collections::BTreeMap;

use crate::error::{GrammarError, ParseError};
use crate::mission::{MissionGraph, MissionGraphGenerator, Pattern, Recipe};

const BUNDLED_START_GRAPH: &str = include_str!("../assets/graph_start.txt");

const BUNDLED_PATTERNS: &[(&str, &str, &[&str])] = &[
    (
        "addnormal",
        include_str!("../assets/patterns/addnormal/input.txt"),
        &[include_str!("../assets/patterns/addnormal/output.txt")],
    ),
    (
        "addbranch",
        include_str!("../assets/patterns/addbranch/input.txt"),
        &[include_str!("../assets/patterns/addbranch/output.txt")],
    ),
    (
        "addkeylock",
        include_str!("../assets/patterns/addkeylock/input.txt"),
        &[include_str!("../assets/patterns/addkeylock/output.txt")],
    ),
    (
        "addpuzzle",
        include_str!("../assets/patterns/addpuzzle/input.txt"),
        &[
            include_str!("../assets/patterns/addpuzzle/output.txt"),
            include_str!("../assets/patterns/addpuzzle/output2.txt"),
        ],
    ),
    (
        "addlever",
        include_str!("../assets/patterns/addlever/input.txt"),
        &[include_str!("../assets/patterns/addlever/output.txt")],
    ),
];

const BUNDLED_RECIPES: &[(&str, &str)] = &[
    ("graphRecipe", include_str!("../assets/recipes/graphRecipe.txt")),
    ("graphRecipeNormal", include_str!("../assets/recipes/graphRecipeNormal.txt")),
    ("graphRecipeKey", include_str!("../assets/recipes/graphRecipeKey.txt")),
    ("graphRecipeSimple", include_str!("../assets/recipes/graphRecipeSimple.txt")),
    ("graphRecipeBranching", include_str!("../assets/recipes/graphRecipeBranching.txt")),
];

/// Validated grammar. Patterns are keyed by lower-cased name; recipes keep
/// the name they were registered under.
#[derive(Clone, Debug)]
pub struct Grammar {
    start_graph: MissionGraph,
    patterns: BTreeMap<String, Pattern>,
    recipes: BTreeMap<String, Vec<Recipe>>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// Grammar compiled into the crate.
    pub fn bundled() -> Self {
        let mut builder = Grammar::builder().start_graph(BUNDLED_START_GRAPH);
        for (name, input, outputs) in BUNDLED_PATTERNS {
            builder = builder.pattern(name, input, outputs.iter().copied());
        }
        for (name, text) in BUNDLED_RECIPES {
            builder = builder.recipe(name, text);
        }
        builder.build().expect("bundled grammar assets are valid")
    }

    pub fn start_graph(&self) -> &MissionGraph {
        &self.start_graph
    }

    pub fn patterns(&self) -> &BTreeMap<String, Pattern> {
        &self.patterns
    }

    pub fn pattern(&self, name: &str) -> Option<&Pattern> {
        self.patterns.get(&name.to_lowercase())
    }

    pub fn recipe_names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    /// The first `recipe_length` rules of the named recipe.
    pub fn recipe(&self, name: &str, recipe_length: usize) -> Result<&[Recipe], GrammarError> {
        let recipes = self
            .recipes
            .get(name)
            .ok_or_else(|| GrammarError::UnknownRecipe { name: name.to_string() })?;
        Ok(&recipes[..recipe_length.min(recipes.len())])
    }

    pub fn mission_generator(&self) -> MissionGraphGenerator<'_> {
        MissionGraphGenerator::new(&self.patterns)
    }
}

/// Collects grammar sources as text; [`GrammarBuilder::build`] parses and
/// validates them all at once.
#[derive(Clone, Debug, Default)]
pub struct GrammarBuilder {
    start_graph: Option<String>,
    patterns: Vec<(String, String, Vec<String>)>,
    recipes: Vec<(String, String)>,
}

impl GrammarBuilder {
    pub fn start_graph(mut self, text: &str) -> Self {
        self.start_graph = Some(text.to_string());
        self
    }

    pub fn pattern<'a>(
        mut self,
        name: &str,
        input: &str,
        outputs: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let outputs = outputs.into_iter().map(str::to_string).collect();
        self.patterns.push((name.to_lowercase(), input.to_string(), outputs));
        self
    }

    pub fn recipe(mut self, name: &str, text: &str) -> Self {
        self.recipes.push((name.to_string(), text.to_string()));
        self
    }

    /// Parses every source in full. A recipe is validated down to its last
    /// rule even though a floor may only use a prefix of it.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let start_text = self.start_graph.ok_or(GrammarError::MissingStartGraph)?;
        let start_graph = parse_asset("start graph", &start_text)?;
        if start_graph.is_empty() {
            return Err(GrammarError::EmptyStartGraph);
        }

        let mut patterns = BTreeMap::new();
        for (name, input, outputs) in self.patterns {
            let matcher = parse_asset(&format!("pattern `{name}` input"), &input)?;
            let mut replacements = Vec::with_capacity(outputs.len());
            for (index, output) in outputs.iter().enumerate() {
                let asset = format!("pattern `{name}` output {index}");
                replacements.push(parse_asset(&asset, output)?);
            }
            let pattern = Pattern::new(matcher, replacements)
                .map_err(|source| GrammarError::InvalidPattern { name: name.clone(), source })?;
            patterns.insert(name, pattern);
        }

        let mut recipes = BTreeMap::new();
        for (name, text) in self.recipes {
            let parsed = Recipe::parse_list(&text)
                .map_err(|source| parse_failure(&format!("recipe `{name}`"), source))?;
            recipes.insert(name, parsed);
        }

        Ok(Grammar { start_graph, patterns, recipes })
    }
}

fn parse_asset(asset: &str, text: &str) -> Result<MissionGraph, GrammarError> {
    text.parse().map_err(|source| parse_failure(asset, source))
}

fn parse_failure(asset: &str, source: ParseError) -> GrammarError {
    GrammarError::Parse { asset: asset.to_string(), source }
}
