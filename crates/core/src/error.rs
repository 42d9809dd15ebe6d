//! Error types for grammar parsing and floor generation.
//!
//! Expected generation failures (no pattern match, no open slot, exhausted
//! connector search) are plain `Option`/`bool` values inside the pipeline and
//! never surface here. Only malformed input and exhausted trial budgets do.

use thiserror::Error;

/// Malformed graph or recipe text. Lines are 1-indexed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected {expected} comma-separated fields, found {found}")]
    FieldCount { line: usize, expected: &'static str, found: usize },

    #[error("line {line}: `{value}` is not a valid integer")]
    InvalidInteger { line: usize, value: String },

    #[error("line {line}: unknown node type `{name}`")]
    UnknownNodeType { line: usize, name: String },

    #[error("line {line}: node {id} is declared twice")]
    DuplicateNode { line: usize, id: u32 },

    #[error("line {line}: edge references undeclared node {id}")]
    UnknownEdgeEndpoint { line: usize, id: u32 },

    #[error("line {line}: empty repeat range {min}..={max}")]
    EmptyRepeatRange { line: usize, min: u32, max: u32 },
}

/// A recipe rule whose repeat range holds no count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("rule `{action}` has empty repeat range {min}..={max}")]
    EmptyRepeatRange { action: String, min: u32, max: u32 },
}

/// Structural problems in a pattern's matcher/replacement graphs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("matcher graph has no nodes")]
    EmptyMatcher,

    #[error("no replacement graphs")]
    NoReplacement,

    #[error("replacement {index} has {found} nodes but the matcher has {required}")]
    ReplacementTooSmall { index: usize, found: usize, required: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("failed to parse {asset}: {source}")]
    Parse {
        asset: String,
        #[source]
        source: ParseError,
    },

    #[error("invalid pattern `{name}`: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: PatternError,
    },

    #[error("grammar has no start graph")]
    MissingStartGraph,

    #[error("start graph has no nodes")]
    EmptyStartGraph,

    #[error("unknown recipe `{name}`")]
    UnknownRecipe { name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no solvable floor after {total_trials} trials")]
    TrialsExhausted { total_trials: u32 },

    #[error("floor {floor} failed: {source}")]
    Floor {
        floor: u32,
        #[source]
        source: Box<GenerationError>,
    },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
