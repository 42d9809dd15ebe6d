//! Scripted sequences of grammar rule applications.

use serde::Serialize;

use crate::error::{ParseError, RecipeError};

use super::text::parse_int;

/// Action name that picks a random pattern instead of a named one.
pub const ANY_ACTION: &str = "any";

/// One rule: apply `action` between `min_times` and `max_times` times.
/// The range is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recipe {
    action: String,
    min_times: u32,
    max_times: u32,
}

impl Recipe {
    pub fn new(action: &str, min_times: u32, max_times: u32) -> Result<Self, RecipeError> {
        let action = action.trim().to_lowercase();
        if min_times > max_times {
            return Err(RecipeError::EmptyRepeatRange { action, min: min_times, max: max_times });
        }
        Ok(Self { action, min_times, max_times })
    }

    /// Lower-cased pattern name, or [`ANY_ACTION`].
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn min_times(&self) -> u32 {
        self.min_times
    }

    pub fn max_times(&self) -> u32 {
        self.max_times
    }

    pub fn is_any(&self) -> bool {
        self.action == ANY_ACTION
    }

    /// Parses one `action[,min[,max]]` line.
    ///
    /// `min` alone means exactly `min` repeats and no numbers means one.
    /// The `any` action always carries `0,0`.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let action = fields[0];
        if action.eq_ignore_ascii_case(ANY_ACTION) {
            return Ok(Self { action: ANY_ACTION.to_string(), min_times: 0, max_times: 0 });
        }

        let (min_times, max_times) = match fields.as_slice() {
            [_, min] => {
                let min = parse_int::<u32>(min, line_number)?;
                (min, min)
            }
            [_, min, max, ..] => {
                (parse_int::<u32>(min, line_number)?, parse_int::<u32>(max, line_number)?)
            }
            _ => (1, 1),
        };
        Recipe::new(action, min_times, max_times).map_err(
            |RecipeError::EmptyRepeatRange { min, max, .. }| ParseError::EmptyRepeatRange {
                line: line_number,
                min,
                max,
            },
        )
    }

    /// Parses every rule of a recipe file, skipping blank and `#` lines.
    pub fn parse_list(text: &str) -> Result<Vec<Recipe>, ParseError> {
        let mut recipes = Vec::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            recipes.push(Recipe::parse_line(line, index + 1)?);
        }
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(action: &str, min_times: u32, max_times: u32) -> Recipe {
        Recipe::new(action, min_times, max_times).expect("valid range")
    }

    #[test]
    fn repeat_counts_follow_field_defaults() {
        assert_eq!(Recipe::parse_line("AddNormal", 1), Ok(rule("addnormal", 1, 1)));
        assert_eq!(Recipe::parse_line("addnormal,3", 1), Ok(rule("addnormal", 3, 3)));
        assert_eq!(Recipe::parse_line("addnormal, 2, 5", 1), Ok(rule("addnormal", 2, 5)));
    }

    #[test]
    fn constructor_rejects_inverted_ranges() {
        assert_eq!(
            Recipe::new("AddNormal", 3, 1),
            Err(RecipeError::EmptyRepeatRange { action: "addnormal".to_string(), min: 3, max: 1 })
        );
        let single = Recipe::new("addnormal", 2, 2).expect("single count is a valid range");
        assert_eq!((single.min_times(), single.max_times()), (2, 2));
        assert_eq!(single.action(), "addnormal");
    }

    #[test]
    fn any_action_ignores_counts() {
        let recipe = Recipe::parse_line("any,4,9", 1).expect("valid recipe");
        assert!(recipe.is_any());
        assert_eq!((recipe.min_times(), recipe.max_times()), (0, 0));
    }

    #[test]
    fn rejects_inverted_ranges_and_bad_numbers() {
        assert_eq!(
            Recipe::parse_line("addnormal,5,2", 7),
            Err(ParseError::EmptyRepeatRange { line: 7, min: 5, max: 2 })
        );
        assert_eq!(
            Recipe::parse_line("addnormal,-1", 2),
            Err(ParseError::InvalidInteger { line: 2, value: "-1".to_string() })
        );
    }

    #[test]
    fn list_skips_comments_and_blank_lines() {
        let recipes =
            Recipe::parse_list("# warmup\naddnormal,1,2\n\nany\n#addlever\naddbranch\n")
                .expect("valid list");
        let actions: Vec<&str> = recipes.iter().map(Recipe::action).collect();
        assert_eq!(actions, vec!["addnormal", "any", "addbranch"]);
    }
}
