use std::collections::HashSet;

use super::CompileErrorType::{DuplicateNonterminal, NoRules};
use super::{CompileError, CompileErrors, FileResult, Location, Rule};

fn get_duplicate_definitions(rules: &[Rule]) -> CompileErrors {
    // Every definition after the first one of a nonterminal is an error at
    // the line of that later definition
    let mut seen = HashSet::with_capacity(rules.len());
    rules.iter()
        .filter(|rule| !seen.insert(rule.symbol))
        .map(|rule| CompileError {
            location: rule.location.to_owned(),
            error: DuplicateNonterminal(rule.symbol)
        })
        .collect()
}

pub fn verify_rules(rules: &[Rule], source: &Location) -> FileResult<()> {
    let mut errors = Vec::new();

    if rules.is_empty() {
        errors.push(CompileError {
            location: source.to_owned(),
            error: NoRules
        });
    }

    errors.extend(get_duplicate_definitions(rules).into_iter());

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}
