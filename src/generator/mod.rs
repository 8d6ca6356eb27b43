/*
    This module generates sentences
*/

use rand::prelude::*;
use std::fmt::Display;

use crate::grammar::*;
use crate::error_handling::*;

// Past this depth the shortest alternatives are preferred
const PREFER_SHORT_DEPTH: usize = 16;
// Past this depth generation gives up
const MAX_DEPTH: usize = 256;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // Generation was asked to start from a symbol with no rules
    UndefinedNonterminal(Symbol),
    // Every way of rewriting kept recursing
    DepthExceeded(usize),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::UndefinedNonterminal(nonterminal) => write!(f, "No definition for nonterminal `{}`", nonterminal),
            GenerateErrorType::DepthExceeded(depth) => write!(f, "Gave up after recursing {} nonterminals deep", depth),
        }
    }
}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<String, GenerateError>;

pub fn generate(grammar: &Grammar, location: &Location, rng: &mut impl Rng) -> GenResult {
    generate_with_override(grammar, grammar.start_symbol(), location, rng)
}

// Generates a sentence in the given grammar starting with the given symbol
pub fn generate_with_override(grammar: &Grammar, start: Symbol, location: &Location, rng: &mut impl Rng) -> GenResult {
    let mut result = String::new();
    generate_nonterminal(start, grammar, 0, location, rng, &mut result)?;
    Ok(result)
}

fn nonterminal_count(production: &Production, grammar: &Grammar) -> usize {
    production.iter().filter(|symbol| grammar.is_nonterminal(**symbol)).count()
}

fn generate_nonterminal(
    nonterminal: Symbol,
    grammar: &Grammar,
    depth: usize,
    location: &Location,
    rng: &mut impl Rng,
    result: &mut String,
) -> Result<(), GenerateError> {
    let error = |error| GenerateError {
        location: location.clone(),
        error
    };

    if depth >= MAX_DEPTH {
        return Err(error(GenerateErrorType::DepthExceeded(MAX_DEPTH)));
    }

    let productions = grammar
        .productions(nonterminal)
        .ok_or_else(|| error(GenerateErrorType::UndefinedNonterminal(nonterminal)))?;

    let alternative = if depth < PREFER_SHORT_DEPTH {
        productions.choose(rng)
    } else {
        productions.iter().min_by_key(|p| nonterminal_count(p, grammar))
    };
    let alternative = match alternative {
        Some(a) => a,
        None => return Ok(()),
    };

    for symbol in alternative {
        if grammar.is_nonterminal(*symbol) {
            generate_nonterminal(*symbol, grammar, depth + 1, location, rng, result)?;
        } else {
            result.push(*symbol);
        }
    }

    Ok(())
}
