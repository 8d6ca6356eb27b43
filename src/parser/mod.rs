/*
    This module reads grammars written as `S = aB | b` lines
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use verifier::verify_rules;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple equals signs
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // The nonterminal being defined is longer than one character
    InvalidNonterminal(String),
    // There is an unclosed quote
    UnmatchedQuote,
    // An alternative has no symbols, e.g. `S = a | | b`
    EmptyAlternative,
    // A nonterminal got a second definition
    DuplicateNonterminal(Symbol),
    // The file contains no rules at all
    NoRules,
    // The rules were read but do not form a valid grammar
    Grammar(GrammarError),
    // Somehow a full rewrite was parsed as a base alternative
    // This is a problem with topdown, not the grammar
    UnsplitRewrite,
    // A blank line got too deep into the parser
    // This is a problem with topdown, not the grammar
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::InvalidNonterminal(a), CompileErrorType::InvalidNonterminal(b)) => a == b,
            (CompileErrorType::DuplicateNonterminal(a), CompileErrorType::DuplicateNonterminal(b)) => a == b,
            (CompileErrorType::Grammar(a), CompileErrorType::Grammar(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `=` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `=` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            CompileErrorType::InvalidNonterminal(name) => write!(f, "Nonterminal `{}` must be a single character", name),
            CompileErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            CompileErrorType::EmptyAlternative => write!(f, "Empty alternative"),
            CompileErrorType::DuplicateNonterminal(nonterminal) => write!(f, "`{}` is already defined", nonterminal),
            CompileErrorType::NoRules => write!(f, "No rules found"),
            CompileErrorType::Grammar(e) => write!(f, "{}", e),
            CompileErrorType::UnsplitRewrite => write!(f, "Rewrite was not fully split (this is a problem with topdown, not the grammar)"),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with topdown, not the grammar)"),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location {
            file,
            line: 0
        },
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: Symbol,
    alternatives: Vec<Production>,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<Production> {
    let mut production = Production::new();
    for token in tokens {
        match token {
            Token::Equals => return Err(CompileErrorType::UnexpectedEquals),
            Token::Or => return Err(CompileErrorType::UnsplitRewrite),
            Token::Symbols(s) | Token::Quoted(s) => production.extend(s.chars()),
        }
    }

    if production.is_empty() {
        return Err(CompileErrorType::EmptyAlternative);
    }
    Ok(production)
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<Production>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let name = match tokens.get(0) {
        Some(Token::Symbols(s)) => Ok(s),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    let symbol = name
        .chars()
        .exactly_one()
        .map_err(|_| CompileErrorType::InvalidNonterminal(name.clone()))?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let alternatives = parse_rewrite(&tokens[2..])?;

    return Ok(Rule {
        symbol,
        alternatives,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with(';')
}

fn grammar_from_rules(rule_list: Vec<Rule>, source: Location) -> FileResult<Grammar> {
    verify_rules(&rule_list, &source)?;

    let rules = rule_list
        .into_iter()
        .map(|rule| (rule.symbol, rule.alternatives))
        .collect::<Rules>();

    Grammar::from_rules(rules).map_err(|error| vec![CompileError {
        location: source,
        error: CompileErrorType::Grammar(error)
    }])
}

// Parses already numbered lines, keeping every line's error
fn parse_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, locate: impl Fn(usize) -> Location) -> FileResult<Vec<Rule>> {
    let parsed_lines = lines
        .filter(|(_, line)| line.as_ref().map_or(true, |l| is_rule_line(l)))
        .map(|(num, line_res)| line_res.and_then(|line| parse_lex_line(&line, locate(num))));

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if errors.len() > 0 {
        return Err(errors);
    }
    Ok(rules)
}

// Returns an iterator over the lines of a file, with the io errors wrapped
// in CompileError and numbered from 1
fn file_line_nums<'a>(file: File, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.to_path_buf())))
        .enumerate()
        .map(|(num, line)| (num + 1, line))
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    let locate = |line| Location { file: path.to_path_buf(), line };

    let rules = parse_lines(file_line_nums(file, path), locate)?;
    grammar_from_rules(rules, locate(0))
}

// Parses grammar text that did not come from a file
pub fn parse_str(text: &str, file: &Path) -> FileResult<Grammar> {
    let locate = |line| Location { file: file.to_path_buf(), line };
    let lines = text.lines().enumerate().map(|(num, line)| (num + 1, Ok(line.to_string())));

    let rules = parse_lines(lines, locate)?;
    grammar_from_rules(rules, locate(0))
}

// Parses rules given one per string, as with `--rule`
pub fn parse_inline<S: AsRef<str>>(rules: &[S]) -> FileResult<Grammar> {
    let lines = rules.iter().enumerate().map(|(num, line)| (num + 1, Ok(line.as_ref().to_string())));

    let rules = parse_lines(lines, Location::inline)?;
    grammar_from_rules(rules, Location::inline(0))
}
