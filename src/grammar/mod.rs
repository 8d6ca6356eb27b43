/*
    This module is for storing and editing grammars
*/

use std::fmt::Display;

use indexmap::IndexMap;
use itertools::Itertools;
use log::info;

use crate::error_handling::ErrorType;

// The base unit in a grammar rule. A symbol is a nonterminal if the grammar
// has rules for it, otherwise it is a terminal
pub type Symbol = char;

// The symbols in a single alternative
pub type Production = Vec<Symbol>;

// Nonterminals in the order they were defined, each with its alternatives
pub type Rules = IndexMap<Symbol, Vec<Production>>;

#[derive(Debug, PartialEq, Clone)]
pub enum InvalidGrammar {
    // The grammar has no rules at all
    NoNonterminals,
    // A nonterminal was defined with zero alternatives
    NoProductions(Symbol),
    // An alternative is blank
    EmptyProduction(Symbol),
    // A nonterminal name is not a single character
    InvalidNonterminal(String),
    // The same nonterminal was defined twice
    DuplicateNonterminal(Symbol),
}

impl Display for InvalidGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidGrammar::NoNonterminals => write!(f, "The grammar defines no nonterminals"),
            InvalidGrammar::NoProductions(nonterminal) => write!(f, "`{}` has no productions", nonterminal),
            InvalidGrammar::EmptyProduction(nonterminal) => write!(f, "`{}` has an empty production", nonterminal),
            InvalidGrammar::InvalidNonterminal(name) => write!(f, "`{}` is not a single character nonterminal", name),
            InvalidGrammar::DuplicateNonterminal(nonterminal) => write!(f, "`{}` is defined more than once", nonterminal),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum GrammarError {
    InvalidGrammar(InvalidGrammar),
    // An edit addressed a rule id outside of `list_rules`
    RuleNotFound(usize),
}

impl ErrorType for GrammarError {}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::InvalidGrammar(reason) => write!(f, "Invalid grammar: {}", reason),
            GrammarError::RuleNotFound(index) => write!(f, "There is no rule with id {}", index),
        }
    }
}

impl From<InvalidGrammar> for GrammarError {
    fn from(reason: InvalidGrammar) -> Self {
        GrammarError::InvalidGrammar(reason)
    }
}

pub type GrammarResult<T> = std::result::Result<T, GrammarError>;

// One line of the rule listing. `index` is 1-based and is what edits address
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RuleEntry<'a> {
    pub index: usize,
    pub nonterminal: Symbol,
    pub production: &'a [Symbol]
}

impl Display for RuleEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {} -> {}", self.index, self.nonterminal, self.production.iter().collect::<String>())
    }
}

// What `replace_rule` did
#[derive(Debug, PartialEq, Clone)]
pub enum Edit {
    Replaced {
        index: usize,
        nonterminal: Symbol,
        old: Production,
        new: Production
    },
    // The replacement was blank so the rule was left alone
    Unchanged { index: usize },
}

impl Display for Edit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edit::Replaced { nonterminal, new, .. } => write!(f, "Updated rule: {} -> {}", nonterminal, new.iter().collect::<String>()),
            Edit::Unchanged { .. } => write!(f, "No changes made"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    start_symbol: Symbol,
    rules: Rules,
    // The rules as first defined, never edited
    original: Rules
}

fn parse_nonterminal(name: &str) -> GrammarResult<Symbol> {
    let name = name.trim();
    match name.chars().exactly_one() {
        Ok(symbol) => Ok(symbol),
        Err(_) => Err(InvalidGrammar::InvalidNonterminal(name.to_string()).into()),
    }
}

fn parse_production(nonterminal: Symbol, text: &str) -> GrammarResult<Production> {
    let production: Production = text.trim().chars().collect();
    if production.is_empty() {
        return Err(InvalidGrammar::EmptyProduction(nonterminal).into());
    }
    Ok(production)
}

impl Grammar {
    // Builds a grammar from `(nonterminal, alternatives)` pairs. The first
    // pair defines the start symbol
    pub fn new<I, N, P, S>(definitions: I) -> GrammarResult<Self>
    where
        I: IntoIterator<Item = (N, P)>,
        N: AsRef<str>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Rules::new();
        for (name, alternatives) in definitions {
            let nonterminal = parse_nonterminal(name.as_ref())?;
            if rules.contains_key(&nonterminal) {
                return Err(InvalidGrammar::DuplicateNonterminal(nonterminal).into());
            }

            let productions = alternatives
                .into_iter()
                .map(|text| parse_production(nonterminal, text.as_ref()))
                .collect::<GrammarResult<Vec<_>>>()?;
            if productions.is_empty() {
                return Err(InvalidGrammar::NoProductions(nonterminal).into());
            }

            rules.insert(nonterminal, productions);
        }

        Self::from_rules(rules)
    }

    // Builds a grammar from already split rules
    pub fn from_rules(rules: Rules) -> GrammarResult<Self> {
        let start_symbol = match rules.keys().next() {
            Some(symbol) => *symbol,
            None => return Err(InvalidGrammar::NoNonterminals.into()),
        };

        for (nonterminal, productions) in &rules {
            if productions.is_empty() {
                return Err(InvalidGrammar::NoProductions(*nonterminal).into());
            }
            if productions.iter().any(Vec::is_empty) {
                return Err(InvalidGrammar::EmptyProduction(*nonterminal).into());
            }
        }

        Ok(Grammar {
            start_symbol,
            original: rules.clone(),
            rules
        })
    }

    pub fn start_symbol(&self) -> Symbol {
        self.start_symbol
    }

    pub fn is_nonterminal(&self, symbol: Symbol) -> bool {
        self.rules.contains_key(&symbol)
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.rules.keys().copied()
    }

    pub fn productions(&self, nonterminal: Symbol) -> Option<&[Production]> {
        self.rules.get(&nonterminal).map(Vec::as_slice)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn original_rules(&self) -> &Rules {
        &self.original
    }

    pub fn is_modified(&self) -> bool {
        self.rules != self.original
    }

    // Every production, numbered from 1 across all nonterminals in definition
    // order
    pub fn list_rules(&self) -> Vec<RuleEntry<'_>> {
        self.rules
            .iter()
            .flat_map(|(nonterminal, productions)| productions.iter().map(move |p| (*nonterminal, p)))
            .enumerate()
            .map(|(i, (nonterminal, production))| RuleEntry {
                index: i + 1,
                nonterminal,
                production
            })
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    // Finds the nonterminal and alternative position of a 1-based rule id
    fn locate(&self, index: usize) -> Option<(Symbol, usize)> {
        if index == 0 {
            return None;
        }

        let mut remaining = index - 1;
        for (nonterminal, productions) in &self.rules {
            if remaining < productions.len() {
                return Some((*nonterminal, remaining));
            }
            remaining -= productions.len();
        }
        None
    }

    pub fn replace_rule(&mut self, index: usize, new_production: &str) -> GrammarResult<Edit> {
        let (nonterminal, position) = self.locate(index).ok_or(GrammarError::RuleNotFound(index))?;

        let new: Production = new_production.trim().chars().collect();
        if new.is_empty() {
            info!("rule {} left unchanged", index);
            return Ok(Edit::Unchanged { index });
        }

        let productions = self
            .rules
            .get_mut(&nonterminal)
            .ok_or(GrammarError::RuleNotFound(index))?;
        let old = std::mem::replace(&mut productions[position], new.clone());
        info!(
            "rule {} edited: {} -> {} is now {} -> {}",
            index,
            nonterminal,
            old.iter().collect::<String>(),
            nonterminal,
            new.iter().collect::<String>()
        );

        Ok(Edit::Replaced {
            index,
            nonterminal,
            old,
            new
        })
    }

    // Throws away every edit
    pub fn reset(&mut self) {
        info!("grammar reset to its original rules");
        self.rules = self.original.clone();
    }

    // Rules whose first symbol is a nonterminal. These can only be selected
    // when the lookahead is literally that nonterminal's character
    pub fn leading_nonterminal_rules(&self) -> Vec<RuleEntry<'_>> {
        self.list_rules()
            .into_iter()
            .filter(|entry| entry.production.first().is_some_and(|s| self.is_nonterminal(*s)))
            .collect()
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.list_rules().iter().join("\n"))
    }
}
