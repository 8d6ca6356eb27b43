/*
    This module decides whether a string can be derived from a grammar by
    simulating a top-down parse with an explicit stack
*/

use std::collections::VecDeque;
use std::fmt::Display;

use log::{debug, trace};

use crate::grammar::{Grammar, Production, Symbol};
use crate::tree::{DerivationTree, NodeId, TreeBuilder};

// Why a string was not accepted. None of these are errors, they are verdicts
#[derive(Debug, PartialEq, Clone)]
pub enum Rejection {
    // No alternative of `nonterminal` starts with the lookahead
    NoMatchingProduction { nonterminal: Symbol, lookahead: Symbol },
    // The terminal on top of the stack is not the next input character
    TerminalMismatch { expected: Symbol, found: Symbol },
    // The input ran out while symbols were still pending
    PrematureInputExhaustion,
    // Everything was derived but input is left over
    TrailingInput,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NoMatchingProduction { nonterminal, lookahead } => write!(f, "No rule for {} starts with `{}`", nonterminal, lookahead),
            Rejection::TerminalMismatch { expected, found } => write!(f, "Expected `{}` but found `{}`", expected, found),
            Rejection::PrematureInputExhaustion => write!(f, "The input ended before the derivation was complete"),
            Rejection::TrailingInput => write!(f, "The derivation finished before the input did"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

#[derive(Debug, PartialEq, Clone)]
pub struct ParseOutcome {
    pub verdict: Verdict,
    // Complete on acceptance, partial (or missing) otherwise
    pub tree: Option<DerivationTree>,
    // Pending symbols, the next one to be processed first
    pub residual_stack: Vec<Symbol>,
    pub residual_input: Vec<Symbol>,
    // How many terminals were matched against the input
    pub consumed: usize
}

impl ParseOutcome {
    pub fn accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.verdict {
            Verdict::Accepted => None,
            Verdict::Rejected(rejection) => Some(rejection),
        }
    }
}

// A pending symbol and the node its expansion should be attached to
struct Entry {
    symbol: Symbol,
    parent: Option<NodeId>
}

// Everything one parse call owns
struct ParseState {
    stack: Vec<Entry>,
    input: VecDeque<Symbol>,
    builder: TreeBuilder,
    consumed: usize
}

impl ParseState {
    fn new(start_symbol: Symbol, input: &str) -> Self {
        ParseState {
            stack: vec![Entry {
                symbol: start_symbol,
                parent: None
            }],
            input: input.chars().collect(),
            builder: TreeBuilder::new(),
            consumed: 0
        }
    }

    fn finish(self, verdict: Verdict) -> ParseOutcome {
        debug!("verdict: {:?}", verdict);
        ParseOutcome {
            verdict,
            tree: self.builder.finish(),
            residual_stack: self.stack.iter().rev().map(|entry| entry.symbol).collect(),
            residual_input: self.input.into_iter().collect(),
            consumed: self.consumed
        }
    }
}

pub struct ParserEngine<'g> {
    grammar: &'g Grammar
}

impl<'g> ParserEngine<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        ParserEngine { grammar }
    }

    // The first alternative, in stored order, whose first symbol is the
    // lookahead itself
    fn select(&self, nonterminal: Symbol, lookahead: Symbol) -> Option<&'g Production> {
        self.grammar
            .productions(nonterminal)?
            .iter()
            .find(|production| production.first() == Some(&lookahead))
    }

    pub fn parse(&self, input: &str) -> ParseOutcome {
        let mut state = ParseState::new(self.grammar.start_symbol(), input);
        trace!("parsing {:?}", input);

        while !state.stack.is_empty() {
            // Running out of input ends the loop even with symbols pending
            let lookahead = match state.input.front() {
                Some(c) => *c,
                None => break,
            };

            let entry = match state.stack.pop() {
                Some(entry) => entry,
                None => break,
            };

            if self.grammar.is_nonterminal(entry.symbol) {
                let production = match self.select(entry.symbol, lookahead) {
                    Some(p) => p,
                    None => {
                        trace!("no rule for {} with lookahead `{}`", entry.symbol, lookahead);
                        return state.finish(Verdict::Rejected(Rejection::NoMatchingProduction {
                            nonterminal: entry.symbol,
                            lookahead
                        }));
                    }
                };

                trace!("expand {} -> {}", entry.symbol, production.iter().collect::<String>());
                let node = state.builder.add(entry.symbol, entry.parent);
                state.stack.extend(production.iter().rev().map(|symbol| Entry {
                    symbol: *symbol,
                    parent: Some(node)
                }));
            } else if entry.symbol == lookahead {
                trace!("match `{}`", lookahead);
                state.input.pop_front();
                state.consumed += 1;
            } else {
                trace!("expected `{}`, found `{}`", entry.symbol, lookahead);
                return state.finish(Verdict::Rejected(Rejection::TerminalMismatch {
                    expected: entry.symbol,
                    found: lookahead
                }));
            }
        }

        let verdict = match (state.stack.is_empty(), state.input.is_empty()) {
            (true, true) => Verdict::Accepted,
            (false, _) => Verdict::Rejected(Rejection::PrematureInputExhaustion),
            (true, false) => Verdict::Rejected(Rejection::TrailingInput),
        };
        state.finish(verdict)
    }
}
