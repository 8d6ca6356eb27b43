/*
    This module is the command loop a user drives: list and edit rules, then
    test strings against them
*/

use std::io::{self, BufRead, Write};
use std::path::Path;

use itertools::Itertools;
use log::{debug, info};

use crate::engine::{ParseOutcome, ParserEngine};
use crate::error_handling::*;
use crate::generator;
use crate::grammar::Grammar;
use crate::parser;
use crate::tree::DerivationTree;

pub const TREE_TITLE: &str = "Top-Down Parsing Tree";

const HELP: &str = "\
Commands:
    list                    show the current rules with their ids
    edit <id> <production>  replace a rule (a blank production changes nothing)
    parse <string>          test a string, printing its tree when accepted
    tree                    outline the tree of the last accepted string
    reset                   undo every edit
    load <file>             replace the grammar with the one in a file
    generate [amount]       print random sentences of the grammar
    help                    show this message
    quit                    leave";

fn symbols(symbols: &[char]) -> String {
    symbols.iter().collect()
}

// What gets printed for one parse: the verdict, then either the tree or
// whatever was left over
pub fn describe(outcome: &ParseOutcome, input: &str, depth: Option<usize>) -> String {
    match (outcome.rejection(), &outcome.tree) {
        (None, Some(tree)) => format!(
            "The string '{}' is ACCEPTED\n{}",
            input,
            tree.render_levels(TREE_TITLE, depth.unwrap_or(usize::MAX))
        ),
        (None, None) => format!("The string '{}' is ACCEPTED", input),
        (Some(rejection), _) => format!(
            "The string '{}' is REJECTED: {}\n  pending: {}\n  unread: {}",
            input,
            rejection,
            symbols(&outcome.residual_stack),
            symbols(&outcome.residual_input)
        ),
    }
}

pub fn list(grammar: &Grammar) -> String {
    let mut out = String::from("Current grammar rules");
    if grammar.is_modified() {
        out.push_str(" (edited)");
    }
    for entry in grammar.list_rules() {
        out.push_str(&format!("\n    {}", entry));
    }
    out
}

pub struct Shell {
    grammar: Grammar,
    depth: Option<usize>,
    source: Location,
    last_tree: Option<DerivationTree>
}

impl Shell {
    pub fn new(grammar: Grammar, depth: Option<usize>, source: Location) -> Self {
        Shell {
            grammar,
            depth,
            source,
            last_tree: None
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn run(&mut self, input: impl BufRead, output: &mut impl Write) -> io::Result<()> {
        writeln!(output, "{}", list(&self.grammar))?;
        for line in input.lines() {
            let line = line?;
            debug!("shell command {:?}", line);
            if !self.execute(line.trim(), output)? {
                break;
            }
        }
        Ok(())
    }

    // Runs one command. Returns false once the user asks to leave
    fn execute(&mut self, line: &str, output: &mut impl Write) -> io::Result<bool> {
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "list" => writeln!(output, "{}", list(&self.grammar))?,
            "edit" => self.edit(argument, output)?,
            "parse" => {
                let outcome = ParserEngine::new(&self.grammar).parse(argument);
                writeln!(output, "{}", describe(&outcome, argument, self.depth))?;
                if outcome.accepted() {
                    self.last_tree = outcome.tree;
                }
            }
            "tree" => match &self.last_tree {
                Some(tree) => writeln!(output, "{}\n{}", TREE_TITLE, tree)?,
                None => writeln!(output, "No parse tree to display")?,
            },
            "reset" => {
                self.grammar.reset();
                writeln!(output, "{}", list(&self.grammar))?;
            }
            "load" => self.load(argument, output)?,
            "generate" => self.generate(argument, output)?,
            "help" => writeln!(output, "{}", HELP)?,
            "quit" | "exit" => return Ok(false),
            _ => writeln!(output, "Invalid input. Try `help`.")?,
        }
        Ok(true)
    }

    fn edit(&mut self, argument: &str, output: &mut impl Write) -> io::Result<()> {
        let (id, production) = argument.split_once(char::is_whitespace).unwrap_or((argument, ""));
        let id = match id.parse::<usize>() {
            Ok(id) => id,
            Err(_) => return writeln!(output, "Invalid rule id `{}`", id),
        };

        match self.grammar.replace_rule(id, production) {
            Ok(edit) => writeln!(output, "{}", edit),
            Err(error) => writeln!(output, "{}", error),
        }
    }

    // Swaps in the grammar read from `argument`. On failure the current
    // grammar stays
    fn load(&mut self, argument: &str, output: &mut impl Write) -> io::Result<()> {
        if argument.is_empty() {
            return writeln!(output, "Give a grammar file to load");
        }

        let path = Path::new(argument);
        match parser::parse_file(path) {
            Ok(grammar) => {
                info!("loaded {} rules from {}", grammar.rule_count(), path.display());
                self.grammar = grammar;
                self.source = Location { file: path.to_path_buf(), line: 0 };
                self.last_tree = None;
                writeln!(output, "{}", list(&self.grammar))
            }
            Err(errors) => errors.iter().try_for_each(|error| writeln!(output, "{}", error)),
        }
    }

    fn generate(&self, argument: &str, output: &mut impl Write) -> io::Result<()> {
        let amount = if argument.is_empty() { Ok(1) } else { argument.parse::<u32>() };
        let amount = match amount {
            Ok(amount) => amount,
            Err(_) => return writeln!(output, "Invalid amount `{}`", argument),
        };

        let mut rng = rand::thread_rng();
        let sentences = (0..amount)
            .map(|_| generator::generate(&self.grammar, &self.source, &mut rng))
            .map(|sentence| sentence.unwrap_or_else(|error| error.to_string()))
            .join("\n");
        writeln!(output, "{}", sentences)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn a_then_b() -> Grammar {
        Grammar::new(vec![("S", vec!["aB"]), ("B", vec!["b"])]).unwrap()
    }

    fn run(commands: &str) -> (Shell, String) {
        let mut shell = Shell::new(a_then_b(), None, Location::inline(0));
        let mut output = Vec::new();
        shell.run(Cursor::new(commands), &mut output).unwrap();
        (shell, String::from_utf8(output).unwrap())
    }

    #[test]
    fn describe_accepted() {
        let outcome = ParserEngine::new(&a_then_b()).parse("ab");

        assert_eq!(
            describe(&outcome, "ab", None),
            "The string 'ab' is ACCEPTED\nTop-Down Parsing Tree\n  level 0: S\n  level 1: B"
        );
        assert_eq!(
            describe(&outcome, "ab", Some(0)),
            "The string 'ab' is ACCEPTED\nTop-Down Parsing Tree\n  level 0: S"
        );
    }

    #[test]
    fn describe_rejected() {
        let outcome = ParserEngine::new(&a_then_b()).parse("a");

        assert_eq!(
            describe(&outcome, "a", None),
            "The string 'a' is REJECTED: The input ended before the derivation was complete\n  pending: B\n  unread: "
        );
    }

    #[test]
    fn edit_then_parse() {
        let (shell, output) = run("parse ac\nedit 2 c\nparse ac\nquit\nparse ab\n");
        let lines = output.lines().collect::<Vec<_>>();

        assert!(lines.contains(&"The string 'ac' is REJECTED: No rule for B starts with `c`"));
        assert!(lines.contains(&"Updated rule: B -> c"));
        assert!(lines.contains(&"The string 'ac' is ACCEPTED"));
        // Nothing after `quit` runs
        assert!(!output.contains("'ab'"));
        assert!(shell.grammar().is_modified());
    }

    #[test]
    fn blank_edit_changes_nothing() {
        let (shell, output) = run("edit 2\nedit 9 x\nedit two x\n");

        assert!(output.contains("No changes made"));
        assert!(output.contains("There is no rule with id 9"));
        assert!(output.contains("Invalid rule id `two`"));
        assert_eq!(shell.grammar(), &a_then_b());
    }

    #[test]
    fn reset_and_list() {
        let (shell, output) = run("edit 1 xB\nlist\nreset\n");

        assert!(output.contains("Current grammar rules (edited)\n    1. S -> xB\n    2. B -> b"));
        assert!(output.ends_with("Current grammar rules\n    1. S -> aB\n    2. B -> b\n"));
        assert!(!shell.grammar().is_modified());
    }

    #[test]
    fn tree_of_last_accepted() {
        let (_, output) = run("tree\nparse ab\nparse ac\ntree\n");

        assert!(output.contains("No parse tree to display"));
        assert!(output.ends_with("Top-Down Parsing Tree\nS\n└── B\n"));
    }

    #[test]
    fn load_replaces_grammar() {
        let (shell, output) = run("parse ab\nload example_data/nesting.cfg\ntree\nparse ((x))\nparse ab\n");

        assert!(output.contains("Current grammar rules\n    1. S -> (S)\n    2. S -> x"));
        assert!(output.contains("No parse tree to display"));
        assert!(output.contains("The string '((x))' is ACCEPTED"));
        assert!(output.contains("The string 'ab' is REJECTED: No rule for S starts with `a`"));
        assert_eq!(shell.grammar().rule_count(), 2);
        assert!(!shell.grammar().is_modified());
    }

    #[test]
    fn failed_load_keeps_grammar() {
        let (shell, output) = run("load example_data/does_not_exist.cfg\nload\nparse ab\n");

        assert!(output.contains("example_data/does_not_exist.cfg"));
        assert!(output.contains("File error"));
        assert!(output.contains("Give a grammar file to load"));
        assert!(output.contains("The string 'ab' is ACCEPTED"));
        assert_eq!(shell.grammar(), &a_then_b());
    }

    #[test]
    fn generate_and_unknown() {
        let (_, output) = run("generate 2\ngenerate x\nfrobnicate\n");

        assert!(output.contains("ab\nab\n"));
        assert!(output.contains("Invalid amount `x`"));
        assert!(output.contains("Invalid input. Try `help`."));
    }
}
