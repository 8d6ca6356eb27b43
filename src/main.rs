mod cli;

use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use log::{info, warn, LevelFilter};

use cli::Cli;
use topdown::engine::ParserEngine;
use topdown::error_handling::{Error, Location};
use topdown::grammar::Grammar;
use topdown::parser::{self, CompileErrors};
use topdown::shell::{self, Shell};
use topdown::generator;

fn init_logger(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn source_location(cli: &Cli) -> Location {
    match &cli.grammar {
        Some(path) => Location { file: path.clone(), line: 0 },
        None => Location::inline(0),
    }
}

fn load_grammar(cli: &Cli) -> Result<Grammar, CompileErrors> {
    match &cli.grammar {
        Some(path) => parser::parse_file(path),
        None => parser::parse_inline(&cli.rules),
    }
}

fn run(cli: &Cli) -> Result<bool, String> {
    let source = source_location(cli);
    let mut grammar = load_grammar(cli).map_err(|errors| errors.iter().join("\n"))?;
    info!("loaded {} rules from {}", grammar.rule_count(), source);

    for entry in grammar.leading_nonterminal_rules() {
        if let Some(first) = entry.production.first() {
            warn!("rule {} starts with a nonterminal, it is only selected when the next character is literally `{}`", entry, first);
        }
    }

    for edit in &cli.edits {
        let result = grammar.replace_rule(edit.index, &edit.production);
        match result {
            Ok(edit) => println!("{}", edit),
            Err(error) => return Err(Error { location: source, error }.to_string()),
        }
    }

    if let Some(amount) = cli.generate {
        let mut rng = rand::thread_rng();
        let start = cli.start.unwrap_or(grammar.start_symbol());
        for _ in 0..amount {
            let sentence = generator::generate_with_override(&grammar, start, &source, &mut rng).map_err(|e| e.to_string())?;
            println!("{}", sentence);
        }
    }

    let mut all_accepted = true;
    let engine = ParserEngine::new(&grammar);
    for input in &cli.strings {
        let outcome = engine.parse(input);
        println!("{}", shell::describe(&outcome, input, cli.depth));
        all_accepted &= outcome.accepted();
    }

    if cli.interactive {
        let mut shell = Shell::new(grammar, cli.depth, source);
        let stdin = std::io::stdin();
        shell.run(stdin.lock(), &mut std::io::stdout()).map_err(|e| e.to_string())?;
    }

    Ok(all_accepted)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
    }
}
